use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use console_core::{ConfirmationPrompt, DeleteOutcome, ListingSession, MissingConfirmationPrompt};
use onboarding::{CaseWorkflow, DocumentArtifact, DocumentKey, NewDocument, OnboardStatus, OnboardingCase};
use shared::{
    domain::EntityKind,
    entities::{Candidate, Client, Contact, Role, Vendor},
    protocol::ListEnvelope,
    record::{find_field, Entity},
};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod config;
mod interaction;
mod workspace;

use config::{ensure_parent_dir_exists, load_settings, Settings};
use interaction::{AutoApprove, PrintNavigator, StdinPrompt, TerminalNotifications};
use workspace::{Collection, JsonWorkspace};

#[derive(Parser, Debug)]
#[command(name = "console", version, about = "Staffing console")]
struct Cli {
    /// Workspace file; overrides console.toml and CONSOLE_DATA_FILE.
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,
    /// Name recorded on onboarding changes.
    #[arg(long, global = true)]
    actor: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Listing(ListingCommand),
    /// Onboarding status and documents.
    #[command(subcommand)]
    Onboarding(OnboardingCommand),
}

#[derive(Subcommand, Debug)]
enum ListingCommand {
    /// List records of one kind.
    List {
        kind: EntityKind,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long, requires = "sort")]
        reverse: bool,
        /// Print a `{ data, ok, message }` envelope instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Show the field names and headings of a kind.
    Fields { kind: EntityKind },
    /// Print the detail route of a record.
    Open { kind: EntityKind, uuid: Uuid },
    Create {
        kind: EntityKind,
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
    Edit {
        kind: EntityKind,
        uuid: Uuid,
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
    Delete {
        kind: EntityKind,
        uuid: Uuid,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

impl ListingCommand {
    fn kind(&self) -> EntityKind {
        match self {
            ListingCommand::List { kind, .. }
            | ListingCommand::Fields { kind }
            | ListingCommand::Open { kind, .. }
            | ListingCommand::Create { kind, .. }
            | ListingCommand::Edit { kind, .. }
            | ListingCommand::Delete { kind, .. } => *kind,
        }
    }
}

#[derive(Subcommand, Debug)]
enum OnboardingCommand {
    Show {
        uuid: Uuid,
    },
    /// Move a case to another status.
    Status {
        uuid: Uuid,
        status: OnboardStatus,
    },
    Attach {
        uuid: Uuid,
        #[arg(long = "type")]
        document_type: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        key: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        mime: Option<String>,
    },
    RenameDoc {
        uuid: Uuid,
        key: String,
        /// Omit to clear the name.
        name: Option<String>,
    },
    RetypeDoc {
        uuid: Uuid,
        key: String,
        document_type: String,
    },
    /// Replace a document's file; omit the path to detach it.
    ReplaceFile {
        uuid: Uuid,
        key: String,
        file: Option<PathBuf>,
        #[arg(long)]
        mime: Option<String>,
    },
    RemoveDoc {
        uuid: Uuid,
        key: String,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got `{raw}`"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in `{raw}`"));
    }
    Ok((field.to_string(), value.to_string()))
}

struct Console {
    settings: Settings,
    workspace: JsonWorkspace,
}

impl Console {
    fn session<E: Collection>(&self, prompt: Arc<dyn ConfirmationPrompt>) -> ListingSession<E> {
        ListingSession::new(
            Arc::new(self.workspace.clone()),
            Arc::new(TerminalNotifications),
            prompt,
            Arc::new(PrintNavigator),
        )
    }
}

macro_rules! for_kind {
    ($kind:expr, $run:ident($($arg:expr),*)) => {
        match $kind {
            EntityKind::Client => $run::<Client>($($arg),*).await,
            EntityKind::Vendor => $run::<Vendor>($($arg),*).await,
            EntityKind::Contact => $run::<Contact>($($arg),*).await,
            EntityKind::Role => $run::<Role>($($arg),*).await,
            EntityKind::Candidate => $run::<Candidate>($($arg),*).await,
            EntityKind::Onboarding => $run::<OnboardingCase>($($arg),*).await,
        }
    };
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(path) = cli.data_file {
        settings.data_file = path;
    }
    if let Some(actor) = cli.actor {
        settings.actor = actor;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    ensure_parent_dir_exists(&settings.data_file)?;
    let console = Console {
        workspace: JsonWorkspace::new(&settings.data_file),
        settings,
    };

    match cli.command {
        Command::Listing(command) => {
            let kind = command.kind();
            for_kind!(kind, run_listing(&console, command))
        }
        Command::Onboarding(command) => run_onboarding(&console, command).await,
    }
}

async fn run_listing<E: Collection>(console: &Console, command: ListingCommand) -> Result<()> {
    match command {
        ListingCommand::List {
            search,
            sort,
            reverse,
            json,
            ..
        } => {
            let mut session = console.session::<E>(Arc::new(MissingConfirmationPrompt));
            if let Err(err) = session.load().await {
                if json {
                    let envelope = ListEnvelope::<E>::failed(err.to_string());
                    println!("{}", serde_json::to_string_pretty(&envelope)?);
                }
                return Err(err.into());
            }
            if let Some(field) = sort.as_deref() {
                session.set_sort(field)?;
                if reverse {
                    session.set_sort(field)?;
                }
            }
            session.set_search(search);

            if json {
                let envelope = ListEnvelope::ok(session.rows().to_vec());
                println!("{}", serde_json::to_string_pretty(&envelope)?);
            } else {
                print!("{}", render_table(session.rows()));
            }
        }
        ListingCommand::Fields { .. } => {
            for field in E::fields() {
                let marker = if field.required { " *" } else { "" };
                println!("{:<32} {}{marker}", field.name, field.label);
            }
        }
        ListingCommand::Open { uuid, .. } => {
            let mut session = console.session::<E>(Arc::new(MissingConfirmationPrompt));
            session.load().await?;
            if session.store().find(uuid).is_none() {
                warn!(kind = %E::KIND, %uuid, "opening a record that is not in the listing");
            }
            session.open_detail(uuid);
        }
        ListingCommand::Create { set, .. } => {
            let mut session = console.session::<E>(Arc::new(MissingConfirmationPrompt));
            session.load().await?;
            let mut draft = E::Draft::default();
            stamp_actor::<E>(&mut draft, &console.settings.actor);
            apply_assignments::<E>(&mut draft, set)?;
            let created = session.create(draft).await?;
            println!("{}", created.uuid());
        }
        ListingCommand::Edit { uuid, set, .. } => {
            let mut session = console.session::<E>(Arc::new(MissingConfirmationPrompt));
            session.load().await?;
            let mut draft = session.request_edit(uuid)?;
            stamp_actor::<E>(&mut draft, &console.settings.actor);
            apply_assignments::<E>(&mut draft, set)?;
            session.submit_edit(draft).await?;
        }
        ListingCommand::Delete { uuid, yes, .. } => {
            let prompt: Arc<dyn ConfirmationPrompt> = if yes {
                Arc::new(AutoApprove)
            } else {
                Arc::new(StdinPrompt)
            };
            let mut session = console.session::<E>(prompt);
            session.load().await?;
            if session.delete(uuid).await? == DeleteOutcome::Cancelled {
                println!("Delete cancelled.");
            }
        }
    }
    Ok(())
}

/// Onboarding drafts record who submitted them; other kinds have no such field.
fn stamp_actor<E: Entity>(draft: &mut E::Draft, actor: &str) {
    if find_field(E::draft_fields(), "submitted_by").is_none() {
        return;
    }
    if let Err(problem) = E::set_draft_field(draft, "submitted_by", actor.to_string()) {
        warn!(%problem, "could not record submitter");
    }
}

fn apply_assignments<E: Entity>(
    draft: &mut E::Draft,
    assignments: Vec<(String, String)>,
) -> Result<()> {
    for (field, value) in assignments {
        E::set_draft_field(draft, &field, value).map_err(|problem| anyhow!("{problem}"))?;
    }
    Ok(())
}

fn render_table<E: Entity>(rows: &[E]) -> String {
    let fields = E::fields();
    let mut lines = vec![fields.iter().map(|field| field.label.to_string()).collect::<Vec<_>>()];
    for row in rows {
        lines.push(fields.iter().map(|field| field.text(row).into_owned()).collect());
    }

    let mut widths = vec![0; fields.len()];
    for line in &lines {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for line in &lines {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        out.push_str(cells.join(" | ").trim_end());
        out.push('\n');
    }
    out
}

async fn run_onboarding(console: &Console, command: OnboardingCommand) -> Result<()> {
    let workflow = CaseWorkflow::new(console.workspace.clone(), console.settings.actor.clone());
    match command {
        OnboardingCommand::Show { uuid } => {
            let case = workflow.case(uuid).await?;
            print!("{}", describe_case(&case));
        }
        OnboardingCommand::Status { uuid, status } => {
            let change = workflow.transition(uuid, status).await?;
            println!("{} -> {}", change.from, change.to);
        }
        OnboardingCommand::Attach {
            uuid,
            document_type,
            name,
            key,
            file,
            mime,
        } => {
            let mut document = NewDocument::of_type(document_type);
            if let Some(name) = name {
                document = document.named(name);
            }
            if let Some(key) = key {
                document = document.with_key(key.as_str());
            }
            if let Some(path) = file {
                document = document.with_file(read_artifact(&path, mime).await?);
            }
            let key = workflow.add_document(uuid, document).await?;
            println!("{key}");
        }
        OnboardingCommand::RenameDoc { uuid, key, name } => {
            workflow
                .rename_document(uuid, &DocumentKey(key), name)
                .await?;
        }
        OnboardingCommand::RetypeDoc {
            uuid,
            key,
            document_type,
        } => {
            workflow
                .retype_document(uuid, &DocumentKey(key), document_type)
                .await?;
        }
        OnboardingCommand::ReplaceFile {
            uuid,
            key,
            file,
            mime,
        } => {
            let artifact = match file {
                Some(path) => Some(read_artifact(&path, mime).await?),
                None => None,
            };
            workflow
                .replace_artifact(uuid, &DocumentKey(key), artifact)
                .await?;
        }
        OnboardingCommand::RemoveDoc { uuid, key } => {
            let removed = workflow.remove_document(uuid, &DocumentKey(key)).await?;
            println!("removed {} ({})", removed.key, removed.document_type);
        }
    }
    Ok(())
}

async fn read_artifact(path: &Path, mime: Option<String>) -> Result<DocumentArtifact> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(DocumentArtifact::from_bytes(filename, mime, &bytes))
}

fn describe_case(case: &OnboardingCase) -> String {
    let mut out = format!("{}\n", case.display_name());
    out.push_str(&format!("  uuid:      {}\n", case.uuid));
    out.push_str(&format!("  status:    {}\n", case.status()));
    if let Some(held_from) = case.held_from() {
        out.push_str(&format!("  held from: {held_from}\n"));
    }
    let next: Vec<&str> = case
        .workflow()
        .legal_targets()
        .into_iter()
        .map(OnboardStatus::as_str)
        .collect();
    if next.is_empty() {
        out.push_str("  next:      (closed)\n");
    } else {
        out.push_str(&format!("  next:      {}\n", next.join(", ")));
    }
    out.push_str(&format!(
        "  modified:  {} by {}\n",
        case.modified_date.to_rfc3339(),
        case.modified_by
    ));

    if case.documents().is_empty() {
        out.push_str("  documents: none\n");
    } else {
        out.push_str("  documents:\n");
        for document in case.documents() {
            let name = document.name.as_deref().unwrap_or("-");
            let file = document
                .file
                .as_ref()
                .map(|file| format!("{} ({} bytes)", file.filename, file.size_bytes))
                .unwrap_or_else(|| "no file".to_string());
            out.push_str(&format!(
                "    {} [{}] {name}: {file}\n",
                document.key, document.document_type
            ));
        }
    }

    for problem in case.problems() {
        out.push_str(&format!("  warning:   {problem}\n"));
    }
    out
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
