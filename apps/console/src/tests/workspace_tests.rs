use onboarding::{CaseWorkflow, NewDocument, OnboardStatus, OnboardingDraft};
use shared::entities::{ClientDraft, RoleDraft};

use super::*;

fn workspace() -> (tempfile::TempDir, JsonWorkspace) {
    let dir = tempfile::tempdir().expect("tempdir");
    let workspace = JsonWorkspace::new(dir.path().join("console.json"));
    (dir, workspace)
}

fn client_draft(first_name: &str) -> ClientDraft {
    ClientDraft {
        first_name: first_name.into(),
        last_name: "Adams".into(),
        primary_email: "amy@example.com".into(),
        primary_phone: "555-0100".into(),
        ..ClientDraft::default()
    }
}

#[tokio::test]
async fn missing_file_reads_as_empty_workspace() {
    let (_dir, workspace) = workspace();
    let clients: Vec<Client> = workspace.fetch_all().await.expect("fetch");
    assert!(clients.is_empty());
}

#[tokio::test]
async fn records_persist_across_instances() {
    let (_dir, workspace) = workspace();
    let amy: Client = workspace
        .create_one(&client_draft("Amy"))
        .await
        .expect("create");
    let bob: Client = workspace
        .create_one(&client_draft("Bob"))
        .await
        .expect("create");
    assert_eq!(amy.id, RecordId(1));
    assert_eq!(bob.id, RecordId(2));

    let reopened = JsonWorkspace::new(workspace.path());
    let clients: Vec<Client> = reopened.fetch_all().await.expect("fetch");
    assert_eq!(clients, vec![amy, bob]);

    let roles: Vec<Role> = reopened.fetch_all().await.expect("fetch");
    assert!(roles.is_empty());
}

#[tokio::test]
async fn edit_and_delete_target_by_uuid() {
    let (_dir, workspace) = workspace();
    let role: Role = workspace
        .create_one(&RoleDraft {
            name: "Recruiter".into(),
            ..RoleDraft::default()
        })
        .await
        .expect("create");

    let mut draft = role.to_draft();
    draft.department_uuid = Some("ops".into());
    let edited: Role = workspace.edit_one(role.uuid, &draft).await.expect("edit");
    assert_eq!(edited.department_uuid.as_deref(), Some("ops"));
    assert_eq!(edited.id, role.id);

    DataSource::<Role>::delete_one(&workspace, role.uuid)
        .await
        .expect("delete");
    let err = DataSource::<Role>::delete_one(&workspace, role.uuid)
        .await
        .expect_err("already gone");
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn failed_change_leaves_file_untouched() {
    let (_dir, workspace) = workspace();
    let _: Client = workspace
        .create_one(&client_draft("Amy"))
        .await
        .expect("create");
    let before = std::fs::read_to_string(workspace.path()).expect("read");

    let result: Result<Client> = workspace
        .edit_one(Uuid::new_v4(), &client_draft("Nobody"))
        .await;
    assert!(result.is_err());
    assert_eq!(std::fs::read_to_string(workspace.path()).expect("read"), before);
}

#[tokio::test]
async fn failed_replace_removes_staging_file() {
    let (_dir, workspace) = workspace();
    std::fs::create_dir(workspace.path()).expect("dir in the way");
    std::fs::write(workspace.path().join("keep"), "x").expect("occupy dir");

    let err = workspace
        .write(&WorkspaceData::default())
        .await
        .expect_err("cannot replace a directory");
    assert!(err.to_string().contains("failed to replace"));
    assert!(!workspace.path().with_extension("json.tmp").exists());
}

#[tokio::test]
async fn corrupt_file_is_reported() {
    let (_dir, workspace) = workspace();
    std::fs::write(workspace.path(), "{ not json").expect("write");
    let err = DataSource::<Client>::fetch_all(&workspace)
        .await
        .expect_err("corrupt");
    assert!(err.to_string().contains("not valid JSON"));
}

#[tokio::test]
async fn onboarding_cases_round_trip_through_the_workflow() {
    let (_dir, workspace) = workspace();
    let mut draft = OnboardingDraft {
        submitted_by: "recruiter".into(),
        ..OnboardingDraft::default()
    };
    draft.profile.designation = "Analyst".into();
    let case: OnboardingCase = workspace.create_one(&draft).await.expect("create");

    let workflow = CaseWorkflow::new(workspace.clone(), "coordinator");
    workflow
        .transition(case.uuid, OnboardStatus::Hold)
        .await
        .expect("hold");
    let key = workflow
        .add_document(case.uuid, NewDocument::of_type("I9"))
        .await
        .expect("attach");

    let stored: Vec<OnboardingCase> = workspace.fetch_all().await.expect("fetch");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].status(), OnboardStatus::Hold);
    assert_eq!(stored[0].held_from(), Some(OnboardStatus::PreInitiated));
    assert!(stored[0].document(&key).is_some());
    assert_eq!(stored[0].modified_by, "coordinator");
}
