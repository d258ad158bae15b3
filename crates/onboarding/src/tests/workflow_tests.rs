use std::sync::atomic::{AtomicBool, Ordering};

use shared::domain::RecordId;

use super::*;
use crate::case::OnboardingDraft;

fn seeded_case() -> OnboardingCase {
    let mut draft = OnboardingDraft {
        submitted_by: "recruiter".into(),
        ..OnboardingDraft::default()
    };
    draft.profile.designation = "QA Lead".into();
    OnboardingCase::open(RecordId(1), Uuid::new_v4(), draft, Utc::now())
}

/// Loads from an inner store but can be told to refuse saves.
struct FlakyStore {
    inner: MemoryCaseStore,
    fail_saves: AtomicBool,
}

#[async_trait]
impl CaseStore for FlakyStore {
    async fn load_case(&self, uuid: Uuid) -> Result<Option<OnboardingCase>> {
        self.inner.load_case(uuid).await
    }

    async fn save_case(&self, case: &OnboardingCase) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(anyhow!("disk full"));
        }
        self.inner.save_case(case).await
    }
}

/// Yields to the scheduler between reading and returning a case.
struct SlowLoadStore {
    inner: MemoryCaseStore,
}

#[async_trait]
impl CaseStore for SlowLoadStore {
    async fn load_case(&self, uuid: Uuid) -> Result<Option<OnboardingCase>> {
        let case = self.inner.load_case(uuid).await;
        tokio::task::yield_now().await;
        case
    }

    async fn save_case(&self, case: &OnboardingCase) -> Result<()> {
        self.inner.save_case(case).await
    }
}

#[tokio::test]
async fn transition_is_persisted_with_actor() {
    let case = seeded_case();
    let uuid = case.uuid;
    let workflow = CaseWorkflow::new(MemoryCaseStore::with_cases([case]), "coordinator");

    let change = workflow
        .transition(uuid, OnboardStatus::PreInprogress)
        .await
        .expect("forward");
    assert_eq!(change.to, OnboardStatus::PreInprogress);

    let stored = workflow.case(uuid).await.expect("stored");
    assert_eq!(stored.status(), OnboardStatus::PreInprogress);
    assert_eq!(stored.modified_by, "coordinator");
}

#[tokio::test]
async fn rejected_transition_does_not_save() {
    let case = seeded_case();
    let uuid = case.uuid;
    let workflow = CaseWorkflow::new(MemoryCaseStore::with_cases([case.clone()]), "coordinator");

    let err = workflow
        .transition(uuid, OnboardStatus::OnboardingCompleted)
        .await
        .expect_err("skip");
    assert!(matches!(
        err,
        WorkflowError::Rejected(OnboardingError::InvalidTransition { .. })
    ));
    assert_eq!(workflow.case(uuid).await.expect("stored"), case);
}

#[tokio::test]
async fn unknown_case_is_not_found() {
    let workflow = CaseWorkflow::new(MemoryCaseStore::default(), "coordinator");
    let uuid = Uuid::new_v4();
    let err = workflow
        .transition(uuid, OnboardStatus::Hold)
        .await
        .expect_err("missing");
    assert!(matches!(err, WorkflowError::NotFound(missing) if missing == uuid));
}

#[tokio::test]
async fn hold_then_reinitiate_survives_reload() {
    let case = seeded_case();
    let uuid = case.uuid;
    let workflow = CaseWorkflow::new(MemoryCaseStore::with_cases([case]), "coordinator");

    workflow
        .transition(uuid, OnboardStatus::PreInprogress)
        .await
        .expect("forward");
    workflow
        .transition(uuid, OnboardStatus::Hold)
        .await
        .expect("hold");
    let held = workflow.case(uuid).await.expect("stored");
    assert_eq!(held.held_from(), Some(OnboardStatus::PreInprogress));

    let change = workflow
        .transition(uuid, OnboardStatus::Reinitiated)
        .await
        .expect("reinitiate");
    assert_eq!(change.requested, OnboardStatus::Reinitiated);
    assert_eq!(change.to, OnboardStatus::PreInprogress);
}

#[tokio::test]
async fn document_lifecycle_is_persisted() {
    let case = seeded_case();
    let uuid = case.uuid;
    let workflow = CaseWorkflow::new(MemoryCaseStore::with_cases([case]), "coordinator");

    let key = workflow
        .add_document(uuid, NewDocument::of_type("PASSPORT"))
        .await
        .expect("add");
    workflow
        .rename_document(uuid, &key, Some("Passport".into()))
        .await
        .expect("rename");
    workflow
        .retype_document(uuid, &key, "VISA".into())
        .await
        .expect("retype");
    workflow
        .replace_artifact(
            uuid,
            &key,
            Some(DocumentArtifact::from_bytes("visa.pdf", None, b"visa")),
        )
        .await
        .expect("replace");

    let stored = workflow.case(uuid).await.expect("stored");
    let document = stored.document(&key).expect("document");
    assert_eq!(document.name.as_deref(), Some("Passport"));
    assert_eq!(document.document_type, "VISA");

    let removed = workflow.remove_document(uuid, &key).await.expect("remove");
    assert_eq!(removed.key, key);
    assert!(workflow
        .case(uuid)
        .await
        .expect("stored")
        .documents()
        .is_empty());
}

#[tokio::test]
async fn failed_save_leaves_stored_case_unchanged() {
    let case = seeded_case();
    let uuid = case.uuid;
    let store = FlakyStore {
        inner: MemoryCaseStore::with_cases([case.clone()]),
        fail_saves: AtomicBool::new(true),
    };
    let workflow = CaseWorkflow::new(store, "coordinator");

    let err = workflow
        .transition(uuid, OnboardStatus::Hold)
        .await
        .expect_err("save fails");
    assert!(matches!(err, WorkflowError::Store(_)));
    assert!(workflow
        .add_document(uuid, NewDocument::of_type("I9"))
        .await
        .is_err());
    assert_eq!(workflow.case(uuid).await.expect("stored"), case);

    workflow.store().fail_saves.store(false, Ordering::SeqCst);
    workflow
        .transition(uuid, OnboardStatus::Hold)
        .await
        .expect("save recovers");
}

#[tokio::test]
async fn missing_store_reports_store_errors() {
    let workflow = CaseWorkflow::new(MissingCaseStore, "coordinator");
    let err = workflow.case(Uuid::new_v4()).await.expect_err("no store");
    assert!(matches!(err, WorkflowError::Store(_)));
}

#[tokio::test]
async fn concurrent_changes_to_one_case_are_both_kept() {
    let case = seeded_case();
    let uuid = case.uuid;
    let workflow = CaseWorkflow::new(
        SlowLoadStore {
            inner: MemoryCaseStore::with_cases([case]),
        },
        "coordinator",
    );

    let (first, second) = tokio::join!(
        workflow.add_document(uuid, NewDocument::of_type("I9").with_key("i9")),
        workflow.add_document(uuid, NewDocument::of_type("W4").with_key("w4")),
    );
    first.expect("first attach");
    second.expect("second attach");

    let stored = workflow.case(uuid).await.expect("stored");
    let keys: Vec<&str> = stored
        .documents()
        .iter()
        .map(|document| document.key.as_str())
        .collect();
    assert_eq!(keys, vec!["i9", "w4"]);
}
