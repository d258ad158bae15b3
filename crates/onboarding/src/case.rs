use std::{borrow::Cow, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{
    domain::{EntityKind, RecordId},
    record::{Entity, FieldProblem, FieldSpec},
};
use uuid::Uuid;

use crate::{
    document::{Document, DocumentArtifact, DocumentKey, NewDocument},
    error::OnboardingError,
    status::{OnboardStatus, WorkflowState},
};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub work_state: String,
    #[serde(default)]
    pub client_location: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub reporting_to: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub overtime_exemption: String,
}

/// Placement terms. Rates and commissions stay as entered; they are only
/// interpreted to reject negative amounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub name_of_recruiter: String,
    #[serde(default)]
    pub contact_number_of_recruiter: String,
    #[serde(default)]
    pub bill_rate: String,
    #[serde(default)]
    pub pay_rate: String,
    #[serde(default)]
    pub payment_frequency: String,
    #[serde(default)]
    pub account_manager_commission: String,
    #[serde(default)]
    pub recruitment_manager_commission: String,
    #[serde(default)]
    pub recruitment_commission: String,
    #[serde(default)]
    pub additional_information: String,
    #[serde(default)]
    pub additional_commission: String,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub vendor: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Immigration {
    #[serde(default)]
    pub processing_type: String,
    #[serde(default)]
    pub who_is_going_to_pay_premium: String,
    #[serde(default)]
    pub immigration_job_title: String,
    #[serde(default)]
    pub current_h1b_validity: String,
    #[serde(default)]
    pub current_lac_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingDraft {
    #[serde(default)]
    pub submitted_by: String,
    #[serde(flatten)]
    pub profile: Profile,
    #[serde(flatten)]
    pub job: Job,
    #[serde(flatten)]
    pub immigration: Immigration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingCase {
    pub id: RecordId,
    pub uuid: Uuid,
    pub created_by: String,
    pub created_date: DateTime<Utc>,
    pub modified_by: String,
    pub modified_date: DateTime<Utc>,
    #[serde(flatten)]
    workflow: WorkflowState,
    #[serde(flatten)]
    pub profile: Profile,
    #[serde(flatten)]
    pub job: Job,
    #[serde(flatten)]
    pub immigration: Immigration,
    #[serde(default)]
    documents: Vec<Document>,
}

/// Outcome of a successful status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub from: OnboardStatus,
    pub requested: OnboardStatus,
    pub to: OnboardStatus,
}

impl OnboardingCase {
    pub fn open(id: RecordId, uuid: Uuid, draft: OnboardingDraft, at: DateTime<Utc>) -> Self {
        Self {
            id,
            uuid,
            created_by: draft.submitted_by.clone(),
            created_date: at,
            modified_by: draft.submitted_by,
            modified_date: at,
            workflow: WorkflowState::default(),
            profile: draft.profile,
            job: draft.job,
            immigration: draft.immigration,
            documents: Vec::new(),
        }
    }

    pub fn status(&self) -> OnboardStatus {
        self.workflow.status()
    }

    pub fn held_from(&self) -> Option<OnboardStatus> {
        self.workflow.held_from
    }

    pub fn workflow(&self) -> WorkflowState {
        self.workflow
    }

    pub fn is_closed(&self) -> bool {
        self.workflow.is_closed()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document(&self, key: &DocumentKey) -> Option<&Document> {
        self.documents.iter().find(|document| &document.key == key)
    }

    pub fn transition(
        &mut self,
        target: OnboardStatus,
        actor: &str,
        at: DateTime<Utc>,
    ) -> Result<StatusChange, OnboardingError> {
        let from = self.workflow.status();
        let next = self.workflow.apply(target)?;
        self.workflow = next;
        self.touch(actor, at);
        Ok(StatusChange {
            from,
            requested: target,
            to: next.status(),
        })
    }

    pub fn add_document(
        &mut self,
        document: NewDocument,
        actor: &str,
        at: DateTime<Utc>,
    ) -> Result<DocumentKey, OnboardingError> {
        self.ensure_open()?;
        if document.document_type.trim().is_empty() {
            return Err(OnboardingError::MissingDocumentType);
        }
        if document.key.as_ref().is_some_and(|key| key.as_str().trim().is_empty()) {
            return Err(OnboardingError::BlankDocumentKey);
        }
        let key = document.key.unwrap_or_else(DocumentKey::generate);
        if self.document(&key).is_some() {
            return Err(OnboardingError::DuplicateDocumentKey(key));
        }
        self.documents.push(Document {
            key: key.clone(),
            name: document.name,
            document_type: document.document_type,
            file: document.file,
        });
        self.touch(actor, at);
        Ok(key)
    }

    pub fn rename_document(
        &mut self,
        key: &DocumentKey,
        name: Option<String>,
        actor: &str,
        at: DateTime<Utc>,
    ) -> Result<(), OnboardingError> {
        self.document_mut(key)?.name = name.filter(|name| !name.trim().is_empty());
        self.touch(actor, at);
        Ok(())
    }

    pub fn retype_document(
        &mut self,
        key: &DocumentKey,
        document_type: String,
        actor: &str,
        at: DateTime<Utc>,
    ) -> Result<(), OnboardingError> {
        if document_type.trim().is_empty() {
            self.ensure_open()?;
            return Err(OnboardingError::MissingDocumentType);
        }
        self.document_mut(key)?.document_type = document_type;
        self.touch(actor, at);
        Ok(())
    }

    pub fn replace_artifact(
        &mut self,
        key: &DocumentKey,
        file: Option<DocumentArtifact>,
        actor: &str,
        at: DateTime<Utc>,
    ) -> Result<(), OnboardingError> {
        self.document_mut(key)?.file = file;
        self.touch(actor, at);
        Ok(())
    }

    pub fn remove_document(
        &mut self,
        key: &DocumentKey,
        actor: &str,
        at: DateTime<Utc>,
    ) -> Result<Document, OnboardingError> {
        self.ensure_open()?;
        let index = self
            .documents
            .iter()
            .position(|document| &document.key == key)
            .ok_or_else(|| OnboardingError::UnknownDocument(key.clone()))?;
        let removed = self.documents.remove(index);
        self.touch(actor, at);
        Ok(removed)
    }

    /// Profile and job invariants of the stored case.
    pub fn problems(&self) -> Vec<FieldProblem> {
        let mut problems = date_order_problems(&self.profile);
        problems.extend(rate_problems(&self.job));
        problems
    }

    fn document_mut(&mut self, key: &DocumentKey) -> Result<&mut Document, OnboardingError> {
        self.ensure_open()?;
        self.documents
            .iter_mut()
            .find(|document| &document.key == key)
            .ok_or_else(|| OnboardingError::UnknownDocument(key.clone()))
    }

    fn ensure_open(&self) -> Result<(), OnboardingError> {
        if self.is_closed() {
            return Err(OnboardingError::CaseClosed {
                status: self.status(),
            });
        }
        Ok(())
    }

    fn touch(&mut self, actor: &str, at: DateTime<Utc>) {
        self.modified_by = actor.to_string();
        self.modified_date = at;
    }
}

fn date_order_problems(profile: &Profile) -> Vec<FieldProblem> {
    match (profile.start_date, profile.end_date) {
        (Some(start), Some(end)) if start > end => vec![FieldProblem::Invalid {
            field: "end_date",
            reason: format!("({end}) is before start_date ({start})"),
        }],
        _ => Vec::new(),
    }
}

fn rate_problems(job: &Job) -> Vec<FieldProblem> {
    [
        ("bill_rate", &job.bill_rate),
        ("pay_rate", &job.pay_rate),
        ("account_manager_commission", &job.account_manager_commission),
        (
            "recruitment_manager_commission",
            &job.recruitment_manager_commission,
        ),
        ("recruitment_commission", &job.recruitment_commission),
        ("additional_commission", &job.additional_commission),
    ]
    .into_iter()
    .filter(|(_, value)| is_negative_amount(value))
    .map(|(field, _)| FieldProblem::Invalid {
        field,
        reason: "must not be negative".to_string(),
    })
    .collect()
}

/// Amounts are free text ("$45.50", "USD -12", "12%", "45/hr"); only a
/// readable amount below zero is rejected.
fn is_negative_amount(raw: &str) -> bool {
    let compact: String = raw
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != ',')
        .collect();
    let unit = |ch: char| ch.is_alphabetic() || matches!(ch, '$' | '€' | '£' | '¥' | '₹');
    let rest = compact.trim_start_matches(unit);
    let Some(rest) = rest.strip_prefix('-') else {
        return false;
    };
    let rest = rest.trim_start_matches(unit);
    let end = rest
        .find(|ch: char| !ch.is_ascii_digit() && ch != '.')
        .unwrap_or(rest.len());
    Decimal::from_str(&rest[..end]).is_ok_and(|amount| amount > Decimal::ZERO)
}

fn parse_date(field: &'static str, value: &str) -> Result<Option<NaiveDate>, FieldProblem> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(Some)
        .map_err(|_| FieldProblem::Invalid {
            field,
            reason: format!("`{value}` is not a YYYY-MM-DD date"),
        })
}

fn format_date(date: Option<NaiveDate>) -> Option<Cow<'static, str>> {
    date.map(|date| Cow::Owned(date.format(DATE_FORMAT).to_string()))
}

macro_rules! group_field {
    ($group:ident . $field:ident, $label:literal, $required:literal) => {
        FieldSpec {
            name: stringify!($field),
            label: $label,
            required: $required,
            numeric: false,
            get: |value| Some(Cow::Borrowed(value.$group.$field.as_str())),
        }
    };
}

macro_rules! onboarding_fields {
    ($($head:expr),* ; $($tail:expr),*) => {
        &[
            $($head,)*
            FieldSpec {
                name: "start_date",
                label: "Start Date",
                required: true,
                numeric: false,
                get: |value| format_date(value.profile.start_date),
            },
            FieldSpec {
                name: "end_date",
                label: "End Date",
                required: false,
                numeric: false,
                get: |value| format_date(value.profile.end_date),
            },
            group_field!(profile.designation, "Designation", true),
            group_field!(job.vendor, "Vendor", true),
            group_field!(profile.work_state, "Work State", false),
            group_field!(profile.client_location, "Client Location", false),
            group_field!(profile.experience, "Experience", false),
            group_field!(profile.department, "Department", false),
            group_field!(profile.reporting_to, "Reporting To", false),
            group_field!(profile.overtime_exemption, "Overtime Exemption", false),
            group_field!(job.name_of_recruiter, "Recruiter", false),
            group_field!(job.contact_number_of_recruiter, "Recruiter Contact", false),
            group_field!(job.bill_rate, "Bill Rate", false),
            group_field!(job.pay_rate, "Pay Rate", false),
            group_field!(job.payment_frequency, "Payment Frequency", false),
            group_field!(job.account_manager_commission, "Account Manager Commission", false),
            group_field!(
                job.recruitment_manager_commission,
                "Recruitment Manager Commission",
                false
            ),
            group_field!(job.recruitment_commission, "Recruitment Commission", false),
            group_field!(job.additional_information, "Additional Information", false),
            group_field!(job.additional_commission, "Additional Commission", false),
            group_field!(job.remarks, "Remarks", false),
            group_field!(immigration.processing_type, "Processing Type", false),
            group_field!(immigration.who_is_going_to_pay_premium, "Premium Paid By", false),
            group_field!(immigration.immigration_job_title, "Immigration Job Title", false),
            group_field!(immigration.current_h1b_validity, "H1B Validity", false),
            group_field!(immigration.current_lac_number, "LCA Number", false),
            $($tail,)*
        ]
    };
}

impl Entity for OnboardingCase {
    const KIND: EntityKind = EntityKind::Onboarding;

    type Draft = OnboardingDraft;

    fn id(&self) -> RecordId {
        self.id
    }

    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn fields() -> &'static [FieldSpec<Self>] {
        const ID: FieldSpec<OnboardingCase> = FieldSpec {
            name: "id",
            label: "ID",
            required: false,
            numeric: true,
            get: |case| Some(Cow::Owned(case.id.to_string())),
        };
        const UUID: FieldSpec<OnboardingCase> = FieldSpec {
            name: "uuid",
            label: "UUID",
            required: false,
            numeric: false,
            get: |case| Some(Cow::Owned(case.uuid.to_string())),
        };
        const STATUS: FieldSpec<OnboardingCase> = FieldSpec {
            name: "onboard_status",
            label: "Status",
            required: true,
            numeric: false,
            get: |case| Some(Cow::Borrowed(case.workflow.onboard_status.as_str())),
        };
        const CREATED_BY: FieldSpec<OnboardingCase> = FieldSpec {
            name: "created_by",
            label: "Created By",
            required: false,
            numeric: false,
            get: |case| Some(Cow::Borrowed(case.created_by.as_str())),
        };
        const FIELDS: &[FieldSpec<OnboardingCase>] = onboarding_fields!(ID, UUID, STATUS; CREATED_BY);
        FIELDS
    }

    fn draft_fields() -> &'static [FieldSpec<OnboardingDraft>] {
        const SUBMITTED_BY: FieldSpec<OnboardingDraft> = FieldSpec {
            name: "submitted_by",
            label: "Submitted By",
            required: true,
            numeric: false,
            get: |draft| Some(Cow::Borrowed(draft.submitted_by.as_str())),
        };
        const FIELDS: &[FieldSpec<OnboardingDraft>] = onboarding_fields!(SUBMITTED_BY;);
        FIELDS
    }

    fn from_draft(id: RecordId, uuid: Uuid, draft: OnboardingDraft) -> Self {
        Self::open(id, uuid, draft, Utc::now())
    }

    fn apply_draft(&mut self, draft: OnboardingDraft) {
        self.profile = draft.profile;
        self.job = draft.job;
        self.immigration = draft.immigration;
        self.touch(&draft.submitted_by, Utc::now());
    }

    fn to_draft(&self) -> OnboardingDraft {
        OnboardingDraft {
            submitted_by: self.modified_by.clone(),
            profile: self.profile.clone(),
            job: self.job.clone(),
            immigration: self.immigration.clone(),
        }
    }

    fn set_draft_field(
        draft: &mut OnboardingDraft,
        field: &str,
        value: String,
    ) -> Result<(), FieldProblem> {
        let slot = match field {
            "start_date" => {
                draft.profile.start_date = parse_date("start_date", &value)?;
                return Ok(());
            }
            "end_date" => {
                draft.profile.end_date = parse_date("end_date", &value)?;
                return Ok(());
            }
            "submitted_by" => &mut draft.submitted_by,
            "work_state" => &mut draft.profile.work_state,
            "client_location" => &mut draft.profile.client_location,
            "experience" => &mut draft.profile.experience,
            "department" => &mut draft.profile.department,
            "reporting_to" => &mut draft.profile.reporting_to,
            "designation" => &mut draft.profile.designation,
            "overtime_exemption" => &mut draft.profile.overtime_exemption,
            "name_of_recruiter" => &mut draft.job.name_of_recruiter,
            "contact_number_of_recruiter" => &mut draft.job.contact_number_of_recruiter,
            "bill_rate" => &mut draft.job.bill_rate,
            "pay_rate" => &mut draft.job.pay_rate,
            "payment_frequency" => &mut draft.job.payment_frequency,
            "account_manager_commission" => &mut draft.job.account_manager_commission,
            "recruitment_manager_commission" => &mut draft.job.recruitment_manager_commission,
            "recruitment_commission" => &mut draft.job.recruitment_commission,
            "additional_information" => &mut draft.job.additional_information,
            "additional_commission" => &mut draft.job.additional_commission,
            "remarks" => &mut draft.job.remarks,
            "vendor" => &mut draft.job.vendor,
            "processing_type" => &mut draft.immigration.processing_type,
            "who_is_going_to_pay_premium" => &mut draft.immigration.who_is_going_to_pay_premium,
            "immigration_job_title" => &mut draft.immigration.immigration_job_title,
            "current_h1b_validity" => &mut draft.immigration.current_h1b_validity,
            "current_lac_number" => &mut draft.immigration.current_lac_number,
            _ => {
                return Err(FieldProblem::Unknown {
                    field: field.to_string(),
                })
            }
        };
        *slot = value;
        Ok(())
    }

    fn check_draft(draft: &OnboardingDraft) -> Vec<FieldProblem> {
        let mut problems = date_order_problems(&draft.profile);
        problems.extend(rate_problems(&draft.job));
        problems
    }

    fn display_name(&self) -> String {
        if self.profile.designation.is_empty() {
            format!("onboarding {}", self.uuid)
        } else {
            format!("{} onboarding", self.profile.designation)
        }
    }
}

#[cfg(test)]
#[path = "tests/case_tests.rs"]
mod tests;
