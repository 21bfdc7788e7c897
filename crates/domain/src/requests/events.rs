use chrono::{DateTime, Utc};
use cqrs_es::DomainEvent;
use serde::{Deserialize, Serialize};

use crate::collaborators::Attachment;

use super::aggregate::{MedicineSelection, PersonalDetails, WizardStep};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Event {
    DraftOpened {
        id: String,
        created_at: DateTime<Utc>,
        prefill: Option<MedicineSelection>,
    },

    PersonalDetailsEdited {
        id: String,
        details: PersonalDetails,
        updated_at: DateTime<Utc>,
    },

    MedicineSelected {
        id: String,
        selection: MedicineSelection,
        updated_at: DateTime<Utc>,
    },

    ReasonProvided {
        id: String,
        reason: String,
        updated_at: DateTime<Utc>,
    },

    PrescriptionAttached {
        id: String,
        attachment: Attachment,
        updated_at: DateTime<Utc>,
    },

    StepAdvanced {
        id: String,
        to: WizardStep,
        updated_at: DateTime<Utc>,
    },

    StepRetreated {
        id: String,
        to: WizardStep,
        updated_at: DateTime<Utc>,
    },

    DraftSubmitted {
        id: String,
        updated_at: DateTime<Utc>,
    },

    DraftDiscarded {
        id: String,
        updated_at: DateTime<Utc>,
    },
}

impl DomainEvent for Event {
    fn event_type(&self) -> String {
        match self {
            Event::DraftOpened { .. } => "RequestDraft:Opened".to_string(),
            Event::PersonalDetailsEdited { .. } => "RequestDraft:PersonalDetailsEdited".to_string(),
            Event::MedicineSelected { .. } => "RequestDraft:MedicineSelected".to_string(),
            Event::ReasonProvided { .. } => "RequestDraft:ReasonProvided".to_string(),
            Event::PrescriptionAttached { .. } => "RequestDraft:PrescriptionAttached".to_string(),
            Event::StepAdvanced { .. } => "RequestDraft:StepAdvanced".to_string(),
            Event::StepRetreated { .. } => "RequestDraft:StepRetreated".to_string(),
            Event::DraftSubmitted { .. } => "RequestDraft:Submitted".to_string(),
            Event::DraftDiscarded { .. } => "RequestDraft:Discarded".to_string(),
        }
    }

    fn event_version(&self) -> String {
        "1.0".to_string()
    }
}
