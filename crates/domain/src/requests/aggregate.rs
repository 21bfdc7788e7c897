use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use cqrs_es::Aggregate;
use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::catalog::{self, MedicineRecord};
use crate::collaborators::{Attachment, Coordinates, MedicineSource, SubmissionSink};
use crate::errors::Error;
use crate::validation;

use super::{Command, Event};

/// Wizard position
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Contact and delivery details
    PersonalDetails,
    /// Medicine pick, quantity, prescription
    MedicineInfo,
    /// Read-only confirmation before submission
    Review,
}

impl Default for WizardStep {
    fn default() -> Self {
        Self::PersonalDetails
    }
}

impl WizardStep {
    fn prev(self) -> Option<Self> {
        match self {
            Self::PersonalDetails => None,
            Self::MedicineInfo => Some(Self::PersonalDetails),
            Self::Review => Some(Self::MedicineInfo),
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PersonalDetails => "personal_details",
            Self::MedicineInfo => "medicine_info",
            Self::Review => "review",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PersonalDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub address: String,
    pub coordinates: Option<Coordinates>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq, new)]
pub struct MedicineSelection {
    pub medicine_name: String,
    pub quantity: i64,
}

/// Request wizard aggregate
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RequestDraft {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub step: WizardStep,

    // Collected form state
    pub personal: PersonalDetails,
    pub selection: Option<MedicineSelection>,
    pub reason: Option<String>,
    pub prescription: Option<Attachment>,

    pub discarded: bool,
}

/// Payload handed to the submission sink from the review step.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RequestSubmission {
    pub draft_id: String,
    pub personal: PersonalDetails,
    pub selection: MedicineSelection,
    pub reason: Option<String>,
    pub prescription: Option<Attachment>,
}

/// Flow configuration consulted at the medicine-info gate.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestPolicy {
    pub require_prescription: bool,
}

#[derive(Clone, new)]
pub struct Services {
    pub medicines: Arc<dyn MedicineSource>,
    pub sink: Arc<dyn SubmissionSink>,
    pub policy: RequestPolicy,
}

pub const AGGREGATE_TYPE: &str = "RequestDraft";

#[async_trait]
impl Aggregate for RequestDraft {
    type Command = Command;
    type Event = Event;
    type Error = Error;
    type Services = Services;

    fn aggregate_type() -> String {
        AGGREGATE_TYPE.to_string()
    }

    async fn handle(
        &self,
        command: Self::Command,
        services: &Self::Services,
    ) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            Command::Open { id, prefill } => {
                self.validate_new()?;
                let now = Utc::now();

                Ok(vec![Event::DraftOpened {
                    id,
                    created_at: now,
                    prefill,
                }])
            }

            Command::EditPersonalDetails { details } => {
                self.validate_live()?;

                Ok(vec![Event::PersonalDetailsEdited {
                    id: self.id.clone(),
                    details,
                    updated_at: Utc::now(),
                }])
            }

            Command::SelectMedicine { selection } => {
                self.validate_live()?;

                Ok(vec![Event::MedicineSelected {
                    id: self.id.clone(),
                    selection,
                    updated_at: Utc::now(),
                }])
            }

            Command::ProvideReason { reason } => {
                self.validate_live()?;

                Ok(vec![Event::ReasonProvided {
                    id: self.id.clone(),
                    reason,
                    updated_at: Utc::now(),
                }])
            }

            Command::AttachPrescription { attachment } => {
                self.validate_live()?;

                Ok(vec![Event::PrescriptionAttached {
                    id: self.id.clone(),
                    attachment,
                    updated_at: Utc::now(),
                }])
            }

            Command::Advance => {
                self.validate_live()?;
                let to = match self.step {
                    WizardStep::PersonalDetails => {
                        self.validate_personal_details()?;
                        WizardStep::MedicineInfo
                    }
                    WizardStep::MedicineInfo => {
                        // Never trust the records the shell loaded the page
                        // with; a listing can vanish while the form is open.
                        let records = services.medicines.fetch().await?;
                        self.validate_medicine_info(
                            &records,
                            services.policy,
                            Utc::now().date_naive(),
                        )?;
                        WizardStep::Review
                    }
                    WizardStep::Review => {
                        return Err(Error::InvalidStateTransition {
                            from: self.step.to_string(),
                            to: "submitted".to_string(),
                        });
                    }
                };

                Ok(vec![Event::StepAdvanced {
                    id: self.id.clone(),
                    to,
                    updated_at: Utc::now(),
                }])
            }

            Command::Retreat => {
                self.validate_live()?;
                let to = self.step.prev().ok_or_else(|| Error::InvalidStateTransition {
                    from: self.step.to_string(),
                    to: self.step.to_string(),
                })?;

                Ok(vec![Event::StepRetreated {
                    id: self.id.clone(),
                    to,
                    updated_at: Utc::now(),
                }])
            }

            Command::Submit => {
                self.validate_live()?;
                if self.step != WizardStep::Review {
                    return Err(Error::InvalidStateTransition {
                        from: self.step.to_string(),
                        to: "submitted".to_string(),
                    });
                }

                // Sink failure propagates with no events emitted: the draft
                // stays intact at review so the user can retry.
                let submission = self.to_submission()?;
                services.sink.submit_request(submission).await?;

                Ok(vec![Event::DraftSubmitted {
                    id: self.id.clone(),
                    updated_at: Utc::now(),
                }])
            }

            Command::Discard => {
                self.validate_live()?;

                Ok(vec![Event::DraftDiscarded {
                    id: self.id.clone(),
                    updated_at: Utc::now(),
                }])
            }
        }
    }

    fn apply(&mut self, event: Self::Event) {
        match event {
            Event::DraftOpened { id, created_at, prefill } => {
                self.id = id;
                self.created_at = created_at;
                self.updated_at = created_at;
                self.step = WizardStep::PersonalDetails;
                self.selection = prefill;
            }

            Event::PersonalDetailsEdited { details, updated_at, .. } => {
                self.personal = details;
                self.updated_at = updated_at;
            }

            Event::MedicineSelected { selection, updated_at, .. } => {
                self.selection = Some(selection);
                self.updated_at = updated_at;
            }

            Event::ReasonProvided { reason, updated_at, .. } => {
                self.reason = Some(reason);
                self.updated_at = updated_at;
            }

            Event::PrescriptionAttached { attachment, updated_at, .. } => {
                self.prescription = Some(attachment);
                self.updated_at = updated_at;
            }

            Event::StepAdvanced { to, updated_at, .. }
            | Event::StepRetreated { to, updated_at, .. } => {
                self.step = to;
                self.updated_at = updated_at;
            }

            Event::DraftSubmitted { updated_at, .. } => {
                // A successful submission empties the wizard for the next request.
                self.step = WizardStep::PersonalDetails;
                self.personal = PersonalDetails::default();
                self.selection = None;
                self.reason = None;
                self.prescription = None;
                self.updated_at = updated_at;
            }

            Event::DraftDiscarded { updated_at, .. } => {
                self.discarded = true;
                self.updated_at = updated_at;
            }
        }
    }
}

impl RequestDraft {
    fn validate_new(&self) -> Result<(), Error> {
        if !self.id.is_empty() {
            return Err(Error::Uniqueness { field: "id".to_string() });
        }
        Ok(())
    }

    fn validate_live(&self) -> Result<(), Error> {
        if self.id.is_empty() {
            return Err(Error::NotFound { entity: AGGREGATE_TYPE.to_string() });
        }
        if self.discarded {
            return Err(Error::Forbidden);
        }
        Ok(())
    }

    fn validate_personal_details(&self) -> Result<(), Error> {
        validation::require("name", &self.personal.name)?;
        validation::require("email", &self.personal.email)?;
        validation::require("phone", &self.personal.phone)?;
        validation::require("address", &self.personal.address)?;
        validation::email(&self.personal.email)?;
        validation::phone(&self.personal.phone)
    }

    fn validate_medicine_info(
        &self,
        records: &[MedicineRecord],
        policy: RequestPolicy,
        today: NaiveDate,
    ) -> Result<(), Error> {
        let selection = self.selection.as_ref().ok_or_else(|| Error::Validation {
            message: "a medicine must be selected".to_string(),
        })?;

        let max = catalog::max_requestable(records, &selection.medicine_name, today);
        if max == 0 {
            return Err(Error::NoLongerAvailable {
                name: selection.medicine_name.clone(),
            });
        }
        if selection.quantity < 1 || selection.quantity > max {
            return Err(Error::Validation {
                message: format!("requested quantity must be between 1 and {}", max),
            });
        }
        if policy.require_prescription && self.prescription.is_none() {
            return Err(Error::Validation {
                message: "a prescription file is required".to_string(),
            });
        }
        Ok(())
    }

    fn to_submission(&self) -> Result<RequestSubmission, Error> {
        let selection = self.selection.clone().ok_or_else(|| Error::Validation {
            message: "a medicine must be selected".to_string(),
        })?;

        Ok(RequestSubmission {
            draft_id: self.id.clone(),
            personal: self.personal.clone(),
            selection,
            reason: self.reason.clone(),
            prescription: self.prescription.clone(),
        })
    }
}
