use serde::{Deserialize, Serialize};

use crate::collaborators::Attachment;

use super::aggregate::{MedicineSelection, PersonalDetails};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum Command {
    /// Open a fresh draft, optionally seeded from a deep link
    Open {
        id: String,
        prefill: Option<MedicineSelection>,
    },

    /// Replace the personal-details fields
    EditPersonalDetails { details: PersonalDetails },

    /// Pick a medicine and quantity
    SelectMedicine { selection: MedicineSelection },

    /// Free-text justification for the request
    ProvideReason { reason: String },

    /// Attach a prescription file
    AttachPrescription { attachment: Attachment },

    /// Move to the next step after validating the current one
    Advance,

    /// Move one step back without re-validation
    Retreat,

    /// Hand the finished draft to the submission sink
    Submit,

    /// Abandon the draft
    Discard,
}
