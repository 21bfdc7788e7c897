use serde::{Deserialize, Serialize};

use crate::collaborators::{Attachment, Coordinates};

use super::aggregate::{MedicineSelection, PersonalDetails};

/// Deep-link entry into the request flow, e.g. from a catalog card.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OpenDraftInput {
    pub medicine_name: Option<String>,
    pub quantity: Option<i64>,
}

impl OpenDraftInput {
    /// Selection seeded from the deep link, when it names a medicine.
    ///
    /// The prefill is advisory only; it is re-validated against live
    /// records before the medicine-info step can be passed.
    pub fn prefill(&self) -> Option<MedicineSelection> {
        let name = self.medicine_name.as_deref()?.trim();
        if name.is_empty() {
            return None;
        }
        Some(MedicineSelection::new(
            name.to_string(),
            self.quantity.unwrap_or(1),
        ))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PersonalDetailsInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<PersonalDetailsInput> for PersonalDetails {
    fn from(input: PersonalDetailsInput) -> Self {
        let coordinates = match (input.latitude, input.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        };
        PersonalDetails {
            name: input.name,
            email: input.email,
            phone: input.phone,
            city: input.city,
            address: input.address,
            coordinates,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelectMedicineInput {
    pub medicine_name: String,
    pub quantity: i64,
}

impl From<SelectMedicineInput> for MedicineSelection {
    fn from(input: SelectMedicineInput) -> Self {
        MedicineSelection::new(input.medicine_name, input.quantity)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttachPrescriptionInput {
    pub file_name: String,
    pub content_type: String,
    #[serde(with = "serde_bytes")]
    pub bytes: Vec<u8>,
}

impl From<AttachPrescriptionInput> for Attachment {
    fn from(input: AttachPrescriptionInput) -> Self {
        Attachment::new(input.file_name, input.content_type, input.bytes)
    }
}
