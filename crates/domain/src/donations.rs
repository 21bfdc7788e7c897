//! Donor listing form.
//!
//! Unlike the request wizard this is a single flat form: every field is
//! required, validated in one pass and submitted in one shot. Submitted
//! listings enter the catalog as `Pending` until an admin reviews them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::collaborators::{Attachment, Coordinates, SubmissionSink};
use crate::errors::Error;
use crate::validation;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct DonationDraft {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub address: String,
    pub city: String,
    pub coordinates: Option<Coordinates>,

    pub medicine_name: String,
    pub quantity: i64,
    pub expiry_date: Option<NaiveDate>,
    pub image: Option<Attachment>,
}

/// Donation payload handed to the submission sink.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DonationSubmission {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub address: String,
    pub city: String,
    pub coordinates: Coordinates,
    pub medicine_name: String,
    pub quantity: i64,
    pub expiry_date: NaiveDate,
    pub image: Attachment,
}

impl DonationDraft {
    pub fn validate(&self, today: NaiveDate) -> Result<(), Error> {
        validation::require("name", &self.name)?;
        validation::require("email", &self.email)?;
        validation::require("mobile", &self.mobile)?;
        validation::require("address", &self.address)?;
        validation::require("city", &self.city)?;
        validation::require("medicine name", &self.medicine_name)?;
        validation::email(&self.email)?;
        validation::phone(&self.mobile)?;
        if self.coordinates.is_none() {
            return Err(Error::Validation {
                message: "location coordinates are required".to_string(),
            });
        }
        if self.quantity < 1 {
            return Err(Error::Validation {
                message: "quantity must be at least 1".to_string(),
            });
        }
        match self.expiry_date {
            Some(date) if date > today => {}
            Some(_) => {
                return Err(Error::Validation {
                    message: "expiry date must be in the future".to_string(),
                })
            }
            None => {
                return Err(Error::Validation {
                    message: "expiry date is required".to_string(),
                })
            }
        }
        if self.image.is_none() {
            return Err(Error::Validation {
                message: "a medicine photo is required".to_string(),
            });
        }
        Ok(())
    }

    fn to_submission(&self) -> Result<DonationSubmission, Error> {
        let missing = |field: &str| Error::Validation {
            message: format!("{} is required", field),
        };
        Ok(DonationSubmission {
            name: self.name.clone(),
            email: self.email.clone(),
            mobile: self.mobile.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            coordinates: self.coordinates.ok_or_else(|| missing("location coordinates"))?,
            medicine_name: self.medicine_name.clone(),
            quantity: self.quantity,
            expiry_date: self.expiry_date.ok_or_else(|| missing("expiry date"))?,
            image: self.image.clone().ok_or_else(|| missing("a medicine photo"))?,
        })
    }
}

/// Validate the whole form, then forward it through the sink.
pub async fn submit(
    draft: &DonationDraft,
    sink: &dyn SubmissionSink,
    today: NaiveDate,
) -> Result<(), Error> {
    draft.validate(today)?;
    sink.submit_donation(draft.to_submission()?).await
}
