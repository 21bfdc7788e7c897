use chrono::NaiveDate;
use derive_new::new;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::errors::Error;

/// Review status of a donated listing
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum MedicineStatus {
    /// Awaiting admin review
    Pending,
    /// Visible to recipients
    Approved,
    /// Hidden from recipients
    Rejected,
}

impl Default for MedicineStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for MedicineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// A donated medicine listing, as served by the catalog source.
///
/// The source is external and not fully trusted: expiry dates that fail to
/// parse become `None` and quantities may arrive negative. Both simply make
/// the record non-offerable.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq, PartialEq, new)]
pub struct MedicineRecord {
    pub id: String,
    pub name: String,
    pub quantity_available: i64,
    #[serde(default, deserialize_with = "lenient_date")]
    pub expiry_date: Option<NaiveDate>,
    pub status: MedicineStatus,

    // Display metadata, not consulted by the eligibility rules
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub donor_name: String,
}

impl MedicineRecord {
    /// Admin review: publish a pending listing.
    pub fn approve(&mut self) -> Result<(), Error> {
        self.transition(MedicineStatus::Approved)
    }

    /// Admin review: decline a pending listing.
    pub fn reject(&mut self) -> Result<(), Error> {
        self.transition(MedicineStatus::Rejected)
    }

    fn transition(&mut self, to: MedicineStatus) -> Result<(), Error> {
        if self.status != MedicineStatus::Pending {
            return Err(Error::InvalidStateTransition {
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        self.status = to;
        Ok(())
    }
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}
