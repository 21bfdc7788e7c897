//! External collaborators the domain core depends on but does not implement.
//!
//! No transport is mandated; an HTTP client and an in-memory test double are
//! equally valid implementations.

use async_trait::async_trait;
use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::catalog::MedicineRecord;
use crate::donations::DonationSubmission;
use crate::errors::Error;
use crate::requests::RequestSubmission;

/// Binary upload forwarded with a submission.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq, new)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    #[serde(with = "serde_bytes")]
    pub bytes: Vec<u8>,
}

/// Geographic point captured by the forms.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, new)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Latest-known catalog records.
///
/// Consulted fresh on every medicine-info check so that a listing going
/// out of stock mid-flow is caught before submission.
#[async_trait]
pub trait MedicineSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<MedicineRecord>, Error>;
}

/// Accepts finished request and donation payloads.
///
/// Failures are surfaced to the caller as-is; the core never retries.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit_request(&self, submission: RequestSubmission) -> Result<(), Error>;
    async fn submit_donation(&self, submission: DonationSubmission) -> Result<(), Error>;
}
