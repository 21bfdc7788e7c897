use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use cqrs_es::persist::ViewRepository;
use ulid::Ulid;

use domain::catalog::{MedicineRecord, MedicineStatus};
use domain::collaborators::{MedicineSource, SubmissionSink};
use domain::donations::{self, DonationDraft, DonationSubmission};
use domain::requests::{
    self,
    inputs::{OpenDraftInput, PersonalDetailsInput, SelectMedicineInput},
    Command, RequestSubmission, WizardStep,
};
use domain::Error;

struct FixedCatalog {
    records: Vec<MedicineRecord>,
}

#[async_trait]
impl MedicineSource for FixedCatalog {
    async fn fetch(&self) -> Result<Vec<MedicineRecord>, Error> {
        Ok(self.records.clone())
    }
}

#[derive(Default)]
struct RecordingSink {
    requests: Mutex<Vec<RequestSubmission>>,
    donations: Mutex<Vec<DonationSubmission>>,
    fail: AtomicBool,
}

#[async_trait]
impl SubmissionSink for RecordingSink {
    async fn submit_request(&self, submission: RequestSubmission) -> Result<(), Error> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::External {
                message: "submission endpoint unreachable".to_string(),
            });
        }
        self.requests.lock().expect("requests lock").push(submission);
        Ok(())
    }

    async fn submit_donation(&self, submission: DonationSubmission) -> Result<(), Error> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::External {
                message: "submission endpoint unreachable".to_string(),
            });
        }
        self.donations.lock().expect("donations lock").push(submission);
        Ok(())
    }
}

fn panadol(quantity: i64) -> MedicineRecord {
    MedicineRecord::new(
        "m-1".to_string(),
        "Panadol".to_string(),
        quantity,
        Some(Utc::now().date_naive() + Duration::days(30)),
        MedicineStatus::Approved,
        "Cairo".to_string(),
        "A. Donor".to_string(),
    )
}

fn personal_input() -> PersonalDetailsInput {
    PersonalDetailsInput {
        name: "R. Needham".to_string(),
        email: "needham@example.com".to_string(),
        phone: "0123456789".to_string(),
        city: "Cairo".to_string(),
        address: "5 Garden St".to_string(),
        latitude: Some(30.04),
        longitude: Some(31.24),
    }
}

fn metadata() -> HashMap<String, String> {
    let mut metadata = HashMap::new();
    metadata.insert("command_id".to_string(), Ulid::new().to_string());
    metadata
}

#[tokio::test]
async fn request_wizard_round_trip() {
    let sink = Arc::new(RecordingSink::default());
    let repo = requests::cqrs::init_repo();
    let cqrs = requests::cqrs::init(
        Arc::new(FixedCatalog { records: vec![panadol(5)] }),
        sink.clone(),
        repo.clone(),
    );

    let deep_link = OpenDraftInput {
        medicine_name: Some("Panadol".to_string()),
        quantity: Some(2),
    };
    let draft_id = Ulid::new().to_string();

    cqrs.execute_with_metadata(
        &draft_id,
        Command::Open { id: draft_id.clone(), prefill: deep_link.prefill() },
        metadata(),
    )
    .await
    .expect("open");

    cqrs.execute_with_metadata(
        &draft_id,
        Command::EditPersonalDetails { details: personal_input().into() },
        metadata(),
    )
    .await
    .expect("edit personal details");

    cqrs.execute_with_metadata(&draft_id, Command::Advance, metadata())
        .await
        .expect("advance to medicine info");

    cqrs.execute_with_metadata(
        &draft_id,
        Command::ProvideReason { reason: "chronic prescription ran out".to_string() },
        metadata(),
    )
    .await
    .expect("provide reason");

    cqrs.execute_with_metadata(&draft_id, Command::Advance, metadata())
        .await
        .expect("advance to review");

    let view = repo.load(&draft_id).await.expect("load view").expect("view exists");
    assert_eq!(view.draft.step, WizardStep::Review);
    assert_eq!(
        view.draft.selection.as_ref().map(|s| s.quantity),
        Some(2),
        "deep-link prefill survives to review"
    );

    cqrs.execute_with_metadata(&draft_id, Command::Submit, metadata())
        .await
        .expect("submit");

    let submissions = sink.requests.lock().expect("requests lock");
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].draft_id, draft_id);
    assert_eq!(submissions[0].selection.medicine_name, "Panadol");
    assert_eq!(submissions[0].selection.quantity, 2);
    assert_eq!(submissions[0].personal.email, "needham@example.com");
    assert_eq!(submissions[0].reason.as_deref(), Some("chronic prescription ran out"));
    drop(submissions);

    // The wizard resets for the next request.
    let view = repo.load(&draft_id).await.expect("load view").expect("view exists");
    assert_eq!(view.draft.step, WizardStep::PersonalDetails);
    assert!(view.draft.selection.is_none());
    assert!(view.draft.reason.is_none());
}

#[tokio::test]
async fn failed_submission_keeps_the_draft_for_a_retry() {
    let sink = Arc::new(RecordingSink::default());
    let repo = requests::cqrs::init_repo();
    let cqrs = requests::cqrs::init(
        Arc::new(FixedCatalog { records: vec![panadol(5)] }),
        sink.clone(),
        repo.clone(),
    );

    let draft_id = Ulid::new().to_string();
    cqrs.execute(&draft_id, Command::Open { id: draft_id.clone(), prefill: None })
        .await
        .expect("open");
    cqrs.execute(&draft_id, Command::EditPersonalDetails { details: personal_input().into() })
        .await
        .expect("edit personal details");
    cqrs.execute(&draft_id, Command::Advance).await.expect("advance");
    let selection: SelectMedicineInput = SelectMedicineInput {
        medicine_name: "Panadol".to_string(),
        quantity: 3,
    };
    cqrs.execute(&draft_id, Command::SelectMedicine { selection: selection.into() })
        .await
        .expect("select medicine");
    cqrs.execute(&draft_id, Command::Advance).await.expect("advance to review");

    sink.fail.store(true, Ordering::SeqCst);
    let err = cqrs
        .execute(&draft_id, Command::Submit)
        .await
        .expect_err("sink is down");
    assert!(err.to_string().contains("submission endpoint unreachable"));

    // Draft intact at review, nothing recorded.
    let view = repo.load(&draft_id).await.expect("load view").expect("view exists");
    assert_eq!(view.draft.step, WizardStep::Review);
    assert_eq!(view.draft.selection.as_ref().map(|s| s.quantity), Some(3));
    assert!(sink.requests.lock().expect("requests lock").is_empty());

    // Retry without re-entering anything.
    sink.fail.store(false, Ordering::SeqCst);
    cqrs.execute(&draft_id, Command::Submit).await.expect("retry succeeds");
    assert_eq!(sink.requests.lock().expect("requests lock").len(), 1);
}

#[tokio::test]
async fn stock_changes_block_advancement_mid_flow() {
    // The catalog only has one unit left by the time the user fills the form.
    let sink = Arc::new(RecordingSink::default());
    let repo = requests::cqrs::init_repo();
    let cqrs = requests::cqrs::init(
        Arc::new(FixedCatalog { records: vec![panadol(1)] }),
        sink,
        repo.clone(),
    );

    let draft_id = Ulid::new().to_string();
    cqrs.execute(&draft_id, Command::Open { id: draft_id.clone(), prefill: None })
        .await
        .expect("open");
    cqrs.execute(&draft_id, Command::EditPersonalDetails { details: personal_input().into() })
        .await
        .expect("edit personal details");
    cqrs.execute(&draft_id, Command::Advance).await.expect("advance");
    cqrs.execute(
        &draft_id,
        Command::SelectMedicine {
            selection: SelectMedicineInput { medicine_name: "Panadol".to_string(), quantity: 2 }.into(),
        },
    )
    .await
    .expect("select medicine");

    let err = cqrs.execute(&draft_id, Command::Advance).await.expect_err("over stock");
    assert!(err.to_string().contains("between 1 and 1"));

    let view = repo.load(&draft_id).await.expect("load view").expect("view exists");
    assert_eq!(view.draft.step, WizardStep::MedicineInfo, "step unchanged on failure");
}

#[tokio::test]
async fn donation_form_submits_in_one_shot() {
    use domain::collaborators::{Attachment, Coordinates};

    let sink = RecordingSink::default();
    let today = Utc::now().date_naive();

    let draft = DonationDraft {
        name: "A. Donor".to_string(),
        email: "donor@example.com".to_string(),
        mobile: "0123456789".to_string(),
        address: "12 Nile St".to_string(),
        city: "Cairo".to_string(),
        coordinates: Some(Coordinates::new(30.04, 31.24)),
        medicine_name: "Panadol".to_string(),
        quantity: 5,
        expiry_date: Some(today + Duration::days(90)),
        image: Some(Attachment::new(
            "box.jpg".to_string(),
            "image/jpeg".to_string(),
            vec![0xff, 0xd8],
        )),
    };

    donations::submit(&draft, &sink, today).await.expect("donation accepted");
    assert_eq!(sink.donations.lock().expect("donations lock").len(), 1);

    let incomplete = DonationDraft { image: None, ..draft };
    let err = donations::submit(&incomplete, &sink, today)
        .await
        .expect_err("photo is required");
    assert!(matches!(err, Error::Validation { .. }));
    assert_eq!(sink.donations.lock().expect("donations lock").len(), 1);
}
