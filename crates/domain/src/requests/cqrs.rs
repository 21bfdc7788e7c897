use std::{env, sync::Arc};

use cqrs_es::{mem_store::MemStore, persist::ViewRepository, CqrsFramework};

use crate::collaborators::{MedicineSource, SubmissionSink};

use super::{InMemoryViewRepository, Query, RequestDraft, RequestPolicy, Services, View};

/// In-memory CQRS wiring: drafts are ephemeral by design, so events and
/// views never leave the process.
pub fn init(
    medicines: Arc<dyn MedicineSource>,
    sink: Arc<dyn SubmissionSink>,
    repo: Arc<Box<dyn ViewRepository<View, RequestDraft>>>,
) -> Arc<CqrsFramework<RequestDraft, MemStore<RequestDraft>>> {
    let require_prescription = env::var("REQUESTS_REQUIRE_PRESCRIPTION")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    tracing::debug!("request policy: require_prescription={}", require_prescription);

    let query = Box::new(Query::new(repo));

    Arc::new(CqrsFramework::new(
        MemStore::default(),
        vec![query],
        Services::new(medicines, sink, RequestPolicy { require_prescription }),
    ))
}

pub fn init_repo() -> Arc<Box<dyn ViewRepository<View, RequestDraft>>> {
    Arc::new(Box::new(InMemoryViewRepository::default()))
}
