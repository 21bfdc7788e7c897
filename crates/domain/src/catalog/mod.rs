/// Medicine listings and review transitions
pub mod records;

/// Offerability rules
pub mod eligibility;

pub use eligibility::{
    distinct_cities, filter_offerable, is_offerable, max_requestable, page, sort_by, SortKey,
};
pub use records::{MedicineRecord, MedicineStatus};
