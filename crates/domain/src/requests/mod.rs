/// Request wizard aggregate
pub mod aggregate;

/// Commands
pub mod commands;

/// Events
pub mod events;

/// Input DTOs
pub mod inputs;

/// View (read model)
pub mod view;

/// CQRS setup
pub mod cqrs;

pub use aggregate::{
    MedicineSelection, PersonalDetails, RequestDraft, RequestPolicy, RequestSubmission, Services,
    WizardStep, AGGREGATE_TYPE,
};
pub use commands::Command;
pub use events::Event;
pub use view::{InMemoryViewRepository, Query, View};
