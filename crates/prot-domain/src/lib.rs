mod clinic;
mod errors;
mod expense;
mod lab_repository;
mod patient;
mod service_item;
mod workflow_status;
mod workflow_step;

pub use clinic::Clinic;
pub use errors::DomainError;
pub use expense::Expense;
pub use lab_repository::{InMemoryLabRepository, LabRepository};
pub use patient::{Patient, PatientDetails, PatientDraft};
pub use service_item::ServiceItem;
pub use workflow_status::{PaymentStatus, WorkflowStatus};
pub use workflow_step::WorkflowStep;
