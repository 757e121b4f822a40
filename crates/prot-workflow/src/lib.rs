//! prot-workflow: motor de fluxo das ordens de serviço
//!
//! Define o `WorkflowEngine` (cadastro, avanço de etapa, edição,
//! pagamento e exclusão de ordens sobre um `LabRepository` injetado), o
//! read-model `LabState` recarregado por troca atômica e o `LabService`,
//! a camada orquestradora chamada pela interface.

mod engine;
mod errors;
mod service;
mod state;

pub use engine::WorkflowEngine;
pub use errors::WorkflowError;
pub use service::LabService;
pub use state::LabState;
