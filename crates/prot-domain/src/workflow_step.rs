// workflow_step.rs
use crate::WorkflowStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Um lançamento no histórico de produção de uma ordem. Depois de anexado
/// ao paciente o registro nunca é editado nem removido.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
  id: Uuid,
  status: WorkflowStatus,
  timestamp: DateTime<Utc>,
  notes: String,
}

impl WorkflowStep {
  /// Cria um lançamento com o instante atual.
  pub fn new(status: WorkflowStatus, notes: impl Into<String>) -> Self {
    Self { id: Uuid::new_v4(), status, timestamp: Utc::now(), notes: notes.into() }
  }

  /// Reconstrói um lançamento persistido sem alterar nenhum campo.
  pub fn from_parts(id: Uuid, status: WorkflowStatus, timestamp: DateTime<Utc>, notes: impl Into<String>) -> Self {
    Self { id, status, timestamp, notes: notes.into() }
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn status(&self) -> WorkflowStatus {
    self.status
  }

  pub fn timestamp(&self) -> DateTime<Utc> {
    self.timestamp
  }

  pub fn notes(&self) -> &str {
    &self.notes
  }
}

impl fmt::Display for WorkflowStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "WorkflowStep({} em {})", self.status, self.timestamp.format("%d/%m/%Y %H:%M"))
  }
}
