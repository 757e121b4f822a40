// errors.rs
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum DomainError {
  #[error("Erro de validação: {0}")]
  ValidationError(String),
  #[error("Erro de armazenamento: {0}")]
  StorageError(String),
  #[error("Erro de serialização: {0}")]
  SerializationError(String),
}

impl From<serde_json::Error> for DomainError {
  fn from(e: serde_json::Error) -> Self {
    Self::SerializationError(e.to_string())
  }
}
