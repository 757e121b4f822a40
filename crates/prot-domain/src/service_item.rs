// service_item.rs
use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Item do catálogo de serviços. Serve apenas para pré-preencher o valor
/// do serviço quando o tipo de prótese correspondente é escolhido; depois
/// de copiado o valor, não resta vínculo persistido.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
  id: Uuid,
  name: String,
  price: f64,
}

impl ServiceItem {
  pub fn new(name: impl Into<String>, price: f64) -> Result<Self, DomainError> {
    Self::from_parts(Uuid::new_v4(), name, price)
  }

  pub fn from_parts(id: Uuid, name: impl Into<String>, price: f64) -> Result<Self, DomainError> {
    let name = name.into();
    if name.trim().is_empty() {
      return Err(DomainError::ValidationError("Nome do serviço não pode estar vazio".to_string()));
    }
    if !price.is_finite() || price < 0.0 {
      return Err(DomainError::ValidationError("Preço do serviço deve ser um número não negativo".to_string()));
    }
    Ok(Self { id, name: name.trim().to_string(), price })
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn price(&self) -> f64 {
    self.price
  }
}

impl fmt::Display for ServiceItem {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "ServiceItem({}: R$ {:.2})", self.name, self.price)
  }
}
