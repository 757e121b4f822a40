// expense.rs
use crate::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Despesa do laboratório. Ciclo de vida simples: cadastrar e excluir,
/// sem máquina de estados.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
  id: Uuid,
  description: String,
  amount: f64,
  date: DateTime<Utc>,
  category: String,
}

impl Expense {
  pub fn new(description: impl Into<String>,
             amount: f64,
             date: DateTime<Utc>,
             category: impl Into<String>)
             -> Result<Self, DomainError> {
    Self::from_parts(Uuid::new_v4(), description, amount, date, category)
  }

  pub fn from_parts(id: Uuid,
                    description: impl Into<String>,
                    amount: f64,
                    date: DateTime<Utc>,
                    category: impl Into<String>)
                    -> Result<Self, DomainError> {
    let description = description.into();
    if description.trim().is_empty() {
      return Err(DomainError::ValidationError("Descrição da despesa não pode estar vazia".to_string()));
    }
    if !amount.is_finite() || amount <= 0.0 {
      return Err(DomainError::ValidationError("Valor da despesa deve ser maior que zero".to_string()));
    }
    Ok(Self { id, description: description.trim().to_string(), amount, date, category: category.into().trim().to_string() })
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn description(&self) -> &str {
    &self.description
  }

  pub fn amount(&self) -> f64 {
    self.amount
  }

  pub fn date(&self) -> DateTime<Utc> {
    self.date
  }

  pub fn category(&self) -> &str {
    &self.category
  }
}

impl fmt::Display for Expense {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Expense({}: R$ {:.2} em {})", self.description, self.amount, self.date.format("%d/%m/%Y"))
  }
}
