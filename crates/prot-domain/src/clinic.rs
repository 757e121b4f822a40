// clinic.rs
use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Clínica parceira. As ordens de serviço guardam clínica e dentista como
/// texto livre (cópia do momento do cadastro): renomear ou excluir uma
/// clínica não propaga para ordens existentes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clinic {
  id: Uuid,
  name: String,
  doctor_name: String,
  phone: Option<String>,
}

impl Clinic {
  pub fn new(name: impl Into<String>, doctor_name: impl Into<String>, phone: Option<String>) -> Result<Self, DomainError> {
    Self::from_parts(Uuid::new_v4(), name, doctor_name, phone)
  }

  pub fn from_parts(id: Uuid,
                    name: impl Into<String>,
                    doctor_name: impl Into<String>,
                    phone: Option<String>)
                    -> Result<Self, DomainError> {
    let name = name.into();
    let doctor_name = doctor_name.into();
    if name.trim().is_empty() {
      return Err(DomainError::ValidationError("Nome da clínica não pode estar vazio".to_string()));
    }
    if doctor_name.trim().is_empty() {
      return Err(DomainError::ValidationError("Nome do dentista responsável não pode estar vazio".to_string()));
    }
    Ok(Self { id,
              name: name.trim().to_string(),
              doctor_name: doctor_name.trim().to_string(),
              phone: phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()) })
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn doctor_name(&self) -> &str {
    &self.doctor_name
  }

  pub fn phone(&self) -> Option<&str> {
    self.phone.as_deref()
  }
}

impl fmt::Display for Clinic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Clinic({}, {})", self.name, self.doctor_name)
  }
}
