use crate::DomainError;
use crate::{Clinic, Expense, Patient, ServiceItem};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Contrato de persistência do laboratório: para cada tipo de entidade,
/// leitura da coleção completa (sem paginação nem garantia de ordem),
/// upsert por id e exclusão por id (excluir id inexistente é no-op).
///
/// `test_connectivity` informa se o armazenamento por trás é remoto;
/// serve somente para o indicador da interface e não condiciona nenhuma
/// funcionalidade.
pub trait LabRepository: Send + Sync {
  /// Lista todas as ordens de serviço.
  fn list_patients(&self) -> Result<Vec<Patient>, DomainError>;

  /// Busca pontual de uma ordem por id.
  fn get_patient(&self, id: &str) -> Result<Option<Patient>, DomainError>;

  /// Upsert por id: cria se ausente, sobrescreve por inteiro se presente.
  /// Devolve o id persistido.
  fn save_patient(&self, patient: Patient) -> Result<String, DomainError>;

  /// Remove a ordem permanentemente. Id ausente é no-op, não erro.
  fn delete_patient(&self, id: &str) -> Result<(), DomainError>;

  /// Lista todas as despesas.
  fn list_expenses(&self) -> Result<Vec<Expense>, DomainError>;

  /// Upsert de despesa por id.
  fn save_expense(&self, expense: Expense) -> Result<Uuid, DomainError>;

  /// Remove a despesa. Id ausente é no-op.
  fn delete_expense(&self, id: &Uuid) -> Result<(), DomainError>;

  /// Lista todas as clínicas parceiras.
  fn list_clinics(&self) -> Result<Vec<Clinic>, DomainError>;

  /// Upsert de clínica por id.
  fn save_clinic(&self, clinic: Clinic) -> Result<Uuid, DomainError>;

  /// Remove a clínica. Não propaga para ordens que a citam como texto.
  fn delete_clinic(&self, id: &Uuid) -> Result<(), DomainError>;

  /// Lista o catálogo de serviços.
  fn list_service_items(&self) -> Result<Vec<ServiceItem>, DomainError>;

  /// Upsert de item do catálogo por id.
  fn save_service_item(&self, item: ServiceItem) -> Result<Uuid, DomainError>;

  /// Remove o item do catálogo. Id ausente é no-op.
  fn delete_service_item(&self, id: &Uuid) -> Result<(), DomainError>;

  /// `true` quando o armazenamento é um backend remoto hospedado.
  fn test_connectivity(&self) -> bool;
}

/// Implementação em memória para testes e wiring rápido. Não é durável.
pub struct InMemoryLabRepository {
  patients: Arc<Mutex<HashMap<String, Patient>>>,
  expenses: Arc<Mutex<HashMap<Uuid, Expense>>>,
  clinics: Arc<Mutex<HashMap<Uuid, Clinic>>>,
  service_items: Arc<Mutex<HashMap<Uuid, ServiceItem>>>,
}

impl InMemoryLabRepository {
  pub fn new() -> Self {
    Self { patients: Arc::new(Mutex::new(HashMap::new())),
           expenses: Arc::new(Mutex::new(HashMap::new())),
           clinics: Arc::new(Mutex::new(HashMap::new())),
           service_items: Arc::new(Mutex::new(HashMap::new())) }
  }

  // Helper para mapear mutex envenenado em DomainError
  fn lock_map<'a, T>(&'a self, m: &'a Mutex<T>, name: &str) -> Result<std::sync::MutexGuard<'a, T>, DomainError> {
    m.lock()
     .map_err(|e| DomainError::StorageError(format!("Mutex '{}' poisoned: {}", name, e)))
  }
}

impl LabRepository for InMemoryLabRepository {
  fn list_patients(&self) -> Result<Vec<Patient>, DomainError> {
    let patients = self.lock_map(&self.patients, "patients")?;
    Ok(patients.values().cloned().collect())
  }

  fn get_patient(&self, id: &str) -> Result<Option<Patient>, DomainError> {
    let patients = self.lock_map(&self.patients, "patients")?;
    Ok(patients.get(id).cloned())
  }

  fn save_patient(&self, patient: Patient) -> Result<String, DomainError> {
    let id = patient.id().to_string();
    let mut patients = self.lock_map(&self.patients, "patients")?;
    patients.insert(id.clone(), patient);
    Ok(id)
  }

  fn delete_patient(&self, id: &str) -> Result<(), DomainError> {
    let mut patients = self.lock_map(&self.patients, "patients")?;
    patients.remove(id);
    Ok(())
  }

  fn list_expenses(&self) -> Result<Vec<Expense>, DomainError> {
    let expenses = self.lock_map(&self.expenses, "expenses")?;
    Ok(expenses.values().cloned().collect())
  }

  fn save_expense(&self, expense: Expense) -> Result<Uuid, DomainError> {
    let id = expense.id();
    let mut expenses = self.lock_map(&self.expenses, "expenses")?;
    expenses.insert(id, expense);
    Ok(id)
  }

  fn delete_expense(&self, id: &Uuid) -> Result<(), DomainError> {
    let mut expenses = self.lock_map(&self.expenses, "expenses")?;
    expenses.remove(id);
    Ok(())
  }

  fn list_clinics(&self) -> Result<Vec<Clinic>, DomainError> {
    let clinics = self.lock_map(&self.clinics, "clinics")?;
    Ok(clinics.values().cloned().collect())
  }

  fn save_clinic(&self, clinic: Clinic) -> Result<Uuid, DomainError> {
    let id = clinic.id();
    let mut clinics = self.lock_map(&self.clinics, "clinics")?;
    clinics.insert(id, clinic);
    Ok(id)
  }

  fn delete_clinic(&self, id: &Uuid) -> Result<(), DomainError> {
    let mut clinics = self.lock_map(&self.clinics, "clinics")?;
    clinics.remove(id);
    Ok(())
  }

  fn list_service_items(&self) -> Result<Vec<ServiceItem>, DomainError> {
    let items = self.lock_map(&self.service_items, "service_items")?;
    Ok(items.values().cloned().collect())
  }

  fn save_service_item(&self, item: ServiceItem) -> Result<Uuid, DomainError> {
    let id = item.id();
    let mut items = self.lock_map(&self.service_items, "service_items")?;
    items.insert(id, item);
    Ok(id)
  }

  fn delete_service_item(&self, id: &Uuid) -> Result<(), DomainError> {
    let mut items = self.lock_map(&self.service_items, "service_items")?;
    items.remove(id);
    Ok(())
  }

  fn test_connectivity(&self) -> bool {
    false
  }
}

impl Default for InMemoryLabRepository {
  fn default() -> Self {
    Self::new()
  }
}
