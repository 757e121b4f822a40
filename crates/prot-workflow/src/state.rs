// state.rs
// Read-model das quatro coleções. A recarga busca tudo antes de montar o
// estado novo, de modo que quem troca o estado nunca publica uma visão
// parcial (algumas coleções novas, outras velhas).
use crate::errors::WorkflowError;
use prot_domain::{Clinic, Expense, LabRepository, Patient, ServiceItem};

/// Cópia em memória das coleções completas, montada de uma vez a partir
/// do repositório. Imutável depois de montada: mutações passam pelo
/// motor e são refletidas por uma recarga completa.
#[derive(Debug, Clone, Default)]
pub struct LabState {
  patients: Vec<Patient>,
  expenses: Vec<Expense>,
  clinics: Vec<Clinic>,
  service_items: Vec<ServiceItem>,
}

impl LabState {
  /// Busca as quatro coleções do repositório. Qualquer falha descarta a
  /// carga inteira: ou o estado novo vem completo, ou o anterior
  /// permanece.
  pub fn load<R: LabRepository>(repo: &R) -> Result<Self, WorkflowError> {
    let patients = repo.list_patients()?;
    let expenses = repo.list_expenses()?;
    let clinics = repo.list_clinics()?;
    let service_items = repo.list_service_items()?;
    Ok(Self { patients, expenses, clinics, service_items })
  }

  pub fn patients(&self) -> &[Patient] {
    &self.patients
  }

  pub fn expenses(&self) -> &[Expense] {
    &self.expenses
  }

  pub fn clinics(&self) -> &[Clinic] {
    &self.clinics
  }

  pub fn service_items(&self) -> &[ServiceItem] {
    &self.service_items
  }

  pub fn find_patient(&self, id: &str) -> Option<&Patient> {
    self.patients.iter().find(|p| p.id() == id)
  }

  /// Ordens ordenadas por data de entrada (mais recentes primeiro), a
  /// ordenação usada nas listagens. O repositório não garante ordem.
  pub fn patients_by_entry_date(&self) -> Vec<&Patient> {
    let mut sorted: Vec<&Patient> = self.patients.iter().collect();
    sorted.sort_by(|a, b| b.entry_date().cmp(&a.entry_date()));
    sorted
  }
}
