// service.rs
// Camada orquestradora chamada pela interface: expõe as operações de
// alto nível sobre as coleções do laboratório. Toda mutação persiste via
// motor/repositório e em seguida recarrega o read-model por inteiro, com
// troca atômica; a interface nunca observa uma visão parcial.
use crate::engine::WorkflowEngine;
use crate::errors::WorkflowError;
use crate::state::LabState;
use prot_domain::{Clinic, Expense, LabRepository, Patient, PatientDetails, PatientDraft, PaymentStatus, ServiceItem,
                  WorkflowStatus};
use prot_import::{CsvImporter, ImportSummary};
use prot_reports::{current_year, dashboard_report, DashboardReport};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Serviço de alto nível do laboratório. Orquestra o repositório, o
/// motor de fluxo, o importador e a agregação do painel.
pub struct LabService<R>
  where R: LabRepository
{
  repo: Arc<R>,
  engine: WorkflowEngine<R>,
  state: Mutex<LabState>,
}

impl<R> LabService<R> where R: LabRepository + 'static
{
  /// Cria o serviço injetando o repositório e faz a carga inicial do
  /// read-model.
  pub fn new(repo: Arc<R>) -> Result<Self, WorkflowError> {
    let engine = WorkflowEngine::new(repo.clone());
    let state = Mutex::new(LabState::load(repo.as_ref())?);
    Ok(Self { repo, engine, state })
  }

  /// Rebusca as quatro coleções e troca o read-model de uma vez. Se a
  /// carga falhar, o estado anterior permanece intacto.
  pub fn reload(&self) -> Result<(), WorkflowError> {
    let fresh = LabState::load(self.repo.as_ref())?;
    let mut guard = self.lock_state()?;
    *guard = fresh;
    Ok(())
  }

  /// Cópia do read-model corrente.
  pub fn state(&self) -> Result<LabState, WorkflowError> {
    Ok(self.lock_state()?.clone())
  }

  pub fn create_patient(&self, draft: PatientDraft) -> Result<Patient, WorkflowError> {
    let patient = self.engine.create_patient(draft)?;
    self.reload()?;
    Ok(patient)
  }

  pub fn advance_status(&self, id: &str, status: WorkflowStatus, notes: &str) -> Result<Patient, WorkflowError> {
    let patient = self.engine.advance_status(id, status, notes)?;
    self.reload()?;
    Ok(patient)
  }

  pub fn edit_patient(&self, id: &str, details: PatientDetails) -> Result<Patient, WorkflowError> {
    let patient = self.engine.edit_patient(id, details)?;
    self.reload()?;
    Ok(patient)
  }

  pub fn set_payment_status(&self, id: &str, payment_status: PaymentStatus) -> Result<Patient, WorkflowError> {
    let patient = self.engine.set_payment_status(id, payment_status)?;
    self.reload()?;
    Ok(patient)
  }

  pub fn delete_patient(&self, id: &str) -> Result<(), WorkflowError> {
    self.engine.delete_patient(id)?;
    self.reload()
  }

  pub fn register_expense(&self, expense: Expense) -> Result<Uuid, WorkflowError> {
    let id = self.repo.save_expense(expense)?;
    self.reload()?;
    Ok(id)
  }

  pub fn delete_expense(&self, id: &Uuid) -> Result<(), WorkflowError> {
    self.repo.delete_expense(id)?;
    self.reload()
  }

  pub fn register_clinic(&self, clinic: Clinic) -> Result<Uuid, WorkflowError> {
    let id = self.repo.save_clinic(clinic)?;
    self.reload()?;
    Ok(id)
  }

  pub fn delete_clinic(&self, id: &Uuid) -> Result<(), WorkflowError> {
    self.repo.delete_clinic(id)?;
    self.reload()
  }

  pub fn register_service_item(&self, item: ServiceItem) -> Result<Uuid, WorkflowError> {
    let id = self.repo.save_service_item(item)?;
    self.reload()?;
    Ok(id)
  }

  pub fn delete_service_item(&self, id: &Uuid) -> Result<(), WorkflowError> {
    self.repo.delete_service_item(id)?;
    self.reload()
  }

  /// Preço sugerido para um tipo de prótese, copiado do catálogo quando
  /// o nome casa (sem diferenciar maiúsculas). Depois de copiado não
  /// resta vínculo com o item.
  pub fn suggested_price(&self, prosthesis_type: &str) -> Result<Option<f64>, WorkflowError> {
    let guard = self.lock_state()?;
    let wanted = prosthesis_type.trim().to_lowercase();
    Ok(guard.service_items()
            .iter()
            .find(|item| item.name().to_lowercase() == wanted)
            .map(ServiceItem::price))
  }

  /// Importa uma planilha legada e recarrega o read-model ao final do
  /// lote.
  pub fn import_csv(&self, raw: &str) -> Result<ImportSummary, WorkflowError> {
    let importer = CsvImporter::new(self.repo.clone());
    let summary = importer.import(raw)?;
    self.reload()?;
    Ok(summary)
  }

  /// Painel completo do ano corrente, recalculado sobre o read-model.
  pub fn dashboard(&self) -> Result<DashboardReport, WorkflowError> {
    let guard = self.lock_state()?;
    Ok(dashboard_report(guard.patients(), guard.expenses(), current_year()))
  }

  /// Indicador de backend remoto, repassado do gateway. Só informa a
  /// interface; nenhuma funcionalidade depende dele.
  pub fn test_connectivity(&self) -> bool {
    self.repo.test_connectivity()
  }

  fn lock_state(&self) -> Result<std::sync::MutexGuard<'_, LabState>, WorkflowError> {
    self.state
        .lock()
        .map_err(|e| WorkflowError::Other(format!("mutex poisoned: {:?}", e)))
  }
}
