// engine.rs
// Operações de mutação sobre ordens de serviço. O motor carrega a ordem
// do repositório, aplica a mutação por valor no domínio e persiste o
// resultado; nenhuma coleção em memória é tocada aqui (o read-model é
// responsabilidade do LabService).
use crate::errors::WorkflowError;
use prot_domain::{LabRepository, Patient, PatientDetails, PatientDraft, PaymentStatus, WorkflowStatus};
use std::sync::Arc;

/// Motor de fluxo genérico sobre o repositório injetado.
///
/// Nota sobre transições: nenhuma é rejeitada. O domínio admite fluxos
/// corretivos (voltar etapas, reabrir ordem finalizada), então avançar a
/// partir de `Finalizado` anexa um lançamento normal e a ordem volta a
/// contar como ativa.
pub struct WorkflowEngine<R>
  where R: LabRepository
{
  repo: Arc<R>,
}

impl<R> WorkflowEngine<R> where R: LabRepository
{
  pub fn new(repo: Arc<R>) -> Self {
    Self { repo }
  }

  /// Cadastra uma ordem nova e a persiste. Campos obrigatórios ausentes
  /// falham com erro de validação antes de qualquer escrita.
  pub fn create_patient(&self, draft: PatientDraft) -> Result<Patient, WorkflowError> {
    let patient = Patient::new(draft)?;
    self.repo.save_patient(patient.clone())?;
    Ok(patient)
  }

  /// Anexa um lançamento de etapa à ordem indicada e persiste a versão
  /// resultante.
  pub fn advance_status(&self, id: &str, status: WorkflowStatus, notes: &str) -> Result<Patient, WorkflowError> {
    let patient = self.load(id)?;
    let advanced = patient.advance_status(status, notes);
    self.repo.save_patient(advanced.clone())?;
    Ok(advanced)
  }

  /// Substitui os campos descritivos/financeiros da ordem sem tocar o
  /// histórico de produção.
  pub fn edit_patient(&self, id: &str, details: PatientDetails) -> Result<Patient, WorkflowError> {
    let patient = self.load(id)?;
    let edited = patient.with_details(details)?;
    self.repo.save_patient(edited.clone())?;
    Ok(edited)
  }

  /// Marca a situação de pagamento da ordem.
  pub fn set_payment_status(&self, id: &str, payment_status: PaymentStatus) -> Result<Patient, WorkflowError> {
    let patient = self.load(id)?;
    let updated = patient.with_payment_status(payment_status);
    self.repo.save_patient(updated.clone())?;
    Ok(updated)
  }

  /// Exclui a ordem permanentemente. Não há lixeira: a exclusão é
  /// irreversível e id ausente é no-op.
  pub fn delete_patient(&self, id: &str) -> Result<(), WorkflowError> {
    self.repo.delete_patient(id)?;
    Ok(())
  }

  fn load(&self, id: &str) -> Result<Patient, WorkflowError> {
    self.repo
        .get_patient(id)?
        .ok_or_else(|| WorkflowError::NotFound(format!("ordem {}", id)))
  }
}
