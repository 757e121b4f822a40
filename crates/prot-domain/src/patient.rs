// patient.rs
use crate::{DomainError, PaymentStatus, WorkflowStatus, WorkflowStep};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Anotação gravada no primeiro lançamento de toda ordem cadastrada
/// manualmente.
pub const INITIAL_STEP_NOTES: &str = "Cadastro inicial";

/// Campos de entrada para cadastrar uma ordem de serviço nova.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientDraft {
  pub name: String,
  pub clinic: String,
  pub doctor_name: String,
  pub doctor_phone: String,
  pub prosthesis_type: String,
  pub notes: String,
  pub service_value: f64,
  pub labor_cost: f64,
  pub entry_date: Option<DateTime<Utc>>,
  pub due_date: Option<DateTime<Utc>>,
}

/// Campos descritivos/financeiros editáveis de uma ordem existente. A
/// edição nunca toca o histórico de produção.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientDetails {
  pub name: String,
  pub clinic: String,
  pub doctor_name: String,
  pub doctor_phone: String,
  pub prosthesis_type: String,
  pub notes: String,
  pub service_value: f64,
  pub labor_cost: f64,
  pub due_date: DateTime<Utc>,
}

/// Ordem de serviço do laboratório (um trabalho de prótese para um
/// paciente), acompanhada de ponta a ponta.
///
/// O histórico de produção é um log de inserção: `current_status` e
/// `is_active` são derivados do último lançamento, de modo que os
/// invariantes valem por construção e não dependem de sincronização
/// manual de campos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
  id: String,
  name: String,
  clinic: String,
  doctor_name: String,
  doctor_phone: String,
  prosthesis_type: String,
  notes: String,
  service_value: f64,
  labor_cost: f64,
  entry_date: DateTime<Utc>,
  due_date: DateTime<Utc>,
  payment_status: PaymentStatus,
  workflow_history: Vec<WorkflowStep>,
}

fn validate_fields(name: &str, clinic: &str, doctor_name: &str, service_value: f64, labor_cost: f64) -> Result<(), DomainError> {
  if name.trim().is_empty() {
    return Err(DomainError::ValidationError("Nome do paciente não pode estar vazio".to_string()));
  }
  if clinic.trim().is_empty() {
    return Err(DomainError::ValidationError("Clínica não pode estar vazia".to_string()));
  }
  if doctor_name.trim().is_empty() {
    return Err(DomainError::ValidationError("Nome do dentista não pode estar vazio".to_string()));
  }
  if !service_value.is_finite() || service_value < 0.0 {
    return Err(DomainError::ValidationError("Valor do serviço deve ser um número não negativo".to_string()));
  }
  if !labor_cost.is_finite() || labor_cost < 0.0 {
    return Err(DomainError::ValidationError("Custo de bancada deve ser um número não negativo".to_string()));
  }
  Ok(())
}

impl Patient {
  /// Cadastra uma ordem nova: valida os campos obrigatórios, gera um id
  /// fresco e semeia o histórico com um único lançamento em
  /// `PlanoCera`.
  pub fn new(draft: PatientDraft) -> Result<Self, DomainError> {
    validate_fields(&draft.name, &draft.clinic, &draft.doctor_name, draft.service_value, draft.labor_cost)?;
    let entry_date = draft.entry_date.unwrap_or_else(Utc::now);
    let due_date = draft.due_date.unwrap_or(entry_date);
    Ok(Self { id: Uuid::new_v4().to_string(),
              name: draft.name.trim().to_string(),
              clinic: draft.clinic.trim().to_string(),
              doctor_name: draft.doctor_name.trim().to_string(),
              doctor_phone: draft.doctor_phone.trim().to_string(),
              prosthesis_type: draft.prosthesis_type.trim().to_string(),
              notes: draft.notes.trim().to_string(),
              service_value: draft.service_value,
              labor_cost: draft.labor_cost,
              entry_date,
              due_date,
              payment_status: PaymentStatus::Pendente,
              workflow_history: vec![WorkflowStep::new(WorkflowStatus::PlanoCera, INITIAL_STEP_NOTES)] })
  }

  /// Reconstrói uma ordem persistida (ou importada) com id e histórico
  /// explícitos. O histórico não pode ser vazio.
  pub fn from_parts(id: impl Into<String>,
                    draft: PatientDraft,
                    payment_status: PaymentStatus,
                    workflow_history: Vec<WorkflowStep>)
                    -> Result<Self, DomainError> {
    let id = id.into();
    if id.trim().is_empty() {
      return Err(DomainError::ValidationError("Id da ordem não pode estar vazio".to_string()));
    }
    if workflow_history.is_empty() {
      return Err(DomainError::ValidationError(format!("Ordem {} sem histórico de produção", id)));
    }
    validate_fields(&draft.name, &draft.clinic, &draft.doctor_name, draft.service_value, draft.labor_cost)?;
    let entry_date = draft.entry_date.unwrap_or_else(Utc::now);
    let due_date = draft.due_date.unwrap_or(entry_date);
    Ok(Self { id,
              name: draft.name.trim().to_string(),
              clinic: draft.clinic.trim().to_string(),
              doctor_name: draft.doctor_name.trim().to_string(),
              doctor_phone: draft.doctor_phone.trim().to_string(),
              prosthesis_type: draft.prosthesis_type.trim().to_string(),
              notes: draft.notes.trim().to_string(),
              service_value: draft.service_value,
              labor_cost: draft.labor_cost,
              entry_date,
              due_date,
              payment_status,
              workflow_history })
  }

  /// Anexa um lançamento novo ao histórico e devolve a ordem resultante.
  ///
  /// Nenhuma transição é rejeitada: o domínio admite fluxos corretivos
  /// (voltar a uma etapa anterior, reabrir uma ordem finalizada), então
  /// `Finalizado` vale como "finalizado por último", não como estado
  /// terminal imposto.
  pub fn advance_status(&self, status: WorkflowStatus, notes: impl Into<String>) -> Self {
    let mut advanced = self.clone();
    advanced.workflow_history.push(WorkflowStep::new(status, notes));
    advanced
  }

  /// Substitui os campos descritivos/financeiros sem tocar o histórico.
  pub fn with_details(&self, details: PatientDetails) -> Result<Self, DomainError> {
    validate_fields(&details.name, &details.clinic, &details.doctor_name, details.service_value, details.labor_cost)?;
    let mut edited = self.clone();
    edited.name = details.name.trim().to_string();
    edited.clinic = details.clinic.trim().to_string();
    edited.doctor_name = details.doctor_name.trim().to_string();
    edited.doctor_phone = details.doctor_phone.trim().to_string();
    edited.prosthesis_type = details.prosthesis_type.trim().to_string();
    edited.notes = details.notes.trim().to_string();
    edited.service_value = details.service_value;
    edited.labor_cost = details.labor_cost;
    edited.due_date = details.due_date;
    Ok(edited)
  }

  /// Marca a situação de pagamento. Independente da etapa de produção.
  pub fn with_payment_status(&self, payment_status: PaymentStatus) -> Self {
    let mut paid = self.clone();
    paid.payment_status = payment_status;
    paid
  }

  /// Etapa atual = etapa do último lançamento do histórico.
  pub fn current_status(&self) -> WorkflowStatus {
    // O histórico nunca é vazio (garantido pelos construtores).
    self.workflow_history.last().map(WorkflowStep::status).unwrap_or(WorkflowStatus::PlanoCera)
  }

  /// Ordem ativa = etapa atual não terminal.
  pub fn is_active(&self) -> bool {
    !self.current_status().is_terminal()
  }

  /// Cópia do histórico ordenada por timestamp, para exibição. O log em
  /// si nunca é reordenado.
  pub fn history_by_timestamp(&self) -> Vec<WorkflowStep> {
    let mut sorted = self.workflow_history.clone();
    sorted.sort_by_key(WorkflowStep::timestamp);
    sorted
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn clinic(&self) -> &str {
    &self.clinic
  }

  pub fn doctor_name(&self) -> &str {
    &self.doctor_name
  }

  pub fn doctor_phone(&self) -> &str {
    &self.doctor_phone
  }

  pub fn prosthesis_type(&self) -> &str {
    &self.prosthesis_type
  }

  pub fn notes(&self) -> &str {
    &self.notes
  }

  pub fn service_value(&self) -> f64 {
    self.service_value
  }

  pub fn labor_cost(&self) -> f64 {
    self.labor_cost
  }

  pub fn entry_date(&self) -> DateTime<Utc> {
    self.entry_date
  }

  pub fn due_date(&self) -> DateTime<Utc> {
    self.due_date
  }

  pub fn payment_status(&self) -> PaymentStatus {
    self.payment_status
  }

  pub fn workflow_history(&self) -> &[WorkflowStep] {
    &self.workflow_history
  }
}

impl fmt::Display for Patient {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f,
           "Patient(id: {}, nome: {}, etapa: {}, pagamento: {})",
           self.id,
           self.name,
           self.current_status(),
           self.payment_status)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn draft() -> PatientDraft {
    PatientDraft { name: "Maria Silva".into(),
                   clinic: "Clínica Sorriso".into(),
                   doctor_name: "Dr. João".into(),
                   doctor_phone: "(11) 99999-0000".into(),
                   prosthesis_type: "Prótese total".into(),
                   notes: String::new(),
                   service_value: 1200.0,
                   labor_cost: 300.0,
                   entry_date: None,
                   due_date: None }
  }

  #[test]
  fn new_patient_seeds_single_plano_cera_step() -> Result<(), DomainError> {
    let p = Patient::new(draft())?;
    assert_eq!(p.workflow_history().len(), 1);
    assert_eq!(p.current_status(), WorkflowStatus::PlanoCera);
    assert_eq!(p.workflow_history()[0].notes(), INITIAL_STEP_NOTES);
    assert!(p.is_active());
    assert_eq!(p.payment_status(), PaymentStatus::Pendente);
    Ok(())
  }

  #[test]
  fn new_patient_rejects_missing_required_fields() {
    let mut d = draft();
    d.name = "   ".into();
    assert!(Patient::new(d).is_err());

    let mut d = draft();
    d.clinic = String::new();
    assert!(Patient::new(d).is_err());

    let mut d = draft();
    d.service_value = f64::NAN;
    assert!(Patient::new(d).is_err());

    let mut d = draft();
    d.service_value = -10.0;
    assert!(Patient::new(d).is_err());
  }

  #[test]
  fn advance_keeps_derived_invariants() -> Result<(), DomainError> {
    let p = Patient::new(draft())?;
    let sequence = [WorkflowStatus::MoldeiraIndividual,
                    WorkflowStatus::Barra,
                    WorkflowStatus::RemontarDentes,
                    WorkflowStatus::Finalizado,
                    WorkflowStatus::Acrilizar];
    let mut current = p;
    for (i, status) in sequence.into_iter().enumerate() {
      current = current.advance_status(status, "");
      assert_eq!(current.workflow_history().len(), i + 2);
      assert_eq!(current.current_status(), status);
      assert_eq!(current.is_active(), status != WorkflowStatus::Finalizado);
    }
    Ok(())
  }

  #[test]
  fn finalizado_is_transient_under_further_advances() -> Result<(), DomainError> {
    let p = Patient::new(draft())?.advance_status(WorkflowStatus::Finalizado, "entregue");
    assert!(!p.is_active());
    // Reabrir é um avanço comum: o histórico registra a volta.
    let reopened = p.advance_status(WorkflowStatus::RemontarDentes, "ajuste de oclusão");
    assert!(reopened.is_active());
    assert_eq!(reopened.current_status(), WorkflowStatus::RemontarDentes);
    assert_eq!(reopened.workflow_history().len(), 3);
    Ok(())
  }

  #[test]
  fn with_details_never_touches_history() -> Result<(), DomainError> {
    let p = Patient::new(draft())?.advance_status(WorkflowStatus::Barra, "");
    let details = PatientDetails { name: "Maria S. Santos".into(),
                                   clinic: p.clinic().to_string(),
                                   doctor_name: p.doctor_name().to_string(),
                                   doctor_phone: p.doctor_phone().to_string(),
                                   prosthesis_type: "Protocolo".into(),
                                   notes: "reagendado".into(),
                                   service_value: 1500.0,
                                   labor_cost: 280.0,
                                   due_date: p.due_date() };
    let edited = p.with_details(details)?;
    assert_eq!(edited.workflow_history().len(), p.workflow_history().len());
    assert_eq!(edited.current_status(), p.current_status());
    assert_eq!(edited.name(), "Maria S. Santos");
    assert_eq!(edited.service_value(), 1500.0);
    assert_eq!(edited.id(), p.id());
    Ok(())
  }

  #[test]
  fn from_parts_rejects_empty_history() {
    let res = Patient::from_parts("abc", draft(), PaymentStatus::Pendente, vec![]);
    assert!(res.is_err());
  }

  #[test]
  fn history_by_timestamp_does_not_reorder_the_log() -> Result<(), DomainError> {
    use chrono::TimeZone;
    let older = WorkflowStep::from_parts(uuid::Uuid::new_v4(),
                                         WorkflowStatus::Barra,
                                         Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap(),
                                         "");
    let newer = WorkflowStep::from_parts(uuid::Uuid::new_v4(),
                                         WorkflowStatus::PlanoCera,
                                         Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap(),
                                         "");
    // Log gravado fora de ordem cronológica: a etapa atual segue sendo a
    // do último lançamento anexado.
    let p = Patient::from_parts("abc", draft(), PaymentStatus::Pendente, vec![newer.clone(), older.clone()])?;
    assert_eq!(p.current_status(), WorkflowStatus::Barra);
    let sorted = p.history_by_timestamp();
    assert_eq!(sorted[0].id(), older.id());
    assert_eq!(p.workflow_history()[0].id(), newer.id());
    Ok(())
  }
}
