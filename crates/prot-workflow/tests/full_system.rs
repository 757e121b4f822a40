use anyhow::Result;
use prot_domain::{Expense, InMemoryLabRepository, PatientDraft, PaymentStatus, ServiceItem, WorkflowStatus};
use prot_workflow::LabService;
use std::sync::Arc;

fn service() -> Result<LabService<InMemoryLabRepository>> {
  Ok(LabService::new(Arc::new(InMemoryLabRepository::new()))?)
}

fn draft(name: &str, value: f64) -> PatientDraft {
  PatientDraft { name: name.into(),
                 clinic: "Clínica Central".into(),
                 doctor_name: "Dr. Ramos".into(),
                 service_value: value,
                 ..Default::default() }
}

#[test]
fn mutations_are_reflected_after_reload() -> Result<()> {
  let service = service()?;
  assert!(service.state()?.patients().is_empty());

  let p = service.create_patient(draft("Maria", 1000.0))?;
  let state = service.state()?;
  assert_eq!(state.patients().len(), 1);
  assert!(state.find_patient(p.id()).is_some());

  service.advance_status(p.id(), WorkflowStatus::Barra, "fundição ok")?;
  let state = service.state()?;
  let loaded = state.find_patient(p.id()).expect("presente no read-model");
  assert_eq!(loaded.current_status(), WorkflowStatus::Barra);
  assert_eq!(loaded.workflow_history().len(), 2);

  service.delete_patient(p.id())?;
  assert!(service.state()?.patients().is_empty());
  Ok(())
}

#[test]
fn failed_creation_leaves_the_read_model_untouched() -> Result<()> {
  let service = service()?;
  service.create_patient(draft("Ana", 500.0))?;
  let mut bad = draft("", 100.0);
  bad.clinic = String::new();
  assert!(service.create_patient(bad).is_err());
  assert_eq!(service.state()?.patients().len(), 1);
  Ok(())
}

#[test]
fn dashboard_tracks_the_full_collections() -> Result<()> {
  let service = service()?;
  let a = service.create_patient(draft("A", 1200.0))?;
  service.create_patient(draft("B", 800.0))?;
  service.advance_status(a.id(), WorkflowStatus::Finalizado, "entregue")?;
  service.register_expense(Expense::new("gesso pedra", 150.0, chrono::Utc::now(), "material")?)?;

  let report = service.dashboard()?;
  assert_eq!(report.summary.completed_count, 1);
  assert_eq!(report.summary.production_count, 1);
  assert_eq!(report.summary.total_revenue, 2000.0);
  assert_eq!(report.summary.total_expenses, 150.0);
  assert_eq!(report.summary.net_profit, 1850.0);
  Ok(())
}

#[test]
fn payment_status_is_independent_of_workflow() -> Result<()> {
  let service = service()?;
  let p = service.create_patient(draft("Carla", 400.0))?;
  let paid = service.set_payment_status(p.id(), PaymentStatus::Pago)?;
  assert_eq!(paid.payment_status(), PaymentStatus::Pago);
  assert_eq!(paid.current_status(), WorkflowStatus::PlanoCera);

  // Receita do painel não filtra por pagamento.
  let report = service.dashboard()?;
  assert_eq!(report.summary.total_revenue, 400.0);
  Ok(())
}

#[test]
fn catalog_prefills_the_service_value() -> Result<()> {
  let service = service()?;
  service.register_service_item(ServiceItem::new("Prótese Total", 1200.0)?)?;
  assert_eq!(service.suggested_price("prótese total")?, Some(1200.0));
  assert_eq!(service.suggested_price("coroa")?, None);

  // O valor copiado fica desacoplado: alterar o catálogo depois não muda
  // a ordem.
  let mut d = draft("Marcos", 0.0);
  if let Some(price) = service.suggested_price(&"Prótese Total".to_string())? {
    d.service_value = price;
  }
  let p = service.create_patient(d)?;
  service.register_service_item(ServiceItem::new("Prótese Total", 9999.0)?)?;
  let state = service.state()?;
  assert_eq!(state.find_patient(p.id()).map(|p| p.service_value()), Some(1200.0));
  Ok(())
}

#[test]
fn csv_import_flows_into_the_read_model() -> Result<()> {
  let service = service()?;
  let sheet = "data,paciente,clinica,valor,status\n\
               10/01/2024,Jose Dias,Clinica Sul,\"R$ 350,00\",finalizado\n\
               11/01/2024,Rita Melo,Clinica Sul,\"R$ 500,00\",\n";
  let summary = service.import_csv(sheet)?;
  assert_eq!(summary.imported, 2);
  let state = service.state()?;
  assert_eq!(state.patients().len(), 2);
  let report = service.dashboard()?;
  assert_eq!(report.summary.completed_count, 1);
  assert_eq!(report.summary.total_revenue, 850.0);
  Ok(())
}
