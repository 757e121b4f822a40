use chrono::Utc;
use prot_domain::{Clinic, Expense, LabRepository, PatientDraft, PaymentStatus, ServiceItem, WorkflowStatus};
use prot_domain::Patient;
use prot_persistence::new_sqlite_for_test;

fn draft(name: &str) -> PatientDraft {
  PatientDraft { name: name.into(),
                 clinic: "Clínica Central".into(),
                 doctor_name: "Dr. Ramos".into(),
                 doctor_phone: "(11) 4000-0000".into(),
                 prosthesis_type: "Prótese total".into(),
                 notes: "caso simples".into(),
                 service_value: 1200.0,
                 labor_cost: 300.0,
                 entry_date: None,
                 due_date: None }
}

#[test]
fn patient_round_trip_preserves_history() {
  let repo = new_sqlite_for_test("file:labtest_patients?mode=memory&cache=shared");
  let p = Patient::new(draft("Maria Silva")).expect("draft válido")
                                            .advance_status(WorkflowStatus::Barra, "fundição ok")
                                            .advance_status(WorkflowStatus::Finalizado, "entregue");
  let id = repo.save_patient(p.clone()).expect("save ok");
  let loaded = repo.get_patient(&id).expect("get ok").expect("presente");
  assert_eq!(loaded.name(), "Maria Silva");
  assert_eq!(loaded.workflow_history().len(), 3);
  assert_eq!(loaded.current_status(), WorkflowStatus::Finalizado);
  assert!(!loaded.is_active());
  assert_eq!(loaded.payment_status(), PaymentStatus::Pendente);
  assert_eq!(loaded.service_value(), 1200.0);
  assert_eq!(loaded.workflow_history()[1].notes(), "fundição ok");
}

#[test]
fn save_overwrites_by_id() {
  let repo = new_sqlite_for_test("file:labtest_upsert?mode=memory&cache=shared");
  let p = Patient::new(draft("Carlos")).expect("draft válido");
  repo.save_patient(p.clone()).expect("save ok");
  let advanced = p.advance_status(WorkflowStatus::Armacao, "");
  repo.save_patient(advanced).expect("save ok");
  let all = repo.list_patients().expect("list ok");
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].current_status(), WorkflowStatus::Armacao);
}

#[test]
fn delete_missing_patient_is_a_noop() {
  let repo = new_sqlite_for_test("file:labtest_delete?mode=memory&cache=shared");
  repo.delete_patient("nao-existe").expect("no-op ok");
  let p = Patient::new(draft("Ana")).expect("draft válido");
  let id = repo.save_patient(p).expect("save ok");
  repo.delete_patient(&id).expect("delete ok");
  assert!(repo.get_patient(&id).expect("get ok").is_none());
}

#[test]
fn expense_clinic_and_catalog_round_trip() {
  let repo = new_sqlite_for_test("file:labtest_aux?mode=memory&cache=shared");

  let e = Expense::new("dentes estoque", 420.0, Utc::now(), "material").expect("despesa válida");
  repo.save_expense(e.clone()).expect("save ok");
  let expenses = repo.list_expenses().expect("list ok");
  assert_eq!(expenses.len(), 1);
  assert_eq!(expenses[0].amount(), 420.0);
  repo.delete_expense(&e.id()).expect("delete ok");
  assert!(repo.list_expenses().expect("list ok").is_empty());

  let c = Clinic::new("Clínica Sorriso", "Dr. João", None).expect("clínica válida");
  repo.save_clinic(c.clone()).expect("save ok");
  let clinics = repo.list_clinics().expect("list ok");
  assert_eq!(clinics.len(), 1);
  assert_eq!(clinics[0].phone(), None);

  let item = ServiceItem::new("Protocolo", 3500.0).expect("item válido");
  repo.save_service_item(item.clone()).expect("save ok");
  let items = repo.list_service_items().expect("list ok");
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].price(), 3500.0);
}

#[test]
fn sqlite_backend_reports_local_store() {
  let repo = new_sqlite_for_test("file:labtest_conn?mode=memory&cache=shared");
  assert!(!repo.test_connectivity());
}
