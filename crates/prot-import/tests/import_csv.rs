use chrono::Datelike;
use prot_domain::{InMemoryLabRepository, LabRepository, PaymentStatus, WorkflowStatus};
use prot_import::{CsvImporter, ImportSummary, IMPORT_STEP_NOTES};
use std::sync::Arc;

fn importer_with_repo() -> (CsvImporter<InMemoryLabRepository>, Arc<InMemoryLabRepository>) {
  let repo = Arc::new(InMemoryLabRepository::new());
  (CsvImporter::new(repo.clone()), repo)
}

#[test]
fn legacy_row_round_trip() {
  let (importer, repo) = importer_with_repo();
  let sheet = "data,paciente,clinica,dentista,servico,valor,status\n\
               \"15/03/2024\",\"Maria Silva\",\"Clinica X\",\"Dr. Joao\",\"Protese Total\",\"R$ 1.200,00\",\"Finalizado\"\n";
  let summary = importer.import(sheet).expect("lote válido");
  assert_eq!(summary, ImportSummary { imported: 1, skipped: 0 });

  let patients = repo.list_patients().expect("coleção legível");
  assert_eq!(patients.len(), 1);
  let p = &patients[0];
  assert_eq!(p.name(), "Maria Silva");
  assert_eq!(p.clinic(), "Clinica X");
  assert_eq!(p.doctor_name(), "Dr. Joao");
  assert_eq!(p.prosthesis_type(), "Protese Total");
  assert_eq!(p.service_value(), 1200.0);
  let entry = p.entry_date();
  assert_eq!((entry.year(), entry.month(), entry.day()), (2024, 3, 15));
  assert_eq!(p.current_status(), WorkflowStatus::Finalizado);
  assert!(!p.is_active());
  assert_eq!(p.payment_status(), PaymentStatus::Pendente);
  assert_eq!(p.workflow_history().len(), 1);
  assert_eq!(p.workflow_history()[0].notes(), IMPORT_STEP_NOTES);
  assert!(p.id().starts_with("import-"));
  // Vencimento padrão: uma semana depois da entrada.
  assert_eq!((p.due_date() - p.entry_date()).num_days(), 7);
}

#[test]
fn quoted_cells_keep_embedded_commas() {
  let (importer, repo) = importer_with_repo();
  let sheet = "paciente,clinica,valor\n\"Silva, Joao\",Clinica Y,\"R$ 500,00\"\n";
  let summary = importer.import(sheet).expect("lote válido");
  assert_eq!(summary.imported, 1);
  let patients = repo.list_patients().expect("coleção legível");
  assert_eq!(patients[0].name(), "Silva, Joao");
  assert_eq!(patients[0].service_value(), 500.0);
}

#[test]
fn one_malformed_row_does_not_abort_the_batch() {
  let (importer, repo) = importer_with_repo();
  let sheet = "data,paciente,clinica,valor\n\
               ,,,100\n\
               20/05/2024,Ana Souza,OdontoCenter,\"R$ 300,00\"\n";
  let summary = importer.import(sheet).expect("lote válido");
  assert_eq!(summary.imported, 1);
  assert_eq!(summary.skipped, 1);
  let patients = repo.list_patients().expect("coleção legível");
  assert_eq!(patients.len(), 1);
  assert_eq!(patients[0].name(), "Ana Souza");
}

#[test]
fn missing_optional_columns_degrade_to_defaults() {
  let (importer, repo) = importer_with_repo();
  // Sem colunas de data, valor e status: entrada vira "agora", valor 0 e
  // a ordem começa no plano de cera.
  let sheet = "paciente,clinica\nCarlos Lima,Clinica Z\n";
  let summary = importer.import(sheet).expect("lote válido");
  assert_eq!(summary.imported, 1);
  let patients = repo.list_patients().expect("coleção legível");
  let p = &patients[0];
  assert_eq!(p.service_value(), 0.0);
  assert_eq!(p.current_status(), WorkflowStatus::PlanoCera);
  assert!(p.is_active());
  assert_eq!(p.doctor_name(), "Não informado");
}

#[test]
fn unparseable_currency_defaults_to_zero() {
  let (importer, repo) = importer_with_repo();
  let sheet = "paciente,clinica,valor\nJoana Alves,Clinica W,a combinar\n";
  importer.import(sheet).expect("lote válido");
  let patients = repo.list_patients().expect("coleção legível");
  assert_eq!(patients[0].service_value(), 0.0);
}

#[test]
fn status_keywords_drive_the_seeded_history() {
  let (importer, repo) = importer_with_repo();
  let sheet = "paciente,clinica,status\n\
               P1,C1,entregue\n\
               P2,C2,em remontagem\n\
               P3,C3,acrilizando\n\
               P4,C4,montagem de dentes\n\
               P5,C5,moldeira individual\n\
               P6,C6,aguardando material\n";
  let summary = importer.import(sheet).expect("lote válido");
  assert_eq!(summary.imported, 6);
  let patients = repo.list_patients().expect("coleção legível");
  let status_of = |name: &str| {
    patients.iter()
            .find(|p| p.name() == name)
            .map(|p| p.current_status())
            .expect("paciente importado")
  };
  assert_eq!(status_of("P1"), WorkflowStatus::Finalizado);
  assert_eq!(status_of("P2"), WorkflowStatus::RemontarDentes);
  assert_eq!(status_of("P3"), WorkflowStatus::Acrilizar);
  assert_eq!(status_of("P4"), WorkflowStatus::MontagemDentes);
  assert_eq!(status_of("P5"), WorkflowStatus::MoldeiraIndividual);
  assert_eq!(status_of("P6"), WorkflowStatus::PlanoCera);
}
