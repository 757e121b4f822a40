// normalizer.rs
use crate::errors::ImportError;
use crate::parse::{cell_at, infer_status, parse_currency, parse_entry_date, split_quoted_line, ColumnMap};
use chrono::Duration;
use prot_domain::{LabRepository, Patient, PatientDraft, PaymentStatus, WorkflowStep};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Anotação fixa gravada no lançamento inicial de toda ordem importada.
pub const IMPORT_STEP_NOTES: &str = "Importado da planilha legada";

/// Resultado de um lote de importação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
  /// Linhas convertidas e persistidas com sucesso.
  pub imported: usize,
  /// Linhas puladas (sem paciente/clínica ou com falha individual).
  pub skipped: usize,
}

/// Importador de planilhas legadas. Cada linha aproveitável vira uma
/// ordem persistida individualmente: uma falha em uma linha não impede as
/// seguintes.
pub struct CsvImporter<R>
  where R: LabRepository
{
  repo: Arc<R>,
}

impl<R> CsvImporter<R> where R: LabRepository
{
  pub fn new(repo: Arc<R>) -> Self {
    Self { repo }
  }

  /// Importa o texto CSV completo: primeira linha não vazia é o
  /// cabeçalho, as demais são dados. Devolve o total importado e o total
  /// pulado.
  pub fn import(&self, raw: &str) -> Result<ImportSummary, ImportError> {
    let mut lines = raw.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());
    let (_, header_line) = lines.next().ok_or(ImportError::EmptyFile)?;
    let columns = ColumnMap::detect(&split_quoted_line(header_line));
    if !columns.has_identity() {
      return Err(ImportError::MissingColumns);
    }

    let mut imported = 0usize;
    let mut skipped = 0usize;
    for (line_number, line) in lines {
      match self.import_row(&columns, line_number, line) {
        Ok(()) => imported += 1,
        Err(reason) => {
          log::warn!("linha {} pulada: {}", line_number + 1, reason);
          skipped += 1;
        }
      }
    }
    Ok(ImportSummary { imported, skipped })
  }

  fn import_row(&self, columns: &ColumnMap, line_number: usize, line: &str) -> Result<(), String> {
    let cells = split_quoted_line(line);
    let name = cell_at(&cells, columns.name);
    let clinic = cell_at(&cells, columns.clinic);
    if name.is_empty() || clinic.is_empty() {
      return Err("sem paciente ou clínica".to_string());
    }

    let entry_date = parse_entry_date(&cell_at(&cells, columns.date));
    let status = infer_status(&cell_at(&cells, columns.status));
    let draft = PatientDraft { name,
                               clinic,
                               doctor_name: non_empty_or(cell_at(&cells, columns.doctor), "Não informado"),
                               doctor_phone: String::new(),
                               prosthesis_type: cell_at(&cells, columns.service),
                               notes: String::new(),
                               service_value: parse_currency(&cell_at(&cells, columns.value)),
                               labor_cost: 0.0,
                               entry_date: Some(entry_date),
                               due_date: Some(entry_date + Duration::days(7)) };

    let id = import_id(line_number, line);
    let history = vec![WorkflowStep::new(status, IMPORT_STEP_NOTES)];
    let patient = Patient::from_parts(id, draft, PaymentStatus::Pendente, history).map_err(|e| e.to_string())?;
    self.repo.save_patient(patient).map_err(|e| e.to_string())?;
    Ok(())
  }
}

fn non_empty_or(value: String, default: &str) -> String {
  if value.is_empty() {
    default.to_string()
  } else {
    value
  }
}

/// Id sintetizado no namespace `import-`, derivado do conteúdo da linha:
/// reimportar a mesma planilha sobrescreve as mesmas ordens em vez de
/// duplicá-las, e o prefixo evita colisão com os ids UUID dos cadastros
/// manuais.
fn import_id(line_number: usize, line: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(line_number.to_le_bytes());
  hasher.update(line.trim().as_bytes());
  let digest = hasher.finalize();
  let hex: String = digest.iter().take(12).map(|b| format!("{:02x}", b)).collect();
  format!("import-{}", hex)
}
