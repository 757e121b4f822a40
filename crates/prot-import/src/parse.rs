// parse.rs
// Parsing de células de planilhas legadas: split de linha ciente de
// aspas, moeda brasileira, datas DD/MM/AAAA e inferência de etapa a
// partir de texto livre. Tudo com default em caso de falha: a migração
// prefere aproveitar o máximo possível a rejeitar linhas inteiras.
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use prot_domain::WorkflowStatus;
use std::collections::HashMap;

static ACCENTS: Lazy<HashMap<char, char>> = Lazy::new(|| {
  [('á', 'a'),
   ('à', 'a'),
   ('â', 'a'),
   ('ã', 'a'),
   ('é', 'e'),
   ('ê', 'e'),
   ('í', 'i'),
   ('ó', 'o'),
   ('ô', 'o'),
   ('õ', 'o'),
   ('ú', 'u'),
   ('ü', 'u'),
   ('ç', 'c')].into_iter()
              .collect()
});

/// Minúsculas + remoção de acentos, para casar palavras-chave escritas de
/// qualquer jeito nas planilhas.
pub(crate) fn fold(text: &str) -> String {
  text.to_lowercase().chars().map(|c| *ACCENTS.get(&c).unwrap_or(&c)).collect()
}

/// Divide uma linha CSV em células, ignorando vírgulas dentro de campos
/// entre aspas. Cada célula volta sem espaços nas pontas e sem as aspas
/// envolventes (aspas duplas internas `""` viram `"`).
pub(crate) fn split_quoted_line(line: &str) -> Vec<String> {
  let mut cells = Vec::new();
  let mut current = String::new();
  let mut in_quotes = false;
  for c in line.chars() {
    match c {
      '"' => {
        in_quotes = !in_quotes;
        current.push(c);
      }
      ',' if !in_quotes => {
        cells.push(unquote(&current));
        current.clear();
      }
      _ => current.push(c),
    }
  }
  cells.push(unquote(&current));
  cells
}

fn unquote(cell: &str) -> String {
  let trimmed = cell.trim();
  if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
    trimmed[1..trimmed.len() - 1].replace("\"\"", "\"").trim().to_string()
  } else {
    trimmed.to_string()
  }
}

/// Converte uma célula monetária brasileira (`R$ 1.200,00`) em um valor
/// decimal: remove o símbolo, descarta os pontos de milhar e troca a
/// vírgula decimal por ponto. Célula imprestável vira 0.
pub(crate) fn parse_currency(cell: &str) -> f64 {
  let cleaned = fold(cell).replace("r$", "").replace('.', "").replace(',', ".").trim().to_string();
  cleaned.parse::<f64>().unwrap_or(0.0)
}

/// Converte uma célula `DD/MM/AAAA` em timestamp UTC (meia-noite). Datas
/// ausentes ou imprestáveis viram o instante atual.
pub(crate) fn parse_entry_date(cell: &str) -> DateTime<Utc> {
  if let Ok(date) = NaiveDate::parse_from_str(cell.trim(), "%d/%m/%Y") {
    if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
      return Utc.from_utc_datetime(&midnight);
    }
  }
  Utc::now()
}

// Palavras-chave de etapa em ordem de prioridade: a primeira que casar
// decide. Palavras de conclusão vêm antes do retrabalho.
static STATUS_KEYWORDS: &[(&str, WorkflowStatus)] = &[("finaliz", WorkflowStatus::Finalizado),
                                                      ("conclu", WorkflowStatus::Finalizado),
                                                      ("entreg", WorkflowStatus::Finalizado),
                                                      ("pronto", WorkflowStatus::Finalizado),
                                                      ("remont", WorkflowStatus::RemontarDentes),
                                                      ("ajust", WorkflowStatus::RemontarDentes),
                                                      ("acriliz", WorkflowStatus::Acrilizar),
                                                      ("montagem", WorkflowStatus::MontagemDentes),
                                                      ("moldeira", WorkflowStatus::MoldeiraIndividual)];

/// Infere a etapa de produção de um texto livre de situação. Sem casar
/// nenhuma palavra-chave, a ordem entra no início do fluxo.
pub(crate) fn infer_status(cell: &str) -> WorkflowStatus {
  let text = fold(cell);
  for (keyword, status) in STATUS_KEYWORDS {
    if text.contains(keyword) {
      return *status;
    }
  }
  WorkflowStatus::PlanoCera
}

/// Índices das colunas reconhecidas no cabeçalho. Coluna ausente degrada
/// para o default do campo correspondente.
#[derive(Debug, Clone, Default)]
pub(crate) struct ColumnMap {
  pub date: Option<usize>,
  pub name: Option<usize>,
  pub clinic: Option<usize>,
  pub doctor: Option<usize>,
  pub service: Option<usize>,
  pub value: Option<usize>,
  pub status: Option<usize>,
}

fn find_column(headers: &[String], keywords: &[&str]) -> Option<usize> {
  headers.iter().position(|h| {
                  let folded = fold(h);
                  keywords.iter().any(|k| folded.contains(k))
                })
}

impl ColumnMap {
  pub fn detect(headers: &[String]) -> Self {
    Self { date: find_column(headers, &["data", "entrada"]),
           name: find_column(headers, &["paciente", "nome"]),
           clinic: find_column(headers, &["clinica"]),
           doctor: find_column(headers, &["dentista", "doutor"]),
           service: find_column(headers, &["servico", "protese", "tipo"]),
           value: find_column(headers, &["valor", "preco", "total"]),
           status: find_column(headers, &["status", "situacao", "etapa"]) }
  }

  /// Sem coluna de paciente nem de clínica não há linha aproveitável.
  pub fn has_identity(&self) -> bool {
    self.name.is_some() && self.clinic.is_some()
  }
}

/// Célula de uma linha pelo índice mapeado; ausência vira string vazia.
pub(crate) fn cell_at(cells: &[String], index: Option<usize>) -> String {
  index.and_then(|i| cells.get(i)).map(|c| c.trim().to_string()).unwrap_or_default()
}
