// errors.rs
use prot_domain::DomainError;
use thiserror::Error;

/// Erros de lote da importação. Falhas de linha individual não aparecem
/// aqui: são registradas em log e a linha é pulada.
#[derive(Debug, Error)]
pub enum ImportError {
  /// O arquivo não tem nem linha de cabeçalho.
  #[error("Arquivo vazio: nenhuma linha de cabeçalho encontrada")]
  EmptyFile,
  /// O cabeçalho não permite localizar as colunas mínimas (paciente e
  /// clínica); nenhuma linha seria aproveitável.
  #[error("Cabeçalho sem colunas reconhecíveis de paciente e clínica")]
  MissingColumns,
  /// Erros do domínio/gateway propagados pelo lote.
  #[error("Erro de domínio: {0}")]
  Domain(#[from] DomainError),
}
