use thiserror::Error;

// Erros comuns do motor de fluxo do laboratório.
//
// Este enum centraliza o que pode falhar em uma operação disparada pela
// interface: erros do domínio/gateway, lote de importação, validação
// local e serialização. Todo erro é terminal para a ação que o disparou;
// não há retry automático.
#[derive(Error, Debug)]
pub enum WorkflowError {
  /// Erros originados pelo domínio ou pelo gateway de persistência.
  #[error("Erro de domínio: {0}")]
  Domain(#[from] prot_domain::DomainError),

  /// Erros de lote da importação de planilhas.
  #[error("Erro de importação: {0}")]
  Import(#[from] prot_import::ImportError),

  /// Ordem de serviço inexistente para a operação pedida.
  #[error("Ordem não encontrada: {0}")]
  NotFound(String),

  /// Erros de validação locais do fluxo.
  #[error("Erro de validação: {0}")]
  Validation(String),

  /// Erros de serialização/desserialização JSON.
  #[error("Erro de serialização: {0}")]
  Serialization(#[from] serde_json::Error),

  /// Erro genérico: captura outros tipos de erro não tipados.
  #[error("Outro erro: {0}")]
  Other(String),
}
