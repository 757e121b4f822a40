//! prot-import: normalizador de planilhas legadas
//!
//! Ferramenta de migração única: converte exportações CSV sem esquema fixo
//! em ordens de serviço válidas. As colunas são localizadas por palavra-
//! chave no cabeçalho, os valores monetários e as datas seguem o formato
//! brasileiro e a etapa de produção é inferida de texto livre. Linhas
//! irrecuperáveis são registradas e puladas; uma falha nunca aborta o
//! lote.

mod errors;
mod normalizer;
mod parse;

pub use errors::ImportError;
pub use normalizer::{CsvImporter, ImportSummary, IMPORT_STEP_NOTES};
