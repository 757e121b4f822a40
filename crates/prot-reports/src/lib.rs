//! prot-reports: agregação para o painel do laboratório
//!
//! Funções puras sobre as coleções completas de ordens e despesas. Não há
//! atualização incremental: a cada recarga de dados o painel é recalculado
//! por inteiro, o que é barato para o volume de um laboratório de um único
//! operador.

mod dashboard;
mod monthly;

pub use dashboard::{dashboard_report, status_distribution, summarize, DashboardReport, DashboardSummary, StatusBucket};
pub use monthly::{current_year, MonthlySeries};
