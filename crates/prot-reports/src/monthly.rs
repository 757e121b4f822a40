// monthly.rs
use chrono::{Datelike, Utc};
use prot_domain::{Expense, Patient};
use serde::Serialize;

/// Ano-calendário corrente, usado como padrão pelo painel.
pub fn current_year() -> i32 {
  Utc::now().year()
}

/// Séries mensais de um ano-calendário: 12 baldes indexados pelo mês da
/// data de entrada (ordens) ou da data da despesa. Anos diferentes do
/// solicitado ficam fora de todos os baldes; não há rollup plurianual.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySeries {
  year: i32,
  revenue: [f64; 12],
  expenses: [f64; 12],
}

impl MonthlySeries {
  pub fn for_year(year: i32, patients: &[Patient], expenses: &[Expense]) -> Self {
    let mut revenue = [0.0f64; 12];
    let mut monthly_expenses = [0.0f64; 12];
    for p in patients {
      let entry = p.entry_date();
      if entry.year() == year {
        revenue[entry.month0() as usize] += p.service_value();
      }
    }
    for e in expenses {
      let date = e.date();
      if date.year() == year {
        monthly_expenses[date.month0() as usize] += e.amount();
      }
    }
    Self { year, revenue, expenses: monthly_expenses }
  }

  pub fn year(&self) -> i32 {
    self.year
  }

  pub fn revenue(&self) -> &[f64; 12] {
    &self.revenue
  }

  pub fn expenses(&self) -> &[f64; 12] {
    &self.expenses
  }
}
