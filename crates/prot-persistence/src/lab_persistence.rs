use crate::schema;
use crate::schema::clinics::dsl as clinics_dsl;
use crate::schema::expenses::dsl as expenses_dsl;
use crate::schema::patients::dsl as patients_dsl;
use crate::schema::service_items::dsl as items_dsl;
use chrono::{DateTime, TimeZone, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::result::Error as DieselError;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use prot_domain::{Clinic, DomainError, Expense, LabRepository, Patient, PatientDraft, PaymentStatus, ServiceItem,
                  WorkflowStep};
use std::sync::Arc;
use uuid::Uuid;
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");
#[cfg(all(feature = "pg", not(test)))]
type DbPool = Pool<ConnectionManager<PgConnection>>;
#[cfg(any(test, not(feature = "pg")))]
type DbPool = Pool<ConnectionManager<SqliteConnection>>;
#[cfg(all(feature = "pg", not(test)))]
type DbConn = PgConnection;
#[cfg(any(test, not(feature = "pg")))]
type DbConn = SqliteConnection;
/// Repositório Diesel que implementa `LabRepository`.
pub struct DieselLabRepository {
  pool: Arc<DbPool>,
}
impl DieselLabRepository {
  pub fn new(database_url: &str) -> Self {
    #[cfg(any(test, not(feature = "pg")))]
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    #[cfg(all(feature = "pg", not(test)))]
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder().max_size(4).build(manager).expect("não foi possível criar o pool de conexões");
    let repo = DieselLabRepository { pool: Arc::new(pool) };
    if let Ok(mut c) = repo.conn_raw() {
      let _ = diesel::sql_query("PRAGMA journal_mode = WAL;").execute(&mut c);
      let _ = diesel::sql_query("PRAGMA busy_timeout = 5000;").execute(&mut c);
      let _ = c.run_pending_migrations(MIGRATIONS);
      log::debug!("migrações pendentes aplicadas");
    }
    repo
  }
  fn conn_raw(&self) -> std::result::Result<PooledConnection<ConnectionManager<DbConn>>, r2d2::Error> {
    self.pool.get()
  }
  fn conn(&self) -> Result<PooledConnection<ConnectionManager<DbConn>>, DomainError> {
    self.conn_raw().map_err(|e| DomainError::StorageError(format!("pool: {}", e)))
  }
}
// Row structs Diesel para as tabelas do laboratório
#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = schema::patients)]
struct PatientRow {
  pub id: String,
  pub name: String,
  pub clinic: String,
  pub doctor_name: String,
  pub doctor_phone: String,
  pub prosthesis_type: String,
  pub notes: String,
  pub service_value: f64,
  pub labor_cost: f64,
  pub entry_date_ts: i64,
  pub due_date_ts: i64,
  pub payment_status: String,
  pub workflow_history: String,
}
#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = schema::expenses)]
struct ExpenseRow {
  pub id: String,
  pub description: String,
  pub amount: f64,
  pub date_ts: i64,
  pub category: String,
}
#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = schema::clinics)]
struct ClinicRow {
  pub id: String,
  pub name: String,
  pub doctor_name: String,
  pub phone: Option<String>,
}
#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = schema::service_items)]
struct ServiceItemRow {
  pub id: String,
  pub name: String,
  pub price: f64,
}
fn map_db_err<T>(res: std::result::Result<T, DieselError>) -> Result<T, DomainError> {
  res.map_err(|e| DomainError::StorageError(format!("db: {}", e)))
}
fn ts_to_datetime(ts: i64) -> DateTime<Utc> {
  Utc.timestamp_millis_opt(ts).single().unwrap_or_else(Utc::now)
}
fn parse_uuid(raw: &str) -> Result<Uuid, DomainError> {
  Uuid::parse_str(raw).map_err(|e| DomainError::StorageError(format!("uuid inválido: {}", e)))
}
fn patient_to_row(patient: &Patient) -> Result<PatientRow, DomainError> {
  Ok(PatientRow { id: patient.id().to_string(),
                  name: patient.name().to_string(),
                  clinic: patient.clinic().to_string(),
                  doctor_name: patient.doctor_name().to_string(),
                  doctor_phone: patient.doctor_phone().to_string(),
                  prosthesis_type: patient.prosthesis_type().to_string(),
                  notes: patient.notes().to_string(),
                  service_value: patient.service_value(),
                  labor_cost: patient.labor_cost(),
                  entry_date_ts: patient.entry_date().timestamp_millis(),
                  due_date_ts: patient.due_date().timestamp_millis(),
                  payment_status: patient.payment_status().as_str().to_string(),
                  workflow_history: serde_json::to_string(patient.workflow_history())? })
}
fn patient_from_row(row: PatientRow) -> Result<Patient, DomainError> {
  let history: Vec<WorkflowStep> = serde_json::from_str(&row.workflow_history)?;
  let payment = row.payment_status.parse::<PaymentStatus>().unwrap_or_default();
  let draft = PatientDraft { name: row.name,
                             clinic: row.clinic,
                             doctor_name: row.doctor_name,
                             doctor_phone: row.doctor_phone,
                             prosthesis_type: row.prosthesis_type,
                             notes: row.notes,
                             service_value: row.service_value,
                             labor_cost: row.labor_cost,
                             entry_date: Some(ts_to_datetime(row.entry_date_ts)),
                             due_date: Some(ts_to_datetime(row.due_date_ts)) };
  Patient::from_parts(row.id, draft, payment, history)
}
impl LabRepository for DieselLabRepository {
  fn list_patients(&self) -> Result<Vec<Patient>, DomainError> {
    let mut conn = self.conn()?;
    let rows = map_db_err(patients_dsl::patients.load::<PatientRow>(&mut conn))?;
    let mut out = Vec::with_capacity(rows.len());
    for r in rows {
      out.push(patient_from_row(r)?);
    }
    Ok(out)
  }
  fn get_patient(&self, id: &str) -> Result<Option<Patient>, DomainError> {
    let mut conn = self.conn()?;
    let opt = map_db_err(patients_dsl::patients.filter(patients_dsl::id.eq(id))
                                               .first::<PatientRow>(&mut conn)
                                               .optional())?;
    opt.map(patient_from_row).transpose()
  }
  fn save_patient(&self, patient: Patient) -> Result<String, DomainError> {
    let mut conn = self.conn()?;
    let row = patient_to_row(&patient)?;
    let id_s = row.id.clone();
    // Upsert: tenta inserir; em conflito de chave, substitui por
    // delete+insert (funciona igual em sqlite e postgres)
    if diesel::insert_into(patients_dsl::patients).values(&row).execute(&mut conn).is_err() {
      log::warn!("insert da ordem {} falhou, substituindo", id_s);
      let _ = diesel::delete(patients_dsl::patients.filter(patients_dsl::id.eq(&id_s))).execute(&mut conn);
      map_db_err(diesel::insert_into(patients_dsl::patients).values(&row).execute(&mut conn))?;
    }
    Ok(id_s)
  }
  fn delete_patient(&self, id: &str) -> Result<(), DomainError> {
    let mut conn = self.conn()?;
    map_db_err(diesel::delete(patients_dsl::patients.filter(patients_dsl::id.eq(id))).execute(&mut conn))?;
    Ok(())
  }
  fn list_expenses(&self) -> Result<Vec<Expense>, DomainError> {
    let mut conn = self.conn()?;
    let rows = map_db_err(expenses_dsl::expenses.load::<ExpenseRow>(&mut conn))?;
    let mut out = Vec::with_capacity(rows.len());
    for r in rows {
      out.push(Expense::from_parts(parse_uuid(&r.id)?, r.description, r.amount, ts_to_datetime(r.date_ts), r.category)?);
    }
    Ok(out)
  }
  fn save_expense(&self, expense: Expense) -> Result<Uuid, DomainError> {
    let mut conn = self.conn()?;
    let row = ExpenseRow { id: expense.id().to_string(),
                           description: expense.description().to_string(),
                           amount: expense.amount(),
                           date_ts: expense.date().timestamp_millis(),
                           category: expense.category().to_string() };
    if diesel::insert_into(expenses_dsl::expenses).values(&row).execute(&mut conn).is_err() {
      let _ = diesel::delete(expenses_dsl::expenses.filter(expenses_dsl::id.eq(&row.id))).execute(&mut conn);
      map_db_err(diesel::insert_into(expenses_dsl::expenses).values(&row).execute(&mut conn))?;
    }
    Ok(expense.id())
  }
  fn delete_expense(&self, id: &Uuid) -> Result<(), DomainError> {
    let mut conn = self.conn()?;
    let id_s = id.to_string();
    map_db_err(diesel::delete(expenses_dsl::expenses.filter(expenses_dsl::id.eq(&id_s))).execute(&mut conn))?;
    Ok(())
  }
  fn list_clinics(&self) -> Result<Vec<Clinic>, DomainError> {
    let mut conn = self.conn()?;
    let rows = map_db_err(clinics_dsl::clinics.load::<ClinicRow>(&mut conn))?;
    let mut out = Vec::with_capacity(rows.len());
    for r in rows {
      out.push(Clinic::from_parts(parse_uuid(&r.id)?, r.name, r.doctor_name, r.phone)?);
    }
    Ok(out)
  }
  fn save_clinic(&self, clinic: Clinic) -> Result<Uuid, DomainError> {
    let mut conn = self.conn()?;
    let row = ClinicRow { id: clinic.id().to_string(),
                          name: clinic.name().to_string(),
                          doctor_name: clinic.doctor_name().to_string(),
                          phone: clinic.phone().map(|p| p.to_string()) };
    if diesel::insert_into(clinics_dsl::clinics).values(&row).execute(&mut conn).is_err() {
      let _ = diesel::delete(clinics_dsl::clinics.filter(clinics_dsl::id.eq(&row.id))).execute(&mut conn);
      map_db_err(diesel::insert_into(clinics_dsl::clinics).values(&row).execute(&mut conn))?;
    }
    Ok(clinic.id())
  }
  fn delete_clinic(&self, id: &Uuid) -> Result<(), DomainError> {
    let mut conn = self.conn()?;
    let id_s = id.to_string();
    map_db_err(diesel::delete(clinics_dsl::clinics.filter(clinics_dsl::id.eq(&id_s))).execute(&mut conn))?;
    Ok(())
  }
  fn list_service_items(&self) -> Result<Vec<ServiceItem>, DomainError> {
    let mut conn = self.conn()?;
    let rows = map_db_err(items_dsl::service_items.load::<ServiceItemRow>(&mut conn))?;
    let mut out = Vec::with_capacity(rows.len());
    for r in rows {
      out.push(ServiceItem::from_parts(parse_uuid(&r.id)?, r.name, r.price)?);
    }
    Ok(out)
  }
  fn save_service_item(&self, item: ServiceItem) -> Result<Uuid, DomainError> {
    let mut conn = self.conn()?;
    let row = ServiceItemRow { id: item.id().to_string(), name: item.name().to_string(), price: item.price() };
    if diesel::insert_into(items_dsl::service_items).values(&row).execute(&mut conn).is_err() {
      let _ = diesel::delete(items_dsl::service_items.filter(items_dsl::id.eq(&row.id))).execute(&mut conn);
      map_db_err(diesel::insert_into(items_dsl::service_items).values(&row).execute(&mut conn))?;
    }
    Ok(item.id())
  }
  fn delete_service_item(&self, id: &Uuid) -> Result<(), DomainError> {
    let mut conn = self.conn()?;
    let id_s = id.to_string();
    map_db_err(diesel::delete(items_dsl::service_items.filter(items_dsl::id.eq(&id_s))).execute(&mut conn))?;
    Ok(())
  }
  fn test_connectivity(&self) -> bool {
    // Indicador de backend remoto: true somente quando compilado com o
    // backend Postgres hospedado.
    cfg!(all(feature = "pg", not(test)))
  }
}
/// Cria o repositório a partir das variáveis de ambiente (ou do SQLite em
/// memória nos testes)
#[cfg(all(feature = "pg", not(test)))]
pub fn new_from_env() -> Result<DieselLabRepository, DomainError> {
  dotenvy::dotenv().ok();
  let url = std::env::var("LAB_DB_URL").or_else(|_| std::env::var("DATABASE_URL"))
                                       .map_err(|_| DomainError::StorageError("LAB_DB_URL / DATABASE_URL não definida".into()))?;
  if !(url.starts_with("postgres") || url.starts_with("postgresql://") || url.contains("@")) {
    return Err(DomainError::StorageError("prot-persistence: LAB_DB_URL não parece uma URL Postgres".into()));
  }
  Ok(DieselLabRepository::new(&url))
}
#[cfg(test)]
pub fn new_from_env() -> Result<DieselLabRepository, DomainError> {
  dotenvy::dotenv().ok();
  let url = std::env::var("LAB_DB_URL").unwrap_or_else(|_| "file:labmemdb?mode=memory&cache=shared".into());
  Ok(DieselLabRepository::new(&url))
}
#[cfg(all(not(feature = "pg"), not(test)))]
pub fn new_from_env() -> Result<DieselLabRepository, DomainError> {
  dotenvy::dotenv().ok();
  let url = std::env::var("LAB_DB_URL").or_else(|_| std::env::var("DATABASE_URL"))
                                       .unwrap_or_else(|_| "lab.sqlite".into());
  Ok(DieselLabRepository::new(&url))
}
// Helper de teste: constrói o repositório sobre um SQLite explícito,
// ignorando o ambiente.
#[cfg(not(feature = "pg"))]
pub fn new_sqlite_for_test(database_url: &str) -> DieselLabRepository {
  use diesel::r2d2::ConnectionManager;
  use diesel::sqlite::SqliteConnection;
  let manager = ConnectionManager::<SqliteConnection>::new(database_url);
  let pool = Pool::builder().max_size(4).build(manager).expect("não foi possível criar o pool de conexões");
  let repo = DieselLabRepository { pool: Arc::new(pool) };
  if let Ok(mut c) = repo.conn_raw() {
    let _ = diesel::sql_query("PRAGMA journal_mode = WAL;").execute(&mut c);
    let _ = diesel::sql_query("PRAGMA busy_timeout = 5000;").execute(&mut c);
    let _ = c.run_pending_migrations(MIGRATIONS);
  }
  repo
}
