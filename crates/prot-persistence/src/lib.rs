//! Implementação durável do contrato `LabRepository` sobre Diesel.
//! Este arquivo expõe o módulo `schema` e reexporta o repositório Diesel;
//! a implementação detalhada está em `lab_persistence.rs`.

mod lab_persistence;
pub mod schema;

#[cfg(not(feature = "pg"))]
pub use lab_persistence::new_sqlite_for_test;
pub use lab_persistence::{new_from_env, DieselLabRepository};
