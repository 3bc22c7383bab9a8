//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod audiotrack_repository;
pub mod commentary_repository;
pub mod playlist_repository;
pub mod provisioning;
pub mod repository_provider;
pub mod score_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use sea_orm::{DbErr, SqlErr};

use crate::domain::DomainError;

fn db_err(e: DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

/// Map a write error, turning unique/primary-key violations into `conflict`.
fn write_err(e: DbErr, conflict: impl FnOnce() -> DomainError) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => conflict(),
        _ => db_err(e),
    }
}
