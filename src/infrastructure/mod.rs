//! Infrastructure layer - external concerns

pub mod crypto;
pub mod database;
pub mod files;
pub mod storage;

pub use crypto::BcryptCredentialVerifier;
pub use database::{init_database, init_database_with_migrations, DatabaseConfig};
pub use database::repositories::SeaOrmRepositoryProvider;
pub use files::{FsAudioFileStore, InMemoryAudioFileStore};
pub use storage::{InMemoryRepositoryProvider, ProvisioningStep};
