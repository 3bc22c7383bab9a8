//! # Audioshare
//!
//! Core of an audio-sharing service: user registration with an atomically
//! provisioned favourites playlist, sign-in, role changes, playlists,
//! audiotracks with their binary content, commentaries and bounded scores.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Entities, the `Score` value object, repository and service ports
//! - **application**: Use-case services (identity, playlists, audiotracks, commentaries, scores)
//! - **infrastructure**: SeaORM persistence, bcrypt credentials, file storage, in-memory stores
//! - **config**: TOML configuration
//! - **shared**: Error taxonomy

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use config::{default_config_path, AppConfig, ConfigError};

pub use application::{
    AudiotrackService, CommentaryService, IdentityService, PlaylistService, ScoreService,
};
pub use infrastructure::{
    init_database, init_database_with_migrations, BcryptCredentialVerifier, DatabaseConfig,
    FsAudioFileStore, InMemoryRepositoryProvider, SeaOrmRepositoryProvider,
};
pub use shared::{DomainError, DomainResult, ErrorKind};
