pub mod audiotrack;
pub mod commentary;
pub mod playlist;
pub mod ports;
pub mod repositories;
pub mod score;
pub mod user;

// Re-export commonly used types
pub use audiotrack::{Audiotrack, AudiotrackRepository};
pub use commentary::{Commentary, CommentaryRepository};
pub use playlist::{
    Playlist, PlaylistAudiotrack, PlaylistAudiotrackRepository, PlaylistRepository,
    UserFavourite, UserFavouriteRepository,
};
pub use ports::{AudioFileStore, CredentialVerifier};
pub use repositories::{ProvisioningTransaction, RepositoryProvider};
pub use score::{mean_score, Score, ScoreRepository};
pub use user::{NewUser, User, UserRepository, UserRole};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::{DomainError, DomainResult, ErrorKind};
