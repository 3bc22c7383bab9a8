use thiserror::Error;
use uuid::Uuid;

/// Broad family a [`DomainError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
    Invariant,
    Infrastructure,
}

#[derive(Debug, Error)]
pub enum DomainError {
    // ── Not found ──────────────────────────────────────────────
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Audiotrack not found: {0}")]
    AudiotrackNotFound(Uuid),

    #[error("Commentary not found: {0}")]
    CommentaryNotFound(Uuid),

    #[error("Playlist not found: {0}")]
    PlaylistNotFound(Uuid),

    #[error("Score not found: audiotrack={audiotrack_id} author={author_id}")]
    ScoreNotFound { audiotrack_id: Uuid, author_id: Uuid },

    #[error("Audiotrack {audiotrack_id} is not in playlist {playlist_id}")]
    AudiotrackNotInPlaylist { playlist_id: Uuid, audiotrack_id: Uuid },

    // ── Conflict ───────────────────────────────────────────────
    #[error("User with email \"{0}\" already registered")]
    UserAlreadyRegistered(String),

    #[error("Commentary already exists: {0}")]
    CommentaryAlreadyExists(Uuid),

    #[error("Audiotrack already exists: {0}")]
    AudiotrackAlreadyExists(Uuid),

    #[error("Playlist already exists: {0}")]
    PlaylistAlreadyExists(Uuid),

    #[error("Score already exists: audiotrack={audiotrack_id} author={author_id}")]
    ScoreAlreadyExists { audiotrack_id: Uuid, author_id: Uuid },

    #[error("Audiotrack {audiotrack_id} is already in playlist {playlist_id}")]
    AudiotrackAlreadyInPlaylist { playlist_id: Uuid, audiotrack_id: Uuid },

    #[error("Playlist {playlist_id} is already a favourite of user {user_id}")]
    FavouriteAlreadyLinked { user_id: Uuid, playlist_id: Uuid },

    #[error("Playlist {0} is the user's favourites playlist and cannot be deleted")]
    FavouritesPlaylistProtected(Uuid),

    // ── Validation ─────────────────────────────────────────────
    #[error("Invalid score value: {0} (expected 0..=5)")]
    InvalidScoreValue(i32),

    #[error("Invalid credentials for \"{0}\"")]
    InvalidCredentials(String),

    // ── Invariant ──────────────────────────────────────────────
    #[error("Missing required collaborator: {0}")]
    MissingCollaborator(&'static str),

    // ── Infrastructure ─────────────────────────────────────────
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("File storage error: {0}")]
    FileStorage(String),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UserNotFound(_)
            | Self::AudiotrackNotFound(_)
            | Self::CommentaryNotFound(_)
            | Self::PlaylistNotFound(_)
            | Self::ScoreNotFound { .. }
            | Self::AudiotrackNotInPlaylist { .. } => ErrorKind::NotFound,

            Self::UserAlreadyRegistered(_)
            | Self::CommentaryAlreadyExists(_)
            | Self::AudiotrackAlreadyExists(_)
            | Self::PlaylistAlreadyExists(_)
            | Self::ScoreAlreadyExists { .. }
            | Self::AudiotrackAlreadyInPlaylist { .. }
            | Self::FavouriteAlreadyLinked { .. }
            | Self::FavouritesPlaylistProtected(_) => ErrorKind::Conflict,

            Self::InvalidScoreValue(_) | Self::InvalidCredentials(_) => ErrorKind::Validation,

            Self::MissingCollaborator(_) => ErrorKind::Invariant,

            Self::Storage(_) | Self::Credential(_) | Self::FileStorage(_) => {
                ErrorKind::Infrastructure
            }
        }
    }

    /// Whether this error is likely transient (e.g. DB connection lost)
    /// and the operation may succeed if retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Message safe to hand to an external caller.
    ///
    /// Unknown-user and wrong-password outcomes of a sign-in collapse into the
    /// same text so callers cannot probe which emails are registered.
    pub fn public_message(&self) -> String {
        match self {
            Self::UserNotFound(_) | Self::InvalidCredentials(_) => {
                "Authentication failed".to_string()
            }
            Self::Storage(_) | Self::Credential(_) | Self::FileStorage(_) => {
                "Internal error".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn families_are_assigned() {
        let id = Uuid::new_v4();
        assert_eq!(DomainError::CommentaryNotFound(id).kind(), ErrorKind::NotFound);
        assert_eq!(
            DomainError::UserAlreadyRegistered("a@b.c".into()).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            DomainError::FavouriteAlreadyLinked {
                user_id: id,
                playlist_id: id
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(DomainError::FavouritesPlaylistProtected(id).kind(), ErrorKind::Conflict);
        assert_eq!(DomainError::InvalidScoreValue(6).kind(), ErrorKind::Validation);
        assert_eq!(
            DomainError::MissingCollaborator("credentials").kind(),
            ErrorKind::Invariant
        );
        assert_eq!(DomainError::Storage("down".into()).kind(), ErrorKind::Infrastructure);
    }

    #[test]
    fn sign_in_failures_share_public_message() {
        let unknown = DomainError::UserNotFound("ghost@example.com".into());
        let wrong = DomainError::InvalidCredentials("user@example.com".into());
        assert_eq!(unknown.public_message(), wrong.public_message());
        assert_ne!(unknown.to_string(), wrong.to_string());
    }

    #[test]
    fn only_storage_errors_are_transient() {
        assert!(DomainError::Storage("timeout".into()).is_transient());
        assert!(!DomainError::InvalidScoreValue(-1).is_transient());
    }

    #[test]
    fn rejected_score_value_is_carried() {
        let err = DomainError::InvalidScoreValue(42);
        assert!(err.to_string().contains("42"));
    }
}
