//! SeaORM implementation of RepositoryProvider

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::domain::{
    AudiotrackRepository, CommentaryRepository, DomainResult, PlaylistAudiotrackRepository,
    PlaylistRepository, ProvisioningTransaction, RepositoryProvider, ScoreRepository,
    UserFavouriteRepository, UserRepository,
};

use super::audiotrack_repository::SeaOrmAudiotrackRepository;
use super::commentary_repository::SeaOrmCommentaryRepository;
use super::db_err;
use super::playlist_repository::{
    SeaOrmPlaylistAudiotrackRepository, SeaOrmPlaylistRepository, SeaOrmUserFavouriteRepository,
};
use super::provisioning::SeaOrmProvisioningTransaction;
use super::score_repository::SeaOrmScoreRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let user = repos.users().find_by_email("mew@example.com").await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    db: DatabaseConnection,
    users: SeaOrmUserRepository,
    playlists: SeaOrmPlaylistRepository,
    favourites: SeaOrmUserFavouriteRepository,
    playlist_audiotracks: SeaOrmPlaylistAudiotrackRepository,
    audiotracks: SeaOrmAudiotrackRepository,
    commentaries: SeaOrmCommentaryRepository,
    scores: SeaOrmScoreRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            playlists: SeaOrmPlaylistRepository::new(db.clone()),
            favourites: SeaOrmUserFavouriteRepository::new(db.clone()),
            playlist_audiotracks: SeaOrmPlaylistAudiotrackRepository::new(db.clone()),
            audiotracks: SeaOrmAudiotrackRepository::new(db.clone()),
            commentaries: SeaOrmCommentaryRepository::new(db.clone()),
            scores: SeaOrmScoreRepository::new(db.clone()),
            db,
        }
    }
}

#[async_trait]
impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn playlists(&self) -> &dyn PlaylistRepository {
        &self.playlists
    }

    fn favourites(&self) -> &dyn UserFavouriteRepository {
        &self.favourites
    }

    fn playlist_audiotracks(&self) -> &dyn PlaylistAudiotrackRepository {
        &self.playlist_audiotracks
    }

    fn audiotracks(&self) -> &dyn AudiotrackRepository {
        &self.audiotracks
    }

    fn commentaries(&self) -> &dyn CommentaryRepository {
        &self.commentaries
    }

    fn scores(&self) -> &dyn ScoreRepository {
        &self.scores
    }

    async fn begin_provisioning(&self) -> DomainResult<Box<dyn ProvisioningTransaction>> {
        let txn = self.db.begin().await.map_err(db_err)?;
        Ok(Box::new(SeaOrmProvisioningTransaction::new(txn)))
    }
}
