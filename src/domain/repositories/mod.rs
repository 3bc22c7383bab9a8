//! Repository provider and the registration unit of work
//!
//! Contains:
//! - `RepositoryProvider` — unified access to all per-aggregate repositories
//! - `ProvisioningTransaction` — transaction-scoped handle for the multi-step
//!   user + favourites provisioning performed at registration

use async_trait::async_trait;

use super::audiotrack::AudiotrackRepository;
use super::commentary::CommentaryRepository;
use super::playlist::{
    Playlist, PlaylistAudiotrackRepository, PlaylistRepository, UserFavourite,
    UserFavouriteRepository,
};
use super::score::ScoreRepository;
use super::user::{User, UserRepository};
use crate::shared::DomainResult;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let user = repos.users().find_by_email("mew@example.com").await?;
///     let mut tx = repos.begin_provisioning().await?;
/// }
/// ```
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn playlists(&self) -> &dyn PlaylistRepository;
    fn favourites(&self) -> &dyn UserFavouriteRepository;
    fn playlist_audiotracks(&self) -> &dyn PlaylistAudiotrackRepository;
    fn audiotracks(&self) -> &dyn AudiotrackRepository;
    fn commentaries(&self) -> &dyn CommentaryRepository;
    fn scores(&self) -> &dyn ScoreRepository;

    /// Open a unit of work for registration provisioning.
    async fn begin_provisioning(&self) -> DomainResult<Box<dyn ProvisioningTransaction>>;
}

// ── ProvisioningTransaction ─────────────────────────────────────

/// Writes performed through this handle become visible only after
/// [`commit`](ProvisioningTransaction::commit). Dropping the handle without
/// committing discards them.
#[async_trait]
pub trait ProvisioningTransaction: Send {
    async fn insert_user(&mut self, user: &User) -> DomainResult<()>;
    async fn insert_playlist(&mut self, playlist: &Playlist) -> DomainResult<()>;
    async fn link_favourite(&mut self, link: UserFavourite) -> DomainResult<()>;
    async fn commit(self: Box<Self>) -> DomainResult<()>;
    async fn rollback(self: Box<Self>) -> DomainResult<()>;
}
