//! Playlist store ports

use async_trait::async_trait;
use uuid::Uuid;

use super::{Playlist, PlaylistAudiotrack, UserFavourite};
use crate::domain::audiotrack::Audiotrack;
use crate::domain::DomainResult;

#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    async fn insert(&self, playlist: &Playlist) -> DomainResult<()>;
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Playlist>>;
    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Playlist>>;
    async fn update(&self, playlist: &Playlist) -> DomainResult<()>;
    /// Removes the playlist together with its track and favourite links.
    async fn delete(&self, id: Uuid) -> DomainResult<()>;
}

#[async_trait]
pub trait UserFavouriteRepository: Send + Sync {
    /// Fails with `FavouriteAlreadyLinked` for a repeated link.
    async fn link(&self, link: UserFavourite) -> DomainResult<()>;
    /// The playlist provisioned at registration (the earliest favourite link).
    async fn find_favourites_playlist(&self, user_id: Uuid) -> DomainResult<Option<Playlist>>;
    async fn count_links(&self, user_id: Uuid) -> DomainResult<usize>;
}

#[async_trait]
pub trait PlaylistAudiotrackRepository: Send + Sync {
    async fn add(&self, link: PlaylistAudiotrack) -> DomainResult<()>;
    async fn remove(&self, link: PlaylistAudiotrack) -> DomainResult<()>;
    async fn contains(&self, link: PlaylistAudiotrack) -> DomainResult<bool>;
    async fn audiotracks_of(&self, playlist_id: Uuid) -> DomainResult<Vec<Audiotrack>>;
    async fn delete_by_audiotrack(&self, audiotrack_id: Uuid) -> DomainResult<()>;
}
