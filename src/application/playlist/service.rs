//! Playlist service
//!
//! Favourites playlists are ordinary playlists reached through the
//! user-favourite link table; they are created by registration, not here.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{
    Audiotrack, DomainError, DomainResult, Playlist, PlaylistAudiotrack, RepositoryProvider,
};

pub struct PlaylistService {
    repos: Arc<dyn RepositoryProvider>,
}

impl PlaylistService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    async fn ensure_user(&self, user_id: Uuid) -> DomainResult<()> {
        if self.repos.users().find_by_id(user_id).await?.is_none() {
            warn!(%user_id, "User not found");
            return Err(DomainError::UserNotFound(user_id.to_string()));
        }
        Ok(())
    }

    async fn ensure_audiotrack(&self, audiotrack_id: Uuid) -> DomainResult<()> {
        if self
            .repos
            .audiotracks()
            .find_by_id(audiotrack_id)
            .await?
            .is_none()
        {
            warn!(%audiotrack_id, "Audiotrack not found");
            return Err(DomainError::AudiotrackNotFound(audiotrack_id));
        }
        Ok(())
    }

    // ── Playlists ───────────────────────────────────────────────

    pub async fn create_playlist(&self, playlist: Playlist) -> DomainResult<Playlist> {
        debug!(playlist_id = %playlist.id, user_id = %playlist.user_id, "Creating playlist");
        self.ensure_user(playlist.user_id).await?;

        if self
            .repos
            .playlists()
            .find_by_id(playlist.id)
            .await?
            .is_some()
        {
            warn!(playlist_id = %playlist.id, "Playlist already exists");
            return Err(DomainError::PlaylistAlreadyExists(playlist.id));
        }

        self.repos.playlists().insert(&playlist).await?;
        info!(playlist_id = %playlist.id, title = %playlist.title, "Playlist created");
        Ok(playlist)
    }

    pub async fn update_playlist_title(
        &self,
        playlist_id: Uuid,
        title: impl Into<String>,
    ) -> DomainResult<Playlist> {
        let mut playlist = self.get_playlist_by_id(playlist_id).await?;
        playlist.title = title.into();
        self.repos.playlists().update(&playlist).await?;
        info!(%playlist_id, title = %playlist.title, "Playlist renamed");
        Ok(playlist)
    }

    /// Deletes the playlist along with its audiotrack and favourite links.
    ///
    /// The owner's favourites playlist (earliest favourite link) is refused
    /// with `FavouritesPlaylistProtected`.
    pub async fn delete_playlist(&self, playlist_id: Uuid) -> DomainResult<()> {
        let playlist = self.get_playlist_by_id(playlist_id).await?;

        let favourites = self
            .repos
            .favourites()
            .find_favourites_playlist(playlist.user_id)
            .await?;
        if favourites.is_some_and(|f| f.id == playlist_id) {
            warn!(%playlist_id, user_id = %playlist.user_id, "Refusing to delete favourites playlist");
            return Err(DomainError::FavouritesPlaylistProtected(playlist_id));
        }

        self.repos.playlists().delete(playlist_id).await?;
        info!(%playlist_id, "Playlist deleted");
        Ok(())
    }

    pub async fn get_playlist_by_id(&self, playlist_id: Uuid) -> DomainResult<Playlist> {
        match self.repos.playlists().find_by_id(playlist_id).await? {
            Some(playlist) => Ok(playlist),
            None => {
                warn!(%playlist_id, "Playlist not found");
                Err(DomainError::PlaylistNotFound(playlist_id))
            }
        }
    }

    pub async fn get_user_playlists(&self, user_id: Uuid) -> DomainResult<Vec<Playlist>> {
        self.ensure_user(user_id).await?;
        self.repos.playlists().find_by_user(user_id).await
    }

    /// The playlist linked at registration; `None` for users that predate it.
    pub async fn get_user_favourites_playlist(
        &self,
        user_id: Uuid,
    ) -> DomainResult<Option<Playlist>> {
        self.ensure_user(user_id).await?;
        self.repos
            .favourites()
            .find_favourites_playlist(user_id)
            .await
    }

    // ── Playlist contents ───────────────────────────────────────

    pub async fn add_audiotrack_to_playlist(
        &self,
        playlist_id: Uuid,
        audiotrack_id: Uuid,
    ) -> DomainResult<()> {
        self.get_playlist_by_id(playlist_id).await?;
        self.ensure_audiotrack(audiotrack_id).await?;

        let link = PlaylistAudiotrack::new(playlist_id, audiotrack_id);
        let links = self.repos.playlist_audiotracks();
        if links.contains(link).await? {
            warn!(%playlist_id, %audiotrack_id, "Audiotrack already in playlist");
            return Err(DomainError::AudiotrackAlreadyInPlaylist {
                playlist_id,
                audiotrack_id,
            });
        }

        links.add(link).await?;
        info!(%playlist_id, %audiotrack_id, "Audiotrack added to playlist");
        Ok(())
    }

    pub async fn remove_audiotrack_from_playlist(
        &self,
        playlist_id: Uuid,
        audiotrack_id: Uuid,
    ) -> DomainResult<()> {
        self.get_playlist_by_id(playlist_id).await?;
        self.ensure_audiotrack(audiotrack_id).await?;

        let link = PlaylistAudiotrack::new(playlist_id, audiotrack_id);
        let links = self.repos.playlist_audiotracks();
        if !links.contains(link).await? {
            warn!(%playlist_id, %audiotrack_id, "Audiotrack not in playlist");
            return Err(DomainError::AudiotrackNotInPlaylist {
                playlist_id,
                audiotrack_id,
            });
        }

        links.remove(link).await?;
        info!(%playlist_id, %audiotrack_id, "Audiotrack removed from playlist");
        Ok(())
    }

    pub async fn get_all_audiotracks_from_playlist(
        &self,
        playlist_id: Uuid,
    ) -> DomainResult<Vec<Audiotrack>> {
        self.get_playlist_by_id(playlist_id).await?;
        self.repos
            .playlist_audiotracks()
            .audiotracks_of(playlist_id)
            .await
    }
}
