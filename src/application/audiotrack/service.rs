//! Audiotrack service
//!
//! Metadata and file content live in different stores, so writes that touch
//! both are compensated by hand: the metadata change is undone when the file
//! write fails.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{AudioFileStore, Audiotrack, DomainError, DomainResult, RepositoryProvider};

pub struct AudiotrackService {
    repos: Arc<dyn RepositoryProvider>,
    files: Arc<dyn AudioFileStore>,
}

impl AudiotrackService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, files: Arc<dyn AudioFileStore>) -> Self {
        Self { repos, files }
    }

    // ── Commands ────────────────────────────────────────────────

    pub async fn create_audiotrack_with_content(
        &self,
        content: &[u8],
        audiotrack: Audiotrack,
    ) -> DomainResult<Audiotrack> {
        debug!(audiotrack_id = %audiotrack.id, filepath = %audiotrack.filepath, "Uploading audiotrack");

        if self
            .repos
            .audiotracks()
            .find_by_id(audiotrack.id)
            .await?
            .is_some()
        {
            warn!(audiotrack_id = %audiotrack.id, "Audiotrack already exists");
            return Err(DomainError::AudiotrackAlreadyExists(audiotrack.id));
        }

        self.repos.audiotracks().insert(&audiotrack).await?;

        if let Err(e) = self.files.write(&audiotrack.filepath, content).await {
            warn!(audiotrack_id = %audiotrack.id, error = %e, "File write failed, removing metadata");
            if let Err(undo) = self.repos.audiotracks().delete(audiotrack.id).await {
                warn!(audiotrack_id = %audiotrack.id, error = %undo, "Metadata cleanup failed");
            }
            return Err(e);
        }

        info!(
            audiotrack_id = %audiotrack.id,
            title = %audiotrack.title,
            bytes = content.len(),
            "Audiotrack uploaded"
        );
        Ok(audiotrack)
    }

    pub async fn update_audiotrack_with_content(
        &self,
        content: &[u8],
        audiotrack: Audiotrack,
    ) -> DomainResult<Audiotrack> {
        let previous = self.get_audiotrack_by_id(audiotrack.id).await?;

        self.repos.audiotracks().update(&audiotrack).await?;

        if let Err(e) = self.files.write(&audiotrack.filepath, content).await {
            warn!(audiotrack_id = %audiotrack.id, error = %e, "File write failed, restoring metadata");
            if let Err(undo) = self.repos.audiotracks().update(&previous).await {
                warn!(audiotrack_id = %audiotrack.id, error = %undo, "Metadata restore failed");
            }
            return Err(e);
        }

        if previous.filepath != audiotrack.filepath {
            self.files.delete(&previous.filepath).await?;
        }

        info!(audiotrack_id = %audiotrack.id, bytes = content.len(), "Audiotrack replaced");
        Ok(audiotrack)
    }

    /// Removes the file and everything referencing the audiotrack, then
    /// the metadata itself.
    pub async fn delete_audiotrack(&self, audiotrack_id: Uuid) -> DomainResult<()> {
        let audiotrack = self.get_audiotrack_by_id(audiotrack_id).await?;

        self.files.delete(&audiotrack.filepath).await?;
        self.repos
            .playlist_audiotracks()
            .delete_by_audiotrack(audiotrack_id)
            .await?;
        self.repos
            .commentaries()
            .delete_by_audiotrack(audiotrack_id)
            .await?;
        self.repos.scores().delete_by_audiotrack(audiotrack_id).await?;
        self.repos.audiotracks().delete(audiotrack_id).await?;

        info!(%audiotrack_id, "Audiotrack deleted");
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn get_audiotrack_by_id(&self, audiotrack_id: Uuid) -> DomainResult<Audiotrack> {
        match self.repos.audiotracks().find_by_id(audiotrack_id).await? {
            Some(audiotrack) => Ok(audiotrack),
            None => {
                warn!(%audiotrack_id, "Audiotrack not found");
                Err(DomainError::AudiotrackNotFound(audiotrack_id))
            }
        }
    }

    pub async fn get_all_audiotracks(&self) -> DomainResult<Vec<Audiotrack>> {
        self.repos.audiotracks().find_all().await
    }

    /// Case-insensitive substring match on the title.
    pub async fn get_audiotracks_by_title(&self, title: &str) -> DomainResult<Vec<Audiotrack>> {
        self.repos.audiotracks().find_by_title(title).await
    }

    pub async fn get_audiotrack_content(&self, filepath: &str) -> DomainResult<Vec<u8>> {
        self.files
            .read(filepath)
            .await?
            .ok_or_else(|| DomainError::FileStorage(format!("no content at {}", filepath)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Commentary, Playlist, PlaylistAudiotrack, Score};
    use crate::infrastructure::files::{FsAudioFileStore, InMemoryAudioFileStore};
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    fn service() -> (
        AudiotrackService,
        Arc<InMemoryRepositoryProvider>,
        Arc<InMemoryAudioFileStore>,
    ) {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let files = Arc::new(InMemoryAudioFileStore::new());
        (
            AudiotrackService::new(repos.clone(), files.clone()),
            repos,
            files,
        )
    }

    #[tokio::test]
    async fn upload_stores_metadata_and_content() {
        let (svc, _repos, _files) = service();
        let track = Audiotrack::new("Song", Uuid::new_v4(), "a/song.mp3");

        svc.create_audiotrack_with_content(b"ID3", track.clone())
            .await
            .unwrap();
        assert_eq!(svc.get_audiotrack_by_id(track.id).await.unwrap(), track);
        assert_eq!(svc.get_audiotrack_content("a/song.mp3").await.unwrap(), b"ID3");

        assert!(matches!(
            svc.create_audiotrack_with_content(b"ID3", track.clone()).await,
            Err(DomainError::AudiotrackAlreadyExists(id)) if id == track.id
        ));
    }

    #[tokio::test]
    async fn failed_upload_leaves_no_metadata() {
        let (svc, repos, files) = service();
        files.set_fail_writes(true);
        let track = Audiotrack::new("Song", Uuid::new_v4(), "song.mp3");

        let err = svc
            .create_audiotrack_with_content(b"ID3", track.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::FileStorage(_)));
        assert!(repos.audiotracks().find_by_id(track.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_replace_restores_metadata() {
        let (svc, _repos, files) = service();
        let original = Audiotrack::new("Song", Uuid::new_v4(), "v1.mp3");
        svc.create_audiotrack_with_content(b"one", original.clone())
            .await
            .unwrap();

        let mut changed = original.clone();
        changed.title = "Song (remaster)".into();
        changed.filepath = "v2.mp3".into();

        files.set_fail_writes(true);
        assert!(svc
            .update_audiotrack_with_content(b"two", changed.clone())
            .await
            .is_err());
        assert_eq!(svc.get_audiotrack_by_id(original.id).await.unwrap(), original);

        files.set_fail_writes(false);
        svc.update_audiotrack_with_content(b"two", changed.clone())
            .await
            .unwrap();
        assert_eq!(svc.get_audiotrack_by_id(original.id).await.unwrap(), changed);
        assert!(!files.contains("v1.mp3"));
        assert_eq!(svc.get_audiotrack_content("v2.mp3").await.unwrap(), b"two");
    }

    #[tokio::test]
    async fn delete_cascades_to_references() {
        let (svc, repos, files) = service();
        let author = Uuid::new_v4();
        let track = Audiotrack::new("Song", author, "song.mp3");
        svc.create_audiotrack_with_content(b"ID3", track.clone())
            .await
            .unwrap();

        let playlist = Playlist::new("Mix", author);
        repos.playlists().insert(&playlist).await.unwrap();
        repos
            .playlist_audiotracks()
            .add(PlaylistAudiotrack::new(playlist.id, track.id))
            .await
            .unwrap();
        repos
            .commentaries()
            .insert(&Commentary::new(author, track.id, "nice"))
            .await
            .unwrap();
        repos
            .scores()
            .insert(&Score::new(track.id, author, 5).unwrap())
            .await
            .unwrap();

        svc.delete_audiotrack(track.id).await.unwrap();

        assert!(files.is_empty());
        assert!(repos.audiotracks().find_by_id(track.id).await.unwrap().is_none());
        assert!(!repos
            .playlist_audiotracks()
            .contains(PlaylistAudiotrack::new(playlist.id, track.id))
            .await
            .unwrap());
        assert!(repos
            .commentaries()
            .find_by_audiotrack(track.id)
            .await
            .unwrap()
            .is_empty());
        assert!(repos
            .scores()
            .find_by_audiotrack(track.id)
            .await
            .unwrap()
            .is_empty());
        assert!(matches!(
            svc.delete_audiotrack(track.id).await,
            Err(DomainError::AudiotrackNotFound(_))
        ));
    }

    #[tokio::test]
    async fn title_search_on_filesystem_store() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AudiotrackService::new(
            Arc::new(InMemoryRepositoryProvider::new()),
            Arc::new(FsAudioFileStore::new(dir.path())),
        );
        let author = Uuid::new_v4();
        for (title, path) in [("Blue Moon", "blue.mp3"), ("Moonlight", "moon.mp3"), ("Sun", "sun.mp3")] {
            svc.create_audiotrack_with_content(title.as_bytes(), Audiotrack::new(title, author, path))
                .await
                .unwrap();
        }

        let titles: Vec<String> = svc
            .get_audiotracks_by_title("moon")
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, ["Blue Moon", "Moonlight"]);
        assert_eq!(svc.get_all_audiotracks().await.unwrap().len(), 3);
        assert_eq!(svc.get_audiotrack_content("sun.mp3").await.unwrap(), b"Sun");
        assert!(matches!(
            svc.get_audiotrack_content("missing.mp3").await,
            Err(DomainError::FileStorage(_))
        ));
    }
}
