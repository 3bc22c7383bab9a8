//! Commentary service
//!
//! Each operation probes existence once before writing. The store's primary
//! key still rejects a racing duplicate create with the same typed conflict.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{Commentary, DomainError, DomainResult, RepositoryProvider};

pub struct CommentaryService {
    repos: Arc<dyn RepositoryProvider>,
}

impl CommentaryService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn create_commentary(&self, commentary: Commentary) -> DomainResult<Commentary> {
        debug!(commentary_id = %commentary.id, audiotrack_id = %commentary.audiotrack_id, "Creating commentary");

        if self
            .repos
            .commentaries()
            .find_by_id(commentary.id)
            .await?
            .is_some()
        {
            warn!(commentary_id = %commentary.id, "Commentary already exists");
            return Err(DomainError::CommentaryAlreadyExists(commentary.id));
        }

        self.repos.commentaries().insert(&commentary).await?;
        info!(commentary_id = %commentary.id, author_id = %commentary.author_id, "Commentary created");
        Ok(commentary)
    }

    pub async fn update_commentary(&self, commentary: Commentary) -> DomainResult<Commentary> {
        debug!(commentary_id = %commentary.id, "Updating commentary");

        if self
            .repos
            .commentaries()
            .find_by_id(commentary.id)
            .await?
            .is_none()
        {
            warn!(commentary_id = %commentary.id, "Commentary not found");
            return Err(DomainError::CommentaryNotFound(commentary.id));
        }

        self.repos.commentaries().update(&commentary).await?;
        info!(commentary_id = %commentary.id, "Commentary updated");
        Ok(commentary)
    }

    pub async fn delete_commentary(&self, commentary_id: Uuid) -> DomainResult<()> {
        debug!(%commentary_id, "Deleting commentary");

        if self
            .repos
            .commentaries()
            .find_by_id(commentary_id)
            .await?
            .is_none()
        {
            warn!(%commentary_id, "Commentary not found");
            return Err(DomainError::CommentaryNotFound(commentary_id));
        }

        self.repos.commentaries().delete(commentary_id).await?;
        info!(%commentary_id, "Commentary deleted");
        Ok(())
    }

    /// Commentaries of an audiotrack in insertion order.
    pub async fn get_audiotrack_commentaries(
        &self,
        audiotrack_id: Uuid,
    ) -> DomainResult<Vec<Commentary>> {
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

        self.repos
            .commentaries()
            .find_by_audiotrack(audiotrack_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Audiotrack, User, UserRole};
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    async fn seeded() -> (CommentaryService, Arc<InMemoryRepositoryProvider>, User, Audiotrack) {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let author = User {
            id: Uuid::new_v4(),
            username: "mew".into(),
            email: "mew@example.com".into(),
            password_hash: "h".into(),
            role: UserRole::User,
        };
        repos.users().insert(&author).await.unwrap();
        let track = Audiotrack::new("Song", author.id, "song.mp3");
        repos.audiotracks().insert(&track).await.unwrap();
        (CommentaryService::new(repos.clone()), repos, author, track)
    }

    #[tokio::test]
    async fn create_then_duplicate_conflicts() {
        let (svc, _repos, author, track) = seeded().await;
        let c = Commentary::new(author.id, track.id, "nice");

        svc.create_commentary(c.clone()).await.unwrap();
        let err = svc.create_commentary(c.clone()).await.unwrap_err();
        assert!(matches!(err, DomainError::CommentaryAlreadyExists(id) if id == c.id));
    }

    #[tokio::test]
    async fn update_and_delete_require_existing_commentary() {
        let (svc, repos, author, track) = seeded().await;
        let ghost = Commentary::new(author.id, track.id, "ghost");

        assert!(matches!(
            svc.update_commentary(ghost.clone()).await,
            Err(DomainError::CommentaryNotFound(id)) if id == ghost.id
        ));
        assert!(matches!(
            svc.delete_commentary(ghost.id).await,
            Err(DomainError::CommentaryNotFound(_))
        ));

        let mut c = svc
            .create_commentary(Commentary::new(author.id, track.id, "first"))
            .await
            .unwrap();
        c.text = "edited".into();
        svc.update_commentary(c.clone()).await.unwrap();
        assert_eq!(
            repos.commentaries().find_by_id(c.id).await.unwrap().unwrap().text,
            "edited"
        );

        svc.delete_commentary(c.id).await.unwrap();
        assert!(repos.commentaries().find_by_id(c.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn listing_checks_audiotrack_and_keeps_insertion_order() {
        let (svc, _repos, author, track) = seeded().await;

        let missing = Uuid::new_v4();
        assert!(matches!(
            svc.get_audiotrack_commentaries(missing).await,
            Err(DomainError::AudiotrackNotFound(id)) if id == missing
        ));
        assert!(svc.get_audiotrack_commentaries(track.id).await.unwrap().is_empty());

        let texts = ["one", "two", "three"];
        for text in texts {
            svc.create_commentary(Commentary::new(author.id, track.id, text))
                .await
                .unwrap();
        }
        let listed: Vec<String> = svc
            .get_audiotrack_commentaries(track.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(listed, texts);
    }
}
