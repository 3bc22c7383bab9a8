use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{mean_score, DomainError, DomainResult, RepositoryProvider, Score};

/// Score service — one score per (author, audiotrack).
pub struct ScoreService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ScoreService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
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

    pub async fn create_score(&self, score: Score) -> DomainResult<Score> {
        debug!(audiotrack_id = %score.audiotrack_id, author_id = %score.author_id, "Creating score");
        self.ensure_audiotrack(score.audiotrack_id).await?;

        if self
            .repos
            .scores()
            .find(score.audiotrack_id, score.author_id)
            .await?
            .is_some()
        {
            warn!(audiotrack_id = %score.audiotrack_id, author_id = %score.author_id, "Score already exists");
            return Err(DomainError::ScoreAlreadyExists {
                audiotrack_id: score.audiotrack_id,
                author_id: score.author_id,
            });
        }

        self.repos.scores().insert(&score).await?;
        info!(
            audiotrack_id = %score.audiotrack_id,
            author_id = %score.author_id,
            value = score.value(),
            "Score created"
        );
        Ok(score)
    }

    pub async fn update_score(&self, score: Score) -> DomainResult<Score> {
        // existence of the row implies the audiotrack exists
        self.get_score_by_primary_key(score.author_id, score.audiotrack_id)
            .await?;
        self.repos.scores().update(&score).await?;
        info!(
            audiotrack_id = %score.audiotrack_id,
            author_id = %score.author_id,
            value = score.value(),
            "Score updated"
        );
        Ok(score)
    }

    pub async fn get_score_by_primary_key(
        &self,
        author_id: Uuid,
        audiotrack_id: Uuid,
    ) -> DomainResult<Score> {
        match self.repos.scores().find(audiotrack_id, author_id).await? {
            Some(score) => Ok(score),
            None => {
                warn!(%audiotrack_id, %author_id, "Score not found");
                Err(DomainError::ScoreNotFound {
                    audiotrack_id,
                    author_id,
                })
            }
        }
    }

    pub async fn get_audiotrack_scores(&self, audiotrack_id: Uuid) -> DomainResult<Vec<Score>> {
        self.ensure_audiotrack(audiotrack_id).await?;
        self.repos.scores().find_by_audiotrack(audiotrack_id).await
    }

    /// Mean of all score values; 0.0 for an unscored track.
    pub async fn get_mean_score(&self, audiotrack_id: Uuid) -> DomainResult<f64> {
        let scores = self.get_audiotrack_scores(audiotrack_id).await?;
        Ok(mean_score(&scores))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Audiotrack;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    async fn seeded() -> (ScoreService, Audiotrack) {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let track = Audiotrack::new("Song", Uuid::new_v4(), "song.mp3");
        repos.audiotracks().insert(&track).await.unwrap();
        (ScoreService::new(repos), track)
    }

    #[tokio::test]
    async fn one_score_per_author_and_track() {
        let (svc, track) = seeded().await;
        let author = Uuid::new_v4();

        svc.create_score(Score::new(track.id, author, 4).unwrap())
            .await
            .unwrap();
        let err = svc
            .create_score(Score::new(track.id, author, 2).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ScoreAlreadyExists { .. }));
        assert_eq!(
            svc.get_score_by_primary_key(author, track.id)
                .await
                .unwrap()
                .value(),
            4
        );
    }

    #[tokio::test]
    async fn scoring_unknown_track_fails() {
        let (svc, _track) = seeded().await;
        let missing = Uuid::new_v4();
        let err = svc
            .create_score(Score::new(missing, Uuid::new_v4(), 3).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AudiotrackNotFound(id) if id == missing));
        assert!(matches!(
            svc.get_mean_score(missing).await,
            Err(DomainError::AudiotrackNotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_requires_existing_score() {
        let (svc, track) = seeded().await;
        let author = Uuid::new_v4();
        let mut score = Score::new(track.id, author, 1).unwrap();

        assert!(matches!(
            svc.update_score(score).await,
            Err(DomainError::ScoreNotFound { .. })
        ));

        svc.create_score(score).await.unwrap();
        score.set_value(5).unwrap();
        svc.update_score(score).await.unwrap();
        assert_eq!(
            svc.get_score_by_primary_key(author, track.id)
                .await
                .unwrap()
                .value(),
            5
        );
    }

    #[tokio::test]
    async fn mean_score_over_all_authors() {
        let (svc, track) = seeded().await;
        assert_eq!(svc.get_mean_score(track.id).await.unwrap(), 0.0);
        assert!(svc.get_audiotrack_scores(track.id).await.unwrap().is_empty());

        for value in [1, 2, 5] {
            svc.create_score(Score::new(track.id, Uuid::new_v4(), value).unwrap())
                .await
                .unwrap();
        }
        assert_eq!(svc.get_audiotrack_scores(track.id).await.unwrap().len(), 3);
        assert!((svc.get_mean_score(track.id).await.unwrap() - 8.0 / 3.0).abs() < 1e-9);
    }
}
