//! SeaORM implementation of ScoreRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use super::{db_err, write_err};
use crate::domain::{DomainError, DomainResult, Score, ScoreRepository};
use crate::infrastructure::database::entities::score;

pub struct SeaOrmScoreRepository {
    db: DatabaseConnection,
}

impl SeaOrmScoreRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Rows are re-validated on the way out; a corrupt value surfaces as
/// `InvalidScoreValue` rather than becoming a `Score`.
fn model_to_domain(m: score::Model) -> DomainResult<Score> {
    Score::new(m.audiotrack_id, m.author_id, m.value)
}

fn to_active(s: &Score) -> score::ActiveModel {
    score::ActiveModel {
        author_id: Set(s.author_id),
        audiotrack_id: Set(s.audiotrack_id),
        value: Set(s.value()),
    }
}

#[async_trait]
impl ScoreRepository for SeaOrmScoreRepository {
    async fn find(&self, audiotrack_id: Uuid, author_id: Uuid) -> DomainResult<Option<Score>> {
        let model = score::Entity::find_by_id((author_id, audiotrack_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn insert(&self, s: &Score) -> DomainResult<()> {
        to_active(s).insert(&self.db).await.map_err(|e| {
            write_err(e, || DomainError::ScoreAlreadyExists {
                audiotrack_id: s.audiotrack_id,
                author_id: s.author_id,
            })
        })?;
        Ok(())
    }

    async fn update(&self, s: &Score) -> DomainResult<()> {
        let existing = score::Entity::find_by_id((s.author_id, s.audiotrack_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::ScoreNotFound {
                audiotrack_id: s.audiotrack_id,
                author_id: s.author_id,
            });
        }

        to_active(s).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_audiotrack(&self, audiotrack_id: Uuid) -> DomainResult<Vec<Score>> {
        let models = score::Entity::find()
            .filter(score::Column::AudiotrackId.eq(audiotrack_id))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn delete_by_audiotrack(&self, audiotrack_id: Uuid) -> DomainResult<()> {
        score::Entity::delete_many()
            .filter(score::Column::AudiotrackId.eq(audiotrack_id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
