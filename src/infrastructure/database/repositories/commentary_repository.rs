//! SeaORM implementation of CommentaryRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{db_err, write_err};
use crate::domain::{Commentary, CommentaryRepository, DomainError, DomainResult};
use crate::infrastructure::database::entities::commentary;

pub struct SeaOrmCommentaryRepository {
    db: DatabaseConnection,
}

impl SeaOrmCommentaryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: commentary::Model) -> Commentary {
    Commentary {
        id: m.id,
        author_id: m.author_id,
        audiotrack_id: m.audiotrack_id,
        text: m.text,
    }
}

#[async_trait]
impl CommentaryRepository for SeaOrmCommentaryRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Commentary>> {
        let model = commentary::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn insert(&self, c: &Commentary) -> DomainResult<()> {
        commentary::ActiveModel {
            id: Set(c.id),
            author_id: Set(c.author_id),
            audiotrack_id: Set(c.audiotrack_id),
            text: Set(c.text.clone()),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_err(e, || DomainError::CommentaryAlreadyExists(c.id)))?;
        Ok(())
    }

    async fn update(&self, c: &Commentary) -> DomainResult<()> {
        let existing = commentary::Entity::find_by_id(c.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        let Some(existing) = existing else {
            return Err(DomainError::CommentaryNotFound(c.id));
        };

        // created_at keeps the original insertion position
        let mut active: commentary::ActiveModel = existing.into();
        active.author_id = Set(c.author_id);
        active.audiotrack_id = Set(c.audiotrack_id);
        active.text = Set(c.text.clone());
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = commentary::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::CommentaryNotFound(id));
        }
        Ok(())
    }

    async fn find_by_audiotrack(&self, audiotrack_id: Uuid) -> DomainResult<Vec<Commentary>> {
        let models = commentary::Entity::find()
            .filter(commentary::Column::AudiotrackId.eq(audiotrack_id))
            .order_by_asc(commentary::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn delete_by_audiotrack(&self, audiotrack_id: Uuid) -> DomainResult<()> {
        commentary::Entity::delete_many()
            .filter(commentary::Column::AudiotrackId.eq(audiotrack_id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
