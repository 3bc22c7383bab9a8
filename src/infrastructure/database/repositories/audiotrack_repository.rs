//! SeaORM implementation of AudiotrackRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;
use uuid::Uuid;

use super::{db_err, write_err};
use crate::domain::{Audiotrack, AudiotrackRepository, DomainError, DomainResult};
use crate::infrastructure::database::entities::audiotrack;

pub struct SeaOrmAudiotrackRepository {
    db: DatabaseConnection,
}

impl SeaOrmAudiotrackRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(super) fn model_to_domain(m: audiotrack::Model) -> Audiotrack {
    Audiotrack {
        id: m.id,
        title: m.title,
        author_id: m.author_id,
        filepath: m.filepath,
    }
}

fn to_active(a: &Audiotrack) -> audiotrack::ActiveModel {
    audiotrack::ActiveModel {
        id: Set(a.id),
        title: Set(a.title.clone()),
        author_id: Set(a.author_id),
        filepath: Set(a.filepath.clone()),
    }
}

#[async_trait]
impl AudiotrackRepository for SeaOrmAudiotrackRepository {
    async fn insert(&self, a: &Audiotrack) -> DomainResult<()> {
        debug!("Saving audiotrack: {}", a.id);
        to_active(a)
            .insert(&self.db)
            .await
            .map_err(|e| write_err(e, || DomainError::AudiotrackAlreadyExists(a.id)))?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Audiotrack>> {
        let model = audiotrack::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Audiotrack>> {
        let models = audiotrack::Entity::find()
            .order_by_asc(audiotrack::Column::Title)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_title(&self, title: &str) -> DomainResult<Vec<Audiotrack>> {
        let models = audiotrack::Entity::find()
            .filter(audiotrack::Column::Title.contains(title))
            .order_by_asc(audiotrack::Column::Title)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, a: &Audiotrack) -> DomainResult<()> {
        debug!("Updating audiotrack: {}", a.id);

        let existing = audiotrack::Entity::find_by_id(a.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Err(DomainError::AudiotrackNotFound(a.id));
        }

        to_active(a).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = audiotrack::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::AudiotrackNotFound(id));
        }
        Ok(())
    }
}
