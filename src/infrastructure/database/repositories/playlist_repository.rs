//! SeaORM implementations of the playlist, favourite and playlist-track stores

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use super::audiotrack_repository::model_to_domain as audiotrack_to_domain;
use super::{db_err, write_err};
use crate::domain::{
    Audiotrack, DomainError, DomainResult, Playlist, PlaylistAudiotrack,
    PlaylistAudiotrackRepository, PlaylistRepository, UserFavourite, UserFavouriteRepository,
};
use crate::infrastructure::database::entities::{
    audiotrack, playlist, playlist_audiotrack, user_favourite,
};

fn model_to_domain(m: playlist::Model) -> Playlist {
    Playlist {
        id: m.id,
        title: m.title,
        user_id: m.user_id,
    }
}

pub(super) async fn insert_playlist<C: ConnectionTrait>(conn: &C, p: &Playlist) -> DomainResult<()> {
    playlist::ActiveModel {
        id: Set(p.id),
        title: Set(p.title.clone()),
        user_id: Set(p.user_id),
    }
    .insert(conn)
    .await
    .map_err(|e| write_err(e, || DomainError::PlaylistAlreadyExists(p.id)))?;
    Ok(())
}

pub(super) async fn link_favourite<C: ConnectionTrait>(
    conn: &C,
    link: UserFavourite,
) -> DomainResult<()> {
    user_favourite::ActiveModel {
        user_id: Set(link.user_id),
        favourite_id: Set(link.playlist_id),
        created_at: Set(Utc::now()),
    }
    .insert(conn)
    .await
    .map_err(|e| {
        write_err(e, || DomainError::FavouriteAlreadyLinked {
            user_id: link.user_id,
            playlist_id: link.playlist_id,
        })
    })?;
    Ok(())
}

// ── Playlists ───────────────────────────────────────────────────

pub struct SeaOrmPlaylistRepository {
    db: DatabaseConnection,
}

impl SeaOrmPlaylistRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PlaylistRepository for SeaOrmPlaylistRepository {
    async fn insert(&self, p: &Playlist) -> DomainResult<()> {
        insert_playlist(&self.db, p).await
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Playlist>> {
        let model = playlist::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Playlist>> {
        let models = playlist::Entity::find()
            .filter(playlist::Column::UserId.eq(user_id))
            .order_by_asc(playlist::Column::Title)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, p: &Playlist) -> DomainResult<()> {
        let existing = playlist::Entity::find_by_id(p.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        let Some(existing) = existing else {
            return Err(DomainError::PlaylistNotFound(p.id));
        };

        let mut active: playlist::ActiveModel = existing.into();
        active.title = Set(p.title.clone());
        active.user_id = Set(p.user_id);
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        playlist_audiotrack::Entity::delete_many()
            .filter(playlist_audiotrack::Column::PlaylistId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        user_favourite::Entity::delete_many()
            .filter(user_favourite::Column::FavouriteId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        let result = playlist::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            txn.rollback().await.map_err(db_err)?;
            return Err(DomainError::PlaylistNotFound(id));
        }

        txn.commit().await.map_err(db_err)
    }
}

// ── Favourites ──────────────────────────────────────────────────

pub struct SeaOrmUserFavouriteRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserFavouriteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserFavouriteRepository for SeaOrmUserFavouriteRepository {
    async fn link(&self, link: UserFavourite) -> DomainResult<()> {
        link_favourite(&self.db, link).await
    }

    async fn find_favourites_playlist(&self, user_id: Uuid) -> DomainResult<Option<Playlist>> {
        let model = playlist::Entity::find()
            .join(JoinType::InnerJoin, playlist::Relation::UserFavourites.def())
            .filter(user_favourite::Column::UserId.eq(user_id))
            .order_by_asc(user_favourite::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn count_links(&self, user_id: Uuid) -> DomainResult<usize> {
        let count = user_favourite::Entity::find()
            .filter(user_favourite::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count as usize)
    }
}

// ── Playlist tracks ─────────────────────────────────────────────

pub struct SeaOrmPlaylistAudiotrackRepository {
    db: DatabaseConnection,
}

impl SeaOrmPlaylistAudiotrackRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PlaylistAudiotrackRepository for SeaOrmPlaylistAudiotrackRepository {
    async fn add(&self, link: PlaylistAudiotrack) -> DomainResult<()> {
        playlist_audiotrack::ActiveModel {
            playlist_id: Set(link.playlist_id),
            audiotrack_id: Set(link.audiotrack_id),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            write_err(e, || DomainError::AudiotrackAlreadyInPlaylist {
                playlist_id: link.playlist_id,
                audiotrack_id: link.audiotrack_id,
            })
        })?;
        Ok(())
    }

    async fn remove(&self, link: PlaylistAudiotrack) -> DomainResult<()> {
        let result =
            playlist_audiotrack::Entity::delete_by_id((link.playlist_id, link.audiotrack_id))
                .exec(&self.db)
                .await
                .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::AudiotrackNotInPlaylist {
                playlist_id: link.playlist_id,
                audiotrack_id: link.audiotrack_id,
            });
        }
        Ok(())
    }

    async fn contains(&self, link: PlaylistAudiotrack) -> DomainResult<bool> {
        let model = playlist_audiotrack::Entity::find_by_id((link.playlist_id, link.audiotrack_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.is_some())
    }

    async fn audiotracks_of(&self, playlist_id: Uuid) -> DomainResult<Vec<Audiotrack>> {
        let models = audiotrack::Entity::find()
            .join(
                JoinType::InnerJoin,
                audiotrack::Relation::PlaylistsAudiotracks.def(),
            )
            .filter(playlist_audiotrack::Column::PlaylistId.eq(playlist_id))
            .order_by_asc(audiotrack::Column::Title)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(audiotrack_to_domain).collect())
    }

    async fn delete_by_audiotrack(&self, audiotrack_id: Uuid) -> DomainResult<()> {
        playlist_audiotrack::Entity::delete_many()
            .filter(playlist_audiotrack::Column::AudiotrackId.eq(audiotrack_id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
