//! Playlists ↔ audiotracks link table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "playlists_audiotracks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub playlist_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub audiotrack_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::playlist::Entity",
        from = "Column::PlaylistId",
        to = "super::playlist::Column::Id"
    )]
    Playlist,
    #[sea_orm(
        belongs_to = "super::audiotrack::Entity",
        from = "Column::AudiotrackId",
        to = "super::audiotrack::Column::Id"
    )]
    Audiotrack,
}

impl Related<super::audiotrack::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Audiotrack.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
