//! Score entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "scores")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub author_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub audiotrack_id: Uuid,
    pub value: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
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
