//! Create users_favourites and playlists_audiotracks link tables
//!
//! Both use composite primary keys; rows are association records only.

use sea_orm_migration::prelude::*;

use super::m20240605_000001_create_users::Users;
use super::m20240605_000002_create_playlists::Playlists;
use super::m20240605_000003_create_audiotracks::Audiotracks;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UsersFavourites::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UsersFavourites::UserId).uuid().not_null())
                    .col(ColumnDef::new(UsersFavourites::FavouriteId).uuid().not_null())
                    .col(
                        ColumnDef::new(UsersFavourites::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(UsersFavourites::UserId)
                            .col(UsersFavourites::FavouriteId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_favourites_user")
                            .from(UsersFavourites::Table, UsersFavourites::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_favourites_playlist")
                            .from(UsersFavourites::Table, UsersFavourites::FavouriteId)
                            .to(Playlists::Table, Playlists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PlaylistsAudiotracks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PlaylistsAudiotracks::PlaylistId).uuid().not_null())
                    .col(ColumnDef::new(PlaylistsAudiotracks::AudiotrackId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(PlaylistsAudiotracks::PlaylistId)
                            .col(PlaylistsAudiotracks::AudiotrackId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_playlists_audiotracks_playlist")
                            .from(PlaylistsAudiotracks::Table, PlaylistsAudiotracks::PlaylistId)
                            .to(Playlists::Table, Playlists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_playlists_audiotracks_audiotrack")
                            .from(PlaylistsAudiotracks::Table, PlaylistsAudiotracks::AudiotrackId)
                            .to(Audiotracks::Table, Audiotracks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PlaylistsAudiotracks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UsersFavourites::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum UsersFavourites {
    Table,
    UserId,
    FavouriteId,
    CreatedAt,
}

#[derive(Iden)]
pub enum PlaylistsAudiotracks {
    Table,
    PlaylistId,
    AudiotrackId,
}
