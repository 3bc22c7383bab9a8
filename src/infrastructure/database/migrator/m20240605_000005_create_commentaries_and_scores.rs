//! Create commentaries and scores tables

use sea_orm_migration::prelude::*;

use super::m20240605_000001_create_users::Users;
use super::m20240605_000003_create_audiotracks::Audiotracks;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Commentaries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Commentaries::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Commentaries::AuthorId).uuid().not_null())
                    .col(ColumnDef::new(Commentaries::AudiotrackId).uuid().not_null())
                    .col(ColumnDef::new(Commentaries::Text).text().not_null())
                    .col(
                        ColumnDef::new(Commentaries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_commentaries_author")
                            .from(Commentaries::Table, Commentaries::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_commentaries_audiotrack")
                            .from(Commentaries::Table, Commentaries::AudiotrackId)
                            .to(Audiotracks::Table, Audiotracks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_commentaries_audiotrack")
                    .table(Commentaries::Table)
                    .col(Commentaries::AudiotrackId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Scores::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Scores::AuthorId).uuid().not_null())
                    .col(ColumnDef::new(Scores::AudiotrackId).uuid().not_null())
                    .col(
                        ColumnDef::new(Scores::Value)
                            .integer()
                            .not_null()
                            .check(Expr::col(Scores::Value).between(0, 5)),
                    )
                    .primary_key(
                        Index::create()
                            .col(Scores::AuthorId)
                            .col(Scores::AudiotrackId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scores_author")
                            .from(Scores::Table, Scores::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scores_audiotrack")
                            .from(Scores::Table, Scores::AudiotrackId)
                            .to(Audiotracks::Table, Audiotracks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Scores::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Commentaries::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Commentaries {
    Table,
    Id,
    AuthorId,
    AudiotrackId,
    Text,
    CreatedAt,
}

#[derive(Iden)]
pub enum Scores {
    Table,
    AuthorId,
    AudiotrackId,
    Value,
}
