//! Create audiotracks table

use sea_orm_migration::prelude::*;

use super::m20240605_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Audiotracks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Audiotracks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Audiotracks::Title).string_len(64).not_null())
                    .col(ColumnDef::new(Audiotracks::AuthorId).uuid().not_null())
                    .col(ColumnDef::new(Audiotracks::Filepath).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_audiotracks_author")
                            .from(Audiotracks::Table, Audiotracks::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Audiotracks::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Audiotracks {
    Table,
    Id,
    Title,
    AuthorId,
    Filepath,
}
