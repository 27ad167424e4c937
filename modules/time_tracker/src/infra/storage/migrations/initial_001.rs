use sea_orm_migration::prelude::*;

/// At most one open interval per (user, task).
const OPEN_INTERVAL_INDEX: &str = "ux_work_intervals_open";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::PassportSerie).string_len(4).not_null())
                    .col(ColumnDef::new(Users::PassportNumber).string_len(6).not_null())
                    .col(ColumnDef::new(Users::Surname).string().not_null())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Patronymic).string().null())
                    .col(ColumnDef::new(Users::Address).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkIntervals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkIntervals::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WorkIntervals::UserId).integer().not_null())
                    .col(ColumnDef::new(WorkIntervals::TaskId).integer().not_null())
                    .col(ColumnDef::new(WorkIntervals::Description).text().null())
                    .col(
                        ColumnDef::new(WorkIntervals::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkIntervals::EndTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_intervals_user")
                            .from(WorkIntervals::Table, WorkIntervals::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_work_intervals_user_start")
                    .table(WorkIntervals::Table)
                    .col(WorkIntervals::UserId)
                    .col(WorkIntervals::StartTime)
                    .to_owned(),
            )
            .await?;

        // Partial index; same syntax on SQLite and Postgres.
        manager
            .get_connection()
            .execute_unprepared(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {OPEN_INTERVAL_INDEX} \
                 ON work_intervals (user_id, task_id) WHERE end_time IS NULL"
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(&format!("DROP INDEX IF EXISTS {OPEN_INTERVAL_INDEX}"))
            .await?;
        manager
            .drop_table(Table::drop().table(WorkIntervals::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    PassportSerie,
    PassportNumber,
    Surname,
    Name,
    Patronymic,
    Address,
}

#[derive(DeriveIden)]
enum WorkIntervals {
    Table,
    Id,
    UserId,
    TaskId,
    Description,
    StartTime,
    EndTime,
}
