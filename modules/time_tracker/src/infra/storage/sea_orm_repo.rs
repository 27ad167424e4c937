//! SeaORM-backed repository implementations for the domain ports.
//!
//! Both structs are generic over `C: ConnectionTrait`, so they work with a pooled
//! `DatabaseConnection` or a transaction. Every state change is a single guarded write
//! statement: the partial unique index on open intervals and the user foreign key decide
//! conflicts, so SQLite never has to upgrade a read lock into a write lock.

use anyhow::Context;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Condition, Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};

use crate::contract::model::{HoursWindow, User, UserUpdate, WorkInterval};
use crate::domain::repo::{
    CloseOutcome, DeleteOutcome, IntervalsRepository, NewIntervalRecord, NewUserRecord,
    OpenOutcome, UsersRepository,
};
use crate::infra::storage::entity::{user, work_interval};

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn is_foreign_key_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}

const LIKE_ESCAPE: char = '\\';

/// `%needle%` with LIKE wildcards in the needle taken literally.
fn contains_pattern(needle: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape(LIKE_ESCAPE)
}

/// SeaORM users repository.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> UsersRepository for SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(&self, u: NewUserRecord) -> anyhow::Result<User> {
        let m = user::ActiveModel {
            passport_serie: Set(u.passport_serie),
            passport_number: Set(u.passport_number),
            surname: Set(u.surname),
            name: Set(u.name),
            patronymic: Set(u.patronymic),
            address: Set(u.address),
            ..Default::default()
        };
        let created = m.insert(&self.conn).await.context("insert user failed")?;
        Ok(created.into())
    }

    async fn update(&self, id: i32, u: UserUpdate) -> anyhow::Result<Option<User>> {
        let m = user::ActiveModel {
            id: Set(id),
            passport_serie: Set(u.passport_serie),
            passport_number: Set(u.passport_number),
            surname: Set(u.surname),
            name: Set(u.name),
            patronymic: Set(u.patronymic),
            address: Set(u.address),
        };
        match m.update(&self.conn).await {
            Ok(updated) => Ok(Some(updated.into())),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e).context("update user failed"),
        }
    }

    async fn delete(&self, id: i32) -> anyhow::Result<DeleteOutcome> {
        let owned = work_interval::Entity::find()
            .filter(work_interval::Column::UserId.eq(id))
            .count(&self.conn)
            .await
            .context("count user intervals failed")?;
        if owned > 0 {
            return Ok(DeleteOutcome::HasIntervals);
        }

        // An interval inserted after the count trips the foreign key instead.
        match user::Entity::delete_by_id(id).exec(&self.conn).await {
            Ok(res) if res.rows_affected > 0 => Ok(DeleteOutcome::Deleted),
            Ok(_) => Ok(DeleteOutcome::NotFound),
            Err(e) if is_foreign_key_violation(&e) => Ok(DeleteOutcome::HasIntervals),
            Err(e) => Err(e).context("delete user failed"),
        }
    }

    async fn list(
        &self,
        filter: Option<&str>,
        limit: u64,
        offset: u64,
    ) -> anyhow::Result<Vec<User>> {
        let mut query = user::Entity::find();
        if let Some(needle) = filter {
            query = query.filter(
                Condition::any()
                    .add(user::Column::Name.like(contains_pattern(needle)))
                    .add(user::Column::Surname.like(contains_pattern(needle))),
            );
        }
        let rows = query
            .order_by_asc(user::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.conn)
            .await
            .context("list users failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// SeaORM work interval repository.
pub struct SeaOrmIntervalsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmIntervalsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

fn open_for(user_id: i32, task_id: i32) -> Condition {
    Condition::all()
        .add(work_interval::Column::UserId.eq(user_id))
        .add(work_interval::Column::TaskId.eq(task_id))
        .add(work_interval::Column::EndTime.is_null())
}

#[async_trait::async_trait]
impl<C> IntervalsRepository for SeaOrmIntervalsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn open(&self, rec: NewIntervalRecord) -> anyhow::Result<OpenOutcome> {
        let m = work_interval::ActiveModel {
            user_id: Set(rec.user_id),
            task_id: Set(rec.task_id),
            description: Set(rec.description),
            start_time: Set(rec.start_time),
            end_time: Set(None),
            ..Default::default()
        };
        match m.insert(&self.conn).await {
            Ok(created) => Ok(OpenOutcome::Opened(created.into())),
            Err(e) if is_unique_violation(&e) => Ok(OpenOutcome::AlreadyOpen),
            Err(e) if is_foreign_key_violation(&e) => Ok(OpenOutcome::UnknownUser),
            Err(e) => Err(e).context("insert interval failed"),
        }
    }

    async fn close_open(
        &self,
        user_id: i32,
        task_id: i32,
        end_time: DateTime<Utc>,
    ) -> anyhow::Result<CloseOutcome> {
        loop {
            let open = work_interval::Entity::find()
                .filter(open_for(user_id, task_id))
                .order_by_asc(work_interval::Column::Id)
                .all(&self.conn)
                .await
                .context("load open intervals failed")?;
            let Some(oldest) = open.first() else {
                return Ok(CloseOutcome::NothingOpen);
            };

            // Only the caller whose update still sees `end_time IS NULL` wins the row.
            let res = work_interval::Entity::update_many()
                .col_expr(work_interval::Column::EndTime, Expr::value(end_time))
                .filter(work_interval::Column::Id.eq(oldest.id))
                .filter(work_interval::Column::EndTime.is_null())
                .exec(&self.conn)
                .await
                .context("close interval failed")?;
            if res.rows_affected == 0 {
                continue;
            }

            let mut closed = oldest.clone();
            closed.end_time = Some(end_time);
            return Ok(CloseOutcome::Closed {
                interval: closed.into(),
                still_open: open.len() - 1,
            });
        }
    }

    async fn closed_in_window(
        &self,
        user_id: i32,
        window: HoursWindow,
    ) -> anyhow::Result<Vec<WorkInterval>> {
        let rows = work_interval::Entity::find()
            .filter(work_interval::Column::UserId.eq(user_id))
            .filter(work_interval::Column::StartTime.gte(window.start))
            .filter(work_interval::Column::EndTime.is_not_null())
            .filter(work_interval::Column::EndTime.lte(window.end))
            .order_by_asc(work_interval::Column::Id)
            .all(&self.conn)
            .await
            .context("load intervals in window failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
