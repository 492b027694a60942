//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::database::PgPool;
use crate::task::{
    domain::{
        ChecklistItem, PersistedTaskData, PriorityCounts, Progress, StatusCounts, Task, TaskId,
        TaskPriority, TaskStatus, TaskTitle,
    },
    ports::{TaskCountFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::user::domain::UserId;
use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_row(task)?;

        self.run_blocking(move |connection| {
            let affected = diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                .set((
                    tasks::title.eq(row.title),
                    tasks::description.eq(row.description),
                    tasks::priority.eq(row.priority),
                    tasks::status.eq(row.status),
                    tasks::due_date.eq(row.due_date),
                    tasks::checklist.eq(row.checklist),
                    tasks::attachments.eq(row.attachments),
                    tasks::progress.eq(row.progress),
                    tasks::pinned.eq(row.pinned),
                    tasks::updated_at.eq(row.updated_at),
                ))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_owned(&self, owner: UserId, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .filter(tasks::owner_id.eq(owner.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_owned(
        &self,
        owner: UserId,
        status: Option<TaskStatus>,
    ) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let mut query = tasks::table
                .filter(tasks::owner_id.eq(owner.into_inner()))
                .select(TaskRow::as_select())
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .into_boxed();
            if let Some(wanted) = status {
                query = query.filter(tasks::status.eq(wanted.as_str()));
            }
            let rows = query
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn delete_owned(&self, owner: UserId, id: TaskId) -> TaskRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let affected = diesel::delete(
                tasks::table
                    .filter(tasks::id.eq(id.into_inner()))
                    .filter(tasks::owner_id.eq(owner.into_inner())),
            )
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;
            Ok(affected > 0)
        })
        .await
    }

    async fn count(&self, owner: UserId, filter: TaskCountFilter) -> TaskRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let mut query = tasks::table
                .filter(tasks::owner_id.eq(owner.into_inner()))
                .select(count_star())
                .into_boxed();
            query = match filter {
                TaskCountFilter::All => query,
                TaskCountFilter::Status(status) => query.filter(tasks::status.eq(status.as_str())),
                TaskCountFilter::OverdueAt(now) => query
                    .filter(tasks::status.ne(TaskStatus::Completed.as_str()))
                    .filter(tasks::due_date.lt(now)),
            };
            let total = query
                .get_result::<i64>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            u64::try_from(total).map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn count_by_status(&self, owner: UserId) -> TaskRepositoryResult<StatusCounts> {
        self.run_blocking(move |connection| {
            let groups = tasks::table
                .filter(tasks::owner_id.eq(owner.into_inner()))
                .group_by(tasks::status)
                .select((tasks::status, count_star()))
                .load::<(String, i64)>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            let pairs = groups
                .into_iter()
                .map(|(label, total)| {
                    let status = label
                        .parse::<TaskStatus>()
                        .map_err(TaskRepositoryError::persistence)?;
                    let count = u64::try_from(total).map_err(TaskRepositoryError::persistence)?;
                    Ok((status, count))
                })
                .collect::<TaskRepositoryResult<Vec<_>>>()?;
            Ok(StatusCounts::from_pairs(pairs))
        })
        .await
    }

    async fn count_by_priority(&self, owner: UserId) -> TaskRepositoryResult<PriorityCounts> {
        self.run_blocking(move |connection| {
            let groups = tasks::table
                .filter(tasks::owner_id.eq(owner.into_inner()))
                .group_by(tasks::priority)
                .select((tasks::priority, count_star()))
                .load::<(String, i64)>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            let pairs = groups
                .into_iter()
                .map(|(label, total)| {
                    let priority = label
                        .parse::<TaskPriority>()
                        .map_err(TaskRepositoryError::persistence)?;
                    let count = u64::try_from(total).map_err(TaskRepositoryError::persistence)?;
                    Ok((priority, count))
                })
                .collect::<TaskRepositoryResult<Vec<_>>>()?;
            Ok(PriorityCounts::from_pairs(pairs))
        })
        .await
    }

    async fn recent(&self, owner: UserId, limit: usize) -> TaskRepositoryResult<Vec<Task>> {
        let limit = i64::try_from(limit).map_err(TaskRepositoryError::persistence)?;
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::owner_id.eq(owner.into_inner()))
                .select(TaskRow::as_select())
                .order((tasks::created_at.desc(), tasks::id.desc()))
                .limit(limit)
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

fn to_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let checklist =
        serde_json::to_value(task.checklist()).map_err(TaskRepositoryError::persistence)?;
    let attachments =
        serde_json::to_value(task.attachments()).map_err(TaskRepositoryError::persistence)?;

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        owner_id: task.owner().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().to_owned(),
        priority: task.priority().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        due_date: task.due_date(),
        checklist,
        attachments,
        progress: i16::from(task.progress().value()),
        pinned: task.is_pinned(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        owner_id,
        title,
        description,
        priority,
        status,
        due_date,
        checklist,
        attachments,
        progress,
        pinned,
        created_at,
        updated_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        owner: UserId::from_uuid(owner_id),
        title: TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?,
        description,
        priority: priority.parse().map_err(TaskRepositoryError::persistence)?,
        status: status.parse().map_err(TaskRepositoryError::persistence)?,
        due_date,
        checklist: serde_json::from_value::<Vec<ChecklistItem>>(checklist)
            .map_err(TaskRepositoryError::persistence)?,
        attachments: serde_json::from_value::<Vec<String>>(attachments)
            .map_err(TaskRepositoryError::persistence)?,
        progress: Progress::new(u8::try_from(progress).map_err(TaskRepositoryError::persistence)?),
        pinned,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}
