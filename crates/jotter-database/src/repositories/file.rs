//! File repository implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use jotter_core::error::{AppError, ErrorKind};
use jotter_core::result::AppResult;
use jotter_entity::file::{CreateFile, File, FileFilter};

use crate::store::FileStore;

/// PostgreSQL-backed [`FileStore`].
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build the listing query for `owner` under `filter`.
fn list_query(owner: Uuid, filter: &FileFilter) -> QueryBuilder<'static, Postgres> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM files WHERE owner = ");
    query.push_bind(owner);

    if let Some(kind) = filter.kind {
        query.push(" AND kind = ").push_bind(kind);
    }
    if filter.favorite_only {
        query.push(" AND is_favorite = TRUE");
    }
    if let Some(parent) = filter.parent_folder {
        query.push(" AND parent_folder = ").push_bind(parent);
    }
    if let Some(term) = filter.normalized_search() {
        query
            .push(" AND LOWER(name) LIKE ")
            .push_bind(format!("%{}%", escape_like(&term)))
            .push(" ESCAPE '\\'");
    }
    if let Some((start, end)) = filter.date_range() {
        query
            .push(" AND created_at >= ")
            .push_bind(start)
            .push(" AND created_at < ")
            .push_bind(end);
    }

    // Column and direction come from closed enums, never from input text.
    query
        .push(" ORDER BY ")
        .push(filter.sort_field.column())
        .push(" ")
        .push(filter.sort_direction.as_sql());
    query
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl FileStore for FileRepository {
    async fn find_owned(&self, owner: Uuid, id: Uuid) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1 AND owner = $2")
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn list(&self, owner: Uuid, filter: &FileFilter) -> AppResult<Vec<File>> {
        let mut query = list_query(owner, filter);
        query
            .build_query_as::<File>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    async fn create(&self, data: &CreateFile) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "INSERT INTO files (name, kind, size, path, public_id, parent_folder, owner, \
             is_favorite, is_private, password_hash, tags, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING *",
        )
        .bind(&data.name)
        .bind(data.kind)
        .bind(data.size)
        .bind(&data.path)
        .bind(&data.public_id)
        .bind(data.parent_folder)
        .bind(data.owner)
        .bind(data.is_favorite)
        .bind(data.is_private)
        .bind(&data.password_hash)
        .bind(&data.tags)
        .bind(&data.metadata)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create file", e))
    }

    async fn set_favorite(
        &self,
        owner: Uuid,
        id: Uuid,
        favorite: bool,
    ) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET is_favorite = $3, updated_at = NOW() \
             WHERE id = $1 AND owner = $2 RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .bind(favorite)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update favorite", e))
    }

    async fn set_privacy(
        &self,
        owner: Uuid,
        id: Uuid,
        password_hash: Option<&str>,
    ) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET is_private = $3, password_hash = $4, updated_at = NOW() \
             WHERE id = $1 AND owner = $2 RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .bind(password_hash.is_some())
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update privacy", e))
    }

    async fn rename(&self, owner: Uuid, id: Uuid, name: &str) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET name = $3, updated_at = NOW() \
             WHERE id = $1 AND owner = $2 RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename file", e))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1 AND owner = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err)
                    if db_err.constraint() == Some("files_parent_folder_fkey") =>
                {
                    AppError::conflict("Folder is not empty")
                }
                _ => AppError::with_source(ErrorKind::Database, "Failed to delete file", e),
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_children(&self, owner: Uuid, folder: Uuid) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM files WHERE owner = $1 AND parent_folder = $2",
        )
        .bind(owner)
        .bind(folder)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count children", e))?;
        Ok(count as u64)
    }
}
