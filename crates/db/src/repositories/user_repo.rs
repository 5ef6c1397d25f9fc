//! Repository for the `users` table.

use civic_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::user::{CreateUser, User};

/// Column list for `users` queries.
pub(crate) const COLUMNS: &str = "id, full_name, email, role, department, subcity, on_leave, \
    workload, id_document_front, id_document_back, created_at, updated_at";

/// Provides CRUD operations for user accounts.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (full_name, email, role, department, subcity) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(input.role.as_str())
            .bind(input.department.map(|d| d.as_str()))
            .bind(&input.subcity)
            .fetch_one(pool)
            .await
    }

    /// Find a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A user's display name, read on the caller's connection.
    pub async fn full_name(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as("SELECT full_name FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(row.map(|(name,)| name))
    }

    /// Record the storage references of a citizen's ID documents.
    pub async fn set_id_documents(
        pool: &PgPool,
        id: DbId,
        front: Option<&str>,
        back: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET id_document_front = $2, id_document_back = $3 \
             WHERE id = $1 AND role = 'citizen' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(front)
            .bind(back)
            .fetch_optional(pool)
            .await
    }
}
