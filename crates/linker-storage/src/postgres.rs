use async_trait::async_trait;
use linker_core::error::StorageError;
use linker_core::model::{Alias, LinkEntry, TopicId, TopicName, UserId, Username};
use linker_core::store::{Result, UserTopicLinkStore};
use sqlx::{PgPool, Row};
use tracing::debug;

const SCHEMA: &str = include_str!("../ddl/postgres/schema.sql");

/// PostgreSQL implementation of the store contract.
///
/// Uniqueness of usernames, of (user, topic) and of (user, topic, alias)
/// is enforced by table constraints, so concurrent writers are serialized
/// by the database rather than by this process.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store from an existing PostgreSQL connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a store by opening a new connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `users`, `topics` and `links` tables if they are missing.
    pub async fn init(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        debug!("postgres schema is up to date");
        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

fn topic_name(raw: String) -> Result<TopicName> {
    TopicName::new(raw)
        .map_err(|_| StorageError::InvalidData("topic row with empty name".to_string()))
}

#[async_trait]
impl UserTopicLinkStore for PostgresStore {
    async fn upsert_user(&self, username: &Username) -> Result<UserId> {
        // The no-op update makes RETURNING yield the id on conflict too.
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (username)
            VALUES ($1)
            ON CONFLICT (username) DO UPDATE SET username = EXCLUDED.username
            RETURNING id
            "#,
        )
        .bind(username.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(UserId(id))
    }

    async fn find_user(&self, username: &Username) -> Result<Option<UserId>> {
        let id: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
            .bind(username.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(id.map(UserId))
    }

    async fn insert_topic(&self, user: UserId, topic: &TopicName) -> Result<TopicId> {
        let result = sqlx::query_scalar::<_, i64>(
            "INSERT INTO topics (user_id, topic) VALUES ($1, $2) RETURNING id",
        )
        .bind(user.0)
        .bind(topic.as_str())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(id) => Ok(TopicId(id)),
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(topic.to_string())),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn find_topic(&self, user: UserId, topic: &TopicName) -> Result<Option<TopicId>> {
        let id: Option<i64> =
            sqlx::query_scalar("SELECT id FROM topics WHERE user_id = $1 AND topic = $2")
                .bind(user.0)
                .bind(topic.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(id.map(TopicId))
    }

    async fn delete_topic(&self, user: UserId, topic: &TopicName) -> Result<Option<TopicId>> {
        let id: Option<i64> = sqlx::query_scalar(
            "DELETE FROM topics WHERE user_id = $1 AND topic = $2 RETURNING id",
        )
        .bind(user.0)
        .bind(topic.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(id.map(TopicId))
    }

    async fn list_topics(&self, user: UserId) -> Result<Vec<TopicName>> {
        let rows: Vec<String> =
            sqlx::query_scalar("SELECT topic FROM topics WHERE user_id = $1 ORDER BY id")
                .bind(user.0)
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        rows.into_iter().map(topic_name).collect()
    }

    async fn insert_link(
        &self,
        user: UserId,
        topic: TopicId,
        alias: &Alias,
        link: &str,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO links (user_id, topic_id, link, alias)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user.0)
        .bind(topic.0)
        .bind(link)
        .bind(alias.as_str())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(alias.to_string())),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn find_link(
        &self,
        user: UserId,
        topic: TopicId,
        alias: &Alias,
    ) -> Result<Option<String>> {
        let link: Option<String> = sqlx::query_scalar(
            "SELECT link FROM links WHERE user_id = $1 AND topic_id = $2 AND alias = $3",
        )
        .bind(user.0)
        .bind(topic.0)
        .bind(alias.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(link)
    }

    async fn delete_link(
        &self,
        user: UserId,
        topic: TopicId,
        alias: &Alias,
    ) -> Result<Option<String>> {
        let link: Option<String> = sqlx::query_scalar(
            r#"
            DELETE FROM links
            WHERE user_id = $1 AND topic_id = $2 AND alias = $3
            RETURNING link
            "#,
        )
        .bind(user.0)
        .bind(topic.0)
        .bind(alias.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(link)
    }

    async fn delete_topic_links(&self, user: UserId, topic: TopicId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM links WHERE user_id = $1 AND topic_id = $2")
            .bind(user.0)
            .bind(topic.0)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn list_links(&self, user: UserId, topic: TopicId) -> Result<Vec<LinkEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT link, alias
            FROM links
            WHERE user_id = $1 AND topic_id = $2
            ORDER BY id
            "#,
        )
        .bind(user.0)
        .bind(topic.0)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter()
            .map(|row| {
                Ok(LinkEntry {
                    link: row.try_get("link").map_err(map_sqlx_error)?,
                    alias: row.try_get("alias").map_err(map_sqlx_error)?,
                })
            })
            .collect()
    }
}
