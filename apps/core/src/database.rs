use crate::error::AppError;
use crate::models::{Dream, NewDream, NewUser, User};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::types::Json;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

/// Auth provider recorded for email/password accounts.
pub const LOCAL_PROVIDER: &str = "local";

/// Persistence for users and dreams.
///
/// Dream reads and writes are scoped to an owner: a dream owned by someone
/// else behaves exactly like a missing one.
#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts a user. A duplicate email (any case) is `Conflict`.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, AppError>;

    async fn create_dream(&self, dream: NewDream) -> Result<Dream, AppError>;
    /// All dreams of a user, newest first.
    async fn list_dreams(&self, user_id: &str) -> Result<Vec<Dream>, AppError>;
    async fn get_dream(&self, user_id: &str, id: &str) -> Result<Option<Dream>, AppError>;
    /// Patches the image URL. `None` when the dream is missing or not owned.
    async fn set_dream_image(
        &self,
        user_id: &str,
        id: &str,
        image_url: &str,
    ) -> Result<Option<Dream>, AppError>;
}

/// Opens the pool and applies migrations.
///
/// In-memory URLs get a single connection that is never recycled, since
/// every new SQLite memory connection starts from an empty database.
pub async fn init_db(database_url: &str) -> Result<SqlitePool, AppError> {
    info!("Initializing database at: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?
    };

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| AppError::Database(sqlx::Error::Migrate(Box::new(e))))?;

    info!("Database initialized and migrations applied.");

    Ok(pool)
}

/// `Store` backed by SQLite.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        Ok(Self::new(init_db(database_url).await?))
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl Store for SqliteStore {
    // --- Users ---

    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now().timestamp_millis();

        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, auth_provider, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, name, email, password_hash, auth_provider, created_at
            "#,
        )
        .bind(&id)
        .bind(user.name.trim())
        .bind(user.email.trim())
        .bind(&user.password_hash)
        .bind(LOCAL_PROVIDER)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Email already registered".to_string())
            } else {
                AppError::Database(e)
            }
        })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, auth_provider, created_at
            FROM users
            WHERE email = ? COLLATE NOCASE
            "#,
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, auth_provider, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    // --- Dreams ---

    async fn create_dream(&self, dream: NewDream) -> Result<Dream, AppError> {
        let id = Uuid::new_v4().to_string();
        let timestamp = Utc::now().timestamp_millis();

        let created = sqlx::query_as::<_, Dream>(
            r#"
            INSERT INTO dreams (id, user_id, text, title, summary, keywords, emotions, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, user_id, text, title, summary, keywords, emotions, timestamp, image_url
            "#,
        )
        .bind(&id)
        .bind(&dream.user_id)
        .bind(&dream.text)
        .bind(&dream.title)
        .bind(&dream.summary)
        .bind(Json(&dream.keywords))
        .bind(Json(&dream.emotions))
        .bind(timestamp)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list_dreams(&self, user_id: &str) -> Result<Vec<Dream>, AppError> {
        let dreams = sqlx::query_as::<_, Dream>(
            r#"
            SELECT id, user_id, text, title, summary, keywords, emotions, timestamp, image_url
            FROM dreams
            WHERE user_id = ?
            ORDER BY timestamp DESC, rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(dreams)
    }

    async fn get_dream(&self, user_id: &str, id: &str) -> Result<Option<Dream>, AppError> {
        let dream = sqlx::query_as::<_, Dream>(
            r#"
            SELECT id, user_id, text, title, summary, keywords, emotions, timestamp, image_url
            FROM dreams
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(dream)
    }

    async fn set_dream_image(
        &self,
        user_id: &str,
        id: &str,
        image_url: &str,
    ) -> Result<Option<Dream>, AppError> {
        let dream = sqlx::query_as::<_, Dream>(
            r#"
            UPDATE dreams
            SET image_url = ?
            WHERE id = ? AND user_id = ?
            RETURNING id, user_id, text, title, summary, keywords, emotions, timestamp, image_url
            "#,
        )
        .bind(image_url)
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(dream)
    }
}
