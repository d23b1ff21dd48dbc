pub mod password;

use crate::config::DatabaseConfig;
use crate::error::{RecError, RecResult};
use crate::models::User;
use crate::utils::validation::validate_credentials;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

pub const DUPLICATE_USERNAME: &str = "Username already exists.";

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> RecResult<Option<User>>;
    async fn find_by_id(&self, id: i64) -> RecResult<Option<User>>;
    async fn insert(&self, username: &str, password_hash: &str) -> RecResult<User>;
}

pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub async fn connect(config: &DatabaseConfig) -> RecResult<Self> {
        ensure_parent_dir(&config.url)?;
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        info!("User store ready at {}", config.url);
        Ok(store)
    }

    pub async fn migrate(&self) -> RecResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn find_by_username(&self, username: &str) -> RecResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> RecResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert(&self, username: &str, password_hash: &str) -> RecResult<User> {
        let created_at = Utc::now();
        let result = sqlx::query("INSERT INTO users (username, password_hash, created_at) VALUES (?, ?, ?)")
            .bind(username)
            .bind(password_hash)
            .bind(created_at)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(User {
                id: done.last_insert_rowid(),
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                created_at,
            }),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(RecError::Validation(DUPLICATE_USERNAME.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn ensure_parent_dir(url: &str) -> RecResult<()> {
    let Some(path) = url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or_default();
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn signup(&self, username: &str, password: &str) -> RecResult<User> {
        let username = username.trim();
        validate_credentials(username, password)?;

        if self.store.find_by_username(username).await?.is_some() {
            return Err(RecError::Validation(DUPLICATE_USERNAME.to_string()));
        }

        let hash = password::hash_password_blocking(password.to_string()).await?;
        let user = self.store.insert(username, &hash).await?;
        info!("Created account {} ({})", user.username, user.id);
        Ok(user)
    }

    pub async fn login(&self, username: &str, password: &str) -> RecResult<Option<User>> {
        let Some(user) = self.store.find_by_username(username.trim()).await? else {
            return Ok(None);
        };

        let verified = password::verify_password_blocking(password.to_string(), user.password_hash.clone()).await?;
        Ok(verified.then_some(user))
    }

    pub async fn find(&self, id: i64) -> RecResult<Option<User>> {
        self.store.find_by_id(id).await
    }
}
