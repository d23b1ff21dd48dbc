use crate::config::SessionConfig;
use crate::models::User;
use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

pub struct SessionManager {
    sessions: DashMap<Uuid, Session>,
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            config,
        }
    }

    pub fn create_session(&self, user: &User) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.insert(
            id,
            Session {
                user_id: user.id,
                username: user.username.clone(),
                expires_at: Utc::now() + Duration::seconds(self.config.ttl_seconds),
            },
        );
        id
    }

    pub fn validate_session(&self, id: Uuid) -> Option<Session> {
        let session = self.sessions.get(&id).map(|s| s.clone())?;
        if session.expires_at <= Utc::now() {
            self.sessions.remove(&id);
            return None;
        }
        Some(session)
    }

    pub fn logout(&self, id: Uuid) -> bool {
        self.sessions.remove(&id).is_some()
    }

    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.expires_at > now);
        before - self.sessions.len()
    }

    pub fn spawn_purge_task(self: Arc<Self>, every: std::time::Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let removed = self.purge_expired();
                if removed > 0 {
                    debug!("Purged {} expired sessions, {} active", removed, self.len());
                }
            }
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn session_id(&self, headers: &HeaderMap) -> Option<Uuid> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.config.cookie_name)
            .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
    }

    pub fn session_cookie(&self, id: Uuid) -> String {
        format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
            self.config.cookie_name, id, self.config.ttl_seconds
        )
    }

    pub fn clear_cookie(&self) -> String {
        format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", self.config.cookie_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn user() -> User {
        User {
            id: 7,
            username: "alice".to_string(),
            password_hash: "x".to_string(),
            created_at: Utc::now(),
        }
    }

    fn config(ttl_seconds: i64) -> SessionConfig {
        SessionConfig {
            cookie_name: "anirec_session".to_string(),
            ttl_seconds,
            purge_interval_seconds: 300,
        }
    }

    #[test]
    fn test_session_lifecycle() {
        let manager = SessionManager::new(config(60));
        let id = manager.create_session(&user());

        let session = manager.validate_session(id).unwrap();
        assert_eq!(session.user_id, 7);
        assert_eq!(session.username, "alice");

        assert!(manager.logout(id));
        assert!(manager.validate_session(id).is_none());
        assert!(!manager.logout(id));
    }

    #[test]
    fn test_expired_session_is_rejected() {
        let manager = SessionManager::new(config(0));
        let id = manager.create_session(&user());
        assert!(manager.validate_session(id).is_none());
        assert!(manager.is_empty());

        manager.create_session(&user());
        assert_eq!(manager.purge_expired(), 1);
    }

    #[tokio::test]
    async fn test_purge_task_drops_abandoned_sessions() {
        let manager = Arc::new(SessionManager::new(config(0)));
        for _ in 0..1000 {
            manager.create_session(&user());
        }
        assert_eq!(manager.len(), 1000);

        let task = manager.clone().spawn_purge_task(std::time::Duration::from_millis(10));
        for _ in 0..100 {
            if manager.is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        task.abort();

        assert!(manager.is_empty());
    }

    #[test]
    fn test_session_id_from_cookie_header() {
        let manager = SessionManager::new(config(60));
        let id = Uuid::new_v4();

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; anirec_session={}", id)).unwrap(),
        );
        assert_eq!(manager.session_id(&headers), Some(id));

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("anirec_session=garbage"));
        assert_eq!(manager.session_id(&headers), None);
        assert_eq!(manager.session_id(&HeaderMap::new()), None);
    }

    #[test]
    fn test_cookie_strings() {
        let manager = SessionManager::new(config(60));
        let id = Uuid::nil();
        assert!(manager.session_cookie(id).starts_with("anirec_session=00000000-"));
        assert!(manager.session_cookie(id).contains("HttpOnly"));
        assert!(manager.clear_cookie().contains("Max-Age=0"));
    }
}
