use crate::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Redirect;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub session_id: Uuid,
    pub user_id: i64,
    pub username: String,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let sessions = &state.session_manager;
        let session_id = sessions.session_id(&parts.headers).ok_or_else(|| Redirect::to("/"))?;
        let session = sessions.validate_session(session_id).ok_or_else(|| Redirect::to("/"))?;

        match state.user_service.find(session.user_id).await {
            Ok(Some(user)) => Ok(CurrentUser {
                session_id,
                user_id: user.id,
                username: user.username,
            }),
            Ok(None) => {
                sessions.logout(session_id);
                Err(Redirect::to("/"))
            }
            Err(e) => {
                tracing::error!("Failed to load session user {}: {}", session.user_id, e);
                Err(Redirect::to("/"))
            }
        }
    }
}
