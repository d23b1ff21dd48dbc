pub mod auth;
pub mod views;

use crate::error::{Outcome, RecError};
use crate::models::{Recommendation, SimilarTitle};
use crate::services::users::DUPLICATE_USERNAME;
use crate::utils::validation::{validate_criteria, validate_title, MIN_PASSWORD_LEN, MIN_USERNAME_LEN};
use crate::AppState;
use auth::CurrentUser;
use axum::{
    extract::{Query, State},
    http::header::SET_COOKIE,
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use views::Message;

pub const UNAVAILABLE_MESSAGE: &str = "Dataset or models not available. Please contact an administrator.";
pub const NO_RESULTS_MESSAGE: &str = "No recommendations found for your criteria. Try adjusting the rating!";
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong while computing recommendations. Please try again.";

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: "Success".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    InvalidLogin,
    UsernameTaken,
    InvalidSignup,
    AccountCreated,
    LoggedOut,
    Error,
}

impl Notice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Notice::InvalidLogin => "invalid_login",
            Notice::UsernameTaken => "username_taken",
            Notice::InvalidSignup => "invalid_signup",
            Notice::AccountCreated => "account_created",
            Notice::LoggedOut => "logged_out",
            Notice::Error => "error",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        [
            Notice::InvalidLogin,
            Notice::UsernameTaken,
            Notice::InvalidSignup,
            Notice::AccountCreated,
            Notice::LoggedOut,
            Notice::Error,
        ]
        .into_iter()
        .find(|n| n.as_str() == raw)
    }

    pub fn message(&self) -> Message {
        match self {
            Notice::InvalidLogin => Message::error("Invalid username or password."),
            Notice::UsernameTaken => Message::error(DUPLICATE_USERNAME),
            Notice::InvalidSignup => Message::error(format!(
                "Username needs at least {} characters without spaces; password needs at least {}.",
                MIN_USERNAME_LEN, MIN_PASSWORD_LEN
            )),
            Notice::AccountCreated => Message::success("Account created! Please log in."),
            Notice::LoggedOut => Message::success("You have been logged out."),
            Notice::Error => Message::error("Something went wrong. Please try again."),
        }
    }

    fn redirect(self) -> Redirect {
        Redirect::to(&format!("/?notice={}", self.as_str()))
    }
}

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    notice: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct PredictForm {
    #[serde(default)]
    genre: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    min_rating: String,
}

#[derive(Debug, Deserialize)]
pub struct SimilarForm {
    #[serde(default)]
    title: String,
}

async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HashMap<String, String>>> {
    let mut status = HashMap::new();
    status.insert("status".to_string(), "healthy".to_string());
    status.insert("service".to_string(), "anirec".to_string());
    status.insert("version".to_string(), env!("CARGO_PKG_VERSION").to_string());
    status.insert(
        "recommendations".to_string(),
        match &state.recommendation_service {
            Some(service) => format!("available ({})", service.model_name()),
            None => "unavailable".to_string(),
        },
    );
    status.insert(
        "similarity".to_string(),
        if state.similarity_service.as_ref().is_some_and(|s| s.is_available()) {
            "available".to_string()
        } else {
            "unavailable".to_string()
        },
    );

    Json(ApiResponse::success(status))
}

async fn home(State(state): State<AppState>, headers: axum::http::HeaderMap, Query(query): Query<HomeQuery>) -> Response {
    let logged_in = state
        .session_manager
        .session_id(&headers)
        .and_then(|id| state.session_manager.validate_session(id))
        .is_some();
    if logged_in {
        return Redirect::to("/index").into_response();
    }

    let message = query.notice.as_deref().and_then(Notice::parse).map(|n| n.message());
    views::home(message.as_ref()).into_response()
}

async fn login(State(state): State<AppState>, Form(form): Form<CredentialsForm>) -> Response {
    match state.user_service.login(&form.username, &form.password).await {
        Ok(Some(user)) => {
            let session_id = state.session_manager.create_session(&user);
            info!("User {} logged in", user.username);
            (
                [(SET_COOKIE, state.session_manager.session_cookie(session_id))],
                Redirect::to("/index"),
            )
                .into_response()
        }
        Ok(None) => Notice::InvalidLogin.redirect().into_response(),
        Err(e) => {
            error!("Login failed: {}", e);
            Notice::Error.redirect().into_response()
        }
    }
}

async fn signup(State(state): State<AppState>, Form(form): Form<CredentialsForm>) -> Redirect {
    match state.user_service.signup(&form.username, &form.password).await {
        Ok(_) => Notice::AccountCreated.redirect(),
        Err(RecError::Validation(msg)) if msg == DUPLICATE_USERNAME => Notice::UsernameTaken.redirect(),
        Err(RecError::Validation(_)) => Notice::InvalidSignup.redirect(),
        Err(e) => {
            error!("Signup failed: {}", e);
            Notice::Error.redirect()
        }
    }
}

async fn logout(State(state): State<AppState>, user: CurrentUser) -> Response {
    state.session_manager.logout(user.session_id);
    info!("User {} logged out", user.username);
    (
        [(SET_COOKIE, state.session_manager.clear_cookie())],
        Notice::LoggedOut.redirect(),
    )
        .into_response()
}

async fn index(user: CurrentUser) -> Html<String> {
    views::index(&user.username, None)
}

fn outcome_message<T>(outcome: &Outcome<T>, not_found: &str) -> Option<Message> {
    match outcome {
        Outcome::Success(_) => None,
        Outcome::NotFound => Some(Message::error(not_found)),
        Outcome::DataUnavailable => Some(Message::error(UNAVAILABLE_MESSAGE)),
        Outcome::ValidationError(msg) => Some(Message::error(msg.clone())),
    }
}

async fn predict(State(state): State<AppState>, user: CurrentUser, Form(form): Form<PredictForm>) -> Html<String> {
    let Some(service) = state.recommendation_service.as_ref() else {
        return views::index(&user.username, Some(&Message::error(UNAVAILABLE_MESSAGE)));
    };

    let outcome: Outcome<Vec<Recommendation>> = match validate_criteria(&form.genre, &form.kind, &form.min_rating) {
        Ok(criteria) => {
            let service = service.clone();
            let computed = tokio::task::spawn_blocking(move || {
                let result = service.recommend(&criteria);
                (criteria, result)
            })
            .await;
            match computed {
                Ok((_, Ok(outcome))) => outcome,
                Ok((criteria, Err(e))) => {
                    error!("Recommendation failed for {:?}: {}", criteria, e);
                    return views::index(&user.username, Some(&Message::error(GENERIC_ERROR_MESSAGE)));
                }
                Err(e) => {
                    error!("Recommendation task failed: {}", e);
                    return views::index(&user.username, Some(&Message::error(GENERIC_ERROR_MESSAGE)));
                }
            }
        }
        Err(e) => e.into(),
    };

    match outcome {
        Outcome::Success(recommendations) => views::results(&user.username, service.model_name(), &recommendations),
        other => views::index(&user.username, outcome_message(&other, NO_RESULTS_MESSAGE).as_ref()),
    }
}

async fn similar(State(state): State<AppState>, user: CurrentUser, Form(form): Form<SimilarForm>) -> Html<String> {
    let outcome: Outcome<Vec<SimilarTitle>> = match (validate_title(&form.title), state.similarity_service.as_ref()) {
        (Err(e), _) => e.into(),
        (Ok(_), None) => Outcome::DataUnavailable,
        (Ok(title), Some(service)) => service.similar_to(title),
    };

    match outcome {
        Outcome::Success(titles) => views::similar(&user.username, &form.title, &titles),
        other => {
            let not_found = format!("No title named \"{}\" was found.", form.title);
            views::index(&user.username, outcome_message(&other, &not_found).as_ref())
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/logout", get(logout))
        .route("/index", get(index))
        .route("/predict", post(predict))
        .route("/similar", post(similar))
        .route("/health", get(health_check))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_round_trip() {
        for notice in [Notice::InvalidLogin, Notice::UsernameTaken, Notice::AccountCreated, Notice::Error] {
            assert_eq!(Notice::parse(notice.as_str()), Some(notice));
        }
        assert_eq!(Notice::parse("<script>"), None);
    }

    #[test]
    fn test_outcome_message() {
        assert_eq!(outcome_message(&Outcome::Success(()), "none"), None);
        assert_eq!(outcome_message::<()>(&Outcome::NotFound, "none").unwrap().text, "none");
        assert_eq!(
            outcome_message::<()>(&Outcome::DataUnavailable, "none").unwrap().text,
            UNAVAILABLE_MESSAGE
        );
        assert_eq!(
            outcome_message::<()>(&Outcome::ValidationError("bad".to_string()), "none").unwrap().text,
            "bad"
        );
    }
}
