//! Auth Router

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::sync::Mutex;

use crate::application::config::AuthConfig;
use crate::domain::repository::AccountRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Login, logout, exec creation and the caller's identity
///
/// Protection comes from the pipeline's [`AuthPolicy`](super::AuthPolicy);
/// `/execs/login` must be one of the excluded paths.
pub fn auth_router<R>(repo: Arc<R>, config: Arc<AuthConfig>) -> Router
where
    R: AccountRepository + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo,
        config,
        create_lock: Arc::new(Mutex::new(())),
    };

    Router::new()
        .route("/execs", post(handlers::create_execs::<R>))
        .route("/execs/login", post(handlers::login::<R>))
        .route("/execs/logout", post(handlers::logout::<R>))
        .route("/execs/me", get(handlers::me))
        .with_state(state)
}
