//! Auth Middleware
//!
//! The authentication stage of the request pipeline. Requests to excluded
//! paths pass through untouched; everything else needs a valid token in the
//! `Bearer` cookie, and its verified claims are attached to the request as
//! [`AuthClaims`].

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use platform::cookie::extract_cookie;
use platform::middleware::{Policy, RequestContext};

use crate::application::{AuthConfig, AuthDecision, Authorizer};

/// Verified identity of the caller, read by handlers with
/// `Extension<AuthClaims>`
pub type AuthClaims = platform::token::Claims;

#[derive(Debug, Clone)]
pub struct AuthPolicy {
    authorizer: Arc<Authorizer>,
}

impl AuthPolicy {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self {
            authorizer: Arc::new(Authorizer::new(config)),
        }
    }
}

impl Policy for AuthPolicy {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn on_request(&self, ctx: &RequestContext, req: &mut Request<Body>) -> Result<(), Response> {
        // Claims only ever come from this stage.
        req.extensions_mut().remove::<AuthClaims>();

        let token = extract_cookie(req.headers(), self.authorizer.config().cookie_name());

        match self.authorizer.authorize(&ctx.path, token.as_deref()) {
            Ok(AuthDecision::Public) => Ok(()),
            Ok(AuthDecision::Authenticated(claims)) => {
                tracing::debug!(
                    subject_id = claims.subject_id,
                    role = %claims.role,
                    path = %ctx.path,
                    "Request authenticated"
                );
                req.extensions_mut().insert(claims);
                Ok(())
            }
            Err(e) => Err(e.into_response()),
        }
    }
}
