//! Access gate middleware.

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use log::debug;
use std::{convert::Infallible, sync::Arc};

use super::{AccessGate, AuthError, Session, SessionKeys};

/// State shared by the gate and the auth handlers.
#[derive(Debug, Clone)]
pub struct AuthState {
    keys: Arc<SessionKeys>,
    gate: Arc<AccessGate>,
}

impl AuthState {
    pub fn new(keys: SessionKeys, gate: AccessGate) -> Self {
        Self {
            keys: Arc::new(keys),
            gate: Arc::new(gate),
        }
    }

    pub fn keys(&self) -> &SessionKeys {
        &self.keys
    }

    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    /// Resolve the session from a cookie jar.
    pub fn session_from_jar(&self, jar: &CookieJar) -> Option<Session> {
        let token = jar.get(self.keys.cookie_name()).map(|c| c.value());
        self.keys.resolve(token)
    }

    /// Resolve the session from raw request headers.
    pub fn session_from_headers(&self, headers: &HeaderMap) -> Option<Session> {
        self.session_from_jar(&CookieJar::from_headers(headers))
    }
}

/// Authenticated user extracted from request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub session: Session,
}

impl CurrentUser {
    pub fn subject(&self) -> &str {
        &self.session.subject
    }

    /// Email if known, otherwise the subject.
    pub fn email(&self) -> &str {
        self.session.email_or_subject()
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::MissingSession)
    }
}

/// `Option<CurrentUser>` for pages that render differently without a session.
impl<S> OptionalFromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<CurrentUser>().cloned())
    }
}

/// Access gate middleware.
///
/// Reads the session cookie and either lets the request through or redirects
/// it. Never sets or refreshes cookies. On pass-through with a valid session,
/// injects `CurrentUser` into request extensions.
pub async fn access_gate(State(auth): State<AuthState>, mut req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let session = auth.session_from_headers(req.headers());
    let decision = auth.gate().decide(&path, session.as_ref());

    if let Some(target) = auth.gate().redirect_target(decision) {
        debug!("Gate redirecting {} -> {} ({:?})", path, target, decision);
        return Redirect::temporary(target).into_response();
    }

    if let Some(session) = session {
        req.extensions_mut().insert(CurrentUser { session });
    }

    next.run(req).await
}
