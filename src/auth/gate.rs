//! Access gate decision logic.
//!
//! The gate is a pure function of the request path and the resolved session.
//! Protected paths are checked first, the login path second. It never touches
//! the session itself.

use super::{GateConfig, Session};

/// Outcome of running a request through the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Let the request through unchanged.
    Allow,
    /// Protected path without a valid session.
    RedirectToLogin,
    /// Login path with a valid session.
    RedirectToHome,
}

/// Path rules for the access gate.
#[derive(Debug, Clone)]
pub struct AccessGate {
    protected_prefixes: Vec<String>,
    login_path: String,
    home_path: String,
}

impl AccessGate {
    /// Build a gate from configuration.
    pub fn new(config: &GateConfig) -> Self {
        Self {
            protected_prefixes: config
                .protected_prefixes
                .iter()
                .map(|p| normalize_prefix(p))
                .collect(),
            login_path: config.login_path.clone(),
            home_path: config.home_path.clone(),
        }
    }

    /// Login path unauthenticated callers are sent to.
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Home path authenticated callers are sent to.
    pub fn home_path(&self) -> &str {
        &self.home_path
    }

    /// Check whether a path requires a session.
    pub fn is_protected(&self, path: &str) -> bool {
        self.protected_prefixes
            .iter()
            .any(|prefix| matches_prefix(path, prefix))
    }

    /// Check whether a path is the login page. Only the exact path counts,
    /// ignoring a trailing slash.
    pub fn is_login_path(&self, path: &str) -> bool {
        normalize_prefix(path) == normalize_prefix(&self.login_path)
    }

    /// Decide what to do with a request.
    pub fn decide(&self, path: &str, session: Option<&Session>) -> GateDecision {
        if self.is_protected(path) && session.is_none() {
            return GateDecision::RedirectToLogin;
        }

        if self.is_login_path(path) && session.is_some() {
            return GateDecision::RedirectToHome;
        }

        GateDecision::Allow
    }

    /// Redirect target for a decision, if any.
    pub fn redirect_target(&self, decision: GateDecision) -> Option<&str> {
        match decision {
            GateDecision::Allow => None,
            GateDecision::RedirectToLogin => Some(&self.login_path),
            GateDecision::RedirectToHome => Some(&self.home_path),
        }
    }
}

fn normalize_prefix(prefix: &str) -> String {
    prefix.trim().trim_end_matches('/').to_string()
}

/// Segment-aware prefix match: `/dashboard` matches `/dashboard` and
/// `/dashboard/...` but not `/dashboards`. An empty prefix (configured as `/`)
/// matches every path.
fn matches_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => prefix.is_empty() || rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
