//! Firebase identity provider integration.
//!
//! Talks to the Identity Toolkit REST API to verify email/password logins and,
//! when a service account is configured, keeps a `users/{uid}` document in
//! Firestore for every verified account.

mod admin;
mod client;
mod config;
mod error;
mod types;
mod verifier;

pub use admin::FirestoreAdmin;
pub use client::FirebaseClient;
pub use config::{FirebaseConfig, ServiceAccount};
pub use error::{IdentityError, IdentityResult};
pub use types::*;
pub use verifier::{FirebaseVerifier, map_provider_error};
