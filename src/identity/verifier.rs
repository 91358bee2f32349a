//! Firebase credential backend.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use std::time::Duration;

use super::{FirebaseClient, FirebaseConfig, FirestoreAdmin, IdentityError, IdentityResult};
use crate::auth::{AuthError, CredentialVerifier, Credentials, Subject};

/// Verifies logins against Firebase and syncs verified users to Firestore.
#[derive(Debug)]
pub struct FirebaseVerifier {
    client: FirebaseClient,
    admin: Option<FirestoreAdmin>,
}

impl FirebaseVerifier {
    pub fn new(client: FirebaseClient, admin: Option<FirestoreAdmin>) -> Self {
        Self { client, admin }
    }

    /// Build the identity client and, when a service account is configured,
    /// the Firestore admin client. Both share one HTTP client.
    pub fn from_config(config: &FirebaseConfig) -> IdentityResult<Self> {
        let api_key = config.resolve_api_key()?;
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;

        let admin = match config.service_account()? {
            Some(account) => Some(FirestoreAdmin::new(
                http.clone(),
                account,
                &config.token_url,
                &config.firestore_base_url,
            )?),
            None => None,
        };

        let client = FirebaseClient::with_client(http, &config.identity_base_url, api_key);
        Ok(Self::new(client, admin))
    }

    pub fn admin_enabled(&self) -> bool {
        self.admin.is_some()
    }

    async fn sync_user(&self, uid: &str, email: &str) {
        let Some(admin) = &self.admin else {
            return;
        };

        match admin.ensure_user_document(uid, email).await {
            Ok(true) => info!("Created Firestore user document for {}", uid),
            Ok(false) => debug!("Firestore user document for {} already exists", uid),
            Err(e) => warn!("Failed to sync Firestore user document for {}: {}", uid, e),
        }
    }
}

#[async_trait]
impl CredentialVerifier for FirebaseVerifier {
    fn provider(&self) -> &'static str {
        "firebase"
    }

    async fn verify(&self, credentials: &Credentials) -> Result<Subject, AuthError> {
        credentials.require_present()?;
        let email = credentials.email.trim();

        let signed_in = self
            .client
            .sign_in_with_password(email, &credentials.password)
            .await
            .map_err(map_provider_error)?;

        let account = self
            .client
            .lookup_account(&signed_in.id_token)
            .await
            .map_err(map_provider_error)?;

        if !account.email_verified {
            info!("Rejected login for unverified account {}", signed_in.local_id);
            return Err(AuthError::UnverifiedEmail);
        }

        self.sync_user(&signed_in.local_id, &signed_in.email).await;

        info!("Firebase login succeeded for {}", signed_in.local_id);
        Ok(Subject {
            id: signed_in.local_id,
            email: signed_in.email,
            display_name: signed_in
                .display_name
                .or(account.display_name)
                .filter(|name| !name.is_empty()),
        })
    }
}

/// Map an identity provider failure to the error shown to the user.
pub fn map_provider_error(err: IdentityError) -> AuthError {
    match err.provider_code() {
        Some("EMAIL_NOT_FOUND") => AuthError::AccountNotFound,
        Some("INVALID_PASSWORD") => AuthError::IncorrectPassword,
        Some("INVALID_EMAIL") => AuthError::InvalidEmail,
        Some("TOO_MANY_ATTEMPTS_TRY_LATER") => AuthError::TooManyAttempts,
        Some(code) => {
            debug!("Firebase rejected credentials: {}", code);
            AuthError::InvalidCredentials
        }
        None => {
            warn!("Firebase request failed: {}", err);
            AuthError::Provider(err.to_string())
        }
    }
}
