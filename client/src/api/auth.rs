//! Login, logout and account refresh

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use shared::{validate_credentials, Account, AccountRecord, DomainError};

use super::ApiClient;
use crate::error::ClientResult;
use crate::session::{Credentials, Session};

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
    #[serde(rename = "type")]
    account_type: &'a str,
}

#[derive(Deserialize)]
struct LoginData {
    access_token: String,
    user: AccountRecord,
}

/// Authentication endpoints
pub struct AuthApi<'a> {
    api: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Exchange credentials for a session
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<Session> {
        validate_credentials(&credentials.username, credentials.password.expose_secret())
            .map_err(|msg| DomainError::validation("credentials", msg))?;

        let body = LoginBody {
            username: &credentials.username,
            password: credentials.password.expose_secret(),
            account_type: &credentials.account_type,
        };
        let data: LoginData = self.api.post(None, "/auth/login", &body).await?;
        let account = Account::try_from(data.user)?;

        tracing::info!(
            account_id = %account.account_id,
            kind = %account.kind,
            "Logged in"
        );
        Ok(Session::new(SecretString::from(data.access_token), account))
    }

    /// End the session
    ///
    /// The token is stateless on the server, so a failed call is only
    /// logged; the session is dropped either way.
    pub async fn logout(&self, session: Session) {
        let result: ClientResult<()> = self
            .api
            .post(Some(&session), "/auth/logout", &serde_json::json!({}))
            .await;
        match result {
            Ok(()) => tracing::info!(account_id = %session.account().account_id, "Logged out"),
            Err(e) => tracing::warn!("Logout call failed, discarding session anyway: {}", e),
        }
    }

    /// Re-read the account behind the session
    pub async fn current_account(&self, session: &Session) -> ClientResult<Account> {
        let record: AccountRecord = self.api.get(Some(session), "/auth/me").await?;
        Ok(Account::try_from(record)?)
    }
}
