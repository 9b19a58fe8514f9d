//! Authenticated session context
//!
//! A [`Session`] is created by login and passed explicitly to every API
//! call. It never changes after creation; refreshing the account produces a
//! new value.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use shared::{capabilities, Account, AccountKind, Capability};

use crate::error::{ClientError, ClientResult};

/// Claims read from the access token
///
/// The token is signed by the backend with a key the client does not hold,
/// so only the payload is decoded.
#[derive(Debug, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    exp: Option<i64>,
}

/// Login credentials
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
    pub account_type: String,
}

impl Credentials {
    pub fn new(username: &str, password: SecretString, kind: AccountKind) -> Self {
        Self {
            username: username.trim().to_string(),
            password,
            account_type: kind.wire_type().to_string(),
        }
    }
}

/// An authenticated operator
#[derive(Clone)]
pub struct Session {
    token: SecretString,
    account: Account,
    capabilities: BTreeSet<Capability>,
    expires_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("account", &self.account)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(token: SecretString, account: Account) -> Self {
        let expires_at = token_expiry(token.expose_secret());
        Self {
            capabilities: capabilities(account.kind),
            token,
            account,
            expires_at,
        }
    }

    /// Same token, refreshed account
    pub fn with_account(&self, account: Account) -> Self {
        Self {
            capabilities: capabilities(account.kind),
            token: self.token.clone(),
            account,
            expires_at: self.expires_at,
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn capabilities(&self) -> &BTreeSet<Capability> {
        &self.capabilities
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|exp| exp <= now).unwrap_or(false)
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Fail with `Forbidden` unless the account has `capability`
    pub fn require(&self, capability: Capability) -> ClientResult<()> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(ClientError::Forbidden {
                message: format!(
                    "{} accounts cannot use {}",
                    self.account.kind,
                    capability.tag()
                ),
            })
        }
    }

    pub(crate) fn bearer(&self) -> &str {
        self.token.expose_secret()
    }
}

fn token_expiry(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    data.claims
        .exp
        .and_then(|exp| Utc.timestamp_opt(exp, 0).single())
}
