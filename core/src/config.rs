//! Account credentials used to sign every request.

use std::fmt;

use crate::error::{ApiError, Result};
use crate::sign::sign_parts;

pub const ENV_USERNAME: &str = "DIGIFLAZZ_USERNAME";
pub const ENV_API_KEY: &str = "DIGIFLAZZ_API_KEY";
pub const ENV_WEBHOOK: &str = "DIGIFLAZZ_WEBHOOK";

/// Immutable account identity: username, secret key and an optional
/// callback (webhook) URL.
///
/// The secret key only ever leaves this struct as signature input. `Debug`
/// redacts it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    account_id: String,
    secret_key: String,
    callback_url: Option<String>,
}

impl Credentials {
    pub fn new(account_id: impl Into<String>, secret_key: impl Into<String>) -> Result<Self> {
        let account_id = account_id.into();
        let secret_key = secret_key.into();
        if account_id.is_empty() {
            return Err(ApiError::InvalidConfiguration(
                "account id must not be empty".to_string(),
            ));
        }
        if secret_key.is_empty() {
            return Err(ApiError::InvalidConfiguration(
                "secret key must not be empty".to_string(),
            ));
        }
        Ok(Self {
            account_id,
            secret_key,
            callback_url: None,
        })
    }

    /// Store a callback URL. It is kept for the caller's reference and is not
    /// sent unless a transaction asks for it.
    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.callback_url = if url.is_empty() { None } else { Some(url) };
        self
    }

    /// Read credentials from `DIGIFLAZZ_USERNAME`, `DIGIFLAZZ_API_KEY` and the
    /// optional `DIGIFLAZZ_WEBHOOK`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let account_id = lookup(ENV_USERNAME)
            .ok_or_else(|| ApiError::InvalidConfiguration(format!("{ENV_USERNAME} is not set")))?;
        let secret_key = lookup(ENV_API_KEY)
            .ok_or_else(|| ApiError::InvalidConfiguration(format!("{ENV_API_KEY} is not set")))?;
        let credentials = Self::new(account_id, secret_key)?;
        Ok(match lookup(ENV_WEBHOOK) {
            Some(url) => credentials.with_callback_url(url),
            None => credentials,
        })
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    pub fn callback_url(&self) -> Option<&str> {
        self.callback_url.as_deref()
    }

    /// `md5(account_id ‖ secret_key ‖ salt)` as lowercase hex.
    pub fn signature(&self, salt: &str) -> String {
        sign_parts(&self.account_id, &self.secret_key, salt)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("secret_key", &"<redacted>")
            .field("callback_url", &self.callback_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn rejects_empty_account_id() {
        let err = Credentials::new("", "key1").unwrap_err();
        assert!(matches!(err, ApiError::InvalidConfiguration(_)));
    }

    #[test]
    fn rejects_empty_secret_key() {
        let err = Credentials::new("user1", "").unwrap_err();
        assert!(matches!(err, ApiError::InvalidConfiguration(_)));
    }

    #[test]
    fn accepts_any_non_empty_strings() {
        let creds = Credentials::new(" ", " ").unwrap();
        assert_eq!(creds.account_id(), " ");
    }

    #[test]
    fn exposes_fields_read_only() {
        let creds = Credentials::new("user1", "key1")
            .unwrap()
            .with_callback_url("https://example.com/hook");
        assert_eq!(creds.account_id(), "user1");
        assert_eq!(creds.secret_key(), "key1");
        assert_eq!(creds.callback_url(), Some("https://example.com/hook"));
    }

    #[test]
    fn empty_callback_url_is_treated_as_absent() {
        let creds = Credentials::new("user1", "key1").unwrap().with_callback_url("");
        assert_eq!(creds.callback_url(), None);
    }

    #[test]
    fn debug_redacts_secret_key() {
        let creds = Credentials::new("user1", "super-secret").unwrap();
        let debug = format!("{creds:?}");
        assert!(debug.contains("user1"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn signature_uses_account_key_and_salt() {
        let creds = Credentials::new("user1", "key1").unwrap();
        assert_eq!(creds.signature("depo"), "af162411e54244ce2f8b3103c45e9b1f");
    }

    #[test]
    fn from_lookup_reads_all_variables() {
        let vars: HashMap<&str, &str> = [
            (ENV_USERNAME, "user1"),
            (ENV_API_KEY, "key1"),
            (ENV_WEBHOOK, "https://example.com/hook"),
        ]
        .into_iter()
        .collect();
        let creds = Credentials::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(creds.account_id(), "user1");
        assert_eq!(creds.callback_url(), Some("https://example.com/hook"));
    }

    #[test]
    fn from_lookup_requires_api_key() {
        let err = Credentials::from_lookup(|k| (k == ENV_USERNAME).then(|| "user1".to_string()))
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::InvalidConfiguration("DIGIFLAZZ_API_KEY is not set".to_string())
        );
    }
}
