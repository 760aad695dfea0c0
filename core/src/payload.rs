//! Outbound request bodies.
//!
//! # Design
//! Optional fields are added with explicit "set if present" steps on a
//! mutable `PayloadBuilder`, then frozen into a `SignedPayload` together with
//! the signature. Absent fields are left out of the JSON object entirely; the
//! remote reads a missing field as its default, while an explicit `null` is
//! not accepted everywhere.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};

pub const FIELD_USERNAME: &str = "username";
pub const FIELD_SIGN: &str = "sign";

/// Mutable, insertion-ordered JSON object under construction.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    fields: Map<String, Value>,
}

impl PayloadBuilder {
    pub fn new(username: &str) -> Self {
        let mut fields = Map::new();
        fields.insert(FIELD_USERNAME.to_string(), Value::String(username.to_string()));
        Self { fields }
    }

    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn set_if_present<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }

    /// Append `sign` and freeze the payload.
    pub fn finish(mut self, sign: String) -> SignedPayload {
        self.fields.insert(FIELD_SIGN.to_string(), Value::String(sign));
        SignedPayload { fields: self.fields }
    }
}

/// Immutable request body carrying `username` and `sign`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SignedPayload {
    fields: Map<String, Value>,
}

impl SignedPayload {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn sign(&self) -> &str {
        self.fields
            .get(FIELD_SIGN)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| ApiError::RequestSetupFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_username_and_ends_with_sign() {
        let payload = PayloadBuilder::new("user1").set("cmd", "deposit").finish("abc".into());
        let keys: Vec<&str> = payload.keys().collect();
        assert_eq!(keys, ["username", "cmd", "sign"]);
        assert_eq!(payload.sign(), "abc");
    }

    #[test]
    fn set_if_present_skips_none() {
        let payload = PayloadBuilder::new("user1")
            .set_if_present("maximumPrice", None::<i64>)
            .set_if_present("allowDot", Some(true))
            .finish("abc".into());
        assert!(!payload.contains("maximumPrice"));
        assert_eq!(payload.get("allowDot"), Some(&Value::Bool(true)));
    }

    #[test]
    fn serializes_as_flat_object() {
        let payload = PayloadBuilder::new("user1").set("amount", 50000).finish("s".into());
        assert_eq!(
            payload.to_json().unwrap(),
            r#"{"username":"user1","amount":50000,"sign":"s"}"#
        );
    }
}
