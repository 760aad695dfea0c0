//! Request signature primitive.
//!
//! The remote recomputes `md5(username ‖ key ‖ salt)` and compares it with the
//! `sign` field of every request body. The algorithm and the lowercase hex
//! encoding are fixed by the wire protocol.

use md5::{Digest, Md5};

/// Salt for the balance check.
pub const BALANCE_SALT: &str = "depo";

/// Salt for deposit requests.
pub const DEPOSIT_SALT: &str = "deposit";

/// Lowercase hex MD5 digest of `material`.
pub fn sign(material: &str) -> String {
    hex::encode(Md5::digest(material.as_bytes()))
}

/// Signature for `account_id`/`secret_key` over an operation salt.
pub fn sign_parts(account_id: &str, secret_key: &str, salt: &str) -> String {
    let mut material = String::with_capacity(account_id.len() + secret_key.len() + salt.len());
    material.push_str(account_id);
    material.push_str(secret_key);
    material.push_str(salt);
    sign(&material)
}
