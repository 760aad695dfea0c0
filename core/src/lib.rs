//! Signed-request client for the Digiflazz PPOB API.
//!
//! # Overview
//! Four operations: balance check, price list, deposit and transaction. Each
//! builds a JSON payload, signs it with `md5(username ‖ key ‖ salt)`, POSTs it
//! to `https://api.digiflazz.com/v1/<path>` and classifies the response.
//!
//! # Design
//! - `DigiflazzClient` is stateless and never does I/O: `build_*` produces an
//!   `HttpRequest`, `parse_*` consumes an `HttpResponse`.
//! - `Transport` executes the round-trip; `UreqTransport` (default `ureq`
//!   feature) is a blocking implementation.
//! - `Digiflazz` couples the two for single-call use.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//!
//! ```rust,no_run
//! use digiflazz_core::{Credentials, Digiflazz, PriceListType, TransactionRequest};
//!
//! # fn main() -> Result<(), digiflazz_core::ApiError> {
//! let api = Digiflazz::new(Credentials::new("username", "production-key")?);
//! let balance = api.check_balance()?;
//! let products = api.price_list(PriceListType::Prepaid)?;
//! let result = api.transaction(
//!     &TransactionRequest::new("xld10", "087800001230", "order-42").message("pulsa"),
//! )?;
//! # let _ = (balance, products, result);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod payload;
pub mod sign;
pub mod types;

pub use api::Digiflazz;
pub use client::{DigiflazzClient, DEFAULT_ENDPOINT};
pub use config::Credentials;
pub use error::{ApiError, Result};
#[cfg(feature = "ureq")]
pub use http::UreqTransport;
pub use http::{HttpRequest, HttpResponse, Transport};
pub use payload::{PayloadBuilder, SignedPayload};
pub use sign::sign;
pub use types::{
    Balance, Command, DepositReceipt, DepositRequest, PostpaidProduct, PrepaidProduct, PriceEntry,
    PriceListType, TransactionRequest, TransactionResult, UnknownCommand,
};
