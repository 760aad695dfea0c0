//! Domain DTOs for the Digiflazz API.
//!
//! # Design
//! Request types are plain builders; they are turned into `SignedPayload`s by
//! `DigiflazzClient`. Response types are defined independently of the
//! mock-server crate; integration tests catch schema drift between the two.
//!
//! The remote answers in snake_case with a few abbreviated names (`rc`, `sn`,
//! `tele`, `wa`, `desc`). Response structs use descriptive camelCase names and
//! accept the remote's spelling through `#[serde(alias)]`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which price list to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceListType {
    #[serde(rename = "prepaid")]
    Prepaid,
    #[serde(rename = "pasca")]
    Postpaid,
}

impl PriceListType {
    /// Wire literal; also the signature salt.
    pub fn as_str(self) -> &'static str {
        match self {
            PriceListType::Prepaid => "prepaid",
            PriceListType::Postpaid => "pasca",
        }
    }
}

impl fmt::Display for PriceListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction sub-command. No command means an ordinary prepaid purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Look up an outstanding postpaid bill.
    #[serde(rename = "inquiry-pasca")]
    InquiryPostpaid,
    /// Pay a previously inquired postpaid bill.
    #[serde(rename = "payment-pasca")]
    PayPostpaid,
    /// Check the status of a postpaid payment.
    ///
    /// Never send this for a transaction submitted more than 90 days ago: the
    /// remote treats it as a new transaction and bills again.
    #[serde(rename = "status-pasca")]
    StatusPostpaid,
    /// PLN (electricity) subscriber lookup.
    #[serde(rename = "pln-subscribe")]
    PlnSubscribe,
}

impl Command {
    pub const ALL: [Command; 4] = [
        Command::InquiryPostpaid,
        Command::PayPostpaid,
        Command::StatusPostpaid,
        Command::PlnSubscribe,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Command::InquiryPostpaid => "inquiry-pasca",
            Command::PayPostpaid => "payment-pasca",
            Command::StatusPostpaid => "status-pasca",
            Command::PlnSubscribe => "pln-subscribe",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known `Command`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown command: {}", self.0)
    }
}

impl std::error::Error for UnknownCommand {}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

/// Deposit (top-up) request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositRequest {
    pub amount: i64,
    pub bank: String,
    /// Name on the sending bank account.
    pub name: String,
}

impl DepositRequest {
    pub fn new(amount: i64, bank: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            amount,
            bank: bank.into(),
            name: name.into(),
        }
    }
}

/// Transaction submission.
///
/// Optional fields are only sent when they carry a non-default value:
/// `maximum_price` when non-zero, `callback_url` when non-empty, `allow_dot`
/// when `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub sku: String,
    pub customer_number: String,
    pub reference_id: String,
    pub command: Option<Command>,
    pub testing: bool,
    pub message: String,
    pub maximum_price: Option<i64>,
    pub callback_url: Option<String>,
    pub allow_dot: Option<bool>,
    /// Age of the original submission, when known. Local only, never sent.
    pub submitted_ago: Option<Duration>,
}

impl TransactionRequest {
    pub fn new(
        sku: impl Into<String>,
        customer_number: impl Into<String>,
        reference_id: impl Into<String>,
    ) -> Self {
        Self {
            sku: sku.into(),
            customer_number: customer_number.into(),
            reference_id: reference_id.into(),
            command: None,
            testing: false,
            message: String::new(),
            maximum_price: None,
            callback_url: None,
            allow_dot: None,
            submitted_ago: None,
        }
    }

    /// Same as `new` with a random UUID v4 reference id.
    pub fn with_generated_reference(sku: impl Into<String>, customer_number: impl Into<String>) -> Self {
        Self::new(sku, customer_number, Uuid::new_v4().to_string())
    }

    pub fn command(mut self, command: Command) -> Self {
        self.command = Some(command);
        self
    }

    /// Set the command from its wire name. Unrecognised names leave the
    /// command unset.
    pub fn command_str(mut self, command: &str) -> Self {
        self.command = command.parse().ok();
        self
    }

    pub fn testing(mut self, testing: bool) -> Self {
        self.testing = testing;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn maximum_price(mut self, price: i64) -> Self {
        self.maximum_price = Some(price);
        self
    }

    pub fn callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    pub fn allow_dot(mut self, allow: bool) -> Self {
        self.allow_dot = Some(allow);
        self
    }

    pub fn submitted_ago(mut self, age: Duration) -> Self {
        self.submitted_ago = Some(age);
        self
    }
}

/// Every successful response is wrapped in a `data` object.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    #[serde(alias = "deposit")]
    pub balance: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepaidProduct {
    #[serde(alias = "product_name")]
    pub product_name: String,
    pub category: String,
    pub brand: String,
    #[serde(rename = "type")]
    pub product_type: String,
    #[serde(alias = "seller_name")]
    pub seller_name: String,
    pub price: i64,
    #[serde(alias = "buyer_sku_code")]
    pub buyer_sku_code: String,
    #[serde(alias = "buyer_product_status")]
    pub buyer_product_status: bool,
    #[serde(alias = "seller_product_status")]
    pub seller_product_status: bool,
    #[serde(alias = "unlimited_stock")]
    pub unlimited_stock: bool,
    #[serde(default)]
    pub stock: i64,
    pub multi: bool,
    #[serde(alias = "start_cut_off")]
    pub start_cut_off: String,
    #[serde(alias = "end_cut_off")]
    pub end_cut_off: String,
    #[serde(alias = "desc", default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostpaidProduct {
    #[serde(alias = "product_name")]
    pub product_name: String,
    pub category: String,
    pub brand: String,
    #[serde(alias = "seller_name")]
    pub seller_name: String,
    pub admin: i64,
    pub commission: i64,
    #[serde(alias = "buyer_sku_code")]
    pub buyer_sku_code: String,
    #[serde(alias = "buyer_product_status")]
    pub buyer_product_status: bool,
    #[serde(alias = "seller_product_status")]
    pub seller_product_status: bool,
    #[serde(alias = "desc", default)]
    pub description: String,
}

/// One price-list row. The variant follows the `PriceListType` that was
/// requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceEntry {
    Prepaid(PrepaidProduct),
    Postpaid(PostpaidProduct),
}

impl PriceEntry {
    pub fn buyer_sku_code(&self) -> &str {
        match self {
            PriceEntry::Prepaid(p) => &p.buyer_sku_code,
            PriceEntry::Postpaid(p) => &p.buyer_sku_code,
        }
    }

    pub fn product_name(&self) -> &str {
        match self {
            PriceEntry::Prepaid(p) => &p.product_name,
            PriceEntry::Postpaid(p) => &p.product_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositReceipt {
    #[serde(alias = "rc")]
    pub return_code: String,
    pub amount: i64,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    #[serde(alias = "ref_id")]
    pub reference_id: String,
    #[serde(alias = "customer_no")]
    pub customer_number: String,
    #[serde(alias = "buyer_sku_code")]
    pub buyer_sku_code: String,
    #[serde(default)]
    pub message: String,
    pub status: String,
    #[serde(alias = "rc")]
    pub return_code: String,
    #[serde(alias = "sn", default)]
    pub serial_number: String,
    #[serde(alias = "buyer_last_saldo", default)]
    pub buyer_last_balance: i64,
    #[serde(default)]
    pub price: i64,
    #[serde(alias = "tele", default)]
    pub telegram: String,
    #[serde(alias = "wa", default)]
    pub whatsapp: String,
}

impl TransactionResult {
    /// `rc` `00`: the transaction completed.
    pub fn is_success(&self) -> bool {
        self.return_code == "00"
    }

    /// `rc` `03`: accepted, final status arrives later.
    pub fn is_pending(&self) -> bool {
        self.return_code == "03"
    }
}
