//! Stateless request builder and response parser for the Digiflazz API.
//!
//! # Design
//! `DigiflazzClient` holds the credentials and the base URL and nothing else.
//! Each operation is split into a `build_*` method that signs and produces an
//! `HttpRequest` and a `parse_*` method that classifies an `HttpResponse`.
//! `Digiflazz` in `api` joins the two halves with a `Transport`.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Credentials;
use crate::error::{ApiError, Result};
use crate::http::{HttpRequest, HttpResponse, CONTENT_TYPE_JSON};
use crate::payload::{PayloadBuilder, SignedPayload};
use crate::sign::{BALANCE_SALT, DEPOSIT_SALT};
use crate::types::{
    Balance, Command, DepositReceipt, DepositRequest, Envelope, PostpaidProduct, PrepaidProduct,
    PriceEntry, PriceListType, TransactionRequest, TransactionResult,
};

pub const RC_SUCCESS: &str = "00";
pub const RC_PENDING: &str = "03";

pub const DEFAULT_ENDPOINT: &str = "https://api.digiflazz.com/v1";

pub const PATH_CHECK_BALANCE: &str = "/cek-saldo";
pub const PATH_PRICE_LIST: &str = "/price-list";
pub const PATH_DEPOSIT: &str = "/deposit";
pub const PATH_TRANSACTION: &str = "/transaction";

/// Past this age a `status-pasca` check is billed as a new transaction.
pub const STATUS_CHECK_MAX_AGE: Duration = Duration::from_secs(90 * 24 * 60 * 60);

/// Synchronous, stateless client for the Digiflazz API.
#[derive(Debug, Clone)]
pub struct DigiflazzClient {
    credentials: Credentials,
    base_url: String,
}

impl DigiflazzClient {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Point the client at another host, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn payload(&self) -> PayloadBuilder {
        PayloadBuilder::new(self.credentials.account_id())
    }

    pub fn check_balance_payload(&self) -> SignedPayload {
        self.payload()
            .set("cmd", "deposit")
            .finish(self.credentials.signature(BALANCE_SALT))
    }

    pub fn price_list_payload(&self, list_type: PriceListType) -> SignedPayload {
        self.payload()
            .set("cmd", list_type.as_str())
            .finish(self.credentials.signature(list_type.as_str()))
    }

    pub fn deposit_payload(&self, input: &DepositRequest) -> SignedPayload {
        self.payload()
            .set("amount", input.amount)
            .set("bank", input.bank.as_str())
            .set("ownerName", input.name.as_str())
            .finish(self.credentials.signature(DEPOSIT_SALT))
    }

    /// The signature covers only the reference id, so each reference id can
    /// be submitted once.
    pub fn transaction_payload(&self, input: &TransactionRequest) -> Result<SignedPayload> {
        check_status_age(input)?;

        let payload = self
            .payload()
            .set("buyerSkuCode", input.sku.as_str())
            .set("customerNumber", input.customer_number.as_str())
            .set("referenceId", input.reference_id.as_str())
            .set("testing", input.testing)
            .set("message", input.message.as_str())
            .set_if_present("command", input.command.map(Command::as_str))
            .set_if_present("maximumPrice", input.maximum_price.filter(|p| *p != 0))
            .set_if_present(
                "callbackUrl",
                input.callback_url.as_deref().filter(|u| !u.is_empty()),
            )
            .set_if_present("allowDot", input.allow_dot.filter(|a| *a));

        Ok(payload.finish(self.credentials.signature(&input.reference_id)))
    }

    pub fn build_check_balance(&self) -> Result<HttpRequest> {
        self.request(PATH_CHECK_BALANCE, &self.check_balance_payload())
    }

    pub fn build_price_list(&self, list_type: PriceListType) -> Result<HttpRequest> {
        self.request(PATH_PRICE_LIST, &self.price_list_payload(list_type))
    }

    pub fn build_deposit(&self, input: &DepositRequest) -> Result<HttpRequest> {
        self.request(PATH_DEPOSIT, &self.deposit_payload(input))
    }

    pub fn build_transaction(&self, input: &TransactionRequest) -> Result<HttpRequest> {
        self.request(PATH_TRANSACTION, &self.transaction_payload(input)?)
    }

    pub fn parse_check_balance(&self, response: HttpResponse) -> Result<Balance> {
        parse_data(&response)
    }

    /// Rows are decoded as the shape of `list_type`, whatever the body holds.
    pub fn parse_price_list(
        &self,
        list_type: PriceListType,
        response: HttpResponse,
    ) -> Result<Vec<PriceEntry>> {
        match list_type {
            PriceListType::Prepaid => Ok(parse_data::<Vec<PrepaidProduct>>(&response)?
                .into_iter()
                .map(PriceEntry::Prepaid)
                .collect()),
            PriceListType::Postpaid => Ok(parse_data::<Vec<PostpaidProduct>>(&response)?
                .into_iter()
                .map(PriceEntry::Postpaid)
                .collect()),
        }
    }

    /// A decoded receipt whose `rc` reports a failure is `RemoteRejected`.
    pub fn parse_deposit(&self, response: HttpResponse) -> Result<DepositReceipt> {
        let receipt: DepositReceipt = parse_data(&response)?;
        check_return_code(&response, &receipt.return_code, "")?;
        Ok(receipt)
    }

    /// Pending (`rc` `03`) is a success; any other code but `00` is
    /// `RemoteRejected`.
    pub fn parse_transaction(&self, response: HttpResponse) -> Result<TransactionResult> {
        let result: TransactionResult = parse_data(&response)?;
        check_return_code(&response, &result.return_code, &result.message)?;
        Ok(result)
    }

    fn request(&self, path: &str, payload: &SignedPayload) -> Result<HttpRequest> {
        Ok(HttpRequest {
            url: format!("{}{path}", self.base_url),
            headers: vec![(CONTENT_TYPE_JSON.0.to_string(), CONTENT_TYPE_JSON.1.to_string())],
            body: payload.to_json()?,
        })
    }
}

fn check_status_age(input: &TransactionRequest) -> Result<()> {
    match (input.command, input.submitted_ago) {
        (Some(Command::StatusPostpaid), Some(age)) if age > STATUS_CHECK_MAX_AGE => {
            Err(ApiError::InvalidArgument(format!(
                "status check for {} refused: submitted {} days ago, limit is 90",
                input.reference_id,
                age.as_secs() / 86_400
            )))
        }
        _ => Ok(()),
    }
}

/// Map a response to its `data` payload or a `RemoteRejected` error.
fn parse_data<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    if !response.is_success() {
        return Err(ApiError::remote_rejected(
            response.status,
            error_message(&response.body)
                .unwrap_or_else(|| format!("request failed with status {}", response.status)),
        ));
    }
    match serde_json::from_str::<Envelope<T>>(&response.body) {
        Ok(envelope) => Ok(envelope.data),
        Err(e) => Err(ApiError::remote_rejected(
            response.status,
            error_message(&response.body)
                .unwrap_or_else(|| format!("unexpected response body: {e}")),
        )),
    }
}

fn check_return_code(response: &HttpResponse, rc: &str, message: &str) -> Result<()> {
    if rc == RC_SUCCESS || rc == RC_PENDING {
        return Ok(());
    }
    let message = if message.is_empty() {
        error_message(&response.body).unwrap_or_else(|| format!("request failed with rc {rc}"))
    } else {
        message.to_string()
    };
    Err(ApiError::remote_rejected(response.status, message))
}

/// `message` at the top level or inside `data`, when the body is JSON.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("data").and_then(|d| d.get("message")))
        .and_then(Value::as_str)
        .map(str::to_string)
}
