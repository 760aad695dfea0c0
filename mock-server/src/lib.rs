//! In-memory emulation of the Digiflazz v1 API.
//!
//! Recomputes `md5(username ‖ key ‖ salt)` for every request and answers in
//! the remote's snake_case shape wrapped in `{"data": ...}`. Errors use HTTP
//! 400 with an `rc` code and a message, as the remote does.

use std::{collections::HashMap, sync::Arc};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const STARTING_BALANCE: i64 = 1_000_000;
pub const INQUIRY_BILL_AMOUNT: i64 = 100_000;

/// The single account this server accepts.
#[derive(Clone, Debug)]
pub struct Account {
    pub username: String,
    pub key: String,
}

impl Account {
    pub fn new(username: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            key: key.into(),
        }
    }

    fn verify(&self, username: &str, salt: &str, sign: &str) -> bool {
        username == self.username && sign == md5_hex(&format!("{}{}{salt}", self.username, self.key))
    }
}

fn md5_hex(material: &str) -> String {
    hex::encode(Md5::digest(material.as_bytes()))
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionRecord {
    pub ref_id: String,
    pub customer_no: String,
    pub buyer_sku_code: String,
    pub message: String,
    pub status: String,
    pub rc: String,
    pub sn: String,
    pub buyer_last_saldo: i64,
    pub price: i64,
    pub tele: String,
    pub wa: String,
}

#[derive(Debug)]
pub struct Ledger {
    pub balance: i64,
    pub transactions: HashMap<String, TransactionRecord>,
}

pub type Db = Arc<RwLock<Ledger>>;

#[derive(Clone)]
pub struct AppState {
    account: Arc<Account>,
    db: Db,
}

struct Prepaid {
    sku: &'static str,
    name: &'static str,
    category: &'static str,
    brand: &'static str,
    price: i64,
}

struct Postpaid {
    sku: &'static str,
    name: &'static str,
    brand: &'static str,
    admin: i64,
    commission: i64,
}

const PREPAID: &[Prepaid] = &[
    Prepaid { sku: "xld10", name: "XL 10.000", category: "Pulsa", brand: "XL", price: 10_100 },
    Prepaid { sku: "tsel5", name: "Telkomsel 5.000", category: "Pulsa", brand: "TELKOMSEL", price: 5_600 },
    Prepaid { sku: "pln20", name: "PLN 20.000", category: "PLN", brand: "PLN", price: 20_200 },
];

const POSTPAID: &[Postpaid] = &[
    Postpaid { sku: "pln", name: "PLN Pascabayar", brand: "PLN", admin: 2_500, commission: 1_000 },
    Postpaid { sku: "bpjs", name: "BPJS Kesehatan", brand: "BPJS", admin: 2_500, commission: 800 },
];

pub fn app(account: Account) -> Router {
    app_with_balance(account, STARTING_BALANCE)
}

pub fn app_with_balance(account: Account, balance: i64) -> Router {
    let state = AppState {
        account: Arc::new(account),
        db: Arc::new(RwLock::new(Ledger {
            balance,
            transactions: HashMap::new(),
        })),
    };
    Router::new()
        .route("/cek-saldo", post(check_balance))
        .route("/price-list", post(price_list))
        .route("/deposit", post(deposit))
        .route("/transaction", post(transaction))
        .with_state(state)
}

pub async fn run(listener: TcpListener, account: Account) -> Result<(), std::io::Error> {
    info!(addr = ?listener.local_addr().ok(), "mock digiflazz listening");
    axum::serve(listener, app(account)).await
}

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

fn reject(rc: &str, message: &str) -> (StatusCode, Json<Value>) {
    debug!(rc, message, "rejecting request");
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "data": { "rc": rc, "message": message } })),
    )
}

fn bad_signature() -> (StatusCode, Json<Value>) {
    reject("41", "Signature Anda salah")
}

#[derive(Deserialize)]
pub struct CommandRequest {
    pub username: String,
    pub cmd: String,
    pub sign: String,
}

async fn check_balance(State(state): State<AppState>, Json(input): Json<CommandRequest>) -> ApiResult {
    if !state.account.verify(&input.username, "depo", &input.sign) {
        return Err(bad_signature());
    }
    if input.cmd != "deposit" {
        return Err(reject("40", "Payload Error"));
    }
    let balance = state.db.read().await.balance;
    Ok(Json(json!({ "data": { "deposit": balance } })))
}

async fn price_list(State(state): State<AppState>, Json(input): Json<CommandRequest>) -> ApiResult {
    if !state.account.verify(&input.username, &input.cmd, &input.sign) {
        return Err(bad_signature());
    }
    let rows: Vec<Value> = match input.cmd.as_str() {
        "prepaid" => PREPAID
            .iter()
            .map(|p| {
                json!({
                    "product_name": p.name,
                    "category": p.category,
                    "brand": p.brand,
                    "type": "Umum",
                    "seller_name": "Mock Seller",
                    "price": p.price,
                    "buyer_sku_code": p.sku,
                    "buyer_product_status": true,
                    "seller_product_status": true,
                    "unlimited_stock": true,
                    "stock": 0,
                    "multi": true,
                    "start_cut_off": "23:45",
                    "end_cut_off": "00:15",
                    "desc": "-"
                })
            })
            .collect(),
        "pasca" => POSTPAID
            .iter()
            .map(|p| {
                json!({
                    "product_name": p.name,
                    "category": "Pascabayar",
                    "brand": p.brand,
                    "seller_name": "Mock Seller",
                    "admin": p.admin,
                    "commission": p.commission,
                    "buyer_sku_code": p.sku,
                    "buyer_product_status": true,
                    "seller_product_status": true,
                    "desc": "-"
                })
            })
            .collect(),
        _ => return Err(reject("40", "Payload Error")),
    };
    Ok(Json(json!({ "data": rows })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    pub username: String,
    pub amount: i64,
    pub bank: String,
    pub owner_name: String,
    pub sign: String,
}

async fn deposit(State(state): State<AppState>, Json(input): Json<DepositRequest>) -> ApiResult {
    if !state.account.verify(&input.username, "deposit", &input.sign) {
        return Err(bad_signature());
    }
    if input.amount <= 0 || input.bank.is_empty() || input.owner_name.is_empty() {
        return Err(reject("40", "Payload Error"));
    }
    Ok(Json(json!({
        "data": {
            "rc": "00",
            "amount": input.amount,
            "notes": format!("Transfer dari {} a.n. {}", input.bank, input.owner_name)
        }
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub username: String,
    pub buyer_sku_code: String,
    pub customer_number: String,
    pub reference_id: String,
    #[serde(default)]
    pub testing: bool,
    #[serde(default)]
    pub message: String,
    pub command: Option<String>,
    pub maximum_price: Option<i64>,
    pub callback_url: Option<String>,
    pub allow_dot: Option<bool>,
    pub sign: String,
}

async fn transaction(State(state): State<AppState>, Json(input): Json<TransactionRequest>) -> ApiResult {
    if !state.account.verify(&input.username, &input.reference_id, &input.sign) {
        return Err(bad_signature());
    }

    let mut ledger = state.db.write().await;

    if let Some(existing) = ledger.transactions.get(&input.reference_id) {
        return Ok(Json(json!({ "data": existing })));
    }
    if input.command.as_deref() == Some("status-pasca") {
        return Err(reject("43", "Transaksi tidak ditemukan"));
    }

    let (price, charge) = match input.command.as_deref() {
        None => {
            let product = PREPAID
                .iter()
                .find(|p| p.sku == input.buyer_sku_code)
                .ok_or_else(|| reject("44", "SKU Tidak di Temukan"))?;
            (product.price, true)
        }
        Some(cmd @ ("inquiry-pasca" | "payment-pasca")) => {
            let product = POSTPAID
                .iter()
                .find(|p| p.sku == input.buyer_sku_code)
                .ok_or_else(|| reject("44", "SKU Tidak di Temukan"))?;
            (
                INQUIRY_BILL_AMOUNT + product.admin - product.commission,
                cmd == "payment-pasca",
            )
        }
        Some("pln-subscribe") => (0, false),
        Some(_) => return Err(reject("40", "Payload Error")),
    };

    if let Some(max) = input.maximum_price {
        if price > max {
            return Err(reject("49", "Harga melebihi harga maksimum"));
        }
    }

    let charge = charge && !input.testing;
    if charge && ledger.balance < price {
        return Err(reject("43", "Saldo tidak cukup"));
    }
    if charge {
        ledger.balance -= price;
    }

    let record = TransactionRecord {
        ref_id: input.reference_id.clone(),
        customer_no: input.customer_number,
        buyer_sku_code: input.buyer_sku_code,
        message: "Transaksi Sukses".to_string(),
        status: "Sukses".to_string(),
        rc: "00".to_string(),
        sn: if input.testing {
            "TEST".to_string()
        } else {
            Uuid::new_v4().simple().to_string()
        },
        buyer_last_saldo: ledger.balance,
        price,
        tele: "@digiflazz".to_string(),
        wa: "081200000000".to_string(),
    };
    // Inquiries are lookups; only recorded transactions are replayable.
    if input.command.as_deref() != Some("inquiry-pasca") {
        ledger
            .transactions
            .insert(input.reference_id, record.clone());
    }
    debug!(ref_id = %record.ref_id, price, charged = charge, "transaction accepted");
    Ok(Json(json!({ "data": record })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_matching_signature() {
        let account = Account::new("user1", "key1");
        assert!(account.verify("user1", "depo", "af162411e54244ce2f8b3103c45e9b1f"));
    }

    #[test]
    fn verify_rejects_wrong_username() {
        let account = Account::new("user1", "key1");
        assert!(!account.verify("user2", "depo", "af162411e54244ce2f8b3103c45e9b1f"));
    }

    #[test]
    fn transaction_record_serializes_snake_case() {
        let record = TransactionRecord {
            ref_id: "r".into(),
            customer_no: "c".into(),
            buyer_sku_code: "s".into(),
            message: "m".into(),
            status: "Sukses".into(),
            rc: "00".into(),
            sn: "sn".into(),
            buyer_last_saldo: 1,
            price: 2,
            tele: "t".into(),
            wa: "w".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["ref_id"], "r");
        assert_eq!(json["buyer_last_saldo"], 1);
    }

    #[test]
    fn transaction_request_optionals_default_to_none() {
        let input: TransactionRequest = serde_json::from_str(
            r#"{"username":"u","buyerSkuCode":"xld10","customerNumber":"0812",
                "referenceId":"r","sign":"s"}"#,
        )
        .unwrap();
        assert!(input.command.is_none());
        assert!(input.maximum_price.is_none());
        assert!(!input.testing);
    }
}
