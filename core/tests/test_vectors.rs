//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences. Signatures in the vectors
//! are MD5 digests computed independently of this crate.

use digiflazz_core::{
    ApiError, Balance, Credentials, DepositReceipt, DepositRequest, DigiflazzClient, HttpRequest,
    HttpResponse, PostpaidProduct, PrepaidProduct, PriceEntry, PriceListType, TransactionRequest,
    TransactionResult,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";

fn client(vectors: &Value) -> DigiflazzClient {
    let creds = &vectors["credentials"];
    DigiflazzClient::new(
        Credentials::new(
            creds["username"].as_str().unwrap(),
            creds["key"].as_str().unwrap(),
        )
        .unwrap(),
    )
    .with_base_url(BASE_URL)
}

fn assert_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.url, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: url");
    assert_eq!(
        req.headers,
        vec![("content-type".to_string(), "application/json".to_string())],
        "{name}: headers"
    );
    let body: Value = serde_json::from_str(&req.body).unwrap();
    assert_eq!(body, expected["body"], "{name}: body");
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

fn parse_list_type(s: &str) -> PriceListType {
    match s {
        "prepaid" => PriceListType::Prepaid,
        "pasca" => PriceListType::Postpaid,
        other => panic!("unknown list type: {other}"),
    }
}

fn transaction_input(input: &Value) -> TransactionRequest {
    let mut req = TransactionRequest::new(
        input["sku"].as_str().unwrap(),
        input["customer_number"].as_str().unwrap(),
        input["reference_id"].as_str().unwrap(),
    )
    .testing(input["testing"].as_bool().unwrap())
    .message(input["message"].as_str().unwrap());
    if let Some(command) = input["command"].as_str() {
        req = req.command_str(command);
    }
    if let Some(price) = input["maximum_price"].as_i64() {
        req = req.maximum_price(price);
    }
    if let Some(url) = input["callback_url"].as_str() {
        req = req.callback_url(url);
    }
    if let Some(allow) = input["allow_dot"].as_bool() {
        req = req.allow_dot(allow);
    }
    req
}

// ---------------------------------------------------------------------------
// Balance
// ---------------------------------------------------------------------------

#[test]
fn check_balance_test_vectors() {
    let vectors: Value = serde_json::from_str(include_str!("../../test-vectors/check_balance.json")).unwrap();
    let c = client(&vectors);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        assert_request(name, &c.build_check_balance().unwrap(), &case["expected_request"]);

        let balance = c.parse_check_balance(simulated(case)).unwrap();
        let expected: Balance = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(balance, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Price list
// ---------------------------------------------------------------------------

#[test]
fn price_list_test_vectors() {
    let vectors: Value = serde_json::from_str(include_str!("../../test-vectors/price_list.json")).unwrap();
    let c = client(&vectors);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let list_type = parse_list_type(case["list_type"].as_str().unwrap());
        assert_request(name, &c.build_price_list(list_type).unwrap(), &case["expected_request"]);

        let entries = c.parse_price_list(list_type, simulated(case)).unwrap();
        let expected: Vec<PriceEntry> = match list_type {
            PriceListType::Prepaid => {
                serde_json::from_value::<Vec<PrepaidProduct>>(case["expected_result"].clone())
                    .unwrap()
                    .into_iter()
                    .map(PriceEntry::Prepaid)
                    .collect()
            }
            PriceListType::Postpaid => {
                serde_json::from_value::<Vec<PostpaidProduct>>(case["expected_result"].clone())
                    .unwrap()
                    .into_iter()
                    .map(PriceEntry::Postpaid)
                    .collect()
            }
        };
        assert_eq!(entries, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Deposit
// ---------------------------------------------------------------------------

#[test]
fn deposit_test_vectors() {
    let vectors: Value = serde_json::from_str(include_str!("../../test-vectors/deposit.json")).unwrap();
    let c = client(&vectors);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let request = DepositRequest::new(
            input["amount"].as_i64().unwrap(),
            input["bank"].as_str().unwrap(),
            input["name"].as_str().unwrap(),
        );
        assert_request(name, &c.build_deposit(&request).unwrap(), &case["expected_request"]);

        let receipt = c.parse_deposit(simulated(case)).unwrap();
        let expected: DepositReceipt = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(receipt, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

#[test]
fn transaction_test_vectors() {
    let vectors: Value = serde_json::from_str(include_str!("../../test-vectors/transaction.json")).unwrap();
    let c = client(&vectors);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let request = transaction_input(&case["input"]);
        assert_request(name, &c.build_transaction(&request).unwrap(), &case["expected_request"]);

        let result = c.parse_transaction(simulated(case)).unwrap();
        let expected: TransactionResult =
            serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(result, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Error classification
// ---------------------------------------------------------------------------

#[test]
fn error_test_vectors() {
    let vectors: Value = serde_json::from_str(include_str!("../../test-vectors/errors.json")).unwrap();
    let c = DigiflazzClient::new(Credentials::new("user1", "key1").unwrap());

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected_error"];
        let expected = ApiError::remote_rejected(
            expected["status"].as_u64().unwrap() as u16,
            expected["message"].as_str().unwrap(),
        );

        assert_eq!(c.parse_check_balance(simulated(case)).unwrap_err(), expected, "{name}: balance");
        assert_eq!(c.parse_deposit(simulated(case)).unwrap_err(), expected, "{name}: deposit");
        assert_eq!(c.parse_transaction(simulated(case)).unwrap_err(), expected, "{name}: transaction");
        assert_eq!(
            c.parse_price_list(PriceListType::Postpaid, simulated(case)).unwrap_err(),
            expected,
            "{name}: price list"
        );
    }
}
