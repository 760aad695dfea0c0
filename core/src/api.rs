//! One-call operations: build, sign, send and classify.

use tracing::debug;

use crate::client::DigiflazzClient;
use crate::config::Credentials;
use crate::error::Result;
use crate::http::Transport;
use crate::types::{
    Balance, DepositReceipt, DepositRequest, PriceEntry, PriceListType, TransactionRequest,
    TransactionResult,
};

#[cfg(feature = "ureq")]
use crate::http::UreqTransport;

/// A `DigiflazzClient` bound to a `Transport`. Each method issues exactly one
/// request.
#[derive(Debug, Clone)]
pub struct Digiflazz<T> {
    client: DigiflazzClient,
    transport: T,
}

#[cfg(feature = "ureq")]
impl Digiflazz<UreqTransport> {
    /// Client for the production endpoint over a blocking ureq agent.
    pub fn new(credentials: Credentials) -> Self {
        Self::with_transport(DigiflazzClient::new(credentials), UreqTransport::new())
    }
}

impl<T: Transport> Digiflazz<T> {
    pub fn with_transport(client: DigiflazzClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &DigiflazzClient {
        &self.client
    }

    pub fn check_balance(&self) -> Result<Balance> {
        debug!(operation = "check_balance", "sending request");
        let response = self.transport.execute(&self.client.build_check_balance()?)?;
        self.client.parse_check_balance(response)
    }

    pub fn price_list(&self, list_type: PriceListType) -> Result<Vec<PriceEntry>> {
        debug!(operation = "price_list", %list_type, "sending request");
        let response = self
            .transport
            .execute(&self.client.build_price_list(list_type)?)?;
        self.client.parse_price_list(list_type, response)
    }

    pub fn deposit(&self, input: &DepositRequest) -> Result<DepositReceipt> {
        debug!(operation = "deposit", amount = input.amount, bank = %input.bank, "sending request");
        let response = self.transport.execute(&self.client.build_deposit(input)?)?;
        self.client.parse_deposit(response)
    }

    /// Submit a transaction. A `status-pasca` check must not be sent for a
    /// transaction older than 90 days; it is only refused locally when
    /// `TransactionRequest::submitted_ago` is set.
    pub fn transaction(&self, input: &TransactionRequest) -> Result<TransactionResult> {
        debug!(
            operation = "transaction",
            reference_id = %input.reference_id,
            sku = %input.sku,
            command = ?input.command,
            "sending request"
        );
        let response = self.transport.execute(&self.client.build_transaction(input)?)?;
        self.client.parse_transaction(response)
    }
}
