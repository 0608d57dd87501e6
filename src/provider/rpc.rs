use std::{str::FromStr, time::Duration};

use alloy_primitives::{hex, Address, B256, U256};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::Error;

/// EVM JSON-RPC client over a plain HTTP transport. Only the handful
/// of methods the dashboard needs; the connected node or wallet does
/// the signing.
#[derive(Debug, Clone)]
pub struct Rpc {
    client: reqwest::Client,
    host: String,
    receipt_poll_interval: Duration,
    receipt_poll_max_attempts: u32,
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u32,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// Transaction fields for `eth_sendTransaction`. Serialized with the
/// hex conventions the wire expects; `value` and `data` are omitted
/// when absent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxRequest {
    pub from: Address,
    pub to: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    pub block_number: Option<String>,
    pub status: Option<String>,
}

impl TransactionReceipt {
    pub fn succeeded(&self) -> bool {
        matches!(self.status.as_deref(), Some("0x1"))
    }
}

impl Rpc {
    pub fn new(
        host: String,
        receipt_poll_interval_ms: u64,
        receipt_poll_max_attempts: u32,
    ) -> Self {
        Rpc {
            client: reqwest::Client::new(),
            host,
            receipt_poll_interval: Duration::from_millis(
                receipt_poll_interval_ms,
            ),
            receipt_poll_max_attempts,
        }
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, Error> {
        let body = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };
        debug!("rpc {} -> {}", method, &self.host);

        let response = self
            .client
            .post(&self.host)
            .json(&body)
            .send()
            .await?
            .json::<RpcResponse>()
            .await?;

        if let Some(error) = response.error {
            return Err(Error::RpcError(format!(
                "{} failed ({}): {}",
                method, error.code, error.message
            )));
        }

        response.result.ok_or_else(|| {
            Error::RpcError(format!("{}: empty result", method))
        })
    }

    async fn call_string(
        &self,
        method: &str,
        params: Value,
    ) -> Result<String, Error> {
        let value = self.call(method, params).await?;
        value.as_str().map(|s| s.to_owned()).ok_or_else(|| {
            Error::RpcError(format!("{}: non-string result", method))
        })
    }

    /// Accounts the connected node or wallet exposes for signing.
    pub async fn accounts(&self) -> Result<Vec<Address>, Error> {
        let value = self.call("eth_accounts", json!([])).await?;
        parse_address_list(&value)
    }

    pub async fn chain_id(&self) -> Result<u64, Error> {
        let hex_id = self.call_string("eth_chainId", json!([])).await?;
        parse_hex_u64(&hex_id)
    }

    pub async fn get_balance(&self, address: Address) -> Result<U256, Error> {
        let hex_balance = self
            .call_string("eth_getBalance", json!([address, "latest"]))
            .await?;
        parse_hex_u256(&hex_balance)
    }

    /// Read-only contract call; `data` is the ABI-encoded calldata.
    pub async fn eth_call(
        &self,
        to: Address,
        data: &[u8],
    ) -> Result<Vec<u8>, Error> {
        let call = json!([
            { "to": to, "data": format!("0x{}", hex::encode(data)) },
            "latest"
        ]);
        let result = self.call_string("eth_call", call).await?;
        Ok(hex::decode(result.trim_start_matches("0x"))?)
    }

    pub async fn send_transaction(
        &self,
        tx: &TxRequest,
    ) -> Result<B256, Error> {
        let hash = self
            .call_string("eth_sendTransaction", json!([tx]))
            .await?;
        hash.parse().map_err(|_| {
            Error::RpcError(format!("malformed tx hash: {}", hash))
        })
    }

    pub async fn get_transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<TransactionReceipt>, Error> {
        let value = self
            .call("eth_getTransactionReceipt", json!([hash]))
            .await?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    /// Poll until the transaction is mined. State-changing flows must
    /// go through this before any dependent read.
    pub async fn wait_for_receipt(
        &self,
        hash: B256,
    ) -> Result<TransactionReceipt, Error> {
        for _ in 0..self.receipt_poll_max_attempts {
            if let Some(receipt) = self.get_transaction_receipt(hash).await? {
                if !receipt.succeeded() {
                    return Err(Error::ContractCall(format!(
                        "transaction {} reverted",
                        hash
                    )));
                }
                return Ok(receipt);
            }
            tokio::time::sleep(self.receipt_poll_interval).await;
        }
        Err(Error::RpcError(format!(
            "transaction {} not mined after {} attempts",
            hash, self.receipt_poll_max_attempts
        )))
    }
}

fn parse_address_list(value: &Value) -> Result<Vec<Address>, Error> {
    let items = value.as_array().ok_or_else(|| {
        Error::RpcError(String::from("eth_accounts: non-array result"))
    })?;

    let mut addresses = Vec::with_capacity(items.len());
    for item in items {
        let account = item.as_str().ok_or_else(|| {
            Error::RpcError(format!("malformed account entry: {}", item))
        })?;
        addresses.push(Address::from_str(account)?);
    }
    Ok(addresses)
}

fn parse_hex_u64(value: &str) -> Result<u64, Error> {
    u64::from_str_radix(value.trim_start_matches("0x"), 16)
        .map_err(Error::from)
}

fn parse_hex_u256(value: &str) -> Result<U256, Error> {
    U256::from_str_radix(value.trim_start_matches("0x"), 16)
        .map_err(|e| Error::RpcError(format!("bad quantity {}: {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_quantities() {
        assert_eq!(parse_hex_u64("0x279f").unwrap(), 10143);
        assert_eq!(parse_hex_u256("0x0").unwrap(), U256::ZERO);
        assert_eq!(
            parse_hex_u256("0xde0b6b3a7640000").unwrap(),
            U256::from(10_u64.pow(18))
        );
        assert!(parse_hex_u64("0xzz").is_err());
    }

    #[test]
    fn test_parse_address_list() {
        let value = json!([
            "0x91DcF137f42130E5095558Ee1D143F0282B114B0",
            "0xe4784dde2ed5abCE7Ca896e862aE7ce11C16e857"
        ]);
        let accounts = parse_address_list(&value).unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(
            accounts[0].to_checksum(None),
            "0x91DcF137f42130E5095558Ee1D143F0282B114B0"
        );

        assert!(parse_address_list(&json!("0xabc")).is_err());
        assert!(parse_address_list(&json!(["not-an-address"])).is_err());
    }

    #[test]
    fn test_tx_request_serialization() {
        let tx = TxRequest {
            from: Address::ZERO,
            to: Address::ZERO,
            value: None,
            data: Some("0xdeadbeef".to_owned()),
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert!(json.get("value").is_none());
        assert_eq!(json["data"], "0xdeadbeef");
    }

    #[test]
    fn test_receipt_status() {
        let ok = TransactionReceipt {
            transaction_hash: B256::ZERO,
            block_number: Some("0x1".to_owned()),
            status: Some("0x1".to_owned()),
        };
        let reverted = TransactionReceipt {
            status: Some("0x0".to_owned()),
            ..ok.clone()
        };
        assert!(ok.succeeded());
        assert!(!reverted.succeeded());
    }
}
