use alloy_primitives::Address;
use bigdecimal::BigDecimal;
use serde::Serialize;

use crate::{
    configuration::Config,
    error::Error,
    helpers::from_wei,
    provider::Rpc,
};

/// `wallet_addEthereumChain` parameters for the guided switch-or-add
/// flow when the client sits on the wrong network.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletStatus {
    pub address: String,
    pub chain_id: u64,
    pub expected_chain_id: u64,
    pub network_ok: bool,
    pub balance: BigDecimal,
    /// Present only on a mismatch, ready to hand to the wallet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_chain: Option<AddChainParams>,
}

/// Account-side bridge to the connected node/wallet. Signing stays
/// with the wallet; nothing here touches key material.
#[derive(Debug, Clone)]
pub struct Wallet {
    rpc: Rpc,
    expected_chain_id: u64,
    chain_name: String,
    rpc_host: String,
    explorer_url: String,
}

impl Wallet {
    pub fn new(rpc: Rpc, config: &Config) -> Self {
        Wallet {
            rpc,
            expected_chain_id: config.chain_id,
            chain_name: config.chain_name.to_owned(),
            rpc_host: config.rpc_host.to_owned(),
            explorer_url: config.explorer_url.to_owned(),
        }
    }

    pub fn add_chain_params(&self) -> AddChainParams {
        AddChainParams {
            chain_id: format!("0x{:x}", self.expected_chain_id),
            chain_name: self.chain_name.to_owned(),
            native_currency: NativeCurrency {
                name: String::from("MON"),
                symbol: String::from("MON"),
                decimals: 18,
            },
            rpc_urls: vec![self.rpc_host.to_owned()],
            block_explorer_urls: vec![self.explorer_url.to_owned()],
        }
    }

    /// Accounts the connected node/wallet is willing to sign for.
    pub async fn accounts(&self) -> Result<Vec<Address>, Error> {
        self.rpc.accounts().await
    }

    pub async fn status(
        &self,
        address: Address,
    ) -> Result<WalletStatus, Error> {
        let chain_id = self.rpc.chain_id().await?;
        let balance = from_wei(self.rpc.get_balance(address).await?)?;
        let network_ok = chain_id == self.expected_chain_id;

        Ok(WalletStatus {
            address: address.to_checksum(None),
            chain_id,
            expected_chain_id: self.expected_chain_id,
            network_ok,
            balance,
            add_chain: (!network_ok).then(|| self.add_chain_params()),
        })
    }

    /// Trade actions require the right chain; a mismatch is an error
    /// for the caller to resolve through the add-chain flow.
    pub async fn ensure_chain(&self) -> Result<(), Error> {
        let actual = self.rpc.chain_id().await?;
        if actual != self.expected_chain_id {
            return Err(Error::ChainMismatch {
                expected: self.expected_chain_id,
                actual,
            });
        }
        Ok(())
    }
}
