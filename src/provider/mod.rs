mod http;
mod rpc;
mod vault;
mod wallet;

pub use http::{YapsEntry, HTTP};
pub use rpc::{Rpc, TransactionReceipt, TxRequest};
pub use vault::{LiquidationStatus, Vault, VaultLiquidity};
pub use wallet::{AddChainParams, Wallet, WalletStatus};
