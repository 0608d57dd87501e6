use std::str::FromStr;

use alloy_primitives::{hex, Address, U256};
use alloy_sol_types::{sol, SolCall};
use bigdecimal::BigDecimal;
use chrono::DateTime;
use tracing::debug;

use crate::{
    error::Error,
    helpers::{from_wei, to_wei},
    metrics::Direction,
    model::Position,
    provider::{Rpc, TxRequest},
};

sol! {
    struct PositionData {
        uint256 id;
        address trader;
        string influencerId;
        bool isLong;
        uint256 entryPrice;
        uint256 collateral;
        bool isOpen;
        uint256 timestamp;
        uint256 lastFundingTime;
    }

    function addLiquidity() payable;
    function removeLiquidity(uint256 _amount);
    function openPosition(string _influencerId, bool _isLong) payable;
    function closePosition(uint256 _positionId);
    function checkLiquidation(uint256 _positionId)
        returns (bool isLiquidatable, int256 currentPnL);
    function totalLiquidity() returns (uint256);
    function lpBalances(address account) returns (uint256);
    function nextPositionId() returns (uint256);
    function getPosition(uint256 _positionId) returns (PositionData data);
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultLiquidity {
    pub total_liquidity: BigDecimal,
    pub lp_balance: Option<BigDecimal>,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidationStatus {
    pub liquidatable: bool,
    pub current_pnl: BigDecimal,
}

/// Call wrapper around the perps vault contract. The contract is a
/// black box: it prices entries itself at open time and exposes no
/// per-position leverage, so positions read back with leverage 1.
#[derive(Debug, Clone)]
pub struct Vault {
    rpc: Rpc,
    address: Address,
}

impl Vault {
    pub fn new(rpc: Rpc, address: Address) -> Self {
        Vault { rpc, address }
    }

    async fn read<C: SolCall>(&self, call: C) -> Result<C::Return, Error> {
        let data = self.rpc.eth_call(self.address, &call.abi_encode()).await?;
        Ok(C::abi_decode_returns(&data, true)?)
    }

    async fn write(
        &self,
        from: Address,
        calldata: Vec<u8>,
        value: Option<U256>,
    ) -> Result<alloy_primitives::B256, Error> {
        let tx = TxRequest {
            from,
            to: self.address,
            value,
            data: Some(format!("0x{}", hex::encode(calldata))),
        };
        let hash = self.rpc.send_transaction(&tx).await?;
        // dependent reads must see the mined state
        self.rpc.wait_for_receipt(hash).await?;
        Ok(hash)
    }

    pub async fn next_position_id(&self) -> Result<u64, Error> {
        let next = self.read(nextPositionIdCall {}).await?._0;
        Ok(next.to_string().parse()?)
    }

    pub async fn get_position(&self, id: u64) -> Result<Position, Error> {
        let data = self
            .read(getPositionCall {
                _positionId: U256::from(id),
            })
            .await?
            .data;

        if data.trader == Address::ZERO {
            return Err(Error::PositionNotFound(id));
        }

        let direction = if data.isLong {
            Direction::Long
        } else {
            Direction::Short
        };
        let opened_at = data
            .timestamp
            .to_string()
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0));

        Ok(Position {
            id: data.id.to_string().parse()?,
            trader: data.trader.to_checksum(None),
            yapper_handle: data.influencerId,
            direction,
            collateral: from_wei(data.collateral)?,
            leverage: 1.0,
            entry_price: data.entryPrice.to_string().parse()?,
            open: data.isOpen,
            opened_at,
        })
    }

    /// Enumerate a trader's positions by scanning all ids below
    /// `nextPositionId`. The contract keeps no per-trader index, so
    /// this is linear in every position ever opened.
    pub async fn positions_for(
        &self,
        trader: Address,
        open_only: Option<bool>,
    ) -> Result<Vec<Position>, Error> {
        let next = self.next_position_id().await?;
        let trader = trader.to_checksum(None).to_lowercase();
        let mut positions = Vec::new();

        for id in 1..next {
            let position = match self.get_position(id).await {
                Ok(p) => p,
                Err(Error::PositionNotFound(_)) => continue,
                Err(e) => {
                    debug!("skipping position {}: {}", id, e);
                    continue;
                },
            };
            if position.trader.to_lowercase() != trader {
                continue;
            }
            if let Some(open) = open_only {
                if position.open != open {
                    continue;
                }
            }
            positions.push(position);
        }

        Ok(positions)
    }

    pub async fn total_liquidity(&self) -> Result<BigDecimal, Error> {
        let raw = self.read(totalLiquidityCall {}).await?._0;
        from_wei(raw)
    }

    pub async fn lp_balance(
        &self,
        account: Address,
    ) -> Result<BigDecimal, Error> {
        let raw = self.read(lpBalancesCall { account }).await?._0;
        from_wei(raw)
    }

    pub async fn check_liquidation(
        &self,
        id: u64,
    ) -> Result<LiquidationStatus, Error> {
        let status = self
            .read(checkLiquidationCall {
                _positionId: U256::from(id),
            })
            .await?;
        let raw = BigDecimal::from_str(&status.currentPnL.to_string())?;
        let current_pnl =
            raw / BigDecimal::from(10_u64.pow(crate::helpers::NATIVE_DECIMALS as u32));

        Ok(LiquidationStatus {
            liquidatable: status.isLiquidatable,
            current_pnl,
        })
    }

    /// Open a position with native collateral. Returns the id the
    /// contract assigned, read back after the receipt lands.
    pub async fn open_position(
        &self,
        from: Address,
        yapper_handle: String,
        direction: Direction,
        collateral: &BigDecimal,
    ) -> Result<u64, Error> {
        let call = openPositionCall {
            _influencerId: yapper_handle,
            _isLong: direction.is_long(),
        };
        let value = to_wei(collateral)?;
        self.write(from, call.abi_encode(), Some(value)).await?;

        let next = self.next_position_id().await?;
        Ok(next.saturating_sub(1))
    }

    pub async fn close_position(
        &self,
        from: Address,
        id: u64,
    ) -> Result<(), Error> {
        let call = closePositionCall {
            _positionId: U256::from(id),
        };
        self.write(from, call.abi_encode(), None).await?;
        Ok(())
    }

    pub async fn add_liquidity(
        &self,
        from: Address,
        amount: &BigDecimal,
    ) -> Result<(), Error> {
        let value = to_wei(amount)?;
        self.write(from, addLiquidityCall {}.abi_encode(), Some(value))
            .await?;
        Ok(())
    }

    pub async fn remove_liquidity(
        &self,
        from: Address,
        amount: &BigDecimal,
    ) -> Result<(), Error> {
        let call = removeLiquidityCall {
            _amount: to_wei(amount)?,
        };
        self.write(from, call.abi_encode(), None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_position_selector() {
        // openPosition(string,bool)
        let call = openPositionCall {
            _influencerId: "hosseeb".to_owned(),
            _isLong: true,
        };
        let encoded = call.abi_encode();
        assert_eq!(&encoded[..4], openPositionCall::SELECTOR);
        // string offset, bool, then the tail
        assert!(encoded.len() > 4 + 64);
    }

    #[test]
    fn test_close_position_encoding() {
        let call = closePositionCall {
            _positionId: U256::from(42),
        };
        let encoded = call.abi_encode();
        assert_eq!(encoded.len(), 4 + 32);
        assert_eq!(encoded[35], 42);
    }
}
