// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of EnerView.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Side of a market order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BidType {
    Sell,
    Buy,
}

impl BidType {
    /// Sign applied to `volume * price` when accumulating profit:
    /// sold energy earns, bought energy costs
    pub fn sign(&self) -> f64 {
        match self {
            Self::Sell => 1.0,
            Self::Buy => -1.0,
        }
    }

    /// Wire tag used by the bids endpoint
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Sell => "SELL",
            Self::Buy => "BUY",
        }
    }
}

impl fmt::Display for BidType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sell => write!(f, "Sell"),
            Self::Buy => write!(f, "Buy"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown bid type tag '{0}', expected SELL or BUY")]
pub struct UnknownBidType(pub String);

impl FromStr for BidType {
    type Err = UnknownBidType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SELL" => Ok(Self::Sell),
            "BUY" => Ok(Self::Buy),
            _ => Err(UnknownBidType(s.to_owned())),
        }
    }
}

/// One market order (buy or sell) for a given delivery date and hour.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    /// Delivery date string as sent by the API
    pub date: String,
    /// Delivery hour, 0-23
    pub hour: u8,
    pub bid_type: BidType,
    /// Volume in MWh, non-negative
    pub volume_mwh: f64,
    /// Price in currency per MWh
    pub price: f64,
}

impl Bid {
    /// Signed contribution of this bid to the day's profit
    pub fn profit(&self) -> f64 {
        self.volume_mwh * self.price * self.bid_type.sign()
    }
}

/// An ordered set of bids with the financial aggregates derived from them.
///
/// Aggregates are maintained by [`BidData::push`], so
/// `total_volume == volume_sold + volume_bought` and
/// `profit == sum(volume * price * sign)` hold by construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BidData {
    pub bids: Vec<Bid>,
    pub profit: f64,
    pub volume_sold: f64,
    pub volume_bought: f64,
    pub total_volume: f64,
}

impl BidData {
    pub fn push(&mut self, bid: Bid) {
        self.profit += bid.profit();
        self.total_volume += bid.volume_mwh;
        match bid.bid_type {
            BidType::Sell => self.volume_sold += bid.volume_mwh,
            BidType::Buy => self.volume_bought += bid.volume_mwh,
        }
        self.bids.push(bid);
    }

    pub fn len(&self) -> usize {
        self.bids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bid(bid_type: BidType, volume: f64, price: f64) -> Bid {
        Bid {
            date: "2021-07-22".to_owned(),
            hour: 0,
            bid_type,
            volume_mwh: volume,
            price,
        }
    }

    #[test]
    fn test_bid_type_tags() {
        assert_eq!("SELL".parse::<BidType>().unwrap(), BidType::Sell);
        assert_eq!("buy".parse::<BidType>().unwrap(), BidType::Buy);
        assert!("HOLD".parse::<BidType>().is_err());
    }

    #[test]
    fn test_profit_sign() {
        assert_eq!(bid(BidType::Sell, 10.0, 50.0).profit(), 500.0);
        assert_eq!(bid(BidType::Buy, 5.0, 40.0).profit(), -200.0);
    }

    #[test]
    fn test_aggregates() {
        let mut data = BidData::default();
        data.push(bid(BidType::Sell, 10.0, 50.0));
        data.push(bid(BidType::Buy, 5.0, 40.0));

        assert_eq!(data.profit, 300.0);
        assert_eq!(data.volume_sold, 10.0);
        assert_eq!(data.volume_bought, 5.0);
        assert_eq!(data.total_volume, 15.0);
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_volume_invariant() {
        let mut data = BidData::default();
        for (side, volume, price) in [
            (BidType::Sell, 3.5, 42.0),
            (BidType::Buy, 1.25, 38.0),
            (BidType::Sell, 0.0, 55.0),
            (BidType::Buy, 7.0, 61.5),
        ] {
            data.push(bid(side, volume, price));
        }
        assert_eq!(data.total_volume, data.volume_sold + data.volume_bought);
    }
}
