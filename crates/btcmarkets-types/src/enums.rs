//! Currency, Instrument, OrderSide, OrderType and OrderStatus enums
//!
//! All of these travel as plain strings on the wire. Deserialization only
//! accepts the listed values, so an unexpected string from the exchange is
//! reported as a decode error instead of leaking through as free text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseEnumError;

/// Currencies held in an account or used as the quote side of a market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Australian dollar
    Aud,
    /// Bitcoin
    Btc,
    /// Ethereum
    Eth,
    /// Ethereum Classic
    Etc,
    /// Litecoin
    Ltc,
    /// Ripple
    Xrp,
    /// Bitcoin Cash
    Bch,
}

impl Currency {
    /// All supported currencies
    pub const ALL: [Currency; 7] = [
        Self::Aud,
        Self::Btc,
        Self::Eth,
        Self::Etc,
        Self::Ltc,
        Self::Xrp,
        Self::Bch,
    ];

    /// Returns the currency code as used in API paths and bodies
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aud => "AUD",
            Self::Btc => "BTC",
            Self::Eth => "ETH",
            Self::Etc => "ETC",
            Self::Ltc => "LTC",
            Self::Xrp => "XRP",
            Self::Bch => "BCH",
        }
    }

    /// Returns true for fiat currencies
    pub fn is_fiat(&self) -> bool {
        matches!(self, Self::Aud)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("currency", s))
    }
}

/// Tradeable instruments (the base side of a market)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Instrument {
    /// Bitcoin
    Btc,
    /// Ethereum
    Eth,
    /// Ethereum Classic
    Etc,
    /// Litecoin
    Ltc,
    /// Ripple
    Xrp,
    /// Bitcoin Cash
    Bch,
}

impl Instrument {
    /// All supported instruments
    pub const ALL: [Instrument; 6] = [
        Self::Btc,
        Self::Eth,
        Self::Etc,
        Self::Ltc,
        Self::Xrp,
        Self::Bch,
    ];

    /// Returns the instrument code as used in API paths and bodies
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Btc => "BTC",
            Self::Eth => "ETH",
            Self::Etc => "ETC",
            Self::Ltc => "LTC",
            Self::Xrp => "XRP",
            Self::Bch => "BCH",
        }
    }

    /// The same asset viewed as an account currency
    pub fn as_currency(&self) -> Currency {
        match self {
            Self::Btc => Currency::Btc,
            Self::Eth => Currency::Eth,
            Self::Etc => Currency::Etc,
            Self::Ltc => Currency::Ltc,
            Self::Xrp => Currency::Xrp,
            Self::Bch => Currency::Bch,
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Instrument {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("instrument", s))
    }
}

impl From<Instrument> for Currency {
    fn from(instrument: Instrument) -> Self {
        instrument.as_currency()
    }
}

/// Order side: an ask sells the instrument, a bid buys it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderSide {
    /// Sell order
    Ask,
    /// Buy order
    Bid,
}

impl OrderSide {
    /// Returns the side as used in API bodies
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ask => "Ask",
            Self::Bid => "Bid",
        }
    }

    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Self::Ask => Self::Bid,
            Self::Bid => Self::Ask,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderSide {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ask" => Ok(Self::Ask),
            "Bid" => Ok(Self::Bid),
            _ => Err(ParseEnumError::new("order side", s)),
        }
    }
}

/// Order types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    /// Executes at the given price or better
    Limit,
    /// Executes immediately at the best available price
    Market,
}

impl OrderType {
    /// Returns the order type as used in API bodies
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Limit => "Limit",
            Self::Market => "Market",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Limit" => Ok(Self::Limit),
            "Market" => Ok(Self::Market),
            _ => Err(ParseEnumError::new("order type", s)),
        }
    }
}

/// Status of an order after it has been submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Created but not yet placed
    New,
    /// Placed and unfilled
    Placed,
    /// Rejected by the matching engine
    Failed,
    /// Failed due to an error
    Error,
    /// Cancelled by the client
    Cancelled,
    /// Partially matched, then cancelled before completion
    #[serde(rename = "Partially Cancelled")]
    PartiallyCancelled,
    /// Completely filled
    #[serde(rename = "Fully Matched")]
    FullyMatched,
    /// Some volume traded, remainder still open
    #[serde(rename = "Partially Matched")]
    PartiallyMatched,
}

impl OrderStatus {
    const ALL: [OrderStatus; 8] = [
        Self::New,
        Self::Placed,
        Self::Failed,
        Self::Error,
        Self::Cancelled,
        Self::PartiallyCancelled,
        Self::FullyMatched,
        Self::PartiallyMatched,
    ];

    /// Returns the status string as reported by the API
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Placed => "Placed",
            Self::Failed => "Failed",
            Self::Error => "Error",
            Self::Cancelled => "Cancelled",
            Self::PartiallyCancelled => "Partially Cancelled",
            Self::FullyMatched => "Fully Matched",
            Self::PartiallyMatched => "Partially Matched",
        }
    }

    /// Returns true if the order can still trade
    pub fn is_open(&self) -> bool {
        matches!(self, Self::New | Self::Placed | Self::PartiallyMatched)
    }

    /// Returns true if the order reached a final state
    pub fn is_terminal(&self) -> bool {
        !self.is_open()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("order status", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_serde() {
        assert_eq!(serde_json::to_string(&Currency::Aud).unwrap(), "\"AUD\"");
        let parsed: Currency = serde_json::from_str("\"BTC\"").unwrap();
        assert_eq!(parsed, Currency::Btc);
    }

    #[test]
    fn test_unknown_currency_rejected() {
        assert!(serde_json::from_str::<Currency>("\"DOGE\"").is_err());
        assert!(serde_json::from_str::<Currency>("\"aud\"").is_err());
        assert!("DOGE".parse::<Currency>().is_err());
    }

    #[test]
    fn test_as_str_matches_serde() {
        for currency in Currency::ALL {
            let json = serde_json::to_string(&currency).unwrap();
            assert_eq!(json, format!("\"{}\"", currency.as_str()));
            assert_eq!(currency.as_str().parse::<Currency>().unwrap(), currency);
        }
        for instrument in Instrument::ALL {
            let json = serde_json::to_string(&instrument).unwrap();
            assert_eq!(json, format!("\"{}\"", instrument.as_str()));
        }
        for status in OrderStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_instrument_as_currency() {
        assert_eq!(Currency::from(Instrument::Eth), Currency::Eth);
        assert!(!Instrument::Btc.as_currency().is_fiat());
        assert!(Currency::Aud.is_fiat());
    }

    #[test]
    fn test_order_side() {
        assert_eq!(OrderSide::Ask.opposite(), OrderSide::Bid);
        assert_eq!(serde_json::to_string(&OrderSide::Bid).unwrap(), "\"Bid\"");
        assert!(serde_json::from_str::<OrderSide>("\"Buy\"").is_err());
    }

    #[test]
    fn test_order_status_multiword() {
        let parsed: OrderStatus = serde_json::from_str("\"Partially Matched\"").unwrap();
        assert_eq!(parsed, OrderStatus::PartiallyMatched);
        assert!(parsed.is_open());
        assert!(OrderStatus::FullyMatched.is_terminal());
        assert!(serde_json::from_str::<OrderStatus>("\"PartiallyMatched\"").is_err());
    }
}
