//! Shared types for the BTC Markets REST API
//!
//! This crate provides the core type definitions used across the SDK.
//! It has minimal dependencies and can be used independently.
//!
//! # Key Types
//!
//! - [`Currency`], [`Instrument`] - Closed asset enumerations
//! - [`OrderSide`], [`OrderType`], [`OrderStatus`] - Order enums
//! - [`OrderId`], [`TradeId`], [`FundTransferId`] - Identifier newtypes
//! - [`AmountWhole`], [`AmountDecimal`] - Wire (x10^8) and human amounts
//! - [`RateClass`], [`RateLimitConfig`] - Client-side rate limit settings

pub mod amount;
pub mod enums;
pub mod error;
pub mod ids;
pub mod rate_limit;

// Re-export commonly used types
pub use amount::*;
pub use enums::*;
pub use error::*;
pub use ids::*;
pub use rate_limit::*;

// Re-export rust_decimal for users
pub use rust_decimal::Decimal;
