//! API endpoint implementations

pub mod account;
pub mod fund_transfer;
pub mod market;
pub mod orders;

pub use account::AccountEndpoints;
pub use fund_transfer::FundTransferEndpoints;
pub use market::MarketEndpoints;
pub use orders::OrderEndpoints;
