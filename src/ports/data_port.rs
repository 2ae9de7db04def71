//! Market data access port.

use crate::domain::error::OppscanError;
use crate::domain::fundamentals::RawFundamentals;
use crate::domain::price::PriceSeries;

pub trait MarketDataPort {
    /// Daily closes for an exchange ticker (e.g. `TCS.NS`), oldest first.
    /// An unknown ticker is `OppscanError::NoData`.
    fn fetch_closes(&self, ticker: &str) -> Result<PriceSeries, OppscanError>;

    /// Loosely-typed fundamentals; an empty map when the source has none.
    fn fetch_fundamentals(&self, ticker: &str) -> Result<RawFundamentals, OppscanError>;
}
