pub mod date;
pub mod price;

pub use date::{DateKey, DateRange, Days};
pub use price::{PriceMap, PriceQuote};
