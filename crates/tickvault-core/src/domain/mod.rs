mod models;
mod period;
mod symbol;

pub use models::{PriceRecord, PriceSeries};
pub use period::Period;
pub use symbol::Symbol;
