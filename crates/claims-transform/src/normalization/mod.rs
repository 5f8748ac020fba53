//! Tolerant parsing of raw cell text.

pub mod datetime;
pub mod numeric;

pub use datetime::parse_date;
pub use numeric::parse_amount;
