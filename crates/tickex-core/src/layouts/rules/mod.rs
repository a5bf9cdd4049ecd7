//! Rule-based field extraction helpers shared by the shipped layouts.

pub mod dates;
pub mod numbers;
pub mod patterns;
pub mod text;

pub use dates::{find_datetime_after, parse_date, parse_datetime};
pub use numbers::{labeled_weight, parse_locale_number};
pub use text::labeled_line;
