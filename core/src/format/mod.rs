pub mod number;

pub use number::{format_percent, format_share, format_thousands};
