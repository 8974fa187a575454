//! CSV input and output.

pub mod export;
pub mod import;

pub use export::{export_csv, write_csv};
pub use import::{ImportError, load_market_csv, read_market_csv};
