//! Asset data structures, year-0 normalization and inventory loading

mod data;
pub mod loader;

pub use data::{normalize_portfolio, AssetRecord, RawAsset, TOTAL_LABEL};
pub(crate) use data::ratio_or_zero;
pub use loader::{load_assets, load_assets_from_reader};
