mod cache;

pub use cache::{Atom, AssetId, asset_count, asset_path, intern_asset};
