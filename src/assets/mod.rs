pub mod cache;
pub mod package;

pub use cache::{AssetCache, CacheStats};
pub use package::{CacheStatus, PackageCache};
