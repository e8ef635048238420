pub mod catalog;
pub mod identity;

pub use catalog::StaticCatalog;
pub use identity::OfflineIdentity;
