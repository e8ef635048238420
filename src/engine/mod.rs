pub mod discovery;
pub mod memstore;
pub mod mirror;
pub mod persistence;
pub mod vault;

pub use discovery::open;
pub use memstore::MemStorage;
pub use mirror::Mirror;
pub use persistence::Persistence;
pub use vault::VaultStorage;
