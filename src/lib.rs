//! Shopfront Store is the client-side state layer of a product storefront.
//!
//! Application state is split into independent slices (catalog, likes, cart,
//! view history, auth session, theme), composed into a single observable
//! [`store::Store`]. Selected slices are mirrored into durable JSON storage
//! after every committed change and rehydrated before the first read.
//!
//! ## Core Components
//! - [`engine`]: Storage backends (in-memory with optional file persistence and
//!   AES-256-GCM encryption) and the [`engine::Mirror`] used by the store.
//! - [`slices`]: Pure state containers and their transitions.
//! - [`store`]: Composition, dispatch, subscribers and async operations.
//! - [`catalog_view`] and [`checkout`]: Derived computations over the state.
//! - [`services`]: In-process implementations of the external capabilities.

pub mod catalog_view;
pub mod checkout;
pub mod config;
pub mod engine;
pub mod model;
pub mod services;
pub mod slices;
pub mod store;

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

pub use model::{Address, Product, User};

/// Errors returned by the Shopfront Store.
#[derive(Error, Debug)]
pub enum Error {
    /// The requested key does not exist in the namespace.
    #[error("key not found")]
    KeyNotFound,
    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
    /// An I/O error occurred during persistence.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error during JSON serialization or deserialization.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The product catalog could not be read.
    #[error("catalog error: {0}")]
    Catalog(String),
    /// No product with this id exists in the catalog.
    #[error("product {0} not found")]
    ProductNotFound(u64),
    /// The identity provider rejected the request. The message is the provider's own.
    #[error("{0}")]
    Identity(String),
    /// The reverse geocoding lookup failed.
    #[error("geocoding error: {0}")]
    Geocoding(String),
    /// Latitude or longitude outside of the valid range.
    #[error("invalid coordinates ({lat}, {lon})")]
    InvalidCoordinates { lat: f64, lon: f64 },
    /// Checkout was attempted with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,
}

/// A specialized Result type for Shopfront Store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Defines basic read operations for a storage backend.
pub trait KVReader: Send + Sync {
    /// Retrieves the value stored under `key` in `namespace`.
    fn get(&self, namespace: &str, key: &str) -> Result<serde_json::Value>;
}

/// Defines basic write and delete operations for a storage backend.
///
/// Writes are synchronous: when `set` or `delete` returns `Ok`, the change is
/// durable as far as the backend is concerned.
pub trait KVWriter: Send + Sync {
    /// Stores `value` under `key` in `namespace`.
    fn set(&self, namespace: &str, key: &str, value: serde_json::Value) -> Result<()>;
    /// Deletes `key` from `namespace`. Deleting an absent key is not an error.
    fn delete(&self, namespace: &str, key: &str) -> Result<()>;
}

/// Allows retrieving every key of a namespace at once.
pub trait BatchExporter: Send + Sync {
    /// Returns all key-value pairs stored in `namespace`.
    fn dump(&self, namespace: &str) -> Result<HashMap<String, serde_json::Value>>;
}

/// A complete storage backend.
pub trait Storage: KVReader + KVWriter + BatchExporter {}

impl<T: KVReader + KVWriter + BatchExporter> Storage for T {}

/// Read access to the remote product catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches up to `limit` products.
    async fn fetch_products(&self, limit: usize) -> Result<Vec<Product>>;
    /// Looks up a single product by id.
    async fn fetch_product(&self, id: u64) -> Result<Product>;
}

/// The external identity provider.
///
/// Implementations report failures as [`Error::Identity`] carrying the
/// provider's message; the store surfaces that message verbatim.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Creates an account with email and password.
    async fn register(&self, email: &str, password: &str) -> Result<User>;
    /// Signs in with email and password.
    async fn login(&self, email: &str, password: &str) -> Result<User>;
    /// Signs in through the federated (Google) flow.
    async fn federated_login(&self) -> Result<User>;
    /// Ends the provider session.
    async fn sign_out(&self) -> Result<()>;
}

/// Reverse geocoding, used by checkout to prefill the shipping address.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves a structured address for the given coordinates.
    async fn reverse(&self, lat: f64, lon: f64) -> Result<Address>;
}
