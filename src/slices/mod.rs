pub mod auth;
pub mod cart;
pub mod catalog;
pub mod favorites;
pub mod history;
pub mod theme;

pub use auth::{AuthAction, AuthState};
pub use cart::{CartAction, CartItem, CartState};
pub use catalog::{CatalogAction, CatalogState};
pub use favorites::{FavoritesAction, FavoritesState};
pub use history::{HistoryAction, HistoryState};
pub use theme::{ThemeAction, ThemeState};

/// Tag attached to an asynchronous request. Issued in increasing order by the
/// store; a slice only accepts the settlement of its latest request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);
