//! The composed application store.
//!
//! [`Store`] owns one [`AppState`] tree. Every change goes through
//! [`Store::dispatch`], which applies the pure slice transition and then
//! notifies subscribers, in registration order, with the committed state
//! before returning. Dispatches are serialized, so subscribers observe actions
//! in commit order. The
//! persistence effect layer ([`effects`]) is registered as the first
//! subscriber when the store is built, so durable storage always matches the
//! committed state by the time `dispatch` returns.

pub mod effects;
mod operations;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, info};
use serde::Serialize;

use crate::engine::Mirror;
use crate::services::{OfflineIdentity, StaticCatalog};
use crate::slices::{
    AuthAction, AuthState, CartAction, CartState, CatalogAction, CatalogState, FavoritesAction,
    FavoritesState, HistoryAction, HistoryState, RequestId, ThemeAction, ThemeState,
};
use crate::{CatalogSource, IdentityProvider};

/// The whole state tree, keyed by slice name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub likes: FavoritesState,
    pub cart: CartState,
    pub products: CatalogState,
    pub product_history: HistoryState,
    pub auth: AuthState,
    pub theme: ThemeState,
}

impl AppState {
    /// Seeds every persisted slice from durable storage. Missing or unreadable
    /// keys leave that slice at its default.
    pub fn rehydrate(mirror: &Mirror) -> Self {
        Self {
            likes: FavoritesState::rehydrate(mirror),
            cart: CartState::rehydrate(mirror),
            products: CatalogState::default(),
            product_history: HistoryState::rehydrate(mirror),
            auth: AuthState::rehydrate(mirror),
            theme: ThemeState::rehydrate(mirror),
        }
    }

    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::Products(a) => self.products.apply(a),
            Action::Likes(a) => self.likes.apply(a),
            Action::Cart(a) => self.cart.apply(a),
            Action::History(a) => self.product_history.apply(a),
            Action::Auth(a) => self.auth.apply(a),
            Action::Theme(a) => self.theme.apply(a),
        }
    }
}

/// An action addressed to one slice.
#[derive(Debug, Clone)]
pub enum Action {
    Products(CatalogAction),
    Likes(FavoritesAction),
    Cart(CartAction),
    History(HistoryAction),
    Auth(AuthAction),
    Theme(ThemeAction),
}

impl Action {
    pub fn slice(&self) -> &'static str {
        match self {
            Action::Products(_) => "products",
            Action::Likes(_) => "likes",
            Action::Cart(_) => "cart",
            Action::History(_) => "productHistory",
            Action::Auth(_) => "auth",
            Action::Theme(_) => "theme",
        }
    }
}

macro_rules! impl_from_action {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(impl From<$ty> for Action {
            fn from(a: $ty) -> Self {
                Action::$variant(a)
            }
        })*
    };
}

impl_from_action!(
    Products(CatalogAction),
    Likes(FavoritesAction),
    Cart(CartAction),
    History(HistoryAction),
    Auth(AuthAction),
    Theme(ThemeAction),
);

/// Callback run after every committed action.
///
/// Subscribers may read the store but must not dispatch from inside the
/// callback.
pub type Subscriber = Arc<dyn Fn(&AppState, &Action) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct Store {
    state: RwLock<AppState>,
    commit: Mutex<()>,
    subscribers: RwLock<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: AtomicU64,
    next_request: AtomicU64,
    mirror: Mirror,
    catalog: Arc<dyn CatalogSource>,
    identity: Arc<dyn IdentityProvider>,
}

impl Store {
    pub fn builder() -> StoreBuilder {
        StoreBuilder::default()
    }

    /// Applies `action` and notifies subscribers before returning.
    pub fn dispatch(&self, action: impl Into<Action>) {
        let action = action.into();
        debug!("dispatch {} {:?}", action.slice(), action);

        let subscribers: Vec<Subscriber> = self
            .read_subscribers()
            .iter()
            .map(|(_, s)| s.clone())
            .collect();

        let _commit = self.commit.lock().unwrap_or_else(PoisonError::into_inner);
        let committed = {
            let mut state = self.write_state();
            state.apply(&action);
            state.clone()
        };
        for subscriber in &subscribers {
            subscriber(&committed, &action);
        }
    }

    /// Registers `f` to observe every committed action.
    pub fn subscribe<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&AppState, &Action) + Send + Sync + 'static,
    {
        self.add_subscriber(Arc::new(f))
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write().unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    /// A snapshot of the whole tree.
    pub fn state(&self) -> AppState {
        self.read_state().clone()
    }

    /// Reads a value out of the current state without cloning the tree.
    pub fn select<T>(&self, f: impl FnOnce(&AppState) -> T) -> T {
        f(&*self.read_state())
    }

    pub fn mirror(&self) -> &Mirror {
        &self.mirror
    }

    fn add_subscriber(&self, subscriber: Subscriber) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::SeqCst));
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, subscriber));
        id
    }

    fn next_request_id(&self) -> RequestId {
        RequestId(self.next_request.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, AppState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, AppState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_subscribers(&self) -> RwLockReadGuard<'_, Vec<(SubscriptionId, Subscriber)>> {
        self.subscribers.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Wires a [`Store`] to its storage and external services.
///
/// Anything left unset falls back to an offline default: in-memory storage,
/// an empty catalog and an identity provider that rejects every call.
#[derive(Default)]
pub struct StoreBuilder {
    mirror: Option<Mirror>,
    catalog: Option<Arc<dyn CatalogSource>>,
    identity: Option<Arc<dyn IdentityProvider>>,
}

impl StoreBuilder {
    pub fn mirror(mut self, mirror: Mirror) -> Self {
        self.mirror = Some(mirror);
        self
    }

    pub fn catalog(mut self, catalog: Arc<dyn CatalogSource>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Rehydrates persisted slices and returns the ready store. The first
    /// read after `build` already sees the persisted state.
    pub fn build(self) -> Store {
        let mirror = self.mirror.unwrap_or_else(Mirror::in_memory);
        let state = AppState::rehydrate(&mirror);
        info!(
            "Rehydrated store from namespace {}: {} cart lines, {} liked, {} viewed",
            mirror.namespace(),
            state.cart.items.len(),
            state.likes.liked_products.len(),
            state.product_history.viewed_products.len()
        );

        let store = Store {
            state: RwLock::new(state),
            commit: Mutex::new(()),
            subscribers: RwLock::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
            next_request: AtomicU64::new(0),
            catalog: self.catalog.unwrap_or_else(|| Arc::new(StaticCatalog::default())),
            identity: self.identity.unwrap_or_else(|| Arc::new(OfflineIdentity)),
            mirror,
        };
        store.add_subscriber(effects::persistence(store.mirror.clone()));
        store
    }
}
