use log::debug;
use serde::Serialize;

use crate::slices::RequestId;
use crate::Product;

/// Number of products requested from the catalog in one fetch.
pub const FETCH_LIMIT: usize = 194;
/// Step by which the visible result window grows.
pub const PAGE_SIZE: usize = 8;
/// The error shown when a catalog fetch fails, whatever the cause.
pub const FETCH_ERROR: &str = "Failed to fetch products";

#[derive(Debug, Clone)]
pub enum CatalogAction {
    FetchPending(RequestId),
    FetchFulfilled(RequestId, Vec<Product>),
    FetchRejected(RequestId),
    SetSearchQuery(String),
    IncreaseLimit,
}

/// Cached catalog plus the search-filtered view of it. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogState {
    pub products: Vec<Product>,
    pub filtered_products: Vec<Product>,
    pub search_query: String,
    pub limit: usize,
    pub loading: bool,
    pub error: Option<String>,
    #[serde(skip)]
    latest_request: Option<RequestId>,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            filtered_products: Vec::new(),
            search_query: String::new(),
            limit: PAGE_SIZE,
            loading: false,
            error: None,
            latest_request: None,
        }
    }
}

impl CatalogState {
    pub fn apply(&mut self, action: &CatalogAction) {
        match action {
            CatalogAction::FetchPending(id) => {
                self.latest_request = Some(*id);
                self.loading = true;
                self.error = None;
            }
            CatalogAction::FetchFulfilled(id, products) => {
                if !self.is_latest(*id) {
                    debug!("Discarding stale catalog response {:?}", id);
                    return;
                }
                self.products = products.clone();
                self.filtered_products = products.clone();
                self.refilter();
                self.loading = false;
            }
            CatalogAction::FetchRejected(id) => {
                if !self.is_latest(*id) {
                    debug!("Discarding stale catalog failure {:?}", id);
                    return;
                }
                self.error = Some(FETCH_ERROR.to_string());
                self.loading = false;
            }
            CatalogAction::SetSearchQuery(query) => {
                self.search_query = query.clone();
                self.refilter();
            }
            CatalogAction::IncreaseLimit => self.limit = self.limit.saturating_add(PAGE_SIZE),
        }
    }

    /// The filtered products inside the current paging window.
    pub fn visible(&self) -> &[Product] {
        let end = self.limit.min(self.filtered_products.len());
        &self.filtered_products[..end]
    }

    pub fn has_more(&self) -> bool {
        self.filtered_products.len() > self.limit
    }

    pub fn find(&self, id: u64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    fn is_latest(&self, id: RequestId) -> bool {
        self.latest_request == Some(id)
    }

    fn refilter(&mut self) {
        let needle = self.search_query.to_lowercase();
        self.filtered_products = self
            .products
            .iter()
            .filter(|p| p.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
    }
}
