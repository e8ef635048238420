use std::future::Future;

use log::warn;

use crate::slices::catalog::FETCH_LIMIT;
use crate::slices::{AuthAction, CatalogAction, HistoryAction};
use crate::store::Store;
use crate::{Error, Product, Result, User};

impl Store {
    /// Loads the catalog into the products slice.
    ///
    /// On failure the slice shows the fixed fetch error; the underlying cause is
    /// logged and returned.
    pub async fn fetch_all_products(&self) -> Result<usize> {
        let id = self.next_request_id();
        self.dispatch(CatalogAction::FetchPending(id));

        match self.catalog.fetch_products(FETCH_LIMIT).await {
            Ok(products) => {
                let count = products.len();
                self.dispatch(CatalogAction::FetchFulfilled(id, products));
                Ok(count)
            }
            Err(e) => {
                warn!("Catalog fetch failed: {}", e);
                self.dispatch(CatalogAction::FetchRejected(id));
                Err(e)
            }
        }
    }

    /// Looks a product up, preferring the cached catalog.
    pub async fn product(&self, id: u64) -> Result<Product> {
        if let Some(cached) = self.select(|s| s.products.find(id).cloned()) {
            return Ok(cached);
        }
        self.catalog.fetch_product(id).await
    }

    /// Looks a product up and records it in the view history.
    pub async fn open_product(&self, id: u64) -> Result<Product> {
        let product = self.product(id).await?;
        self.dispatch(HistoryAction::Add(product.clone()));
        Ok(product)
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<User> {
        self.authenticate(self.identity.register(email, password)).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        self.authenticate(self.identity.login(email, password)).await
    }

    pub async fn federated_login(&self) -> Result<User> {
        self.authenticate(self.identity.federated_login()).await
    }

    /// Signs out. The local session is cleared even if the provider call fails.
    pub async fn logout(&self) -> Result<()> {
        let id = self.next_request_id();
        self.dispatch(AuthAction::LogoutPending(id));

        match self.identity.sign_out().await {
            Ok(()) => {
                self.dispatch(AuthAction::LoggedOut(id, None));
                Ok(())
            }
            Err(e) => {
                self.dispatch(AuthAction::LoggedOut(id, Some(provider_message(&e))));
                Err(e)
            }
        }
    }

    async fn authenticate<F>(&self, call: F) -> Result<User>
    where
        F: Future<Output = Result<User>>,
    {
        let id = self.next_request_id();
        self.dispatch(AuthAction::Pending(id));

        match call.await {
            Ok(user) => {
                self.dispatch(AuthAction::Fulfilled(id, user.clone()));
                Ok(user)
            }
            Err(e) => {
                self.dispatch(AuthAction::Rejected(id, provider_message(&e)));
                Err(e)
            }
        }
    }
}

fn provider_message(e: &Error) -> String {
    match e {
        Error::Identity(message) => message.clone(),
        other => other.to_string(),
    }
}
