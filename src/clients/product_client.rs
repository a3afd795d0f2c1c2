use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::domain::{Product, ProductCreate, ProductPatch, ProductQuery};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};
use super::newest_first;

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(ProductClient, Product, ProductError, product);

impl ProductClient {
    #[instrument(skip(self, params), fields(name = %params.name))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<Product, ProductError> {
        debug!("Sending request");
        let id = self.inner.create(params).await?;
        self.require(id).await
    }

    /// Fetches a product that must exist.
    pub async fn require(&self, id: String) -> Result<Product, ProductError> {
        self.get_product(id.clone())
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self, query: ProductQuery) -> Result<Vec<Product>, ProductError> {
        debug!("Sending request");
        let products = self
            .inner
            .list(Some(Box::new(move |product: &Product| query.matches(product))))
            .await?;
        Ok(newest_first(products))
    }

    /// Looks up several products at once, keyed by id. Unknown ids are absent.
    pub async fn products_by_id(&self, ids: HashSet<String>) -> Result<HashMap<String, Product>, ProductError> {
        let products = self
            .inner
            .list(Some(Box::new(move |product: &Product| ids.contains(&product.id))))
            .await?;
        Ok(products.into_iter().map(|p| (p.id.clone(), p)).collect())
    }

    #[instrument(skip(self))]
    pub async fn update_product(&self, id: String, patch: ProductPatch) -> Result<Product, ProductError> {
        debug!("Sending request");
        Ok(self.inner.update(id, patch).await?)
    }

    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: String) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::CheckStock).await? {
            ProductActionResult::StockLevel(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    /// Takes `quantity` units out of stock and returns what is left.
    #[instrument(skip(self))]
    pub async fn reserve_stock(&self, id: String, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::ReserveStock(quantity)).await? {
            ProductActionResult::Reserved { remaining } => Ok(remaining),
            ProductActionResult::Insufficient { available } => {
                warn!(requested = quantity, available, "Insufficient stock");
                Err(ProductError::InsufficientStock {
                    requested: quantity,
                    available,
                })
            }
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn release_stock(&self, id: String, quantity: u32) -> Result<u32, ProductError> {
        debug!("Sending request");
        match self.inner.perform_action(id, ProductAction::ReleaseStock(quantity)).await? {
            ProductActionResult::Released { stock } => Ok(stock),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(result: ProductActionResult) -> ProductError {
    ProductError::ActorCommunicationError(format!("Unexpected result: {result:?}"))
}
