use tracing::{debug, info, instrument};

use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::cart_actor::{CartAction, CartCreate, CartError};
use crate::domain::{Cart, CartRule, CartView, CouponLine};
use crate::product_actor::ProductError;
use super::ProductClient;

/// Client for the Cart actor.
///
/// Stock checks need the product actor, so this client looks the product up
/// first and hands the stock level to the cart action.
#[derive(Clone)]
pub struct CartClient {
    inner: ResourceClient<Cart>,
    product_client: ProductClient,
}

fn product_error(err: ProductError) -> CartError {
    match err {
        ProductError::NotFound(id) => CartError::ProductNotFound(id),
        other => CartError::ActorCommunicationError(other.to_string()),
    }
}

impl CartClient {
    pub fn new(inner: ResourceClient<Cart>, product_client: ProductClient) -> Self {
        Self {
            inner,
            product_client,
        }
    }

    /// Returns the user's cart, opening an empty one on first access.
    #[instrument(skip(self))]
    pub async fn open_cart(&self, user_id: String) -> Result<Cart, CartError> {
        if let Some(cart) = self.inner.get(user_id.clone()).await? {
            return Ok(cart);
        }
        match self.inner.create(CartCreate { user_id: user_id.clone() }).await {
            Ok(_) => info!("Cart opened"),
            // Another request opened it in between.
            Err(FrameworkError::AlreadyExists(_)) => debug!("Cart already open"),
            Err(e) => return Err(e.into()),
        }
        self.inner
            .get(user_id.clone())
            .await?
            .ok_or(CartError::CartNotFound(user_id))
    }

    async fn existing_cart(&self, user_id: String) -> Result<Cart, CartError> {
        self.inner
            .get(user_id.clone())
            .await?
            .ok_or(CartError::CartNotFound(user_id))
    }

    /// Joins the cart with current product records.
    pub async fn view(&self, cart: &Cart) -> Result<CartView, CartError> {
        let ids = cart.items.iter().map(|item| item.product_id.clone()).collect();
        let products = self.product_client.products_by_id(ids).await.map_err(product_error)?;
        Ok(cart.populate(&products))
    }

    #[instrument(skip(self))]
    pub async fn get_cart(&self, user_id: String) -> Result<CartView, CartError> {
        debug!("Sending request");
        let cart = self.open_cart(user_id).await?;
        self.view(&cart).await
    }

    async fn apply(&self, user_id: String, action: CartAction) -> Result<CartView, CartError> {
        let cart = self.inner.perform_action(user_id, action).await??;
        self.view(&cart).await
    }

    #[instrument(skip(self))]
    pub async fn add_item(&self, user_id: String, product_id: String, quantity: u32) -> Result<CartView, CartError> {
        debug!("Sending request");
        if product_id.trim().is_empty() || quantity == 0 {
            return Err(CartRule::InvalidQuantity.into());
        }
        let product = self
            .product_client
            .require(product_id.clone())
            .await
            .map_err(product_error)?;

        self.open_cart(user_id.clone()).await?;
        let view = self
            .apply(
                user_id,
                CartAction::AddItem {
                    product_id,
                    quantity,
                    stock: product.stock,
                },
            )
            .await?;
        info!(total_items = view.total_items, "Item added to cart");
        Ok(view)
    }

    /// Sets a line's quantity; zero or less removes the line.
    #[instrument(skip(self))]
    pub async fn update_item(&self, user_id: String, product_id: String, quantity: i64) -> Result<CartView, CartError> {
        debug!("Sending request");
        let cart = self.existing_cart(user_id.clone()).await?;
        if !cart.contains(&product_id) {
            return Err(CartRule::ItemMissing.into());
        }
        let stock = if quantity > 0 {
            self.product_client
                .check_stock(product_id.clone())
                .await
                .map_err(product_error)?
        } else {
            0
        };
        self.apply(
            user_id,
            CartAction::SetQuantity {
                product_id,
                quantity,
                stock,
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn remove_item(&self, user_id: String, product_id: String) -> Result<CartView, CartError> {
        debug!("Sending request");
        self.existing_cart(user_id.clone()).await?;
        self.apply(user_id, CartAction::RemoveItem(product_id)).await
    }

    /// Empties the cart if the user has one.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self, user_id: String) -> Result<(), CartError> {
        debug!("Sending request");
        match self.inner.perform_action(user_id, CartAction::Clear).await {
            Ok(_) | Err(FrameworkError::NotFound(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Cart total and the product facts coupon restrictions look at.
    #[instrument(skip(self))]
    pub async fn coupon_basis(&self, user_id: String) -> Result<(f64, Vec<CouponLine>), CartError> {
        let view = self.get_cart(user_id).await?;
        let lines = view
            .items
            .iter()
            .map(|line| CouponLine {
                product_id: line.product.id.clone(),
                category: line.product.category.clone(),
            })
            .collect();
        Ok((view.cart_total, lines))
    }
}
