use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::coupon_actor::CouponError;
use crate::domain::{
    Customer, CouponLine, Order, OrderCreate, OrderItem, OrderStatus, OrderTotals, OrderView,
    PaymentMethod, Product, ShippingAddress,
};
use crate::order_actor::{OrderAction, OrderError};
use crate::product_actor::ProductError;
use super::{newest_first, CartClient, CouponClient, ProductClient, UserClient};

/// Checkout form as the storefront submits it. Client-side totals are
/// ignored; the server prices every order itself.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrder {
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
    pub shipping_address: Option<ShippingAddress>,
    pub payment_method: Option<PaymentMethod>,
    pub coupon_code: Option<String>,
}

/// Client for interacting with the Order actor.
///
/// This client handles the checkout orchestration: it checks products and
/// prices, applies the coupon, reserves stock and only then stores the order.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    user_client: UserClient,
    product_client: ProductClient,
    coupon_client: CouponClient,
    cart_client: CartClient,
    tax_rate: f64,
}

fn product_error(err: ProductError) -> OrderError {
    OrderError::ActorCommunicationError(err.to_string())
}

impl OrderClient {
    pub fn new(
        inner: ResourceClient<Order>,
        user_client: UserClient,
        product_client: ProductClient,
        coupon_client: CouponClient,
        cart_client: CartClient,
        tax_rate: f64,
    ) -> Self {
        Self {
            inner,
            user_client,
            product_client,
            coupon_client,
            cart_client,
            tax_rate,
        }
    }

    /// Validates, prices and stores an order for `user_id`, then clears the
    /// user's cart.
    #[instrument(skip(self, form), fields(items = form.order_items.len()))]
    pub async fn place_order(&self, user_id: String, form: PlaceOrder) -> Result<Order, OrderError> {
        info!("Processing place_order request (Client Side)");

        if form.order_items.is_empty() {
            return Err(OrderError::ValidationError("No order items provided".to_string()));
        }
        if form.order_items.iter().any(|item| item.quantity == 0) {
            return Err(OrderError::ValidationError("Quantity must be at least 1".to_string()));
        }
        let shipping_address = form
            .shipping_address
            .ok_or_else(|| "Complete shipping address is required".to_string())
            .and_then(|address| address.normalized())
            .map_err(OrderError::ValidationError)?;
        let payment_method = form.payment_method.unwrap_or_default();

        // Step 1: Check every line against the catalog
        let ids: HashSet<String> = form.order_items.iter().map(|item| item.product_id.clone()).collect();
        let products = self.product_client.products_by_id(ids).await.map_err(product_error)?;
        let items = checked_items(form.order_items, &products)?;
        info!("Product validation successful");

        // Step 2: Price the order, coupon included
        let subtotal: f64 = items.iter().map(OrderItem::line_total).sum();
        let coupon_code = form
            .coupon_code
            .map(|code| code.trim().to_uppercase())
            .filter(|code| !code.is_empty());
        let discount = match &coupon_code {
            Some(code) => {
                let lines: Vec<CouponLine> = items
                    .iter()
                    .filter_map(|item| products.get(&item.product_id))
                    .map(|product| CouponLine {
                        product_id: product.id.clone(),
                        category: product.category.clone(),
                    })
                    .collect();
                self.coupon_client
                    .validate(code.clone(), subtotal, &lines)
                    .await
                    .map_err(coupon_error)?
                    .discount_amount
            }
            None => 0.0,
        };
        let totals = OrderTotals::compute(&items, discount, self.tax_rate);

        // Step 3: Reserve stock, rolling back on the first failure
        let mut reserved: Vec<(String, u32)> = Vec::new();
        for item in &items {
            match self.product_client.reserve_stock(item.product_id.clone(), item.quantity).await {
                Ok(remaining) => {
                    debug!(product_id = %item.product_id, remaining, "Stock reserved");
                    reserved.push((item.product_id.clone(), item.quantity));
                }
                Err(e) => {
                    error!(error = %e, "Stock reservation failed");
                    self.release(&reserved).await;
                    return Err(match e {
                        ProductError::InsufficientStock { available, .. } => OrderError::InsufficientStock {
                            name: item.name.clone(),
                            available,
                        },
                        ProductError::NotFound(_) => OrderError::ProductNotFound { name: item.name.clone() },
                        other => product_error(other),
                    });
                }
            }
        }
        info!("Stock reserved successfully");

        // Step 4: Store the order
        let payload = OrderCreate {
            user_id: user_id.clone(),
            items,
            shipping_address,
            payment_method,
            totals,
            coupon_code: coupon_code.clone(),
        };
        let id = match self.inner.create(payload).await {
            Ok(id) => id,
            Err(e) => {
                error!(error = %e, "Order creation failed");
                self.release(&reserved).await;
                return Err(e.into());
            }
        };
        let order = self.require(id).await?;
        info!(order_id = %order.id, total = order.total_amount, "Order placed");

        // Step 5: Bookkeeping that must not undo a stored order
        if let Some(code) = coupon_code {
            if let Err(e) = self.coupon_client.record_usage(code).await {
                warn!(error = %e, "Could not record coupon usage");
            }
        }
        if let Err(e) = self.cart_client.clear_cart(user_id).await {
            warn!(error = %e, "Could not clear cart after order");
        }
        Ok(order)
    }

    async fn release(&self, reserved: &[(String, u32)]) {
        for (product_id, quantity) in reserved {
            if let Err(e) = self.product_client.release_stock(product_id.clone(), *quantity).await {
                warn!(product_id = %product_id, error = %e, "Could not release reserved stock");
            }
        }
    }

    pub async fn require(&self, id: String) -> Result<Order, OrderError> {
        self.get_order(id.clone()).await?.ok_or(OrderError::NotFound(id))
    }

    /// The caller's own orders, newest first.
    #[instrument(skip(self))]
    pub async fn user_orders(&self, user_id: String) -> Result<Vec<OrderView>, OrderError> {
        debug!("Sending request");
        let orders = self
            .inner
            .list(Some(Box::new(move |order: &Order| order.user == user_id)))
            .await?;
        Ok(newest_first(orders)
            .into_iter()
            .map(|order| OrderView::new(order, None))
            .collect())
    }

    /// Every order with its customer, newest first.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<OrderView>, OrderError> {
        debug!("Sending request");
        let orders = newest_first(self.inner.list(None).await?);
        let ids = orders.iter().map(|order| order.user.clone()).collect();
        let customers = self
            .user_client
            .users_by_id(ids)
            .await
            .map_err(|e| OrderError::ActorCommunicationError(e.to_string()))?;
        Ok(orders
            .into_iter()
            .map(|order| {
                let customer = customers.get(&order.user).map(Customer::from);
                OrderView::new(order, customer)
            })
            .collect())
    }

    async fn with_customer(&self, order: Order) -> OrderView {
        let customer = match self.user_client.get_user(order.user.clone()).await {
            Ok(user) => user.as_ref().map(Customer::from),
            Err(e) => {
                warn!(error = %e, "Could not load order customer");
                None
            }
        };
        OrderView::new(order, customer)
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: String, status: String) -> Result<OrderView, OrderError> {
        debug!("Sending request");
        if status.trim().is_empty() {
            return Err(OrderError::ValidationError("Status is required".to_string()));
        }
        let status = OrderStatus::parse(status.trim()).ok_or(OrderError::InvalidStatus(status))?;
        let order = self.inner.perform_action(id, OrderAction::SetStatus(status)).await?;
        info!(order_id = %order.id, status = %order.order_status, "Order status updated");
        Ok(self.with_customer(order).await)
    }

    #[instrument(skip(self))]
    pub async fn mark_paid(&self, id: String) -> Result<OrderView, OrderError> {
        debug!("Sending request");
        let order = self.inner.perform_action(id, OrderAction::MarkPaid).await?;
        info!(order_id = %order.id, "Order marked as paid");
        Ok(self.with_customer(order).await)
    }
}

/// Checks each line against the catalog and snapshots the product's current
/// name and image into it. Quantities of repeated products are summed before
/// the stock check.
fn checked_items(
    items: Vec<OrderItem>,
    products: &HashMap<String, Product>,
) -> Result<Vec<OrderItem>, OrderError> {
    let mut wanted: HashMap<&str, u64> = HashMap::new();
    for item in &items {
        *wanted.entry(item.product_id.as_str()).or_default() += u64::from(item.quantity);
    }

    for item in &items {
        let Some(product) = products.get(&item.product_id) else {
            return Err(OrderError::ProductNotFound { name: item.name.clone() });
        };
        let requested = wanted
            .get(item.product_id.as_str())
            .copied()
            .unwrap_or_else(|| u64::from(item.quantity));
        if u64::from(product.stock) < requested {
            return Err(OrderError::InsufficientStock {
                name: product.name.clone(),
                available: product.stock,
            });
        }
        if (product.price - item.price).abs() > 1e-9 {
            return Err(OrderError::PriceChanged { name: product.name.clone() });
        }
    }

    Ok(items
        .into_iter()
        .map(|mut item| {
            if let Some(product) = products.get(&item.product_id) {
                item.name = product.name.clone();
                if item.image.trim().is_empty() {
                    item.image = product.image.clone();
                }
            }
            item
        })
        .collect())
}

fn coupon_error(err: CouponError) -> OrderError {
    match err {
        CouponError::Rejected(rejection) => OrderError::Coupon(rejection.message()),
        CouponError::NotFound(_) => OrderError::Coupon("Invalid coupon code".to_string()),
        other => OrderError::ActorCommunicationError(other.to_string()),
    }
}

impl_client_methods!(OrderClient, Order, OrderError, order);
