use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::actor_framework::{Entity, ResourceActor, ResourceClient};
use crate::cart_actor::CartCreate;
use crate::clients::{CartClient, CouponClient, OrderClient, ProductClient, UserClient};
use crate::domain::{
    Cart, Coupon, CouponCreate, Order, OrderCreate, Product, ProductCreate, User, UserCreate,
};

/// Sequential ids of the form `<prefix>_<n>`, starting at 1.
fn counter_ids<P: 'static>(prefix: &'static str) -> impl Fn(&P) -> String + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(1));
    move |_: &P| format!("{prefix}_{}", counter.fetch_add(1, Ordering::SeqCst))
}

/// The running storefront: one resource actor per record type, wired
/// together through their clients.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct StoreSystem {
    pub user_client: UserClient,
    pub product_client: ProductClient,
    pub cart_client: CartClient,
    pub coupon_client: CouponClient,
    pub order_client: OrderClient,
    shutdown: Vec<ShutdownHandle>,
}

struct ShutdownHandle {
    name: &'static str,
    stop: Box<dyn Fn() -> JoinHandle<()> + Send + Sync>,
    task: JoinHandle<()>,
}

fn spawn_actor<T: Entity>(actor: ResourceActor<T>, client: &ResourceClient<T>, name: &'static str) -> ShutdownHandle {
    let task = tokio::spawn(actor.run());
    let client = client.clone();
    ShutdownHandle {
        name,
        stop: Box::new(move || {
            let client = client.clone();
            tokio::spawn(async move {
                let _ = client.shutdown().await;
            })
        }),
        task,
    }
}

impl StoreSystem {
    pub fn new(buffer: usize, tax_rate: f64) -> Self {
        let mut shutdown = Vec::new();

        // 1. Users
        let (user_actor, users) = ResourceActor::<User>::new("user", buffer, counter_ids::<UserCreate>("user"));
        shutdown.push(spawn_actor(user_actor, &users, "user"));
        let user_client = UserClient::new(users);

        // 2. Products
        let (product_actor, products) =
            ResourceActor::<Product>::new("product", buffer, counter_ids::<ProductCreate>("product"));
        shutdown.push(spawn_actor(product_actor, &products, "product"));
        let product_client = ProductClient::new(products);

        // 3. Carts are keyed by their owner
        let (cart_actor, carts) = ResourceActor::<Cart>::new("cart", buffer, |params: &CartCreate| {
            params.user_id.clone()
        });
        shutdown.push(spawn_actor(cart_actor, &carts, "cart"));
        let cart_client = CartClient::new(carts, product_client.clone());

        // 4. Coupons
        let (coupon_actor, coupons) =
            ResourceActor::<Coupon>::new("coupon", buffer, counter_ids::<CouponCreate>("coupon"));
        shutdown.push(spawn_actor(coupon_actor, &coupons, "coupon"));
        let coupon_client = CouponClient::new(coupons);

        // 5. Orders orchestrate all of the above
        let (order_actor, orders) = ResourceActor::<Order>::new("order", buffer, counter_ids::<OrderCreate>("order"));
        shutdown.push(spawn_actor(order_actor, &orders, "order"));
        let order_client = OrderClient::new(
            orders,
            user_client.clone(),
            product_client.clone(),
            coupon_client.clone(),
            cart_client.clone(),
            tax_rate,
        );

        info!(actors = shutdown.len(), "Store system started");
        Self {
            user_client,
            product_client,
            cart_client,
            coupon_client,
            order_client,
            shutdown,
        }
    }

    /// Asks every actor to stop and waits for their tasks to finish.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        for handle in &self.shutdown {
            let _ = (handle.stop)().await;
        }
        for handle in self.shutdown {
            if let Err(e) = handle.task.await {
                error!(actor = handle.name, error = ?e, "Actor task failed");
                return Err(format!("Actor task {} failed: {e:?}", handle.name));
            }
        }
        info!("System shutdown complete.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product_actor::ProductError;

    #[test]
    fn test_counter_ids_are_sequential() {
        let next = counter_ids::<()>("order");
        assert_eq!(next(&()), "order_1");
        assert_eq!(next(&()), "order_2");
    }

    #[tokio::test]
    async fn test_system_starts_and_stops() {
        let system = StoreSystem::new(8, 0.18);
        let product = system
            .product_client
            .create_product(ProductCreate {
                name: "Mug".into(),
                description: "Stoneware".into(),
                price: 8.0,
                category: "Kitchen".into(),
                image: "mug.png".into(),
                stock: 4,
            })
            .await
            .unwrap();
        assert_eq!(product.id, "product_1");

        let cart = system.cart_client.get_cart("user_9".into()).await.unwrap();
        assert_eq!(cart.user, "user_9");

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_stock_reserve_and_release() {
        let system = StoreSystem::new(8, 0.18);
        let products = &system.product_client;
        let id = products
            .create_product(ProductCreate {
                name: "Lamp".into(),
                description: "Brass desk lamp".into(),
                price: 30.0,
                category: "Home".into(),
                image: "lamp.png".into(),
                stock: 5,
            })
            .await
            .unwrap()
            .id;

        assert_eq!(products.check_stock(id.clone()).await, Ok(5));
        assert_eq!(products.reserve_stock(id.clone(), 3).await, Ok(2));
        assert_eq!(
            products.reserve_stock(id.clone(), 3).await,
            Err(ProductError::InsufficientStock { requested: 3, available: 2 })
        );
        assert_eq!(products.check_stock(id.clone()).await, Ok(2));
        assert_eq!(products.release_stock(id.clone(), 3).await, Ok(5));
        assert_eq!(
            products.check_stock("product_404".into()).await,
            Err(ProductError::NotFound("product_404".into()))
        );

        system.shutdown().await.unwrap();
    }
}
