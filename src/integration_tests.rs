#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use tokio::sync::mpsc;

    use crate::actor_framework::ResourceRequest;
    use crate::cart_actor::CartAction;
    use crate::clients::{CartClient, CouponClient, OrderClient, PlaceOrder, ProductClient, UserClient};
    use crate::coupon_actor::CouponAction;
    use crate::domain::product::sample_product;
    use crate::domain::{
        Cart, Coupon, CouponCreate, DiscountType, Order, OrderItem, PaymentMethod, Product,
        ShippingAddress, User,
    };
    use crate::mock_framework::{answer_list, create_mock_client, expect_action, expect_create, expect_get};
    use crate::order_actor::OrderError;
    use crate::product_actor::{ProductAction, ProductActionResult};

    struct Mocks {
        products: mpsc::Receiver<ResourceRequest<Product>>,
        coupons: mpsc::Receiver<ResourceRequest<Coupon>>,
        carts: mpsc::Receiver<ResourceRequest<Cart>>,
        orders: mpsc::Receiver<ResourceRequest<Order>>,
    }

    fn order_client() -> (OrderClient, Mocks) {
        let (user_inner, _user_rx) = create_mock_client::<User>(10);
        let (product_inner, products) = create_mock_client::<Product>(10);
        let (coupon_inner, coupons) = create_mock_client::<Coupon>(10);
        let (cart_inner, carts) = create_mock_client::<Cart>(10);
        let (order_inner, orders) = create_mock_client::<Order>(10);

        let product_client = ProductClient::new(product_inner);
        let client = OrderClient::new(
            order_inner,
            UserClient::new(user_inner),
            product_client.clone(),
            CouponClient::new(coupon_inner),
            CartClient::new(cart_inner, product_client),
            0.18,
        );
        (client, Mocks { products, coupons, carts, orders })
    }

    fn item(product_id: &str, price: f64, quantity: u32) -> OrderItem {
        OrderItem {
            product_id: product_id.into(),
            name: format!("Product {product_id}"),
            image: String::new(),
            price,
            quantity,
        }
    }

    fn form(items: Vec<OrderItem>, coupon_code: Option<&str>) -> PlaceOrder {
        PlaceOrder {
            order_items: items,
            shipping_address: Some(ShippingAddress {
                street: "12 MG Road".into(),
                city: "Bengaluru".into(),
                state: "KA".into(),
                zip_code: "560001".into(),
                country: "India".into(),
            }),
            payment_method: Some(PaymentMethod::Card),
            coupon_code: coupon_code.map(str::to_string),
        }
    }

    fn save10() -> Coupon {
        let now = Utc::now();
        Coupon::from_params(
            "coupon_1".into(),
            CouponCreate {
                code: "save10".into(),
                description: "Ten percent off".into(),
                discount_type: DiscountType::Percentage,
                discount_value: 10.0,
                min_purchase_amount: 100.0,
                max_discount_amount: None,
                valid_from: now - Duration::days(1),
                valid_until: now + Duration::days(30),
                usage_limit: Some(5),
                is_active: true,
                applicable_categories: vec!["Books".into()],
                applicable_products: Vec::new(),
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_order_placement_flow() {
        // 1. Setup Mocks
        let (order_client, mut mocks) = order_client();

        // 2. Execute Order Placement in background
        let order_task = tokio::spawn(async move {
            order_client
                .place_order("user_1".into(), form(vec![item("p1", 100.0, 2)], Some(" save10 ")))
                .await
        });

        // 3. Verify Interactions

        // Catalog lookup
        assert!(answer_list(&mut mocks.products, vec![sample_product("p1", "Books", 100.0, 5)]).await);

        // Coupon lookup by code
        assert!(answer_list(&mut mocks.coupons, vec![save10()]).await);

        // Stock reservation
        let (product_id, action, responder) =
            expect_action(&mut mocks.products).await.expect("Expected Product Action");
        assert_eq!(product_id, "p1");
        match action {
            ProductAction::ReserveStock(qty) => assert_eq!(qty, 2),
            _ => panic!("Unexpected action: {:?}", action),
        }
        responder.send(Ok(ProductActionResult::Reserved { remaining: 3 })).unwrap();

        // Order create, priced server-side
        let (payload, responder) = expect_create(&mut mocks.orders).await.expect("Expected Order Create");
        assert_eq!(payload.user_id, "user_1");
        assert_eq!(payload.totals.subtotal, 200.0);
        assert_eq!(payload.totals.discount, 20.0);
        assert_eq!(payload.totals.tax, 32.4);
        assert_eq!(payload.totals.total_amount, 212.4);
        assert_eq!(payload.coupon_code.as_deref(), Some("SAVE10"));
        let stored = Order::from_params("order_1".into(), payload).unwrap();
        responder.send(Ok("order_1".to_string())).unwrap();

        let (order_id, responder) = expect_get(&mut mocks.orders).await.expect("Expected Order Get");
        assert_eq!(order_id, "order_1");
        responder.send(Ok(Some(stored))).unwrap();

        // Coupon usage
        assert!(answer_list(&mut mocks.coupons, vec![save10()]).await);
        let (coupon_id, action, responder) =
            expect_action(&mut mocks.coupons).await.expect("Expected Coupon Action");
        assert_eq!(coupon_id, "coupon_1");
        assert!(matches!(action, CouponAction::RecordUsage));
        responder.send(Ok(1)).unwrap();

        // Cart cleared
        let (cart_id, action, responder) = expect_action(&mut mocks.carts).await.expect("Expected Cart Action");
        assert_eq!(cart_id, "user_1");
        assert!(matches!(action, CartAction::Clear));
        responder.send(Ok(Ok(Cart::empty("user_1".into())))).unwrap();

        // 4. Verify Result
        let order = order_task.await.unwrap().unwrap();
        assert_eq!(order.id, "order_1");
        assert_eq!(order.total_amount, 212.4);
        assert_eq!(order.order_items[0].name, "Product p1");
    }

    #[tokio::test]
    async fn test_failed_reservation_releases_earlier_ones() {
        let (order_client, mut mocks) = order_client();

        let order_task = tokio::spawn(async move {
            order_client
                .place_order(
                    "user_1".into(),
                    form(vec![item("p1", 10.0, 1), item("p2", 20.0, 2)], None),
                )
                .await
        });

        assert!(
            answer_list(
                &mut mocks.products,
                vec![sample_product("p1", "Books", 10.0, 5), sample_product("p2", "Books", 20.0, 5)],
            )
            .await
        );

        let (_, _, responder) = expect_action(&mut mocks.products).await.expect("Reserve p1");
        responder.send(Ok(ProductActionResult::Reserved { remaining: 4 })).unwrap();

        // Someone else bought p2 in the meantime
        let (product_id, _, responder) = expect_action(&mut mocks.products).await.expect("Reserve p2");
        assert_eq!(product_id, "p2");
        responder.send(Ok(ProductActionResult::Insufficient { available: 1 })).unwrap();

        let (product_id, action, responder) = expect_action(&mut mocks.products).await.expect("Release p1");
        assert_eq!(product_id, "p1");
        assert!(matches!(action, ProductAction::ReleaseStock(1)));
        responder.send(Ok(ProductActionResult::Released { stock: 5 })).unwrap();

        let result = order_task.await.unwrap();
        assert_eq!(
            result,
            Err(OrderError::InsufficientStock { name: "Product p2".into(), available: 1 })
        );
        assert!(mocks.orders.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_rejected_coupon_stops_before_reservation() {
        let (order_client, mut mocks) = order_client();

        // Below the coupon's 100.0 minimum
        let order_task = tokio::spawn(async move {
            order_client
                .place_order("user_1".into(), form(vec![item("p1", 40.0, 1)], Some("SAVE10")))
                .await
        });

        assert!(answer_list(&mut mocks.products, vec![sample_product("p1", "Books", 40.0, 5)]).await);
        assert!(answer_list(&mut mocks.coupons, vec![save10()]).await);

        let result = order_task.await.unwrap();
        assert_eq!(
            result,
            Err(OrderError::Coupon("Minimum purchase of ₹100 required".into()))
        );
        assert!(mocks.products.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_missing_address_rejected_without_actor_calls() {
        let (order_client, mut mocks) = order_client();
        let mut incomplete = form(vec![item("p1", 10.0, 1)], None);
        incomplete.shipping_address = None;

        let result = order_client.place_order("user_1".into(), incomplete).await;
        assert_eq!(
            result,
            Err(OrderError::ValidationError("Complete shipping address is required".into()))
        );
        assert!(mocks.products.try_recv().is_err());
    }
}
