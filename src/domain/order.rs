use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{round2, User};

pub const DEFAULT_COUNTRY: &str = "India";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.to_string() == raw)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cod,
    Card,
    Upi,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(alias = "product")]
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub price: f64,
    pub quantity: u32,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

impl ShippingAddress {
    /// Trims every field; fails unless street, city, state and zip are present.
    pub fn normalized(&self) -> Result<Self, String> {
        let trimmed = Self {
            street: self.street.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            zip_code: self.zip_code.trim().to_string(),
            country: match self.country.trim() {
                "" => default_country(),
                country => country.to_string(),
            },
        };
        if [&trimmed.street, &trimmed.city, &trimmed.state, &trimmed.zip_code]
            .iter()
            .any(|field| field.is_empty())
        {
            return Err("Complete shipping address is required".to_string());
        }
        Ok(trimmed)
    }
}

/// Server-side price breakdown of an order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub discount: f64,
    pub tax: f64,
    pub total_amount: f64,
}

impl OrderTotals {
    /// Tax applies to the discounted subtotal; every figure is rounded to two decimals.
    pub fn compute(items: &[OrderItem], discount: f64, tax_rate: f64) -> Self {
        let subtotal = round2(items.iter().map(OrderItem::line_total).sum());
        let discount = round2(discount.clamp(0.0, subtotal));
        let tax = round2((subtotal - discount) * tax_rate);
        Self {
            subtotal,
            discount,
            tax,
            total_amount: round2(subtotal - discount + tax),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user: String,
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub subtotal: f64,
    pub discount: f64,
    pub coupon_code: Option<String>,
    pub tax: f64,
    pub total_amount: f64,
    pub order_status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub is_delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Params for storing a checked, priced order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub totals: OrderTotals,
    pub coupon_code: Option<String>,
}

impl Order {
    pub fn from_params(id: String, params: OrderCreate) -> Result<Self, String> {
        if params.items.is_empty() {
            return Err("No order items provided".to_string());
        }
        if params.items.iter().any(|item| item.quantity == 0) {
            return Err("Quantity must be at least 1".to_string());
        }
        let now = Utc::now();
        Ok(Self {
            id,
            user: params.user_id,
            order_items: params.items,
            shipping_address: params.shipping_address.normalized()?,
            payment_method: params.payment_method,
            subtotal: params.totals.subtotal,
            discount: params.totals.discount,
            coupon_code: params.coupon_code.map(|code| code.trim().to_uppercase()),
            tax: params.totals.tax,
            total_amount: params.totals.total_amount,
            order_status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            is_paid: false,
            paid_at: None,
            is_delivered: false,
            delivered_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn set_status(&mut self, status: OrderStatus) {
        self.order_status = status;
        if status == OrderStatus::Delivered && !self.is_delivered {
            self.is_delivered = true;
            self.delivered_at = Some(Utc::now());
        }
        self.updated_at = Utc::now();
    }

    pub fn mark_paid(&mut self) {
        self.is_paid = true;
        self.paid_at = Some(Utc::now());
        self.payment_status = PaymentStatus::Paid;
        self.updated_at = Utc::now();
    }

    pub fn item_count(&self) -> u64 {
        self.order_items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

/// Who placed an order, as shown in admin listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for Customer {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub item_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
}

impl OrderView {
    pub fn new(order: Order, customer: Option<Customer>) -> Self {
        Self {
            item_count: order.item_count(),
            order,
            customer,
        }
    }
}
