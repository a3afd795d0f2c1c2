use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{round2, Product};

/// One cart per user; the cart id is the owner's user id.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub user_id: String,
    pub items: Vec<CartItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub product_id: String,
    pub quantity: u32,
}

/// Why a cart mutation was refused.
#[derive(Debug, Clone, PartialEq)]
pub enum CartRule {
    InvalidQuantity,
    ExceedsStock { available: u32 },
    ItemMissing,
}

impl CartRule {
    pub fn message(&self) -> String {
        match self {
            CartRule::InvalidQuantity => "Product ID and valid quantity required".to_string(),
            CartRule::ExceedsStock { available } => {
                format!("Only {available} units available in stock")
            }
            CartRule::ItemMissing => "Item not found in cart".to_string(),
        }
    }
}

impl Cart {
    pub fn empty(user_id: String) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.product_id == product_id)
    }

    /// Adds `quantity` units, merging with an existing line. The merged
    /// quantity may not exceed `stock`.
    pub fn add_item(&mut self, product_id: &str, quantity: u32, stock: u32) -> Result<u32, CartRule> {
        if quantity == 0 {
            return Err(CartRule::InvalidQuantity);
        }
        let merged = match self.position(product_id) {
            Some(index) => self.items[index].quantity.saturating_add(quantity),
            None => quantity,
        };
        if merged > stock {
            return Err(CartRule::ExceedsStock { available: stock });
        }
        match self.position(product_id) {
            Some(index) => self.items[index].quantity = merged,
            None => self.items.push(CartItem {
                product_id: product_id.to_string(),
                quantity,
            }),
        }
        self.updated_at = Utc::now();
        Ok(merged)
    }

    /// Sets the quantity of an existing line; zero or less removes it.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64, stock: u32) -> Result<(), CartRule> {
        let index = self.position(product_id).ok_or(CartRule::ItemMissing)?;
        if quantity <= 0 {
            self.items.remove(index);
        } else {
            if quantity > i64::from(stock) {
                return Err(CartRule::ExceedsStock { available: stock });
            }
            self.items[index].quantity = quantity as u32;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: &str) -> Result<(), CartRule> {
        let index = self.position(product_id).ok_or(CartRule::ItemMissing)?;
        self.items.remove(index);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.updated_at = Utc::now();
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.position(product_id).is_some()
    }

    /// Joins the cart lines with current product records. Lines whose product
    /// no longer exists are dropped from the view.
    pub fn populate(&self, products: &HashMap<String, Product>) -> CartView {
        let items: Vec<CartLine> = self
            .items
            .iter()
            .filter_map(|item| {
                products.get(&item.product_id).map(|product| CartLine {
                    product: product.clone(),
                    quantity: item.quantity,
                })
            })
            .collect();
        let cart_total = round2(items.iter().map(CartLine::line_total).sum());
        let total_items = items.iter().map(|line| u64::from(line.quantity)).sum();
        CartView {
            user: self.user_id.clone(),
            items,
            cart_total,
            total_items,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub user: String,
    pub items: Vec<CartLine>,
    pub cart_total: f64,
    pub total_items: u64,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::sample_product;

    #[test]
    fn test_add_merges_and_respects_stock() {
        let mut cart = Cart::empty("user_1".into());
        assert_eq!(cart.add_item("p1", 2, 5), Ok(2));
        assert_eq!(cart.add_item("p1", 3, 5), Ok(5));
        assert_eq!(
            cart.add_item("p1", 1, 5),
            Err(CartRule::ExceedsStock { available: 5 })
        );
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 5);
    }

    #[test]
    fn test_add_rejects_zero_and_over_stock_new_line() {
        let mut cart = Cart::empty("user_1".into());
        assert_eq!(cart.add_item("p1", 0, 5), Err(CartRule::InvalidQuantity));
        assert_eq!(
            cart.add_item("p1", 6, 5),
            Err(CartRule::ExceedsStock { available: 5 })
        );
        assert!(cart.items.is_empty());
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = Cart::empty("user_1".into());
        cart.add_item("p1", 1, 10).unwrap();

        assert_eq!(cart.set_quantity("p2", 1, 10), Err(CartRule::ItemMissing));
        assert_eq!(
            cart.set_quantity("p1", 11, 10),
            Err(CartRule::ExceedsStock { available: 10 })
        );
        cart.set_quantity("p1", 4, 10).unwrap();
        assert_eq!(cart.items[0].quantity, 4);

        cart.set_quantity("p1", 0, 10).unwrap();
        assert!(cart.items.is_empty());
    }

    #[test]
    fn test_remove_missing_item() {
        let mut cart = Cart::empty("user_1".into());
        assert_eq!(cart.remove_item("p1"), Err(CartRule::ItemMissing));
        assert_eq!(CartRule::ItemMissing.message(), "Item not found in cart");
    }

    #[test]
    fn test_populate_skips_deleted_products() {
        let mut cart = Cart::empty("user_1".into());
        cart.add_item("p1", 2, 10).unwrap();
        cart.add_item("gone", 1, 10).unwrap();
        cart.add_item("p2", 3, 10).unwrap();

        let products: HashMap<String, Product> = [
            sample_product("p1", "Books", 12.5, 10),
            sample_product("p2", "Fashion", 0.1, 10),
        ]
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect();

        let view = cart.populate(&products);
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.total_items, 5);
        assert_eq!(view.cart_total, 25.3);
    }

    #[test]
    fn test_total_items_does_not_overflow() {
        let mut cart = Cart::empty("user_1".into());
        cart.add_item("p1", u32::MAX, u32::MAX).unwrap();
        cart.add_item("p2", u32::MAX, u32::MAX).unwrap();
        let products: HashMap<String, Product> = [
            sample_product("p1", "Books", 1.0, u32::MAX),
            sample_product("p2", "Books", 1.0, u32::MAX),
        ]
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect();

        assert_eq!(cart.populate(&products).total_items, 2 * u64::from(u32::MAX));
    }
}
