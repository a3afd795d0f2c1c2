use crate::domain::{Cart, CartRule};

/// Line mutations. Stock is looked up by the caller and passed in so the cart
/// actor never has to talk to the product actor.
#[derive(Debug, Clone)]
pub enum CartAction {
    AddItem { product_id: String, quantity: u32, stock: u32 },
    SetQuantity { product_id: String, quantity: i64, stock: u32 },
    RemoveItem(String),
    Clear,
}

/// A refused mutation is an `Err` inside a successful action, so the actor
/// keeps the cart as it was and the caller still gets the rule that failed.
pub type CartActionResult = Result<Cart, CartRule>;
