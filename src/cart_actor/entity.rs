use crate::actor_framework::Entity;
use crate::domain::Cart;
use super::actions::{CartAction, CartActionResult};

/// Params for opening a user's cart.
#[derive(Debug, Clone)]
pub struct CartCreate {
    pub user_id: String,
}

impl Entity for Cart {
    type Id = String;
    type CreateParams = CartCreate;
    type Patch = ();
    type Action = CartAction;
    type ActionResult = CartActionResult;

    fn id(&self) -> &String {
        &self.user_id
    }

    fn from_create_params(id: String, _params: CartCreate) -> Result<Self, String> {
        Ok(Cart::empty(id))
    }

    /// Carts only change through actions.
    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Ok(())
    }

    fn handle_action(&mut self, action: CartAction) -> Result<CartActionResult, String> {
        let outcome = match action {
            CartAction::AddItem { product_id, quantity, stock } => {
                self.add_item(&product_id, quantity, stock).map(|_| ())
            }
            CartAction::SetQuantity { product_id, quantity, stock } => {
                self.set_quantity(&product_id, quantity, stock)
            }
            CartAction::RemoveItem(product_id) => self.remove_item(&product_id),
            CartAction::Clear => {
                self.clear();
                Ok(())
            }
        };
        Ok(outcome.map(|()| self.clone()))
    }
}
