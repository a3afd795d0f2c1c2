use crate::actor_framework::Entity;
use crate::domain::{Product, ProductCreate, ProductPatch};
use super::actions::{ProductAction, ProductActionResult};

impl Entity for Product {
    type Id = String;
    type CreateParams = ProductCreate;
    type Patch = ProductPatch;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new Product from creation parameters.
    ///
    /// # Arguments
    /// * `id` - Unique identifier for the product
    /// * `params` - Name, description, price, category, image and stock
    fn from_create_params(id: String, params: ProductCreate) -> Result<Self, String> {
        Product::from_params(id, params)
    }

    fn on_update(&mut self, patch: ProductPatch) -> Result<(), String> {
        self.apply_patch(patch)
    }

    /// Handles stock actions.
    ///
    /// `ReserveStock` never drives stock below zero; a short reservation reports
    /// [`ProductActionResult::Insufficient`] and changes nothing.
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, String> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::StockLevel(self.stock)),
            ProductAction::ReserveStock(0) => Err("Quantity must be at least 1".to_string()),
            ProductAction::ReserveStock(amount) => {
                if self.stock >= amount {
                    self.stock -= amount;
                    Ok(ProductActionResult::Reserved { remaining: self.stock })
                } else {
                    Ok(ProductActionResult::Insufficient { available: self.stock })
                }
            }
            ProductAction::ReleaseStock(amount) => {
                self.stock = self.stock.saturating_add(amount);
                Ok(ProductActionResult::Released { stock: self.stock })
            }
        }
    }
}
