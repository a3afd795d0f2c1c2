use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate};
use super::actions::OrderAction;

impl Entity for Order {
    type Id = String;
    type CreateParams = OrderCreate;
    type Patch = (); // Orders change through actions only
    type Action = OrderAction;
    type ActionResult = Order;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new Order from checked, priced params.
    ///
    /// # Notes
    /// The order starts `Pending` with payment `Pending`, whatever the payment method.
    fn from_create_params(id: String, params: OrderCreate) -> Result<Self, String> {
        Order::from_params(id, params)
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Ok(())
    }

    fn handle_action(&mut self, action: OrderAction) -> Result<Order, String> {
        match action {
            OrderAction::SetStatus(status) => self.set_status(status),
            OrderAction::MarkPaid => self.mark_paid(),
        }
        Ok(self.clone())
    }
}
