use crate::actor_framework::Entity;
use crate::domain::{Coupon, CouponCreate, CouponPatch};
use super::actions::CouponAction;

impl Entity for Coupon {
    type Id = String;
    type CreateParams = CouponCreate;
    type Patch = CouponPatch;
    type Action = CouponAction;
    /// Usage count after the action.
    type ActionResult = u32;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: CouponCreate) -> Result<Self, String> {
        Coupon::from_params(id, params)
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.code.clone())
    }

    /// Re-checks the date window after applying the patch.
    fn on_update(&mut self, patch: CouponPatch) -> Result<(), String> {
        self.apply_patch(patch)
    }

    fn handle_action(&mut self, action: CouponAction) -> Result<u32, String> {
        match action {
            CouponAction::RecordUsage => self.record_usage(),
        }
    }
}
