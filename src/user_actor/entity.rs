use crate::actor_framework::Entity;
use crate::domain::{User, UserCreate, UserPatch};

impl Entity for User {
    type Id = String;
    type CreateParams = UserCreate;
    type Patch = UserPatch;
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new User from creation parameters.
    ///
    /// # Notes
    /// The e-mail is normalized here, so uniqueness is checked on the
    /// lowercased address.
    fn from_create_params(id: String, params: UserCreate) -> Result<Self, String> {
        User::from_params(id, params)
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.email.clone())
    }

    fn on_update(&mut self, patch: UserPatch) -> Result<(), String> {
        self.apply_patch(patch)
    }

    /// Currently, no custom actions are defined for users.
    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
