use std::collections::{HashMap, HashSet};

use tracing::{debug, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::auth::{hash_password, verify_password};
use crate::domain::{normalize_email, validate_password, Role, User, UserCreate, UserPatch};
use crate::user_actor::UserError;

/// Registration form.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Profile changes requested by the user; the password arrives in clear text.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl_basic_client!(UserClient, User, UserError, user);

async fn hash_off_thread(password: String) -> Result<String, UserError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| UserError::Hashing(e.to_string()))?
        .map_err(|e| UserError::Hashing(e.to_string()))
}

impl UserClient {
    /// Validates the form, hashes the password and stores the user.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: Registration, role: Role) -> Result<User, UserError> {
        debug!("Sending request");
        validate_password(&registration.password).map_err(UserError::ValidationError)?;
        let password_hash = hash_off_thread(registration.password).await?;

        let id = self
            .inner
            .create(UserCreate {
                name: registration.name,
                email: registration.email,
                password_hash,
                role,
            })
            .await?;
        info!(user_id = %id, "User registered");
        self.require(id).await
    }

    pub async fn require(&self, id: String) -> Result<User, UserError> {
        self.get_user(id.clone()).await?.ok_or(UserError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: String) -> Result<Option<User>, UserError> {
        let Ok(email) = normalize_email(&email) else {
            return Ok(None);
        };
        let mut matches = self
            .inner
            .list(Some(Box::new(move |user: &User| user.email == email)))
            .await?;
        Ok(matches.pop())
    }

    /// Checks e-mail and password; both failure modes look the same to the caller.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: String, password: String) -> Result<User, UserError> {
        let Some(user) = self.find_by_email(email).await? else {
            warn!("Login for unknown email");
            return Err(UserError::InvalidCredentials);
        };
        let hash = user.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| UserError::Hashing(e.to_string()))?
            .map_err(|e| UserError::Hashing(e.to_string()))?;
        if !valid {
            warn!(user_id = %user.id, "Wrong password");
            return Err(UserError::InvalidCredentials);
        }
        Ok(user)
    }

    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, id: String, update: ProfileUpdate) -> Result<User, UserError> {
        debug!("Sending request");
        let password_hash = match update.password {
            Some(password) => {
                validate_password(&password).map_err(UserError::ValidationError)?;
                Some(hash_off_thread(password).await?)
            }
            None => None,
        };
        let patch = UserPatch {
            name: update.name,
            email: update.email,
            password_hash,
        };
        Ok(self.inner.update(id, patch).await?)
    }

    pub async fn users_by_id(&self, ids: HashSet<String>) -> Result<HashMap<String, User>, UserError> {
        let users = self
            .inner
            .list(Some(Box::new(move |user: &User| ids.contains(&user.id))))
            .await?;
        Ok(users.into_iter().map(|u| (u.id.clone(), u)).collect())
    }

    /// Creates the configured admin account unless the e-mail is already taken.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn seed_admin(&self, registration: Registration) -> Result<(), UserError> {
        match self.register(registration, Role::Admin).await {
            Ok(user) => {
                info!(user_id = %user.id, "Admin account seeded");
                Ok(())
            }
            Err(UserError::AlreadyExists(_)) => {
                info!("Admin account already present");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
