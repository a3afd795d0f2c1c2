use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::required;

pub const PASSWORD_MIN_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Represents a registered user in the system.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Params for storing a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Stored-field update for an existing user.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

/// What the API exposes about a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

pub fn normalize_email(email: &str) -> Result<String, String> {
    let email = required("Email", email)?.to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err("Please provide a valid email".to_string()),
    }
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        Err(format!("Password must be at least {PASSWORD_MIN_LEN} characters"))
    } else {
        Ok(())
    }
}

impl User {
    pub fn from_params(id: String, params: UserCreate) -> Result<Self, String> {
        let now = Utc::now();
        Ok(Self {
            id,
            name: required("Name", &params.name)?,
            email: normalize_email(&params.email)?,
            password_hash: params.password_hash,
            role: params.role,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_patch(&mut self, patch: UserPatch) -> Result<(), String> {
        if let Some(name) = patch.name {
            self.name = required("Name", &name)?;
        }
        if let Some(email) = patch.email {
            self.email = normalize_email(&email)?;
        }
        if let Some(hash) = patch.password_hash {
            self.password_hash = hash;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email(" Ana@Shop.IO "), Ok("ana@shop.io".to_string()));
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("@shop.io").is_err());
        assert!(normalize_email("").is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn test_view_hides_hash() {
        let user = User::from_params(
            "user_1".into(),
            UserCreate {
                name: "Ana".into(),
                email: "ana@shop.io".into(),
                password_hash: "secret-hash".into(),
                role: Role::Admin,
            },
        )
        .unwrap();
        let json = serde_json::to_value(UserView::from(&user)).unwrap();
        assert_eq!(json["role"], "admin");
        assert!(json.get("passwordHash").is_none());
        assert!(user.is_admin());
    }
}
