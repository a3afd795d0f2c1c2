//! Storefront records and the pure business rules over them.
//!
//! Nothing in here talks to an actor or to HTTP; the rules are plain functions
//! so they can be tested without a runtime.

pub mod cart;
pub mod coupon;
pub mod order;
pub mod product;
pub mod user;

pub use cart::*;
pub use coupon::*;
pub use order::*;
pub use product::*;
pub use user::*;

/// Rounds a currency amount to two decimals.
pub fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Trims `value` and fails with "`<label>` is required" when nothing is left.
pub(crate) fn required(label: &str, value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(format!("{label} is required"))
    } else {
        Ok(trimmed.to_string())
    }
}

pub(crate) fn non_negative(label: &str, value: f64) -> Result<f64, String> {
    if !value.is_finite() || value < 0.0 {
        Err(format!("{label} cannot be negative"))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(10.005_f64 + 0.0001), 10.01);
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_required_trims() {
        assert_eq!(required("Name", "  Lamp "), Ok("Lamp".to_string()));
        assert_eq!(required("Name", "   "), Err("Name is required".to_string()));
    }

    #[test]
    fn test_non_negative() {
        assert!(non_negative("Price", -0.01).is_err());
        assert!(non_negative("Price", f64::NAN).is_err());
        assert_eq!(non_negative("Price", 0.0), Ok(0.0));
    }
}
