use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{non_negative, required, round2};

pub const COUPON_CODE_MIN: usize = 3;
pub const COUPON_CODE_MAX: usize = 20;
pub const COUPON_CATEGORIES: [&str; 3] = ["Electronics", "Fashion", "Books"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: String,
    pub code: String,
    pub description: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub min_purchase_amount: f64,
    pub max_discount_amount: Option<f64>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub usage_limit: Option<u32>,
    pub used_count: u32,
    pub is_active: bool,
    pub applicable_categories: Vec<String>,
    pub applicable_products: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Accepts RFC 3339 timestamps as well as bare `YYYY-MM-DD` dates (midnight UTC),
/// which is what HTML date inputs submit.
fn flexible_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_datetime(&raw).map_err(serde::de::Error::custom)
}

fn flexible_datetime_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_datetime(&raw).map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

pub fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("Invalid date: {raw}"))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponCreate {
    pub code: String,
    pub description: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub min_purchase_amount: f64,
    #[serde(default)]
    pub max_discount_amount: Option<f64>,
    #[serde(deserialize_with = "flexible_datetime")]
    pub valid_from: DateTime<Utc>,
    #[serde(deserialize_with = "flexible_datetime")]
    pub valid_until: DateTime<Utc>,
    #[serde(default)]
    pub usage_limit: Option<u32>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub applicable_categories: Vec<String>,
    #[serde(default)]
    pub applicable_products: Vec<String>,
}

fn default_active() -> bool {
    true
}

/// Partial update. `maxDiscountAmount` and `usageLimit` can be cleared by
/// sending `null`, hence the nested options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponPatch {
    pub code: Option<String>,
    pub description: Option<String>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<f64>,
    pub min_purchase_amount: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub max_discount_amount: Option<Option<f64>>,
    #[serde(default, deserialize_with = "flexible_datetime_opt")]
    pub valid_from: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "flexible_datetime_opt")]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable")]
    pub usage_limit: Option<Option<u32>>,
    pub is_active: Option<bool>,
    pub applicable_categories: Option<Vec<String>>,
    pub applicable_products: Option<Vec<String>>,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub fn normalize_code(code: &str) -> Result<String, String> {
    let code = required("Coupon code", code)?.to_uppercase();
    let len = code.chars().count();
    if len < COUPON_CODE_MIN {
        return Err(format!("Code must be at least {COUPON_CODE_MIN} characters"));
    }
    if len > COUPON_CODE_MAX {
        return Err(format!("Code cannot exceed {COUPON_CODE_MAX} characters"));
    }
    Ok(code)
}

fn normalize_categories(categories: Vec<String>) -> Result<Vec<String>, String> {
    let mut kept = Vec::new();
    for category in categories {
        let category = category.trim();
        if category.is_empty() {
            continue;
        }
        if !COUPON_CATEGORIES.contains(&category) {
            return Err(format!(
                "Invalid category \"{category}\". Must be one of: {}",
                COUPON_CATEGORIES.join(", ")
            ));
        }
        if !kept.iter().any(|c| c == category) {
            kept.push(category.to_string());
        }
    }
    Ok(kept)
}

fn check_usage_limit(limit: Option<u32>) -> Result<Option<u32>, String> {
    match limit {
        Some(0) => Err("Usage limit must be at least 1".to_string()),
        other => Ok(other),
    }
}

fn check_max_discount(max: Option<f64>) -> Result<Option<f64>, String> {
    max.map(|m| non_negative("Max discount", m)).transpose()
}

/// Why a coupon cannot be applied to a cart, in the order the checks run.
#[derive(Debug, Clone, PartialEq)]
pub enum CouponRejection {
    UnknownCode,
    Inactive,
    NotYetValid(DateTime<Utc>),
    Expired,
    UsageLimitReached,
    BelowMinimum(f64),
    CategoryMismatch(Vec<String>),
    ProductMismatch,
}

impl CouponRejection {
    pub fn message(&self) -> String {
        match self {
            CouponRejection::UnknownCode => "Invalid coupon code".to_string(),
            CouponRejection::Inactive => "This coupon is currently inactive".to_string(),
            CouponRejection::NotYetValid(from) => {
                format!("Coupon valid from {}", from.format("%Y-%m-%d"))
            }
            CouponRejection::Expired => "This coupon has expired".to_string(),
            CouponRejection::UsageLimitReached => "Coupon usage limit reached".to_string(),
            CouponRejection::BelowMinimum(min) => format!("Minimum purchase of ₹{min} required"),
            CouponRejection::CategoryMismatch(categories) => {
                format!("Coupon only applicable to: {}", categories.join(", "))
            }
            CouponRejection::ProductMismatch => "Coupon not applicable to items in cart".to_string(),
        }
    }
}

/// The cart facts a coupon restriction looks at.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponLine {
    pub product_id: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountQuote {
    pub code: String,
    pub description: String,
    pub discount_amount: f64,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub final_amount: f64,
}

/// Public listing shape; product restrictions stay internal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponSummary {
    pub id: String,
    pub code: String,
    pub description: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub min_purchase_amount: f64,
    pub max_discount_amount: Option<f64>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub applicable_categories: Vec<String>,
}

impl From<&Coupon> for CouponSummary {
    fn from(coupon: &Coupon) -> Self {
        Self {
            id: coupon.id.clone(),
            code: coupon.code.clone(),
            description: coupon.description.clone(),
            discount_type: coupon.discount_type,
            discount_value: coupon.discount_value,
            min_purchase_amount: coupon.min_purchase_amount,
            max_discount_amount: coupon.max_discount_amount,
            valid_from: coupon.valid_from,
            valid_until: coupon.valid_until,
            applicable_categories: coupon.applicable_categories.clone(),
        }
    }
}

impl Coupon {
    pub fn from_params(id: String, params: CouponCreate) -> Result<Self, String> {
        let now = Utc::now();
        let coupon = Self {
            id,
            code: normalize_code(&params.code)?,
            description: required("Description", &params.description)?,
            discount_type: params.discount_type,
            discount_value: non_negative("Discount value", params.discount_value)?,
            min_purchase_amount: non_negative("Minimum purchase", params.min_purchase_amount)?,
            max_discount_amount: check_max_discount(params.max_discount_amount)?,
            valid_from: params.valid_from,
            valid_until: params.valid_until,
            usage_limit: check_usage_limit(params.usage_limit)?,
            used_count: 0,
            is_active: params.is_active,
            applicable_categories: normalize_categories(params.applicable_categories)?,
            applicable_products: params.applicable_products,
            created_at: now,
            updated_at: now,
        };
        coupon.check_date_range()?;
        Ok(coupon)
    }

    pub fn check_date_range(&self) -> Result<(), String> {
        if self.valid_until <= self.valid_from {
            Err("Valid until date must be after valid from date".to_string())
        } else {
            Ok(())
        }
    }

    pub fn apply_patch(&mut self, patch: CouponPatch) -> Result<(), String> {
        if let Some(code) = patch.code {
            self.code = normalize_code(&code)?;
        }
        if let Some(description) = patch.description {
            self.description = required("Description", &description)?;
        }
        if let Some(kind) = patch.discount_type {
            self.discount_type = kind;
        }
        if let Some(value) = patch.discount_value {
            self.discount_value = non_negative("Discount value", value)?;
        }
        if let Some(min) = patch.min_purchase_amount {
            self.min_purchase_amount = non_negative("Minimum purchase", min)?;
        }
        if let Some(max) = patch.max_discount_amount {
            self.max_discount_amount = check_max_discount(max)?;
        }
        if let Some(from) = patch.valid_from {
            self.valid_from = from;
        }
        if let Some(until) = patch.valid_until {
            self.valid_until = until;
        }
        if let Some(limit) = patch.usage_limit {
            self.usage_limit = check_usage_limit(limit)?;
        }
        if let Some(active) = patch.is_active {
            self.is_active = active;
        }
        if let Some(categories) = patch.applicable_categories {
            self.applicable_categories = normalize_categories(categories)?;
        }
        if let Some(products) = patch.applicable_products {
            self.applicable_products = products;
        }
        self.check_date_range()?;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn limit_reached(&self) -> bool {
        self.usage_limit.is_some_and(|limit| self.used_count >= limit)
    }

    pub fn is_currently_valid(&self, now: DateTime<Utc>) -> bool {
        self.is_active && now >= self.valid_from && now <= self.valid_until && !self.limit_reached()
    }

    /// Discount for `cart_total` before rounding: percentage or fixed, capped by
    /// `max_discount_amount` (when positive) and by the cart total itself.
    pub fn discount_for(&self, cart_total: f64) -> f64 {
        let mut discount = match self.discount_type {
            DiscountType::Percentage => self.discount_value / 100.0 * cart_total,
            DiscountType::Fixed => self.discount_value,
        };
        if let Some(max) = self.max_discount_amount.filter(|max| *max > 0.0) {
            discount = discount.min(max);
        }
        discount.min(cart_total).max(0.0)
    }

    /// Runs every eligibility check against the cart and prices the discount.
    pub fn evaluate(
        &self,
        now: DateTime<Utc>,
        cart_total: f64,
        lines: &[CouponLine],
    ) -> Result<DiscountQuote, CouponRejection> {
        if !self.is_active {
            return Err(CouponRejection::Inactive);
        }
        if now < self.valid_from {
            return Err(CouponRejection::NotYetValid(self.valid_from));
        }
        if now > self.valid_until {
            return Err(CouponRejection::Expired);
        }
        if self.limit_reached() {
            return Err(CouponRejection::UsageLimitReached);
        }
        if cart_total < self.min_purchase_amount {
            return Err(CouponRejection::BelowMinimum(self.min_purchase_amount));
        }
        if !self.applicable_categories.is_empty()
            && !lines
                .iter()
                .any(|line| self.applicable_categories.contains(&line.category))
        {
            return Err(CouponRejection::CategoryMismatch(self.applicable_categories.clone()));
        }
        if !self.applicable_products.is_empty()
            && !lines
                .iter()
                .any(|line| self.applicable_products.contains(&line.product_id))
        {
            return Err(CouponRejection::ProductMismatch);
        }

        let discount = self.discount_for(cart_total);
        Ok(DiscountQuote {
            code: self.code.clone(),
            description: self.description.clone(),
            discount_amount: round2(discount),
            discount_type: self.discount_type,
            discount_value: self.discount_value,
            final_amount: round2(cart_total - discount),
        })
    }

    pub fn record_usage(&mut self) -> Result<u32, String> {
        if self.limit_reached() {
            return Err(CouponRejection::UsageLimitReached.message());
        }
        self.used_count += 1;
        self.updated_at = Utc::now();
        Ok(self.used_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn params(kind: DiscountType, value: f64) -> CouponCreate {
        let now = Utc::now();
        CouponCreate {
            code: " save10 ".into(),
            description: "Ten off".into(),
            discount_type: kind,
            discount_value: value,
            min_purchase_amount: 100.0,
            max_discount_amount: None,
            valid_from: now - Duration::days(1),
            valid_until: now + Duration::days(1),
            usage_limit: None,
            is_active: true,
            applicable_categories: Vec::new(),
            applicable_products: Vec::new(),
        }
    }

    fn coupon(kind: DiscountType, value: f64) -> Coupon {
        Coupon::from_params("coupon_1".into(), params(kind, value)).unwrap()
    }

    fn line(product_id: &str, category: &str) -> CouponLine {
        CouponLine {
            product_id: product_id.into(),
            category: category.into(),
        }
    }

    #[test]
    fn test_code_is_trimmed_and_uppercased() {
        assert_eq!(coupon(DiscountType::Fixed, 5.0).code, "SAVE10");
        assert!(normalize_code("ab").is_err());
        assert!(normalize_code(&"x".repeat(21)).is_err());
    }

    #[test]
    fn test_date_range_must_be_ordered() {
        let mut p = params(DiscountType::Fixed, 5.0);
        p.valid_until = p.valid_from;
        assert_eq!(
            Coupon::from_params("c".into(), p).unwrap_err(),
            "Valid until date must be after valid from date"
        );

        let mut c = coupon(DiscountType::Fixed, 5.0);
        let patch = CouponPatch {
            valid_until: Some(c.valid_from - Duration::hours(1)),
            ..Default::default()
        };
        assert!(c.apply_patch(patch).is_err());
    }

    #[test]
    fn test_usage_limit_and_categories_validated() {
        let mut p = params(DiscountType::Fixed, 5.0);
        p.usage_limit = Some(0);
        assert!(Coupon::from_params("c".into(), p).is_err());

        let mut p = params(DiscountType::Fixed, 5.0);
        p.applicable_categories = vec!["Books".into(), "".into(), "Books".into()];
        assert_eq!(
            Coupon::from_params("c".into(), p).unwrap().applicable_categories,
            vec!["Books".to_string()]
        );

        let mut p = params(DiscountType::Fixed, 5.0);
        p.applicable_categories = vec!["Garden".into()];
        assert!(Coupon::from_params("c".into(), p).is_err());
    }

    #[test]
    fn test_percentage_discount_capped_at_max() {
        let mut c = coupon(DiscountType::Percentage, 50.0);
        c.max_discount_amount = Some(30.0);
        let quote = c.evaluate(Utc::now(), 200.0, &[line("p1", "Books")]).unwrap();
        assert_eq!(quote.discount_amount, 30.0);
        assert_eq!(quote.final_amount, 170.0);
    }

    #[test]
    fn test_zero_max_discount_means_uncapped() {
        let mut c = coupon(DiscountType::Percentage, 10.0);
        c.max_discount_amount = Some(0.0);
        assert_eq!(c.discount_for(250.0), 25.0);
    }

    #[test]
    fn test_fixed_discount_capped_at_cart_total() {
        let mut c = coupon(DiscountType::Fixed, 500.0);
        c.min_purchase_amount = 0.0;
        let quote = c.evaluate(Utc::now(), 120.0, &[]).unwrap();
        assert_eq!(quote.discount_amount, 120.0);
        assert_eq!(quote.final_amount, 0.0);
    }

    #[test]
    fn test_discount_is_rounded() {
        let mut c = coupon(DiscountType::Percentage, 12.5);
        c.min_purchase_amount = 0.0;
        let quote = c.evaluate(Utc::now(), 33.33, &[]).unwrap();
        assert_eq!(quote.discount_amount, 4.17);
        assert_eq!(quote.final_amount, 29.16);
    }

    #[test]
    fn test_rejections_in_order() {
        let now = Utc::now();
        let mut c = coupon(DiscountType::Fixed, 5.0);

        c.is_active = false;
        assert_eq!(c.evaluate(now, 500.0, &[]), Err(CouponRejection::Inactive));
        c.is_active = true;

        assert_eq!(
            c.evaluate(now - Duration::days(2), 500.0, &[]),
            Err(CouponRejection::NotYetValid(c.valid_from))
        );
        assert_eq!(
            c.evaluate(now + Duration::days(2), 500.0, &[]),
            Err(CouponRejection::Expired)
        );

        c.usage_limit = Some(1);
        c.used_count = 1;
        assert_eq!(c.evaluate(now, 500.0, &[]), Err(CouponRejection::UsageLimitReached));
        c.usage_limit = None;

        assert_eq!(c.evaluate(now, 99.99, &[]), Err(CouponRejection::BelowMinimum(100.0)));
        assert_eq!(
            CouponRejection::BelowMinimum(100.0).message(),
            "Minimum purchase of ₹100 required"
        );
    }

    #[test]
    fn test_category_and_product_restrictions() {
        let now = Utc::now();
        let mut c = coupon(DiscountType::Fixed, 5.0);
        c.applicable_categories = vec!["Books".into(), "Fashion".into()];

        let err = c.evaluate(now, 200.0, &[line("p1", "Electronics")]).unwrap_err();
        assert_eq!(err.message(), "Coupon only applicable to: Books, Fashion");
        assert!(c
            .evaluate(now, 200.0, &[line("p1", "Electronics"), line("p2", "Books")])
            .is_ok());

        c.applicable_categories.clear();
        c.applicable_products = vec!["p9".into()];
        assert_eq!(
            c.evaluate(now, 200.0, &[line("p1", "Books")]),
            Err(CouponRejection::ProductMismatch)
        );
        assert!(c.evaluate(now, 200.0, &[line("p9", "Books")]).is_ok());
    }

    #[test]
    fn test_record_usage_respects_limit() {
        let mut c = coupon(DiscountType::Fixed, 5.0);
        c.usage_limit = Some(2);
        assert_eq!(c.record_usage(), Ok(1));
        assert_eq!(c.record_usage(), Ok(2));
        assert!(c.record_usage().is_err());
        assert!(!c.is_currently_valid(Utc::now()));
    }

    #[test]
    fn test_patch_can_clear_nullable_fields() {
        let mut c = coupon(DiscountType::Fixed, 5.0);
        c.usage_limit = Some(3);
        let patch: CouponPatch = serde_json::from_str(r#"{"usageLimit": null}"#).unwrap();
        c.apply_patch(patch).unwrap();
        assert_eq!(c.usage_limit, None);

        let untouched: CouponPatch = serde_json::from_str(r#"{"description": "New"}"#).unwrap();
        assert!(untouched.usage_limit.is_none());
    }

    #[test]
    fn test_parse_bare_dates() {
        let parsed = parse_datetime("2026-01-31").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-01-31T00:00:00+00:00");
        assert!(parse_datetime("31/01/2026").is_err());
    }
}
