use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::coupon_actor::{CouponAction, CouponError};
use crate::domain::{
    normalize_code, Coupon, CouponCreate, CouponLine, CouponPatch, CouponRejection, CouponSummary,
    DiscountQuote,
};
use super::newest_first;

/// Client for interacting with the Coupon actor.
#[derive(Clone)]
pub struct CouponClient {
    inner: ResourceClient<Coupon>,
}

impl_basic_client!(CouponClient, Coupon, CouponError, coupon);

impl CouponClient {
    #[instrument(skip(self, params), fields(code = %params.code))]
    pub async fn create_coupon(&self, params: CouponCreate) -> Result<Coupon, CouponError> {
        debug!("Sending request");
        let id = self.inner.create(params).await?;
        info!(coupon_id = %id, "Coupon created");
        self.get_coupon(id.clone()).await?.ok_or(CouponError::NotFound(id))
    }

    /// Every coupon, newest first.
    #[instrument(skip(self))]
    pub async fn list_coupons(&self) -> Result<Vec<Coupon>, CouponError> {
        debug!("Sending request");
        Ok(newest_first(self.inner.list(None).await?))
    }

    /// Coupons a shopper can use right now.
    #[instrument(skip(self))]
    pub async fn active_coupons(&self, now: DateTime<Utc>) -> Result<Vec<CouponSummary>, CouponError> {
        let coupons = self
            .inner
            .list(Some(Box::new(move |coupon: &Coupon| coupon.is_currently_valid(now))))
            .await?;
        Ok(coupons.iter().map(CouponSummary::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn update_coupon(&self, id: String, patch: CouponPatch) -> Result<Coupon, CouponError> {
        debug!("Sending request");
        Ok(self.inner.update(id, patch).await?)
    }

    #[instrument(skip(self))]
    pub async fn find_by_code(&self, code: String) -> Result<Option<Coupon>, CouponError> {
        let Ok(code) = normalize_code(&code) else {
            return Ok(None);
        };
        let mut matches = self
            .inner
            .list(Some(Box::new(move |coupon: &Coupon| coupon.code == code)))
            .await?;
        Ok(matches.pop())
    }

    /// Checks the coupon against a cart and prices the discount.
    #[instrument(skip(self, lines))]
    pub async fn validate(
        &self,
        code: String,
        cart_total: f64,
        lines: &[CouponLine],
    ) -> Result<DiscountQuote, CouponError> {
        let coupon = self
            .find_by_code(code)
            .await?
            .ok_or(CouponRejection::UnknownCode)?;
        let quote = coupon.evaluate(Utc::now(), cart_total, lines)?;
        info!(discount = quote.discount_amount, "Coupon accepted");
        Ok(quote)
    }

    /// Counts one redemption of `code` and returns the new usage count.
    #[instrument(skip(self))]
    pub async fn record_usage(&self, code: String) -> Result<u32, CouponError> {
        let coupon = self
            .find_by_code(code.clone())
            .await?
            .ok_or(CouponError::NotFound(code))?;
        Ok(self.inner.perform_action(coupon.id, CouponAction::RecordUsage).await?)
    }
}
