#[derive(Debug, Clone)]
pub enum CouponAction {
    /// Counts one redemption; refused once the usage limit is reached.
    RecordUsage,
}
