/// Custom actions for Product records.
///
/// These actions represent stock operations that go beyond the plain
/// create/update/delete requests.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Reads the current stock level without modifying it.
    CheckStock,
    /// Takes `u32` units out of stock when at least that many are available.
    ReserveStock(u32),
    /// Puts `u32` previously reserved units back.
    ReleaseStock(u32),
}

/// Results from ProductActions
#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    StockLevel(u32),
    Reserved { remaining: u32 },
    /// Nothing was taken; `available` is the stock at the time of the request.
    Insufficient { available: u32 },
    Released { stock: u32 },
}
