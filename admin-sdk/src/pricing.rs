//! Display-side price arithmetic. The backend's `final_price` is authoritative.

/// `price - price * discount / 100`.
pub fn final_price(price: f64, discount: i64) -> f64 {
    price - (price * discount as f64) / 100.0
}

/// Two-decimal rendering used wherever a price is shown.
pub fn format_price(amount: f64) -> String {
    format!("{amount:.2}")
}
