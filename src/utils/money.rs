// Utilitários para comissão e taxas, todos os valores em centavos

/// Percentage the gateway is expected to keep before it reports a real fee.
pub const ESTIMATED_FEE_RATE: f64 = 0.03;
/// Fixed per-transaction charge added on top of the estimated rate.
pub const ESTIMATED_FIXED_FEE_CENTS: i64 = 100;
pub const ESTIMATED_COMMISSION_RATE: f64 = 0.97;

/// Rounds halves toward positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn calculate_fee(amount: i64, fee_rate: f64) -> i64 {
    round_half_up(amount as f64 * fee_rate)
}

/// Fee estimate used when the charge is created, before the gateway has
/// computed the real one.
pub fn estimated_gateway_fee(amount: i64) -> i64 {
    calculate_fee(amount, ESTIMATED_FEE_RATE) + ESTIMATED_FIXED_FEE_CENTS
}

/// Not the complement of [`estimated_gateway_fee`]; the fixed fee is not
/// deducted here.
pub fn estimated_user_commission(amount: i64) -> i64 {
    calculate_fee(amount, ESTIMATED_COMMISSION_RATE)
}

pub fn reported_user_commission(amount: i64, reported_fee: i64) -> i64 {
    amount - reported_fee
}

pub fn format_currency(amount: i64) -> String {
    format!("R$ {:.2}", amount as f64 / 100.0)
}
