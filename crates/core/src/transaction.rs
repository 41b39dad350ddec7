//! Payment transaction status handling.
//!
//! Statuses are owned by the payment gateway; the local table only mirrors
//! whatever string the gateway reports. [`PaymentStatus`] classifies the
//! known values so the callback can answer the buyer.

/// Gateway transaction status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentStatus {
    Approved,
    Pending,
    Declined,
    Canceled,
    Expired,
    Other(String),
}

impl PaymentStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "approved" => PaymentStatus::Approved,
            "pending" => PaymentStatus::Pending,
            "declined" => PaymentStatus::Declined,
            "canceled" => PaymentStatus::Canceled,
            "expired" => PaymentStatus::Expired,
            other => PaymentStatus::Other(other.to_string()),
        }
    }

    /// Whether the payment went through.
    pub fn is_success(&self) -> bool {
        matches!(self, PaymentStatus::Approved)
    }

    /// Message reported back to the buyer after the gateway callback.
    pub fn message(&self) -> String {
        match self {
            PaymentStatus::Approved => "Payment approved".to_string(),
            PaymentStatus::Pending => "Payment pending".to_string(),
            PaymentStatus::Declined => "Payment declined".to_string(),
            PaymentStatus::Canceled => "Payment canceled".to_string(),
            PaymentStatus::Expired => "Payment expired".to_string(),
            PaymentStatus::Other(s) => format!("Unknown payment status: {s}"),
        }
    }
}

/// Convert a catalogue price to the integer amount the gateway expects.
pub fn amount_from_price(price: f64) -> i64 {
    price.round() as i64
}
