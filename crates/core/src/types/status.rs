//! Status enums for orders and trader applications.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Payment status of an order.
///
/// Orders are created in `Created` when checkout begins, move to `Paid`
/// once the gateway signature verifies, or `Failed` when verification is
/// rejected. Abandoned checkouts simply stay in `Created`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "payment_status", rename_all = "lowercase")
)]
pub enum PaymentStatus {
    #[default]
    Created,
    Paid,
    Failed,
}

impl PaymentStatus {
    /// Stable string form, matching the database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Paid => "paid",
            Self::Failed => "failed",
        }
    }

    /// Parse the database representation.
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "created" => Some(Self::Created),
            "paid" => Some(Self::Paid),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a trader (wholesale) application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "trader_status", rename_all = "lowercase")
)]
pub enum TraderStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl TraderStatus {
    /// Stable string form, matching the database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parse the database representation.
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for TraderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_roundtrip() {
        for status in [
            PaymentStatus::Created,
            PaymentStatus::Paid,
            PaymentStatus::Failed,
        ] {
            assert_eq!(PaymentStatus::from_str_opt(status.as_str()), Some(status));
        }
        assert_eq!(PaymentStatus::from_str_opt("settled"), None);
    }

    #[test]
    fn test_trader_status_roundtrip() {
        for status in [
            TraderStatus::Pending,
            TraderStatus::Approved,
            TraderStatus::Rejected,
        ] {
            assert_eq!(TraderStatus::from_str_opt(status.as_str()), Some(status));
        }
        assert_eq!(TraderStatus::from_str_opt(""), None);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&PaymentStatus::Paid).expect("serialize");
        assert_eq!(json, "\"paid\"");
        let json = serde_json::to_string(&TraderStatus::Approved).expect("serialize");
        assert_eq!(json, "\"approved\"");
    }
}
