//! Seller-request lifecycle (`PENDING` -> `CONFIRM` | `REFUSE`).
//!
//! The status names must match the seed data in
//! `20260101000005_create_seller_requests_table.sql`.

use crate::error::CoreError;
use crate::types::DbId;

pub const STATUS_PENDING: &str = "PENDING";
pub const STATUS_CONFIRM: &str = "CONFIRM";
pub const STATUS_REFUSE: &str = "REFUSE";

/// All valid status names, in lifecycle order.
pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_CONFIRM, STATUS_REFUSE];

/// An administrator's decision on a pending request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Confirm,
    Refuse { reason: String },
}

impl Decision {
    /// Status name the request moves to.
    pub fn target_status(&self) -> &'static str {
        match self {
            Decision::Confirm => STATUS_CONFIRM,
            Decision::Refuse { .. } => STATUS_REFUSE,
        }
    }

    /// Build a refusal, rejecting a blank reason.
    pub fn refuse(reason: &str) -> Result<Self, CoreError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(CoreError::Validation(
                "A reason is required to refuse a request".into(),
            ));
        }
        Ok(Decision::Refuse {
            reason: reason.to_string(),
        })
    }
}

/// Only pending requests can be decided.
pub fn ensure_pending(request_id: DbId, current_status: &str) -> Result<(), CoreError> {
    if current_status == STATUS_PENDING {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Request {request_id} has already been processed (status: {current_status})"
        )))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn decisions_map_to_terminal_statuses() {
        assert_eq!(Decision::Confirm.target_status(), STATUS_CONFIRM);
        let refuse = Decision::refuse("incomplete file").unwrap();
        assert_eq!(refuse.target_status(), STATUS_REFUSE);
    }

    #[test]
    fn refusal_reason_is_trimmed() {
        let refuse = Decision::refuse("  no catalogue  ").unwrap();
        assert_eq!(
            refuse,
            Decision::Refuse {
                reason: "no catalogue".into()
            }
        );
    }

    #[test]
    fn blank_refusal_reason_is_rejected() {
        assert_matches!(Decision::refuse("   "), Err(CoreError::Validation(_)));
    }

    #[test]
    fn only_pending_requests_can_be_decided() {
        assert!(ensure_pending(1, STATUS_PENDING).is_ok());
        assert_matches!(ensure_pending(1, STATUS_CONFIRM), Err(CoreError::Conflict(_)));
        assert_matches!(ensure_pending(1, STATUS_REFUSE), Err(CoreError::Conflict(_)));
    }
}
