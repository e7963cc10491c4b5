use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Slot hold lifecycle status. `expired` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoldStatus {
    Active,
    Expired,
}

impl fmt::Display for HoldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoldStatus::Active => write!(f, "active"),
            HoldStatus::Expired => write!(f, "expired"),
        }
    }
}

impl FromStr for HoldStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(HoldStatus::Active),
            "expired" => Ok(HoldStatus::Expired),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown hold status: {0}")]
pub struct UnknownStatus(pub String);

/// A temporary reservation on a bookable time slot, created by the booking
/// session flow and reclaimed here if it is never confirmed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotHold {
    pub id: String,
    /// Booking session that placed the hold.
    pub session_id: String,
    pub status: HoldStatus,
    /// Epoch-millis deadline, fixed at creation.
    pub expires_at: i64,
    /// Epoch millis of the sweep that reclaimed the hold. Set once.
    pub expired_at: Option<i64>,
    pub created_at: i64,
}

impl SlotHold {
    pub fn new(id: String, session_id: String, expires_at: i64, now_millis: i64) -> Self {
        Self {
            id,
            session_id,
            status: HoldStatus::Active,
            expires_at,
            expired_at: None,
            created_at: now_millis,
        }
    }

    /// True when the sweeper should reclaim this hold.
    pub fn is_expirable(&self, now_millis: i64) -> bool {
        self.status == HoldStatus::Active && self.expires_at <= now_millis
    }

    /// Transition `active → expired`. Returns false (and changes nothing)
    /// when the hold is already expired.
    pub fn expire(&mut self, now_millis: i64) -> bool {
        if self.status != HoldStatus::Active {
            return false;
        }
        self.status = HoldStatus::Expired;
        self.expired_at = Some(now_millis);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_is_monotonic() {
        let mut hold = SlotHold::new("h1".to_string(), "session-1".to_string(), 1_000, 100);

        assert!(hold.expire(1_500));
        assert_eq!(hold.status, HoldStatus::Expired);
        assert_eq!(hold.expired_at, Some(1_500));

        // A second sweep must not move expired_at.
        assert!(!hold.expire(2_000));
        assert_eq!(hold.expired_at, Some(1_500));
    }

    #[test]
    fn test_expirable_boundary_is_inclusive() {
        let hold = SlotHold::new("h1".to_string(), "session-1".to_string(), 1_000, 100);
        assert!(!hold.is_expirable(999));
        assert!(hold.is_expirable(1_000));
        assert!(hold.is_expirable(1_001));
    }

    #[test]
    fn test_status_round_trips_as_lowercase() {
        assert_eq!(HoldStatus::Active.to_string(), "active");
        assert_eq!("expired".parse::<HoldStatus>().unwrap(), HoldStatus::Expired);
        assert!("EXPIRED".parse::<HoldStatus>().is_err());

        let hold = SlotHold::new("h1".to_string(), "session-1".to_string(), 1_000, 100);
        let json = serde_json::to_value(&hold).unwrap();
        assert_eq!(json["status"], "active");
        assert_eq!(json["sessionId"], "session-1");
    }
}
