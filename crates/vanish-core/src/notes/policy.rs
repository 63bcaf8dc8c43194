//! Destructive-read policy.

use chrono::{DateTime, Utc};

use crate::storage::NoteLimits;

/// Why a note is being destroyed instead of shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyReason {
    OpenLimitReached,
    Expired,
}

impl DestroyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DestroyReason::OpenLimitReached => "open_limit_reached",
            DestroyReason::Expired => "expired",
        }
    }
}

/// Verdict for a read request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadDecision {
    Open,
    Destroy(DestroyReason),
}

/// Decide whether a note may be shown at `now`.
///
/// The open limit is checked against the pre-read count, so a note with
/// `max_opens = n` is shown exactly `n` times. Expiry is strict: a note is
/// still readable at the instant `expires_at`.
pub fn evaluate(limits: &NoteLimits, now: DateTime<Utc>) -> ReadDecision {
    if let Some(max_opens) = limits.max_opens {
        if limits.open_count >= max_opens {
            return ReadDecision::Destroy(DestroyReason::OpenLimitReached);
        }
    }
    if let Some(expires_at) = limits.expires_at {
        if now > expires_at {
            return ReadDecision::Destroy(DestroyReason::Expired);
        }
    }
    ReadDecision::Open
}

/// Whether the note must be destroyed at `now`.
pub fn is_exhausted(limits: &NoteLimits, now: DateTime<Utc>) -> bool {
    matches!(evaluate(limits, now), ReadDecision::Destroy(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn limits(open_count: u32, max_opens: Option<u32>, expires_at: Option<DateTime<Utc>>) -> NoteLimits {
        NoteLimits {
            open_count,
            max_opens,
            expires_at,
        }
    }

    #[test]
    fn test_unbounded_note_always_opens() {
        let now = Utc::now();
        assert_eq!(evaluate(&limits(0, None, None), now), ReadDecision::Open);
        assert_eq!(evaluate(&limits(10_000, None, None), now), ReadDecision::Open);
    }

    #[test]
    fn test_open_limit_uses_pre_read_count() {
        let now = Utc::now();
        assert_eq!(evaluate(&limits(0, Some(1), None), now), ReadDecision::Open);
        assert_eq!(
            evaluate(&limits(1, Some(1), None), now),
            ReadDecision::Destroy(DestroyReason::OpenLimitReached)
        );
        assert_eq!(evaluate(&limits(1, Some(2), None), now), ReadDecision::Open);
        assert_eq!(
            evaluate(&limits(3, Some(2), None), now),
            ReadDecision::Destroy(DestroyReason::OpenLimitReached)
        );
    }

    #[test]
    fn test_expiry_is_strict() {
        let now = Utc::now();
        assert_eq!(evaluate(&limits(0, None, Some(now)), now), ReadDecision::Open);
        assert_eq!(
            evaluate(&limits(0, None, Some(now - Duration::seconds(1))), now),
            ReadDecision::Destroy(DestroyReason::Expired)
        );
        assert_eq!(
            evaluate(&limits(0, None, Some(now + Duration::hours(1))), now),
            ReadDecision::Open
        );
    }

    #[test]
    fn test_past_expiry_destroys_regardless_of_count() {
        let now = Utc::now();
        let past = Some(now - Duration::days(1));
        assert!(is_exhausted(&limits(0, Some(5), past), now));
        assert!(is_exhausted(&limits(0, None, past), now));
    }

    #[test]
    fn test_open_limit_checked_before_expiry() {
        let now = Utc::now();
        let past = Some(now - Duration::days(1));
        assert_eq!(
            evaluate(&limits(2, Some(2), past), now),
            ReadDecision::Destroy(DestroyReason::OpenLimitReached)
        );
    }
}
