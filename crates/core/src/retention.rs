//! Retention policy constants and parameter validation for revision pruning.

use chrono::{Duration, Utc};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Default number of autosave revisions to keep per content item.
pub const DEFAULT_AUTOSAVE_KEEP: i64 = 5;

/// Default maximum age in days for non-published revisions.
pub const DEFAULT_MAX_AGE_DAYS: i64 = 90;

/// Validate an autosave keep-count (must retain at least one).
pub fn validate_keep_count(keep: i64) -> Result<(), CoreError> {
    if keep < 1 {
        return Err(CoreError::Validation(format!(
            "Autosave keep count must be at least 1, got {keep}"
        )));
    }
    Ok(())
}

/// Validate an age threshold in days.
pub fn validate_age_days(days: i64) -> Result<(), CoreError> {
    if days < 1 {
        return Err(CoreError::Validation(format!(
            "Retention age must be at least 1 day, got {days}"
        )));
    }
    Ok(())
}

/// Compute the creation-time cutoff for an age-based prune.
///
/// Revisions created strictly before this instant are prune candidates.
pub fn age_cutoff(older_than_days: i64) -> Timestamp {
    Utc::now() - Duration::days(older_than_days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keep_count_rejects_zero_and_negative() {
        assert!(validate_keep_count(0).is_err());
        assert!(validate_keep_count(-3).is_err());
        assert!(validate_keep_count(1).is_ok());
        assert!(validate_keep_count(DEFAULT_AUTOSAVE_KEEP).is_ok());
    }

    #[test]
    fn age_days_rejects_zero_and_negative() {
        assert!(validate_age_days(0).is_err());
        assert!(validate_age_days(-1).is_err());
        assert!(validate_age_days(DEFAULT_MAX_AGE_DAYS).is_ok());
    }

    #[test]
    fn cutoff_is_in_the_past() {
        let cutoff = age_cutoff(30);
        assert!(cutoff < Utc::now());
        let further = age_cutoff(60);
        assert!(further < cutoff);
    }
}
