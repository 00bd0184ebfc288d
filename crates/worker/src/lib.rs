//! Background retention sweep.
//!
//! Periodically prunes superseded autosave revisions and aged history
//! across every content item that has revisions. Safe to run concurrently
//! with live editing: the pruner only removes rows matching its predicate
//! at statement time, so revisions created mid-sweep are never collected.

use sqlx::PgPool;

use inkstone_core::retention::{DEFAULT_AUTOSAVE_KEEP, DEFAULT_MAX_AGE_DAYS};
use inkstone_db::repositories::RevisionRepo;
use inkstone_db::retention::RetentionPruner;
use inkstone_db::StoreError;

/// Default seconds between sweep runs.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3_600;

/// Retention sweep configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct RetentionConfig {
    /// Autosave revisions to keep per content item.
    pub autosave_keep: i64,
    /// Maximum age in days for non-published revisions.
    pub max_age_days: i64,
    /// Seconds between sweep runs.
    pub sweep_interval_secs: u64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            autosave_keep: DEFAULT_AUTOSAVE_KEEP,
            max_age_days: DEFAULT_MAX_AGE_DAYS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}

impl RetentionConfig {
    /// Build from environment variables, falling back to defaults for
    /// anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            autosave_keep: env_parse("RETENTION_AUTOSAVE_KEEP", defaults.autosave_keep),
            max_age_days: env_parse("RETENTION_MAX_AGE_DAYS", defaults.max_age_days),
            sweep_interval_secs: env_parse(
                "RETENTION_SWEEP_INTERVAL_SECS",
                defaults.sweep_interval_secs,
            ),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Outcome of one sweep run.
#[derive(Debug, Clone, Default)]
pub struct SweepStats {
    /// Content items visited.
    pub entities: usize,
    /// Autosave revisions deleted.
    pub autosaves_pruned: u64,
    /// Aged revisions deleted.
    pub aged_pruned: u64,
    /// Entities whose prune failed (logged and skipped).
    pub failures: usize,
}

/// Run one retention sweep over every content item that has revisions.
///
/// A failure on one entity is logged and does not abort the sweep; the
/// enumeration itself failing does.
pub async fn run_sweep(pool: &PgPool, config: &RetentionConfig) -> Result<SweepStats, StoreError> {
    let ids = RevisionRepo::content_item_ids(pool).await?;

    let mut stats = SweepStats {
        entities: ids.len(),
        ..SweepStats::default()
    };

    for content_item_id in ids {
        match RetentionPruner::prune_autosaves(pool, content_item_id, config.autosave_keep).await {
            Ok(pruned) => stats.autosaves_pruned += pruned,
            Err(err) => {
                stats.failures += 1;
                tracing::warn!(content_item_id, error = %err, "autosave prune failed");
                continue;
            }
        }

        match RetentionPruner::prune_by_age(pool, content_item_id, config.max_age_days).await {
            Ok(pruned) => stats.aged_pruned += pruned,
            Err(err) => {
                stats.failures += 1;
                tracing::warn!(content_item_id, error = %err, "age prune failed");
            }
        }
    }

    tracing::info!(
        entities = stats.entities,
        autosaves_pruned = stats.autosaves_pruned,
        aged_pruned = stats.aged_pruned,
        failures = stats.failures,
        "retention sweep complete"
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_policy_defaults() {
        let config = RetentionConfig::default();
        assert_eq!(config.autosave_keep, 5);
        assert_eq!(config.max_age_days, 90);
        assert_eq!(config.sweep_interval_secs, 3_600);
    }

    #[test]
    fn env_parse_falls_back_on_garbage() {
        std::env::set_var("RETENTION_TEST_GARBAGE", "not-a-number");
        assert_eq!(env_parse("RETENTION_TEST_GARBAGE", 7i64), 7);
        std::env::remove_var("RETENTION_TEST_GARBAGE");
    }

    #[test]
    fn env_parse_falls_back_on_missing() {
        assert_eq!(env_parse("RETENTION_TEST_UNSET", 42u64), 42);
    }
}
