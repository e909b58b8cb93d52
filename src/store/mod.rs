//! Repositories for operator policy and irrigation history.
//!
//! Both are injected into the app as trait objects so the SQLite adapter and
//! the in-memory fakes are interchangeable. Each implementation serializes its
//! writes behind a single lock.

pub mod memory;
pub mod registry;

pub use memory::{InMemoryLedger, InMemorySettingsStore};
pub use registry::ZoneRegistry;

use crate::db::Database;
use crate::error::{AdvisorError, Result};
use crate::logic::calculations::manual_water_volume;
use crate::models::{completion_time, HistoryEntry, IrrigationReason, Settings, SettingsUpdate};
use chrono::{DateTime, Utc};

/// Efficiency credited to operator-started runs.
pub const MANUAL_EFFICIENCY_PCT: u8 = 80;

/// Longest run an operator can start in one call.
pub const MAX_MANUAL_DURATION_MINUTES: f64 = 24.0 * 60.0;

pub trait SettingsStore: Send + Sync {
    fn current(&self) -> Result<Settings>;

    /// Merge, validate and replace the record in one step. On error the
    /// previous settings stay in place.
    fn update(&self, update: &SettingsUpdate) -> Result<Settings>;
}

/// Append-only record of irrigation runs.
pub trait HistoryLedger: Send + Sync {
    /// Store the entry and return it with its assigned id.
    fn append(&self, entry: HistoryEntry) -> Result<HistoryEntry>;

    /// The latest `limit` entries, oldest first.
    fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>>;

    /// Every entry dated at or after `cutoff`, oldest first.
    fn since(&self, cutoff: DateTime<Utc>) -> Result<Vec<HistoryEntry>>;
}

/// SQLite-backed settings, seeded from the configured defaults until the
/// operator saves a change.
pub struct PersistentSettings {
    db: Database,
    defaults: Settings,
}

impl PersistentSettings {
    pub fn new(db: Database, defaults: Settings) -> Self {
        Self { db, defaults }
    }
}

impl SettingsStore for PersistentSettings {
    fn current(&self) -> Result<Settings> {
        Ok(self
            .db
            .load_settings()?
            .unwrap_or_else(|| self.defaults.clone()))
    }

    fn update(&self, update: &SettingsUpdate) -> Result<Settings> {
        self.db.apply_settings_update(&self.defaults, update)
    }
}

/// Validate and append an operator-started run.
///
/// Every check runs before anything is written: unknown or repeated zone ids
/// and durations outside (0, 24 h] are rejected.
pub fn record_manual_start(
    ledger: &dyn HistoryLedger,
    registry: &ZoneRegistry,
    zones: &[u32],
    duration_minutes: f64,
    now: DateTime<Utc>,
) -> Result<HistoryEntry> {
    if zones.is_empty() {
        return Err(AdvisorError::InvalidData(
            "at least one zone is required".into(),
        ));
    }
    if !duration_minutes.is_finite()
        || duration_minutes <= 0.0
        || duration_minutes > MAX_MANUAL_DURATION_MINUTES
    {
        return Err(AdvisorError::InvalidData(format!(
            "duration must be between 0 and {} minutes, got {}",
            MAX_MANUAL_DURATION_MINUTES, duration_minutes
        )));
    }
    if completion_time(now, duration_minutes).is_none() {
        return Err(AdvisorError::InvalidData(format!(
            "a {} minute run starting at {} ends out of range",
            duration_minutes, now
        )));
    }

    for (i, &id) in zones.iter().enumerate() {
        registry.get(id).ok_or(AdvisorError::ZoneNotFound(id))?;
        if zones[..i].contains(&id) {
            return Err(AdvisorError::InvalidData(format!(
                "zone {} listed more than once",
                id
            )));
        }
    }

    let water = manual_water_volume(zones.len(), duration_minutes);
    let entry = HistoryEntry::new(IrrigationReason::Manual, now)
        .with_zones(zones.to_vec())
        .with_water(water, duration_minutes)
        .with_efficiency(MANUAL_EFFICIENCY_PCT)
        .with_savings(0.0);

    let entry = ledger.append(entry)?;
    tracing::info!(
        zones = ?entry.zones,
        liters = entry.water_used_liters,
        minutes = entry.duration_minutes,
        "Manual irrigation recorded"
    );
    Ok(entry)
}
