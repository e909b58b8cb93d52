use super::{HistoryLedger, SettingsStore};
use crate::error::Result;
use crate::models::{HistoryEntry, Settings, SettingsUpdate};
use chrono::{DateTime, Utc};
use std::sync::{Mutex, PoisonError, RwLock};

/// Settings held for the life of the process.
pub struct InMemorySettingsStore {
    settings: RwLock<Settings>,
}

impl InMemorySettingsStore {
    pub fn new(initial: Settings) -> Self {
        Self {
            settings: RwLock::new(initial),
        }
    }
}

impl Default for InMemorySettingsStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn current(&self) -> Result<Settings> {
        Ok(self
            .settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn update(&self, update: &SettingsUpdate) -> Result<Settings> {
        let mut guard = self
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let merged = guard.merged(update)?;
        *guard = merged.clone();
        Ok(merged)
    }
}

#[derive(Default)]
struct LedgerState {
    entries: Vec<HistoryEntry>,
    next_id: i64,
}

/// Ledger kept in insertion order. Entries are dated by the caller, so the
/// reads sort by date to stay chronological.
#[derive(Default)]
pub struct InMemoryLedger {
    state: Mutex<LedgerState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(mut entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
        entries.sort_by_key(|e| (e.date, e.id));
        entries
    }
}

impl HistoryLedger for InMemoryLedger {
    fn append(&self, mut entry: HistoryEntry) -> Result<HistoryEntry> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.next_id += 1;
        entry.id = Some(state.next_id);
        state.entries.push(entry.clone());
        Ok(entry)
    }

    fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let all = Self::sorted(state.entries.clone());
        let skip = all.len().saturating_sub(limit);
        Ok(all.into_iter().skip(skip).collect())
    }

    fn since(&self, cutoff: DateTime<Utc>) -> Result<Vec<HistoryEntry>> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let matching = state
            .entries
            .iter()
            .filter(|e| e.date >= cutoff)
            .cloned()
            .collect();
        Ok(Self::sorted(matching))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvisorError;
    use crate::models::IrrigationReason;
    use chrono::{Duration, TimeZone};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, day, 7, 30, 0).unwrap()
    }

    #[test]
    fn rejected_update_keeps_previous_settings() {
        let store = InMemorySettingsStore::default();
        let bad = SettingsUpdate {
            max_daily_water_liters: Some(0.0),
            moisture_threshold_pct: Some(40.0),
            ..Default::default()
        };

        assert!(matches!(
            store.update(&bad),
            Err(AdvisorError::InvalidSettings(_))
        ));
        assert_eq!(store.current().unwrap(), Settings::default());
    }

    #[test]
    fn accepted_update_replaces_record() {
        let store = InMemorySettingsStore::default();
        let updated = store
            .update(&SettingsUpdate {
                temperature_threshold_c: Some(33.0),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(store.current().unwrap(), updated);
        assert_eq!(updated.temperature_threshold_c, 33.0);
    }

    #[test]
    fn ledger_assigns_increasing_ids() {
        let ledger = InMemoryLedger::new();
        let a = ledger
            .append(HistoryEntry::new(IrrigationReason::Scheduled, at(1)))
            .unwrap();
        let b = ledger
            .append(HistoryEntry::new(IrrigationReason::Manual, at(2)))
            .unwrap();
        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
    }

    #[test]
    fn recent_returns_latest_in_chronological_order() {
        let ledger = InMemoryLedger::new();
        // appended out of date order
        for day in [3, 1, 5, 4, 2] {
            ledger
                .append(HistoryEntry::new(IrrigationReason::Scheduled, at(day)))
                .unwrap();
        }

        let recent = ledger.recent(3).unwrap();
        let dates: Vec<_> = recent.iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![at(3), at(4), at(5)]);

        assert_eq!(ledger.recent(50).unwrap().len(), 5);
        assert!(ledger.recent(0).unwrap().is_empty());
    }

    #[test]
    fn since_filters_by_cutoff() {
        let ledger = InMemoryLedger::new();
        for day in 1..=6 {
            ledger
                .append(HistoryEntry::new(IrrigationReason::SensorTriggered, at(day)))
                .unwrap();
        }

        let entries = ledger.since(at(4) - Duration::hours(1)).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].date, at(4));
    }
}
