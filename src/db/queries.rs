use crate::db::Database;
use crate::error::Result;
use crate::models::{HistoryEntry, IrrigationReason, Settings, SettingsUpdate};
use crate::store::HistoryLedger;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Row};
use tracing::warn;

const SETTINGS_KEY: &str = "irrigation_settings";

/// Fixed-width UTC timestamps so text ordering matches time ordering.
fn timestamp(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// Settings Queries

impl Database {
    pub fn load_settings(&self) -> Result<Option<Settings>> {
        self.with_conn(|conn| {
            let stored: Option<String> = conn
                .query_row(
                    "SELECT value FROM settings WHERE key = ?1",
                    [SETTINGS_KEY],
                    |row| row.get(0),
                )
                .optional()?;

            match stored {
                Some(json) => Ok(Some(serde_json::from_str(&json)?)),
                None => Ok(None),
            }
        })
    }

    /// Read, merge, validate and write the settings row in one transaction.
    /// A rejected update rolls back and leaves the stored record as it was.
    pub fn apply_settings_update(
        &self,
        defaults: &Settings,
        update: &SettingsUpdate,
    ) -> Result<Settings> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let stored: Option<String> = tx
                .query_row(
                    "SELECT value FROM settings WHERE key = ?1",
                    [SETTINGS_KEY],
                    |row| row.get(0),
                )
                .optional()?;
            let current = match stored {
                Some(json) => serde_json::from_str(&json)?,
                None => defaults.clone(),
            };

            let next = current.merged(update)?;
            tx.execute(
                r#"
                INSERT INTO settings (key, value) VALUES (?1, ?2)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value
                "#,
                params![SETTINGS_KEY, serde_json::to_string(&next)?],
            )?;
            tx.commit()?;

            Ok(next)
        })
    }
}

// Irrigation History Queries

impl HistoryLedger for Database {
    fn append(&self, mut entry: HistoryEntry) -> Result<HistoryEntry> {
        let zones = serde_json::to_string(&entry.zones)?;
        let id = self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO irrigation_history
                    (recorded_at, water_used_liters, duration_minutes, zones,
                     efficiency_pct, reason, savings_pct)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    timestamp(&entry.date),
                    entry.water_used_liters,
                    entry.duration_minutes,
                    zones,
                    entry.efficiency_pct,
                    format!("{:?}", entry.reason),
                    entry.savings_pct,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })?;

        entry.id = Some(id);
        Ok(entry)
    }

    fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT * FROM (
                    SELECT * FROM irrigation_history
                    ORDER BY recorded_at DESC, id DESC
                    LIMIT ?1
                )
                ORDER BY recorded_at ASC, id ASC
                "#,
            )?;
            let entries = stmt
                .query_map([limit], row_to_entry)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(entries)
        })
    }

    fn since(&self, cutoff: DateTime<Utc>) -> Result<Vec<HistoryEntry>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT * FROM irrigation_history
                WHERE recorded_at >= ?1
                ORDER BY recorded_at ASC, id ASC
                "#,
            )?;
            let entries = stmt
                .query_map([timestamp(&cutoff)], row_to_entry)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(entries)
        })
    }
}

fn row_to_entry(row: &Row) -> rusqlite::Result<HistoryEntry> {
    let recorded_at: String = row.get("recorded_at")?;
    let zones_json: String = row.get("zones")?;
    let reason_str: String = row.get("reason")?;

    let date = DateTime::parse_from_rfc3339(&recorded_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
    let zones: Vec<u32> = serde_json::from_str(&zones_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;

    let reason = IrrigationReason::from_str(&reason_str).unwrap_or_else(|| {
        warn!(
            reason = %reason_str,
            "Unknown irrigation reason in database, defaulting to Scheduled"
        );
        IrrigationReason::Scheduled
    });

    Ok(HistoryEntry {
        id: Some(row.get("id")?),
        date,
        water_used_liters: row.get("water_used_liters")?,
        duration_minutes: row.get("duration_minutes")?,
        zones,
        efficiency_pct: row.get("efficiency_pct")?,
        reason,
        savings_pct: row.get("savings_pct")?,
    })
}

trait OptionalExt<T> {
    fn optional(self) -> rusqlite::Result<Option<T>>;
}

impl<T> OptionalExt<T> for rusqlite::Result<T> {
    fn optional(self) -> rusqlite::Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvisorError;
    use chrono::{Duration, TimeZone};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, day, hour, 0, 0).unwrap()
    }

    fn manual(date: DateTime<Utc>, liters: f64) -> HistoryEntry {
        HistoryEntry::new(IrrigationReason::Manual, date)
            .with_zones(vec![1, 3])
            .with_water(liters, liters / 10.0)
            .with_efficiency(80)
    }

    #[test]
    fn appended_entries_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let stored = db
            .append(
                HistoryEntry::new(IrrigationReason::SensorTriggered, at(2, 6))
                    .with_zones(vec![2])
                    .with_water(180.0, 18.0)
                    .with_efficiency(92)
                    .with_savings(12.5),
            )
            .unwrap();
        assert!(stored.id.is_some());

        let loaded = db.recent(5).unwrap();
        assert_eq!(loaded, vec![stored]);
    }

    #[test]
    fn recent_is_chronological_and_limited() {
        let db = Database::open_in_memory().unwrap();
        for (day, liters) in [(4, 40.0), (1, 10.0), (3, 30.0), (2, 20.0)] {
            db.append(manual(at(day, 6), liters)).unwrap();
        }

        let recent = db.recent(2).unwrap();
        let liters: Vec<f64> = recent.iter().map(|e| e.water_used_liters).collect();
        assert_eq!(liters, vec![30.0, 40.0]);
    }

    #[test]
    fn since_uses_time_ordering() {
        let db = Database::open_in_memory().unwrap();
        // sub-second timestamps sort correctly against whole seconds
        let base = at(5, 9);
        db.append(manual(base, 10.0)).unwrap();
        db.append(manual(base + Duration::milliseconds(250), 20.0))
            .unwrap();
        db.append(manual(base - Duration::days(2), 30.0)).unwrap();

        let entries = db.since(base).unwrap();
        let liters: Vec<f64> = entries.iter().map(|e| e.water_used_liters).collect();
        assert_eq!(liters, vec![10.0, 20.0]);
    }

    #[test]
    fn settings_update_persists() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.load_settings().unwrap().is_none());

        let update = SettingsUpdate {
            moisture_threshold_pct: Some(28.0),
            ..Default::default()
        };
        let saved = db
            .apply_settings_update(&Settings::default(), &update)
            .unwrap();
        assert_eq!(db.load_settings().unwrap(), Some(saved));
    }

    #[test]
    fn rejected_settings_update_rolls_back() {
        let db = Database::open_in_memory().unwrap();
        let first = db
            .apply_settings_update(
                &Settings::default(),
                &SettingsUpdate {
                    conservation_mode: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();

        let result = db.apply_settings_update(
            &Settings::default(),
            &SettingsUpdate {
                max_daily_water_liters: Some(-1.0),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(AdvisorError::InvalidSettings(_))));
        assert_eq!(db.load_settings().unwrap(), Some(first));
    }
}
