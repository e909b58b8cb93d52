use crate::datasources::{TelemetryProvider, WeatherProvider};
use crate::error::Result;
use crate::logic::usage::{lookback_start, usage_report};
use crate::logic::{Advisor, ConnectionStatus};
use crate::models::{
    HistoryEntry, IrrigationStart, Recommendation, Settings, SettingsUpdate, UsageReport,
    ZoneStatus,
};
use crate::store::{record_manual_start, HistoryLedger, SettingsStore, ZoneRegistry};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::Arc;

/// How far back the ledger is searched for a zone's last run.
const ZONE_STATUS_LOOKBACK_DAYS: i64 = 30;

/// Wires the zone registry, stores and advisor together behind the
/// operations the command line exposes.
pub struct App<T, W> {
    registry: ZoneRegistry,
    settings: Arc<dyn SettingsStore>,
    ledger: Arc<dyn HistoryLedger>,
    advisor: Advisor<T, W>,
}

impl<T: TelemetryProvider, W: WeatherProvider> App<T, W> {
    pub fn new(
        registry: ZoneRegistry,
        settings: Arc<dyn SettingsStore>,
        ledger: Arc<dyn HistoryLedger>,
        advisor: Advisor<T, W>,
    ) -> Self {
        Self {
            registry,
            settings,
            ledger,
            advisor,
        }
    }

    pub async fn recommendation(&self) -> Result<Recommendation> {
        let settings = self.settings.current()?;
        Ok(self.advisor.recommend(&settings, self.registry.all()).await)
    }

    pub fn zones(&self) -> Result<Vec<ZoneStatus>> {
        self.zones_at(Utc::now())
    }

    pub fn zones_at(&self, now: DateTime<Utc>) -> Result<Vec<ZoneStatus>> {
        let recent = self
            .ledger
            .since(now - Duration::days(ZONE_STATUS_LOOKBACK_DAYS))?;

        let statuses = self
            .registry
            .all()
            .iter()
            .map(|zone| {
                let runs: Vec<&HistoryEntry> = recent
                    .iter()
                    .filter(|e| e.covers_zone(zone.id) && e.date <= now)
                    .collect();
                ZoneStatus {
                    zone: zone.clone(),
                    last_irrigation: runs.iter().map(|e| e.date).max(),
                    active: runs.iter().any(|e| now < e.completes_at()),
                }
            })
            .collect();

        Ok(statuses)
    }

    pub fn settings(&self) -> Result<Settings> {
        self.settings.current()
    }

    pub fn update_settings(&self, update: &SettingsUpdate) -> Result<Settings> {
        let settings = self.settings.update(update)?;
        tracing::info!(?settings, "Settings updated");
        Ok(settings)
    }

    pub fn start_irrigation(&self, zones: &[u32], duration_minutes: f64) -> Result<IrrigationStart> {
        self.start_irrigation_at(zones, duration_minutes, Utc::now())
    }

    pub fn start_irrigation_at(
        &self,
        zones: &[u32],
        duration_minutes: f64,
        now: DateTime<Utc>,
    ) -> Result<IrrigationStart> {
        let entry = record_manual_start(
            self.ledger.as_ref(),
            &self.registry,
            zones,
            duration_minutes,
            now,
        )?;

        Ok(IrrigationStart {
            water_amount_liters: entry.water_used_liters,
            duration_minutes: entry.duration_minutes,
            estimated_completion_time: entry.completes_at(),
        })
    }

    /// The latest `days` ledger entries, oldest first.
    pub fn history(&self, days: usize) -> Result<Vec<HistoryEntry>> {
        self.ledger.recent(days)
    }

    pub fn usage_report(&self) -> Result<UsageReport> {
        self.usage_report_on(Utc::now().date_naive())
    }

    pub fn usage_report_on(&self, today: NaiveDate) -> Result<UsageReport> {
        let entries = self.ledger.since(lookback_start(today))?;
        Ok(usage_report(&entries, today))
    }

    pub async fn check_connections(&self) -> ConnectionStatus {
        self.advisor.check_connections().await
    }

    pub fn rules(&self) -> Vec<(&'static str, &'static str)> {
        self.advisor.engine().list_rules()
    }
}
