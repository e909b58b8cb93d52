//! Daily and weekly water-use figures for the analytics dashboard.

use crate::models::{
    DailyUsage, HistoryEntry, Trend, UsageComparison, UsageDelta, UsageReport, WeeklyUsage,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};

pub const WEEK_DAYS: usize = 7;

/// Today plus the seven days it is compared against.
pub const LOOKBACK_DAYS: i64 = WEEK_DAYS as i64 + 1;

/// Change in the recent three-day mean that counts as a trend.
const TREND_THRESHOLD: f64 = 0.10;

/// Start of the oldest day `usage_report` reads.
pub fn lookback_start(today: NaiveDate) -> DateTime<Utc> {
    (today - Duration::days(LOOKBACK_DAYS - 1))
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Summarize the ledger around `today` (UTC calendar days).
///
/// Entries older than the lookback or dated after today are ignored.
pub fn usage_report(entries: &[HistoryEntry], today: NaiveDate) -> UsageReport {
    // days_ago[0] is today, days_ago[7] is a week before
    let mut days_ago: Vec<Vec<&HistoryEntry>> = vec![Vec::new(); LOOKBACK_DAYS as usize];
    for entry in entries {
        let age = (today - entry.date.date_naive()).num_days();
        if (0..LOOKBACK_DAYS).contains(&age) {
            days_ago[age as usize].push(entry);
        }
    }

    let used: Vec<f64> = days_ago
        .iter()
        .map(|day| day.iter().map(|e| e.water_used_liters).sum())
        .collect();

    let today_entries = &days_ago[0];
    let today_usage = DailyUsage {
        used: round1(used[0]),
        efficiency: round1(mean(today_entries.iter().map(|e| e.efficiency_pct as f64))),
        savings: round1(mean(today_entries.iter().map(|e| e.savings_pct))),
    };

    let previous_week_average = used[1..].iter().sum::<f64>() / WEEK_DAYS as f64;
    let comparison = UsageComparison {
        vs_yesterday: delta(used[0], used[1]),
        vs_average: delta(used[0], previous_week_average),
    };

    let week = &used[..WEEK_DAYS];
    let total: f64 = week.iter().sum();
    let weekly = WeeklyUsage {
        total: round1(total),
        average: round1(total / WEEK_DAYS as f64),
        trend: trend(week),
        efficiency: round1(mean(
            days_ago[..WEEK_DAYS]
                .iter()
                .flatten()
                .map(|e| e.efficiency_pct as f64),
        )),
    };

    UsageReport {
        today: today_usage,
        comparison,
        weekly,
    }
}

/// `daily` is newest first: the latest three days against the four before.
fn trend(daily: &[f64]) -> Trend {
    let recent = mean(daily[..3].iter().copied());
    let earlier = mean(daily[3..].iter().copied());

    if earlier == 0.0 {
        return if recent > 0.0 {
            Trend::Rising
        } else {
            Trend::Stable
        };
    }

    let change = (recent - earlier) / earlier;
    if change > TREND_THRESHOLD {
        Trend::Rising
    } else if change < -TREND_THRESHOLD {
        Trend::Falling
    } else {
        Trend::Stable
    }
}

fn delta(current: f64, baseline: f64) -> UsageDelta {
    let difference = current - baseline;
    let percentage = if baseline == 0.0 {
        0.0
    } else {
        difference / baseline * 100.0
    };
    UsageDelta {
        difference: round1(difference),
        percentage: round1(percentage),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IrrigationReason;
    use chrono::TimeZone;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 10).unwrap()
    }

    fn entry(days_ago: i64, liters: f64, efficiency: u8, savings: f64) -> HistoryEntry {
        let date = Utc.with_ymd_and_hms(2026, 6, 10, 6, 0, 0).unwrap() - Duration::days(days_ago);
        HistoryEntry::new(IrrigationReason::Scheduled, date)
            .with_zones(vec![1])
            .with_water(liters, liters / 10.0)
            .with_efficiency(efficiency)
            .with_savings(savings)
    }

    #[test]
    fn empty_ledger_reports_zeros() {
        let report = usage_report(&[], today());
        assert_eq!(report, UsageReport::default());
        assert_eq!(report.weekly.trend, Trend::Stable);
    }

    #[test]
    fn today_and_yesterday() {
        let entries = vec![
            entry(0, 200.0, 90, 10.0),
            entry(0, 100.0, 80, 20.0),
            entry(1, 250.0, 85, 0.0),
        ];
        let report = usage_report(&entries, today());

        assert_eq!(report.today.used, 300.0);
        assert_eq!(report.today.efficiency, 85.0);
        assert_eq!(report.today.savings, 15.0);
        assert_eq!(report.comparison.vs_yesterday.difference, 50.0);
        assert_eq!(report.comparison.vs_yesterday.percentage, 20.0);
    }

    #[test]
    fn average_compares_against_previous_week() {
        // 140 L on each of the seven days before today
        let mut entries: Vec<_> = (1..=7).map(|d| entry(d, 140.0, 80, 0.0)).collect();
        entries.push(entry(0, 70.0, 80, 0.0));
        let report = usage_report(&entries, today());

        assert_eq!(report.comparison.vs_average.difference, -70.0);
        assert_eq!(report.comparison.vs_average.percentage, -50.0);
        // weekly covers today and the six days before it
        assert_eq!(report.weekly.total, 70.0 + 6.0 * 140.0);
        assert_eq!(report.weekly.average, 130.0);
    }

    #[test]
    fn zero_baseline_gives_zero_percentage() {
        let report = usage_report(&[entry(0, 120.0, 80, 0.0)], today());
        assert_eq!(report.comparison.vs_yesterday.difference, 120.0);
        assert_eq!(report.comparison.vs_yesterday.percentage, 0.0);
        assert_eq!(report.comparison.vs_average.percentage, 0.0);
    }

    #[test]
    fn trend_direction() {
        let rising: Vec<_> = (0..7)
            .map(|d| entry(d, if d < 3 { 200.0 } else { 100.0 }, 80, 0.0))
            .collect();
        assert_eq!(usage_report(&rising, today()).weekly.trend, Trend::Rising);

        let falling: Vec<_> = (0..7)
            .map(|d| entry(d, if d < 3 { 50.0 } else { 100.0 }, 80, 0.0))
            .collect();
        assert_eq!(usage_report(&falling, today()).weekly.trend, Trend::Falling);

        let steady: Vec<_> = (0..7)
            .map(|d| entry(d, if d < 3 { 105.0 } else { 100.0 }, 80, 0.0))
            .collect();
        assert_eq!(usage_report(&steady, today()).weekly.trend, Trend::Stable);
    }

    #[test]
    fn out_of_window_entries_are_ignored() {
        let entries = vec![entry(8, 999.0, 10, 0.0), entry(-1, 999.0, 10, 0.0)];
        assert_eq!(usage_report(&entries, today()), UsageReport::default());
    }

    #[test]
    fn weekly_efficiency_averages_entries() {
        let entries = vec![entry(0, 10.0, 90, 0.0), entry(4, 10.0, 70, 0.0)];
        assert_eq!(usage_report(&entries, today()).weekly.efficiency, 80.0);
    }

    #[test]
    fn lookback_starts_at_midnight_a_week_ago() {
        assert_eq!(
            lookback_start(today()),
            Utc.with_ymd_and_hms(2026, 6, 3, 0, 0, 0).unwrap()
        );
    }
}
