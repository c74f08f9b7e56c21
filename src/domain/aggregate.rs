//! Click aggregation over a time window.
//!
//! [`fold_events`] is a pure single pass; everything it accumulates lives on
//! its own stack frame and is discarded once the result is built.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::domain::entities::ClickEvent;
use crate::domain::window::TimeWindow;

/// Bucket label for events without a resolved country.
pub const UNKNOWN_COUNTRY: &str = "unknown";

/// Per-alias totals within a topic query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasBreakdown {
    pub total_clicks: u64,
    pub unique_users: u64,
}

/// Summary statistics for a set of click events.
///
/// Derived on demand and never stored. Map keys serialize in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub total_clicks: u64,
    pub unique_users: u64,
    /// UTC calendar day to click count. Days without clicks are absent.
    pub clicks_by_day: BTreeMap<NaiveDate, u64>,
    pub breakdown_by_os: BTreeMap<String, u64>,
    pub breakdown_by_device: BTreeMap<String, u64>,
    pub breakdown_by_country: BTreeMap<String, u64>,
    /// Present for topic queries only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_alias_breakdown: Option<BTreeMap<String, AliasBreakdown>>,
}

impl AggregateResult {
    /// All-zero result, optionally carrying an empty per-alias map.
    pub fn empty(per_alias: bool) -> Self {
        Self {
            per_alias_breakdown: per_alias.then(BTreeMap::new),
            ..Self::default()
        }
    }
}

/// Folds `events` into an [`AggregateResult`].
///
/// Events outside `window` are skipped even if the store returned them.
pub fn fold_events<'a, I>(events: I, window: TimeWindow, per_alias: bool) -> AggregateResult
where
    I: IntoIterator<Item = &'a ClickEvent>,
{
    let mut result = AggregateResult::empty(per_alias);
    let mut users: HashSet<&str> = HashSet::new();
    let mut alias_users: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();

    for event in events {
        if !window.contains(event.occurred_at) {
            continue;
        }

        result.total_clicks += 1;
        users.insert(event.user_id.as_str());

        *result
            .clicks_by_day
            .entry(event.occurred_at.date_naive())
            .or_default() += 1;
        *result
            .breakdown_by_os
            .entry(event.operating_system.clone())
            .or_default() += 1;
        *result
            .breakdown_by_device
            .entry(event.device_class.clone())
            .or_default() += 1;

        let country = event
            .geo_location
            .country
            .as_deref()
            .unwrap_or(UNKNOWN_COUNTRY);
        *result
            .breakdown_by_country
            .entry(country.to_string())
            .or_default() += 1;

        if let Some(per_alias) = result.per_alias_breakdown.as_mut() {
            per_alias
                .entry(event.alias_code.clone())
                .or_default()
                .total_clicks += 1;
            alias_users
                .entry(event.alias_code.as_str())
                .or_default()
                .insert(event.user_id.as_str());
        }
    }

    result.unique_users = users.len() as u64;
    if let Some(per_alias) = result.per_alias_breakdown.as_mut() {
        for (code, distinct) in alias_users {
            if let Some(bucket) = per_alias.get_mut(code) {
                bucket.unique_users = distinct.len() as u64;
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::GeoLocation;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn event(id: i64, code: &str, user: &str, at: DateTime<Utc>) -> ClickEvent {
        ClickEvent {
            id,
            alias_code: code.to_string(),
            user_id: user.to_string(),
            ip_address: "203.0.113.1".to_string(),
            geo_location: GeoLocation::default(),
            operating_system: "Linux".to_string(),
            device_class: "desktop".to_string(),
            occurred_at: at,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_three_clicks_two_users_two_days() {
        let now = now();
        let window = TimeWindow::trailing(Duration::days(7), now);
        let events = vec![
            event(1, "abc", "u1", now - Duration::days(2)),
            event(2, "abc", "u2", now - Duration::days(2)),
            event(3, "abc", "u1", now - Duration::hours(1)),
        ];

        let result = fold_events(&events, window, false);

        assert_eq!(result.total_clicks, 3);
        assert_eq!(result.unique_users, 2);
        assert_eq!(result.clicks_by_day.len(), 2);
        assert_eq!(result.clicks_by_day.values().sum::<u64>(), 3);
        assert_eq!(
            result.clicks_by_day.get(&NaiveDate::from_ymd_opt(2024, 3, 8).unwrap()),
            Some(&2)
        );
        assert!(result.per_alias_breakdown.is_none());
    }

    #[test]
    fn test_window_start_is_inclusive() {
        let now = now();
        let window = TimeWindow::trailing(Duration::days(7), now);
        let events = vec![
            event(1, "abc", "u1", window.start),
            event(2, "abc", "u2", window.start - Duration::microseconds(1)),
            event(3, "abc", "u3", window.end),
            event(4, "abc", "u4", window.end + Duration::microseconds(1)),
        ];

        let result = fold_events(&events, window, false);

        assert_eq!(result.total_clicks, 2);
        assert_eq!(result.unique_users, 2);
    }

    #[test]
    fn test_n_events_invariants() {
        let now = now();
        let window = TimeWindow::trailing(Duration::days(7), now);
        let events: Vec<ClickEvent> = (0..50)
            .map(|i| {
                event(
                    i,
                    "abc",
                    &format!("u{}", i % 7),
                    now - Duration::hours(i * 3),
                )
            })
            .collect();

        let result = fold_events(&events, window, false);

        assert_eq!(result.total_clicks, 50);
        assert_eq!(result.unique_users, 7);
        assert_eq!(result.clicks_by_day.values().sum::<u64>(), 50);
        assert_eq!(result.breakdown_by_os.get("Linux"), Some(&50));
    }

    #[test]
    fn test_country_breakdown_uses_unknown_bucket() {
        let now = now();
        let window = TimeWindow::trailing(Duration::days(1), now);
        let mut located = event(1, "abc", "u1", now);
        located.geo_location.country = Some("Germany".to_string());
        let events = vec![located, event(2, "abc", "u2", now)];

        let result = fold_events(&events, window, false);

        assert_eq!(result.breakdown_by_country.get("Germany"), Some(&1));
        assert_eq!(result.breakdown_by_country.get(UNKNOWN_COUNTRY), Some(&1));
    }

    #[test]
    fn test_per_alias_breakdown() {
        let now = now();
        let window = TimeWindow::trailing(Duration::days(1), now);
        let events = vec![
            event(1, "a", "u1", now),
            event(2, "a", "u1", now),
            event(3, "a", "u2", now),
            event(4, "b", "u1", now),
        ];

        let result = fold_events(&events, window, true);
        let per_alias = result.per_alias_breakdown.unwrap();

        assert_eq!(
            per_alias.get("a"),
            Some(&AliasBreakdown {
                total_clicks: 3,
                unique_users: 2
            })
        );
        assert_eq!(
            per_alias.get("b"),
            Some(&AliasBreakdown {
                total_clicks: 1,
                unique_users: 1
            })
        );
        assert_eq!(result.unique_users, 2);
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let window = TimeWindow::trailing(Duration::days(7), now());

        let result = fold_events(&Vec::<ClickEvent>::new(), window, true);

        assert_eq!(result, AggregateResult::empty(true));
        assert_eq!(result.per_alias_breakdown, Some(BTreeMap::new()));
    }

    #[test]
    fn test_serializes_sorted_camel_case() {
        let now = now();
        let window = TimeWindow::trailing(Duration::days(7), now);
        let events = vec![
            event(1, "abc", "u1", now),
            event(2, "abc", "u1", now - Duration::days(1)),
        ];

        let json = serde_json::to_value(fold_events(&events, window, false)).unwrap();

        assert_eq!(json["totalClicks"], 2);
        assert_eq!(json["clicksByDay"]["2024-03-09"], 1);
        assert_eq!(json["clicksByDay"]["2024-03-10"], 1);
        assert!(json.get("perAliasBreakdown").is_none());

        let days: Vec<&String> = json["clicksByDay"].as_object().unwrap().keys().collect();
        assert_eq!(days, ["2024-03-09", "2024-03-10"]);
    }
}
