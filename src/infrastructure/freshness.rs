//! Per-shop freshness tracking
//!
//! A shop counts as updated when its effective timestamp is strictly newer than
//! the one recorded on the previous successful fetch of the same URL.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

/// Where the effective timestamp came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampSource {
    LastModifiedHeader,
    EmbeddedMarkup,
    /// No usable metadata: the shop is always treated as updated
    Now,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessDecision {
    pub timestamp: DateTime<Utc>,
    pub source: TimestampSource,
    pub previous: Option<DateTime<Utc>>,
    pub is_updated: bool,
}

/// Pick the first valid timestamp: header, then embedded markup, then `now`.
pub fn effective_timestamp(
    last_modified: Option<&str>,
    embedded: Option<&str>,
    now: DateTime<Utc>,
) -> (DateTime<Utc>, TimestampSource) {
    if let Some(ts) = last_modified.and_then(parse_http_date) {
        return (ts, TimestampSource::LastModifiedHeader);
    }
    if let Some(ts) = embedded.and_then(parse_markup_datetime) {
        return (ts, TimestampSource::EmbeddedMarkup);
    }
    (now, TimestampSource::Now)
}

/// `Last-Modified` values are RFC 2822 dates; some servers send RFC 3339.
fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// `<time datetime>` accepts full timestamps, zone-less ones (read as UTC) and bare dates.
fn parse_markup_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Previous-timestamp map keyed by shop URL. Starts out empty ("never").
#[derive(Debug, Default)]
pub struct FreshnessDetector {
    last_update_times: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl FreshnessDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare against the recorded timestamp without recording anything.
    pub async fn assess(
        &self,
        shop_url: &str,
        last_modified: Option<&str>,
        embedded: Option<&str>,
    ) -> FreshnessDecision {
        let (timestamp, source) = effective_timestamp(last_modified, embedded, Utc::now());
        let previous = self.last_update_time(shop_url).await;
        let is_updated = previous.is_none_or(|prev| timestamp > prev);

        debug!(
            "Freshness for {}: {:?} from {:?} (previous {:?}) -> updated={}",
            shop_url, timestamp, source, previous, is_updated
        );

        FreshnessDecision {
            timestamp,
            source,
            previous,
            is_updated,
        }
    }

    pub async fn record(&self, shop_url: &str, timestamp: DateTime<Utc>) {
        self.last_update_times
            .write()
            .await
            .insert(shop_url.to_string(), timestamp);
    }

    /// `None` until the shop has been fetched successfully once.
    pub async fn last_update_time(&self, shop_url: &str) -> Option<DateTime<Utc>> {
        self.last_update_times.read().await.get(shop_url).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_header_takes_priority() {
        let (ts, source) = effective_timestamp(
            Some("Wed, 21 Oct 2015 07:28:00 GMT"),
            Some("2020-01-01T00:00:00Z"),
            now(),
        );
        assert_eq!(source, TimestampSource::LastModifiedHeader);
        assert_eq!(ts, Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap());
    }

    #[test]
    fn test_invalid_header_falls_through_to_markup() {
        let (ts, source) =
            effective_timestamp(Some("yesterday"), Some("2024-05-01T10:00:00+09:00"), now());
        assert_eq!(source, TimestampSource::EmbeddedMarkup);
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 5, 1, 1, 0, 0).unwrap());
    }

    #[test]
    fn test_defaults_to_now() {
        let (ts, source) = effective_timestamp(None, Some("soon"), now());
        assert_eq!(source, TimestampSource::Now);
        assert_eq!(ts, now());
    }

    #[rstest]
    #[case("2024-05-01", Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())]
    #[case("2024-05-01T12:30:00", Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap())]
    #[case("2024-05-01 12:30:00", Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap())]
    #[case("2024-05-01T12:30:00Z", Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap())]
    fn test_markup_formats(#[case] raw: &str, #[case] expected: DateTime<Utc>) {
        assert_eq!(parse_markup_datetime(raw), Some(expected));
    }

    #[tokio::test]
    async fn test_first_sighting_is_updated() {
        let detector = FreshnessDetector::new();
        let decision = detector
            .assess("https://a.booth.pm/", Some("Wed, 21 Oct 2015 07:28:00 GMT"), None)
            .await;
        assert!(decision.is_updated);
        assert_eq!(decision.previous, None);
    }

    #[tokio::test]
    async fn test_equal_timestamp_is_not_updated() {
        let detector = FreshnessDetector::new();
        let url = "https://a.booth.pm/";
        let header = Some("Wed, 21 Oct 2015 07:28:00 GMT");

        let first = detector.assess(url, header, None).await;
        detector.record(url, first.timestamp).await;

        let second = detector.assess(url, header, None).await;
        assert!(!second.is_updated);
        assert_eq!(second.previous, Some(first.timestamp));

        let newer = detector
            .assess(url, Some("Thu, 22 Oct 2015 07:28:00 GMT"), None)
            .await;
        assert!(newer.is_updated);
    }

    #[tokio::test]
    async fn test_assess_does_not_record() {
        let detector = FreshnessDetector::new();
        detector.assess("https://a.booth.pm/", None, None).await;
        assert_eq!(detector.last_update_time("https://a.booth.pm/").await, None);
    }
}
