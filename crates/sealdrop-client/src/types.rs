//! Request and response types

use crate::{ClientError, Result};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use sealdrop_blockstore::ContentAddress;
use sealdrop_core::{FileRecord, Identity};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Options for an upload
#[derive(Clone, Debug, Default)]
pub struct UploadOptions {
    /// Whether non-owners may read the file record
    pub is_public: bool,
    /// File extension recorded for naming downloads
    pub extension: String,
}

impl UploadOptions {
    pub fn public(extension: impl Into<String>) -> Self {
        Self {
            is_public: true,
            extension: extension.into(),
        }
    }

    pub fn private(extension: impl Into<String>) -> Self {
        Self {
            is_public: false,
            extension: extension.into(),
        }
    }
}

/// Normalize an extension: drop a leading dot, reject path-like values
pub(crate) fn normalize_extension(extension: &str) -> Result<String> {
    let ext = extension.trim().trim_start_matches('.');
    if ext.len() > 32
        || ext
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_whitespace() || c.is_control())
    {
        return Err(ClientError::Input(format!("invalid extension: {:?}", extension)));
    }
    Ok(ext.to_string())
}

/// How the caller obtained access to a file
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Access {
    Owner,
    Grant { grantor: Identity },
}

/// Decrypted file returned by retrieval
#[derive(Clone)]
pub struct RetrievedFile {
    pub content_address: ContentAddress,
    pub extension: String,
    pub access: Access,
    pub data: Vec<u8>,
}

impl RetrievedFile {
    /// Suggested download name: `<content address>[.<extension>]`
    pub fn file_name(&self) -> String {
        if self.extension.is_empty() {
            self.content_address.to_string()
        } else {
            format!("{}.{}", self.content_address, self.extension)
        }
    }
}

impl std::fmt::Debug for RetrievedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievedFile")
            .field("content_address", &self.content_address)
            .field("extension", &self.extension)
            .field("access", &self.access)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Creation-time window for listings
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// Same UTC calendar day as now
    Today,
    #[serde(rename = "last7days")]
    Last7Days,
    #[serde(rename = "last30days")]
    Last30Days,
    #[default]
    All,
}

impl TimeRange {
    /// Whether `at` falls in the window as seen at `now`
    ///
    /// The 7- and 30-day windows count back from the start of today.
    pub fn contains(&self, at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let start_of_today = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        match self {
            TimeRange::Today => at.date_naive() == now.date_naive(),
            TimeRange::Last7Days => at >= start_of_today - Duration::days(7) && at <= now,
            TimeRange::Last30Days => at >= start_of_today - Duration::days(30) && at <= now,
            TimeRange::All => true,
        }
    }
}

impl FromStr for TimeRange {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "today" => Ok(TimeRange::Today),
            "last7days" | "7d" => Ok(TimeRange::Last7Days),
            "last30days" | "30d" => Ok(TimeRange::Last30Days),
            "all" => Ok(TimeRange::All),
            other => Err(ClientError::Input(format!("unknown time range: {}", other))),
        }
    }
}

/// Listing sort field
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Timestamp,
    ContentAddress,
}

/// Listing sort direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Filter and sort for [`Session::list_files`](crate::Session::list_files)
///
/// The default lists everything, newest first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FileQuery {
    pub range: TimeRange,
    pub sort: SortKey,
    pub order: SortOrder,
}

impl FileQuery {
    pub fn with_range(mut self, range: TimeRange) -> Self {
        self.range = range;
        self
    }

    pub fn sorted_by(mut self, sort: SortKey, order: SortOrder) -> Self {
        self.sort = sort;
        self.order = order;
        self
    }

    /// Filter and sort records in place
    pub fn apply(&self, records: &mut Vec<FileRecord>, now: DateTime<Utc>) {
        records.retain(|r| self.range.contains(r.created_at, now));
        records.sort_by(|a, b| {
            let ord = match self.sort {
                SortKey::Timestamp => a.created_at.cmp(&b.created_at),
                SortKey::ContentAddress => a
                    .content_address
                    .to_string()
                    .cmp(&b.content_address.to_string()),
            };
            match self.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
    }
}

/// Outcome of a batch delete
#[derive(Debug, Default)]
pub struct BatchDeleteReport {
    pub deleted: Vec<ContentAddress>,
    pub failed: Vec<(ContentAddress, ClientError)>,
}

impl BatchDeleteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(seed: &[u8], at: DateTime<Utc>) -> FileRecord {
        FileRecord {
            content_address: ContentAddress::for_bytes(seed),
            key_blob_address: ContentAddress::for_bytes(b"k"),
            owner: Identity::new("alice").unwrap(),
            created_at: at,
            is_public: true,
            extension: String::new(),
        }
    }

    #[test]
    fn test_extension_normalization() {
        assert_eq!(normalize_extension(".txt").unwrap(), "txt");
        assert_eq!(normalize_extension(" pdf ").unwrap(), "pdf");
        assert_eq!(normalize_extension("").unwrap(), "");
        assert!(normalize_extension("../etc").is_err());
        assert!(normalize_extension("a b").is_err());
    }

    #[test]
    fn test_time_ranges() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap();
        let earlier_today = Utc.with_ymd_and_hms(2024, 6, 15, 0, 30, 0).unwrap();
        let yesterday = Utc.with_ymd_and_hms(2024, 6, 14, 23, 0, 0).unwrap();
        let eight_days = Utc.with_ymd_and_hms(2024, 6, 7, 12, 0, 0).unwrap();
        let window_edge = Utc.with_ymd_and_hms(2024, 6, 8, 0, 0, 0).unwrap();

        assert!(TimeRange::Today.contains(earlier_today, now));
        assert!(!TimeRange::Today.contains(yesterday, now));
        assert!(TimeRange::Last7Days.contains(yesterday, now));
        assert!(TimeRange::Last7Days.contains(window_edge, now));
        assert!(!TimeRange::Last7Days.contains(eight_days, now));
        assert!(TimeRange::Last30Days.contains(eight_days, now));
        assert!(TimeRange::All.contains(Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap(), now));
    }

    #[test]
    fn test_time_range_parse() {
        assert_eq!("last7days".parse::<TimeRange>().unwrap(), TimeRange::Last7Days);
        assert_eq!("ALL".parse::<TimeRange>().unwrap(), TimeRange::All);
        assert!("forever".parse::<TimeRange>().is_err());
    }

    #[test]
    fn test_query_sorting() {
        let now = Utc::now();
        let mut records = vec![
            record(b"b", now - Duration::hours(2)),
            record(b"a", now - Duration::hours(1)),
            record(b"c", now - Duration::days(40)),
        ];

        FileQuery::default().apply(&mut records, now);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].content_address, ContentAddress::for_bytes(b"a"));
        assert_eq!(records[2].content_address, ContentAddress::for_bytes(b"c"));

        FileQuery::default()
            .with_range(TimeRange::Last30Days)
            .sorted_by(SortKey::Timestamp, SortOrder::Asc)
            .apply(&mut records, now);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].content_address, ContentAddress::for_bytes(b"b"));

        FileQuery::default()
            .sorted_by(SortKey::ContentAddress, SortOrder::Asc)
            .apply(&mut records, now);
        assert!(records[0].content_address.to_string() < records[1].content_address.to_string());
    }
}
