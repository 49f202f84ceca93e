//! Listing filters for a user's files.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use jotter_core::types::SortDirection;

use super::kind::FileKind;
use super::model::File;

/// Field used to order a file listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileSortField {
    /// Display name.
    Name,
    /// Content size.
    Size,
    /// Type classification.
    #[serde(rename = "type")]
    Kind,
    /// Creation time.
    #[default]
    CreatedAt,
    /// Last update time.
    UpdatedAt,
}

impl FileSortField {
    /// Expression used in `ORDER BY`.
    ///
    /// Types sort by name so both backends agree.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Size => "size",
            Self::Kind => "kind::text",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }

    fn compare(&self, a: &File, b: &File) -> Ordering {
        match self {
            Self::Name => a.name.cmp(&b.name),
            Self::Size => a.size.cmp(&b.size),
            Self::Kind => a.kind.as_str().cmp(b.kind.as_str()),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

/// Conjunctive filter over one owner's files.
///
/// Unset fields do not restrict the result.
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    /// Exact type match.
    pub kind: Option<FileKind>,
    /// Only favorites.
    pub favorite_only: bool,
    /// Case-insensitive substring of the name.
    pub search_term: Option<String>,
    /// Direct children of this folder.
    pub parent_folder: Option<Uuid>,
    /// UTC calendar day of creation.
    pub date: Option<NaiveDate>,
    /// Ordering field.
    pub sort_field: FileSortField,
    /// Ordering direction.
    pub sort_direction: SortDirection,
}

impl FileFilter {
    /// Lowercased, trimmed search term, or `None` when blank.
    pub fn normalized_search(&self) -> Option<String> {
        self.search_term
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// Half-open `[start, end)` UTC range for the `date` filter.
    pub fn date_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let day = self.date?;
        let start = day.and_hms_opt(0, 0, 0)?.and_utc();
        let end = day.succ_opt()?.and_hms_opt(0, 0, 0)?.and_utc();
        Some((start, end))
    }

    /// Whether `file` passes every supplied predicate.
    pub fn matches(&self, file: &File) -> bool {
        if self.kind.is_some_and(|k| k != file.kind) {
            return false;
        }
        if self.favorite_only && !file.is_favorite {
            return false;
        }
        if self.parent_folder.is_some() && self.parent_folder != file.parent_folder {
            return false;
        }
        if let Some(term) = self.normalized_search() {
            if !file.name.to_lowercase().contains(&term) {
                return false;
            }
        }
        if let Some((start, end)) = self.date_range() {
            if file.created_at < start || file.created_at >= end {
                return false;
            }
        }
        true
    }

    /// Ordering implied by the sort field and direction.
    pub fn compare(&self, a: &File, b: &File) -> Ordering {
        self.sort_direction.apply(self.sort_field.compare(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn file(name: &str, kind: FileKind, created: DateTime<Utc>) -> File {
        File {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            size: 1,
            path: String::new(),
            public_id: None,
            parent_folder: None,
            owner: Uuid::nil(),
            is_favorite: false,
            is_private: false,
            password_hash: None,
            tags: vec![],
            metadata: serde_json::Value::Null,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let f = FileFilter {
            search_term: Some("REP".into()),
            ..Default::default()
        };
        let now = Utc::now();
        assert!(f.matches(&file("Quarterly report.pdf", FileKind::Pdf, now)));
        assert!(!f.matches(&file("notes.txt", FileKind::Text, now)));
    }

    #[test]
    fn test_date_restricts_to_utc_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let f = FileFilter {
            date: Some(day),
            ..Default::default()
        };
        let inside = Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 59).unwrap();
        let next = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();
        assert!(f.matches(&file("a", FileKind::Text, inside)));
        assert!(!f.matches(&file("a", FileKind::Text, next)));
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let now = Utc::now();
        let mut fav_pdf = file("a.pdf", FileKind::Pdf, now);
        fav_pdf.is_favorite = true;
        let plain_pdf = file("b.pdf", FileKind::Pdf, now);
        let f = FileFilter {
            kind: Some(FileKind::Pdf),
            favorite_only: true,
            ..Default::default()
        };
        assert!(f.matches(&fav_pdf));
        assert!(!f.matches(&plain_pdf));
    }

    #[test]
    fn test_default_order_is_newest_first() {
        let older = file("a", FileKind::Text, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let newer = file("b", FileKind::Text, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        let f = FileFilter::default();
        assert_eq!(f.compare(&newer, &older), Ordering::Less);
    }

    #[test]
    fn test_type_order_is_alphabetical() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let f = FileFilter {
            sort_field: FileSortField::Kind,
            sort_direction: SortDirection::Asc,
            ..FileFilter::default()
        };
        let mut files = vec![
            file("a", FileKind::Image, at),
            file("b", FileKind::Folder, at),
            file("c", FileKind::Text, at),
            file("d", FileKind::Html, at),
        ];
        files.sort_by(|a, b| f.compare(a, b));
        let kinds: Vec<_> = files.iter().map(|f| f.kind.as_str()).collect();
        assert_eq!(kinds, ["folder", "html", "image", "text"]);
    }
}
