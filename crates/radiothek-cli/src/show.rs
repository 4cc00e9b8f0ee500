//! Show resolution: turning raw catalog records into a canonical `Show`.

use chrono::{Datelike, Local};
use regex::Regex;

use radiothek_api::types::{BroadcastRecord, HitData, ImageSet, SearchResponse, StreamDescriptor};

/// Entity value marking a search hit as a broadcast.
const BROADCAST_ENTITY: &str = "Broadcast";

/// Cover art is only embedded from the variant with exactly this width.
pub const COVER_WIDTH: u32 = 434;

/// Canonical, resolver-normalised view of a broadcast. Constructed once per
/// resolved broadcast and consumed by the path planner and tag writer.
#[derive(Debug, Clone, PartialEq)]
pub struct Show {
    pub title: String,
    /// Filesystem-safe title: whitespace runs collapsed to single
    /// underscores, no whitespace remains.
    pub title_sanitized: String,
    /// Human-readable description with `<...>` markup spans removed.
    pub description: String,
    /// Broadcast date as the catalog encodes it, YYYYMMDD.
    pub broadcast_day: String,
    /// Four-digit calendar year of the start timestamp, local time.
    pub year: String,
    pub images: Vec<ImageSet>,
    pub streams: Vec<StreamDescriptor>,
}

impl Show {
    /// URL of the exactly-[`COVER_WIDTH`]px cover variant, if the broadcast
    /// has one. No nearest-match fallback.
    pub fn cover_url(&self) -> Option<&str> {
        self.images
            .first()?
            .versions
            .iter()
            .find(|v| v.width == COVER_WIDTH)
            .map(|v| v.path.as_str())
    }
}

/// Whether a search hit qualifies for download: it must be a broadcast
/// entity and its title must contain the search term, case-insensitively.
/// Everything else is silently skipped.
pub fn accepts(data: &HitData, term: &str) -> bool {
    data.entity == BROADCAST_ENTITY
        && data
            .title
            .to_lowercase()
            .contains(&term.to_lowercase())
}

/// Hits of a search response that qualify for `term`, in catalog order.
pub fn matching_hits<'a>(response: &'a SearchResponse, term: &str) -> Vec<&'a HitData> {
    response
        .hits
        .iter()
        .map(|hit| &hit.data)
        .filter(|data| accepts(data, term))
        .collect()
}

/// Normalise a broadcast record into a `Show`.
pub fn resolve(record: &BroadcastRecord) -> Show {
    let title = record.title.trim().to_string();
    Show {
        title_sanitized: sanitize_title(&title),
        description: strip_markup(record.subtitle.trim()),
        broadcast_day: record.broadcast_day.to_string(),
        year: record
            .start_iso
            .with_timezone(&Local)
            .year()
            .to_string(),
        images: record.images.clone(),
        streams: record.streams.clone(),
        title,
    }
}

/// Replace every whitespace run with a single underscore and drop
/// surrounding whitespace.
pub fn sanitize_title(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Remove `<...>` spans from text.
///
/// The rule is syntactic and non-nested: anything between an opening angle
/// bracket and the next closing one is dropped verbatim; an unclosed `<` is
/// left as-is.
pub fn strip_markup(value: &str) -> String {
    Regex::new(r"<[^>]*>")
        .map(|re| re.replace_all(value, "").trim().to_string())
        .unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};
    use radiothek_api::types::ImageVariant;

    fn start() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2022-08-06T19:03:00+02:00").unwrap()
    }

    fn record(title: &str, subtitle: &str) -> BroadcastRecord {
        BroadcastRecord {
            entity: "Broadcast".to_string(),
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            broadcast_day: 20220806,
            program_key: "4SS".to_string(),
            start_iso: start(),
            end_iso: None,
            images: Vec::new(),
            streams: Vec::new(),
        }
    }

    fn hit(entity: &str, title: &str, href: &str) -> HitData {
        HitData {
            href: href.to_string(),
            station: "fm4".to_string(),
            entity: entity.to_string(),
            id: 0,
            broadcast_day: 20220806,
            program_key: String::new(),
            title: title.to_string(),
            subtitle: String::new(),
            start_iso: None,
            end_iso: None,
            images: Vec::new(),
        }
    }

    #[test]
    fn sanitize_collapses_whitespace_runs() {
        assert_eq!(sanitize_title("Title Test"), "Title_Test");
        assert_eq!(sanitize_title("  Title \t  Test \n"), "Title_Test");
        assert!(!sanitize_title(" a  b\tc ").contains(char::is_whitespace));
    }

    #[test]
    fn strip_markup_removes_tag_spans() {
        assert_eq!(strip_markup("<p>Description</p> "), "Description");
        assert_eq!(strip_markup("a <b>bold</b> word"), "a bold word");
        // Unclosed tags are not a parser's problem; they stay.
        assert_eq!(strip_markup("5 < 6"), "5 < 6");
    }

    #[test]
    fn resolves_broadcast_into_show() {
        let show = resolve(&record(" Title Test ", "<p>Description</p> "));
        assert_eq!(show.title, "Title Test");
        assert_eq!(show.title_sanitized, "Title_Test");
        assert_eq!(show.description, "Description");
        assert_eq!(show.broadcast_day, "20220806");
        assert_eq!(show.year, "2022");
    }

    #[test]
    fn accepts_only_broadcasts_matching_the_term() {
        let broadcast = hit("Broadcast", "Swound Sound Session", "href-1");
        let article = hit("Article", "Swound Sound retrospective", "href-2");
        let unrelated = hit("Broadcast", "Morning Show", "href-3");

        assert!(accepts(&broadcast, "swound sound"));
        assert!(!accepts(&article, "swound sound"));
        assert!(!accepts(&unrelated, "swound sound"));
    }

    #[test]
    fn matching_hits_keeps_catalog_order() {
        let response = SearchResponse {
            took: 0,
            total: 3,
            hits: vec![
                radiothek_api::types::SearchHit {
                    data: hit("Broadcast", "Swound Sound Session", "href-1"),
                },
                radiothek_api::types::SearchHit {
                    data: hit("Article", "Swound Sound retrospective", "href-2"),
                },
                radiothek_api::types::SearchHit {
                    data: hit("Broadcast", "Swound Sound Special", "href-3"),
                },
            ],
            suggest: Vec::new(),
        };

        let matches = matching_hits(&response, "Swound Sound");
        let hrefs: Vec<&str> = matches.iter().map(|d| d.href.as_str()).collect();
        assert_eq!(hrefs, vec!["href-1", "href-3"]);
    }

    #[test]
    fn cover_url_requires_exact_width() {
        let mut show = resolve(&record("Title", ""));
        show.images = vec![ImageSet {
            versions: vec![
                ImageVariant {
                    path: "https://img/width200.jpg".to_string(),
                    width: 200,
                },
                ImageVariant {
                    path: "https://img/width434.jpg".to_string(),
                    width: COVER_WIDTH,
                },
            ],
        }];
        assert_eq!(show.cover_url(), Some("https://img/width434.jpg"));

        show.images[0].versions.pop();
        assert_eq!(show.cover_url(), None);
    }
}
