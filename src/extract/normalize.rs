//! Normalisation of the free text found in forum markup
//!
//! Dates, reaction summaries, message bodies and numeric strings all arrive
//! as display text. The helpers here turn them into typed values and fail
//! hard on anything that does not match the forum's formatting.

use crate::{Result, SpacerError};
use chrono::{NaiveDate, NaiveDateTime};

/// Post timestamps, e.g. `Jan 5, 2021 at 3:45 PM`
pub const POST_TIMESTAMP_FORMAT: &str = "%b %d, %Y at %I:%M %p";

/// Member join dates, e.g. `Jan 5, 2021`
pub const JOIN_DATE_FORMAT: &str = "%b %d, %Y";

/// Separator between username and timestamp in a post caption
pub const CAPTION_SEPARATOR: char = '\u{00B7}';

/// Parses a post timestamp such as `Jan 5, 2021 at 3:45 PM`
pub fn parse_post_timestamp(text: &str) -> Result<NaiveDateTime> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, POST_TIMESTAMP_FORMAT).map_err(|source| {
        SpacerError::MalformedDate {
            value: text.to_string(),
            source,
        }
    })
}

/// Parses a join date such as `Jan 5, 2021`
pub fn parse_join_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, JOIN_DATE_FORMAT).map_err(|source| {
        SpacerError::MalformedDate {
            value: text.to_string(),
            source,
        }
    })
}

/// Parses a displayed count such as `1,204`
pub fn parse_count(text: &str) -> Result<i64> {
    let digits: String = text
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    digits
        .parse::<i64>()
        .map_err(|_| SpacerError::MalformedNumber(text.trim().to_string()))
}

/// Collapses every whitespace run (spaces, tabs, line breaks) into one space
/// and trims both ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Derives a like count from a reaction summary
///
/// The summary lists reactors as `A, B[, C...]`, optionally followed by
/// `and <N> others` or `and <name>`. Every comma-separated name in the first
/// clause counts once; the trailing clause adds `N`, or one when it names a
/// single person. `None` (no reaction link on the post) counts zero.
///
/// ```
/// use spacer::extract::count_likes;
///
/// assert_eq!(count_likes(Some("Alice, Bob and 3 others")).unwrap(), 5);
/// assert_eq!(count_likes(Some("Alice and Bob")).unwrap(), 2);
/// assert_eq!(count_likes(None).unwrap(), 0);
/// ```
pub fn count_likes(summary: Option<&str>) -> Result<u32> {
    let summary = match summary.map(collapse_whitespace) {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(0),
    };

    let (named, trailing) = match summary.rsplit_once(" and ") {
        Some((named, trailing)) => (named, Some(trailing)),
        None => (summary.as_str(), None),
    };

    let named_count = named.split(',').filter(|n| !n.trim().is_empty()).count() as u32;

    let trailing_count = match trailing {
        None => 0,
        Some(clause) => match others_count(clause) {
            Some(others) => {
                u32::try_from(others).map_err(|_| SpacerError::MalformedNumber(clause.to_string()))?
            }
            None => 1,
        },
    };

    Ok(named_count + trailing_count)
}

/// Reads `N` from an `<N> others` (or `<N> other`) clause
///
/// Anything else is a single name, even one starting with a digit.
fn others_count(clause: &str) -> Option<i64> {
    let (count, word) = clause.rsplit_once(' ')?;
    if word != "others" && word != "other" {
        return None;
    }
    parse_count(count).ok()
}

/// Splits a `<username> · <timestamp>` caption on its first middle dot
pub fn split_caption(caption: &str) -> Result<(String, String)> {
    caption
        .split_once(CAPTION_SEPARATOR)
        .map(|(user, time)| (user.trim().to_string(), time.trim().to_string()))
        .filter(|(user, time)| !user.is_empty() && !time.is_empty())
        .ok_or_else(|| SpacerError::MalformedAttribute {
            name: "caption",
            value: caption.to_string(),
        })
}

/// Reads the numeric suffix of a `<prefix>-<id>` identifier
pub fn parse_prefixed_id(name: &'static str, value: &str) -> Result<i64> {
    value
        .rsplit_once('-')
        .and_then(|(_, id)| id.parse::<i64>().ok())
        .ok_or_else(|| SpacerError::MalformedAttribute {
            name,
            value: value.to_string(),
        })
}
