//! Post and author extraction for a single message block

use crate::extract::normalize::{
    collapse_whitespace, count_likes, parse_count, parse_join_date, parse_post_timestamp,
    parse_prefixed_id, split_caption,
};
use crate::extract::{require, require_attr, Selectors};
use crate::records::{ForumPost, ForumUser};
use crate::{Result, SpacerError};
use scraper::ElementRef;

/// Reads the author of a message block
///
/// The metadata list holds exactly four values in a fixed order: join date,
/// message count, reaction score, points.
pub(crate) fn extract_user(block: ElementRef<'_>, selectors: &Selectors) -> Result<ForumUser> {
    let author = require(block, &selectors.author, "author block")?;
    let link = require(author, &selectors.user_link, "user link")?;

    let id_attr = require_attr(link, "data-user-id")?;
    let id = id_attr
        .trim()
        .parse::<i64>()
        .map_err(|_| SpacerError::MalformedAttribute {
            name: "data-user-id",
            value: id_attr.to_string(),
        })?;
    let username = collapse_whitespace(&link.text().collect::<String>());

    let role = author
        .select(&selectors.roles)
        .map(|label| collapse_whitespace(&label.text().collect::<String>()))
        .filter(|label| !label.is_empty())
        .collect::<Vec<_>>()
        .join(",");

    let extras: Vec<String> = block
        .select(&selectors.extras)
        .map(|value| collapse_whitespace(&value.text().collect::<String>()))
        .collect();
    let [joined, messages, reaction_score, points] = extras.as_slice() else {
        return Err(SpacerError::MissingElement(format!(
            "user metadata (expected 4 fields, found {})",
            extras.len()
        )));
    };

    Ok(ForumUser {
        id,
        username,
        role,
        join_date: parse_join_date(joined)?,
        messages: parse_count(messages)?,
        reaction_score: parse_count(reaction_score)?,
        points: parse_count(points)?,
        last_updated: None,
    })
}

/// Reads the post of a message block, attributed to `author`
pub(crate) fn extract_post(
    block: ElementRef<'_>,
    selectors: &Selectors,
    author: &ForumUser,
    thread: &str,
) -> Result<ForumPost> {
    let content = require(block, &selectors.caption, "post caption")?;
    let (username, timestamp) = split_caption(require_attr(content, "data-lb-caption-desc")?)?;
    let id = parse_prefixed_id("data-lb-id", require_attr(content, "data-lb-id")?)?;

    let body = require(block, &selectors.body, "message body")?;
    let message = clean_body(body);

    let summary = block
        .select(&selectors.reactions)
        .next()
        .map(|link| link.text().collect::<String>());

    Ok(ForumPost {
        id,
        user_id: author.id,
        username,
        thread: thread.to_string(),
        message,
        likes: count_likes(summary.as_deref())?,
        time_posted: parse_post_timestamp(&timestamp)?,
        last_updated: None,
    })
}

/// Text of a message body without any quoted replies, whitespace collapsed
pub(crate) fn clean_body(body: ElementRef<'_>) -> String {
    let mut text = String::new();
    collect_unquoted_text(body, &mut text);
    collapse_whitespace(&text)
}

fn collect_unquoted_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if child_element.value().name() != "blockquote" {
                collect_unquoted_text(child_element, out);
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}
