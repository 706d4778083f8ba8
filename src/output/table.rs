//! Plain-text tables

use crate::records::{ForumPost, ForumUser};
use std::fmt::Write;

/// Longest message excerpt shown in a posts table
const MESSAGE_WIDTH: usize = 60;

/// Renders posts as a table, one row per post
pub fn render_posts_table(posts: &[ForumPost]) -> String {
    let rows: Vec<Vec<String>> = posts
        .iter()
        .map(|post| {
            vec![
                post.id.to_string(),
                post.time_posted.format("%Y-%m-%d %H:%M").to_string(),
                post.username.clone(),
                post.likes.to_string(),
                excerpt(&post.message, MESSAGE_WIDTH),
            ]
        })
        .collect();

    render(&["ID", "POSTED", "USER", "LIKES", "MESSAGE"], &rows)
}

/// Renders users as a table, one row per user
pub fn render_users_table(users: &[ForumUser]) -> String {
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|user| {
            vec![
                user.id.to_string(),
                user.username.clone(),
                user.role.clone(),
                user.join_date.to_string(),
                user.messages.to_string(),
                user.reaction_score.to_string(),
                user.points.to_string(),
            ]
        })
        .collect();

    render(
        &["ID", "USER", "ROLE", "JOINED", "MESSAGES", "REACTIONS", "POINTS"],
        &rows,
    )
}

fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    write_row(&mut out, &header_cells, &widths);
    for row in rows {
        write_row(&mut out, row, &widths);
    }
    out
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}

fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", cut)
}
