//! Output module for tabular access to stored records
//!
//! This module handles:
//! - Rendering stored posts and users as plain-text tables
//! - Summarising store contents

pub mod stats;
mod table;

pub use stats::{load_statistics, print_statistics, StoreStatistics};
pub use table::{render_posts_table, render_users_table};
