//! Statistics over the record store

use crate::storage::ForumStore;
use crate::SpacerError;

/// Store contents summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStatistics {
    pub total_users: u64,
    pub total_posts: u64,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
///
/// # Returns
///
/// * `Ok(StoreStatistics)` - Successfully loaded statistics
/// * `Err(SpacerError)` - Failed to query statistics
pub fn load_statistics(storage: &dyn ForumStore) -> Result<StoreStatistics, SpacerError> {
    Ok(StoreStatistics {
        total_users: storage.count_users()?,
        total_posts: storage.count_posts()?,
    })
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Store Statistics ===\n");
    println!("  Users: {}", stats.total_users);
    println!("  Posts: {}", stats.total_posts);
}
