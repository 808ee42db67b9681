//! Registry configuration.

/// Configuration for the Registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Upper bound, in bytes, on each plaintext metadata field.
    pub max_metadata_bytes: usize,
    /// Buffer size of the live event channel. Slow subscribers that fall
    /// further behind than this miss events and must replay from the log.
    pub event_capacity: usize,
    /// Largest page `list_books` and `events_since` will return.
    pub max_page_size: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_metadata_bytes: 4096,
            event_capacity: 256,
            max_page_size: 1000,
        }
    }
}
