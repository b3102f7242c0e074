//! Resource configuration.

/// Settings shared by resource listings.
#[derive(Debug, Clone)]
pub struct ResourceConfig {
    /// Items per listing page, sent as `pagesize`.
    pub page_size: u32,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}
