/// API route handlers
///
/// - `health`: Health check endpoint
/// - `users`: User registration, lookup, deactivation and per-user items
/// - `items`: Item listing

pub mod health;
pub mod items;
pub mod users;

use serde::Deserialize;

/// Default page size
pub const DEFAULT_LIMIT: i64 = 100;

/// Largest page a client may request
pub const MAX_LIMIT: i64 = 1000;

/// `?skip=&limit=` query parameters
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Pagination {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    /// Rows to skip, never negative
    pub fn skip(&self) -> i64 {
        self.skip.unwrap_or(0).max(0)
    }

    /// Page size, clamped to `1..=MAX_LIMIT`
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let page = Pagination::default();
        assert_eq!(page.skip(), 0);
        assert_eq!(page.limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn test_pagination_clamps() {
        let page = Pagination {
            skip: Some(-5),
            limit: Some(0),
        };
        assert_eq!(page.skip(), 0);
        assert_eq!(page.limit(), 1);

        let page = Pagination {
            skip: Some(20),
            limit: Some(50_000),
        };
        assert_eq!(page.skip(), 20);
        assert_eq!(page.limit(), MAX_LIMIT);
    }
}
