//! PostgreSQL implementations of the repository traits.

pub mod counter;
pub mod message;
pub mod project;
pub mod service_request;
pub mod service_type;
pub mod user;

use sqlx::PgPool;
use std::time::Duration;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    timeout: Duration,
}

impl PgStore {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

/// Follows every `ILIKE` bound to a [`like_pattern`].
pub(crate) const LIKE_ESCAPE: &str = r" ESCAPE '\'";

/// `%term%` for ILIKE comparisons. Wildcards in the term itself match
/// literally, the same as the in-process store.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_terms_are_matched_literally() {
        assert_eq!(like_pattern(" web "), "%web%");
        assert_eq!(like_pattern("50%"), r"%50\%%");
        assert_eq!(like_pattern("a_b"), r"%a\_b%");
        assert_eq!(like_pattern(r"c:\x"), r"%c:\\x%");
    }
}
