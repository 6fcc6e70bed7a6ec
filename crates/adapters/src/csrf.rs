// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use parking_lot::RwLock;

/// Supplies the CSRF token attached to every mutating request.
///
/// The token is opaque; it is never inspected, only forwarded.
pub trait CsrfSource: Send + Sync + 'static {
    fn token(&self) -> Option<String>;
}

/// A token fixed at startup, replaceable when the session is renewed.
#[derive(Debug, Clone, Default)]
pub struct StaticCsrf {
    token: Arc<RwLock<Option<String>>>,
}

impl StaticCsrf {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: Arc::new(RwLock::new(Some(token.into()))) }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn replace(&self, token: Option<String>) {
        *self.token.write() = token;
    }
}

impl CsrfSource for StaticCsrf {
    fn token(&self) -> Option<String> {
        self.token.read().clone().filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_counts_as_missing() {
        assert_eq!(StaticCsrf::new("").token(), None);
        assert_eq!(StaticCsrf::none().token(), None);
    }

    #[test]
    fn replace_is_visible_through_clones() {
        let source = StaticCsrf::none();
        let shared = source.clone();
        source.replace(Some("tok".to_string()));
        assert_eq!(shared.token().as_deref(), Some("tok"));
    }
}
