//! Alias → token resolution backed by a [`Cache`].
//!
//! The API has no endpoint for looking a resource up by its human-readable
//! name, so a miss lists every resource once and remembers every mapping it
//! sees. Entries are never invalidated and a miss is never cached.

use std::future::Future;
use std::sync::Arc;

use crate::cache::Cache;
use crate::error::Error;

/// A listed resource that can take part in alias resolution.
pub trait Aliased {
    fn alias(&self) -> &str;
    fn token(&self) -> &str;
}

/// Resolves aliases through a shared cache, falling back to a listing call.
#[derive(Clone)]
pub struct AliasResolver {
    cache: Arc<dyn Cache>,
}

impl AliasResolver {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<dyn Cache> {
        &self.cache
    }

    /// Returns the token for `name`.
    ///
    /// A cached mapping is returned as-is without contacting the service.
    /// Otherwise `list` is awaited once; every item it yields is written to
    /// the cache, and the token of the item whose alias equals `name` exactly
    /// is returned. Listing errors are returned unchanged before anything is
    /// cached; no match yields [`Error::TokenNotFound`].
    pub async fn token_for_alias<T, F, Fut>(&self, name: &str, list: F) -> Result<String, Error>
    where
        T: Aliased,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, Error>>,
    {
        if let Some(token) = self.cache.get(name) {
            tracing::trace!(alias = name, "alias cache hit");
            return Ok(token);
        }
        tracing::trace!(alias = name, "alias cache miss, listing");

        let items = list().await?;

        let mut found = None;
        for item in &items {
            self.cache.put(item.alias(), item.token());
            if item.alias() == name {
                found = Some(item.token().to_string());
            }
        }

        found.ok_or(Error::TokenNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Item(&'static str, &'static str);

    impl Aliased for Item {
        fn alias(&self) -> &str {
            self.0
        }
        fn token(&self) -> &str {
            self.1
        }
    }

    fn resolver() -> (AliasResolver, Arc<MemoryCache>) {
        let cache = Arc::new(MemoryCache::new());
        (AliasResolver::new(cache.clone()), cache)
    }

    fn listing() -> Vec<Item> {
        vec![Item("Teen Quotes", "s7su"), Item("Blog", "ab12")]
    }

    #[tokio::test]
    async fn miss_lists_and_backfills() {
        let (r, cache) = resolver();
        let calls = AtomicUsize::new(0);
        let list = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(listing())
        };

        assert_eq!(r.token_for_alias("Teen Quotes", list).await.unwrap(), "s7su");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.get("Blog").as_deref(), Some("ab12"));
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let (r, _) = resolver();
        let calls = AtomicUsize::new(0);
        for _ in 0..2 {
            let token = r
                .token_for_alias("Blog", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(listing())
                })
                .await
                .unwrap();
            assert_eq!(token, "ab12");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_alias_is_not_negatively_cached() {
        let (r, cache) = resolver();
        let calls = AtomicUsize::new(0);
        for _ in 0..2 {
            let err = r
                .token_for_alias("nonexistent", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(listing())
                })
                .await
                .unwrap_err();
            assert!(err.is_token_not_found());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!cache.has("nonexistent"));
    }

    #[tokio::test]
    async fn match_is_exact_and_case_sensitive() {
        let (r, _) = resolver();
        for name in ["teen quotes", "Teen", "Teen Quotes "] {
            let err = r
                .token_for_alias(name, || async { Ok(listing()) })
                .await
                .unwrap_err();
            assert!(err.is_token_not_found(), "{name} should not match");
        }
    }

    #[tokio::test]
    async fn listing_error_propagates_without_caching() {
        let (r, cache) = resolver();
        let err = r
            .token_for_alias("Blog", || async {
                Err::<Vec<Item>, _>(Error::Other("boom".into()))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Other(ref m) if m == "boom"));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn stale_entry_wins_over_remote_state() {
        let (r, cache) = resolver();
        cache.put("Blog", "old-token");
        let token = r
            .token_for_alias("Blog", || async { Ok(listing()) })
            .await
            .unwrap();
        assert_eq!(token, "old-token");
    }

    #[tokio::test]
    async fn listing_overwrites_previous_mappings() {
        let (r, cache) = resolver();
        cache.put("Blog", "old-token");
        r.token_for_alias("Teen Quotes", || async { Ok(listing()) })
            .await
            .unwrap();
        assert_eq!(cache.get("Blog").as_deref(), Some("ab12"));
    }
}
