//! Business search behind the global throttle.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{error::ScoutError, throttle::SearchThrottle, time::now_utc};

pub mod http;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub location: Option<String>,
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub location: Option<String>,
    pub results: Vec<Business>,
    pub fetched_at: DateTime<Utc>,
}

/// Downstream provider of business listings, the resource the throttle protects.
#[allow(async_fn_in_trait)]
pub trait SearchBackend {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Business>, ScoutError>;
}

pub struct SearchService<B> {
    throttle: Arc<SearchThrottle>,
    backend: B,
}

impl<B: SearchBackend> SearchService<B> {
    pub fn new(throttle: Arc<SearchThrottle>, backend: B) -> Self {
        Self { throttle, backend }
    }

    pub fn throttle(&self) -> &SearchThrottle {
        &self.throttle
    }

    pub async fn search(&self, query: SearchQuery) -> Result<SearchResults, ScoutError> {
        let text = query.text.trim();
        if text.is_empty() {
            return Err(ScoutError::InvalidQuery("query is empty".into()));
        }
        if query.limit == 0 {
            return Err(ScoutError::InvalidQuery("limit must be positive".into()));
        }

        let decision = self.throttle.try_acquire();
        if !decision.allowed {
            tracing::warn!(
                remaining_seconds = decision.remaining_seconds,
                "search rejected by throttle"
            );
            return Err(ScoutError::Throttled {
                remaining_seconds: decision.remaining_seconds,
            });
        }

        let query = SearchQuery {
            text: text.to_string(),
            location: query
                .location
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
            limit: query.limit,
        };
        let mut results = self.backend.search(&query).await?;
        results.truncate(query.limit);
        tracing::info!("search {:?} returned {} businesses", query.text, results.len());

        Ok(SearchResults {
            query: query.text,
            location: query.location,
            results,
            fetched_at: now_utc(),
        })
    }

    pub fn reset_throttle(&self) {
        self.throttle.reset();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use super::*;
    use crate::core::time::ManualClock;

    #[derive(Default)]
    struct CountingBackend {
        calls: AtomicUsize,
    }

    impl SearchBackend for &CountingBackend {
        async fn search(&self, query: &SearchQuery) -> Result<Vec<Business>, ScoutError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((0..3)
                .map(|i| Business {
                    name: format!("{} #{i}", query.text),
                    address: None,
                    phone: None,
                    website: None,
                    category: None,
                    rating: None,
                })
                .collect())
        }
    }

    fn query(text: &str) -> SearchQuery {
        SearchQuery {
            text: text.to_string(),
            location: None,
            limit: 10,
        }
    }

    #[tokio::test]
    async fn throttled_search_never_reaches_backend() {
        let clock = Arc::new(ManualClock::new(0));
        let throttle = Arc::new(SearchThrottle::with_clock(
            Duration::from_secs(5),
            clock.clone(),
        ));
        let backend = CountingBackend::default();
        let service = SearchService::new(throttle, &backend);

        service.search(query("plumbers")).await.unwrap();
        clock.set(1_200);
        let err = service.search(query("bakeries")).await.unwrap_err();
        assert!(matches!(
            err,
            ScoutError::Throttled {
                remaining_seconds: 4
            }
        ));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);

        service.reset_throttle();
        service.search(query("bakeries")).await.unwrap();
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_query_keeps_window_open() {
        let clock = Arc::new(ManualClock::new(0));
        let throttle = Arc::new(SearchThrottle::with_clock(Duration::from_secs(5), clock));
        let backend = CountingBackend::default();
        let service = SearchService::new(throttle, &backend);

        let err = service.search(query("   ")).await.unwrap_err();
        assert!(matches!(err, ScoutError::InvalidQuery(_)));
        assert!(service.throttle().peek().allowed);
    }

    #[tokio::test]
    async fn results_are_capped_at_limit() {
        let throttle = Arc::new(SearchThrottle::new(Duration::ZERO));
        let backend = CountingBackend::default();
        let service = SearchService::new(throttle, &backend);

        let mut q = query("  dentists ");
        q.limit = 2;
        q.location = Some("  ".into());
        let res = service.search(q).await.unwrap();
        assert_eq!(res.query, "dentists");
        assert_eq!(res.location, None);
        assert_eq!(res.results.len(), 2);
    }
}
