// Browsing session: the catalog handle and wish list owned by one user session.
// State is held here explicitly and changed only through the pure operations it wraps.

use crate::catalog::Catalog;
use crate::filter::{apply, FilterSpec};
use crate::intent::IntentClassifier;
use crate::offer::TravelOffer;
use crate::wishlist::WishList;
use std::sync::Arc;
use tracing::{info, warn};

// What the question box shows: an answer, or an inline error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    Error(String),
}

#[derive(Debug, Clone)]
pub struct BrowsingSession {
    catalog: Arc<Catalog>,
    wish_list: WishList,
}

impl BrowsingSession {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            wish_list: WishList::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn wish_list(&self) -> &WishList {
        &self.wish_list
    }

    pub fn search(&self, spec: &FilterSpec) -> Vec<TravelOffer> {
        apply(&self.catalog, spec)
    }

    // Returns false if the location was already saved
    pub fn save_location(&mut self, name: &str) -> bool {
        let (list, added) = std::mem::take(&mut self.wish_list).add_location(name);
        self.wish_list = list;
        if added {
            info!(location = name, "Added to wish list");
        }
        added
    }

    // Blank questions are not sent. Service failures stay inside the answer
    // and never touch the catalog or the wish list.
    pub async fn ask<C: IntentClassifier + ?Sized>(
        &self,
        classifier: &C,
        question: &str,
    ) -> Option<Answer> {
        let question = question.trim();
        if question.is_empty() {
            return None;
        }

        Some(match classifier.classify_intent(question).await {
            Ok(result) => Answer::Text(result.answer().to_string()),
            Err(e) => {
                warn!(error = %e, "Question could not be answered");
                Answer::Error(e.to_string())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample_row;
    use crate::catalog::{load, InMemorySource};
    use crate::intent::{IntentResult, ServiceError, FALLBACK_ANSWER};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedClassifier {
        reply: fn() -> Result<IntentResult, ServiceError>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IntentClassifier for FixedClassifier {
        async fn classify_intent(&self, _question: &str) -> Result<IntentResult, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.reply)()
        }
    }

    fn session() -> BrowsingSession {
        let rows = vec![sample_row("T1", "Paris", 500.0), sample_row("T2", "Goa", 900.0)];
        let catalog = load(&InMemorySource::new("memory", rows)).unwrap();
        BrowsingSession::new(Arc::new(catalog))
    }

    #[test]
    fn test_save_location_deduplicates() {
        let mut session = session();
        assert!(session.save_location("Paris"));
        assert!(!session.save_location("Paris"));
        assert!(session.save_location("Goa"));
        assert_eq!(session.wish_list().locations(), ["Paris", "Goa"].map(String::from));
    }

    #[test]
    fn test_search_uses_session_catalog() {
        let session = session();
        let mut spec = FilterSpec::sidebar_defaults(session.catalog());
        spec.min_star_rating = 1;

        let ids: Vec<String> = session.search(&spec).into_iter().map(|o| o.travel_id).collect();
        assert_eq!(ids, vec!["T1".to_string(), "T2".to_string()]);
    }

    #[test]
    fn test_ask_returns_intent_name() {
        let session = session();
        let classifier = FixedClassifier {
            reply: || {
                Ok(IntentResult::Recognized {
                    name: "visa info".to_string(),
                    confidence: 0.7,
                })
            },
            calls: AtomicUsize::new(0),
        };

        let answer = tokio_test::block_on(session.ask(&classifier, "do I need a visa?"));
        assert_eq!(answer, Some(Answer::Text("visa info".to_string())));
    }

    #[test]
    fn test_ask_fallback_when_unrecognized() {
        let session = session();
        let classifier = FixedClassifier {
            reply: || Ok(IntentResult::Unrecognized),
            calls: AtomicUsize::new(0),
        };

        let answer = tokio_test::block_on(session.ask(&classifier, "hmm"));
        assert_eq!(answer, Some(Answer::Text(FALLBACK_ANSWER.to_string())));
    }

    #[test]
    fn test_blank_question_is_not_sent() {
        let session = session();
        let classifier = FixedClassifier {
            reply: || Ok(IntentResult::Unrecognized),
            calls: AtomicUsize::new(0),
        };

        assert_eq!(tokio_test::block_on(session.ask(&classifier, "   ")), None);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_service_failure_is_isolated() {
        let mut session = session();
        session.save_location("Paris");
        let before = session.clone();
        let classifier = FixedClassifier {
            reply: || {
                Err(ServiceError::Status {
                    status_code: 503,
                    body: "unavailable".to_string(),
                })
            },
            calls: AtomicUsize::new(0),
        };

        let answer = session.ask(&classifier, "where to go?").await;
        match answer {
            Some(Answer::Error(message)) => {
                assert!(message.contains("503"));
                assert!(message.contains("unavailable"));
            }
            other => panic!("Expected inline error, got {:?}", other),
        }

        assert_eq!(session.wish_list(), before.wish_list());
        assert_eq!(session.catalog(), before.catalog());
    }
}
