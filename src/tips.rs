//! Random tip selection per cohort

use std::sync::Arc;

use rand::Rng;
use rand_core::RngCore;

use crate::catalog::ContentCatalog;
use crate::content::TipItem;
use crate::profile::CohortResolver;

#[derive(Debug, Clone)]
pub struct TipSelector {
    catalog: Arc<ContentCatalog<TipItem>>,
}

impl TipSelector {
    pub fn new(catalog: Arc<ContentCatalog<TipItem>>) -> Self {
        Self { catalog }
    }

    /// Pick one tip uniformly from the cohort's sequence. Repeats are allowed;
    /// unknown or empty cohorts draw from `student`.
    pub fn select_tip<R: RngCore>(&self, cohort: &str, rng: &mut R) -> TipItem {
        let tips = self.catalog.entries_for(cohort);
        let index = rng.gen_range(0..tips.len());
        tracing::trace!(cohort, index, "tip selected");
        tips[index].clone()
    }

    /// Resolve the signed-in user's cohort and pick a tip for it.
    /// `None` means nobody is signed in and yields the sign-in sentinel.
    pub async fn select_tip_for_user<R: RngCore>(
        &self,
        resolver: &CohortResolver,
        user_id: Option<&str>,
        rng: &mut R,
    ) -> TipItem {
        match user_id {
            Some(user_id) => {
                let cohort = resolver.resolve_cohort(user_id).await;
                self.select_tip(cohort.as_str(), rng)
            }
            None => TipItem::sign_in(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::config::AwarenessConfig;
    use crate::content;
    use crate::profile::{InMemoryProfileStore, ProfileRecord};
    use crate::Cohort;

    fn selector() -> TipSelector {
        TipSelector::new(Arc::new(content::builtin_tips().unwrap()))
    }

    #[test]
    fn test_tip_belongs_to_cohort() {
        let selector = selector();
        let catalog = content::builtin_tips().unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for cohort in Cohort::ALL {
            let pool = catalog.entries_for(cohort.as_str());
            for _ in 0..50 {
                let tip = selector.select_tip(cohort.as_str(), &mut rng);
                assert!(pool.contains(&tip), "{} not in {}", tip.key(), cohort);
            }
        }
    }

    #[test]
    fn test_unknown_cohort_uses_student_tips() {
        let selector = selector();
        let student = content::builtin_tips().unwrap();
        let student = student.entries_for("student");
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..20 {
            let tip = selector.select_tip("unknown_cohort", &mut rng);
            assert!(student.contains(&tip));
        }
    }

    #[test]
    fn test_selection_is_roughly_uniform() {
        let selector = selector();
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<TipItem, usize> = HashMap::new();
        let draws = 4_000;

        for _ in 0..draws {
            *counts
                .entry(selector.select_tip("senior", &mut rng))
                .or_insert(0) += 1;
        }

        assert_eq!(counts.len(), 4);
        for count in counts.values() {
            // expected 1000 each
            assert!((800..=1200).contains(count), "skewed count {}", count);
        }
    }

    #[test]
    fn test_seeded_selection_is_reproducible() {
        let selector = selector();
        let picks = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10)
                .map(|_| selector.select_tip("rural", &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(3), picks(3));
    }

    #[tokio::test]
    async fn test_tip_for_user() {
        let store = Arc::new(InMemoryProfileStore::new());
        store
            .upsert(ProfileRecord::new("u1").with_demographic("professional"))
            .await;
        let resolver = CohortResolver::new(store, &AwarenessConfig::default());
        let selector = selector();
        let mut rng = StdRng::seed_from_u64(5);

        let tip = selector
            .select_tip_for_user(&resolver, Some("u1"), &mut rng)
            .await;
        assert!(tip.key().starts_with("tips.professional."));

        let tip = selector
            .select_tip_for_user(&resolver, Some("stranger"), &mut rng)
            .await;
        assert!(tip.key().starts_with("tips.student."));

        let tip = selector.select_tip_for_user(&resolver, None, &mut rng).await;
        assert!(tip.is_sign_in());
    }
}
