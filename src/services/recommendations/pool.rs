use crate::models::{CandidateRecommendation, NormalizedKey};
use std::collections::{hash_map::Entry, HashMap};

/// Which candidate survives when two seeds surface the same track
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// First arrival wins; arrival follows job completion order, not seed order
    #[default]
    KeepFirst,
    /// Highest match score wins regardless of arrival order
    KeepHighest,
}

/// Deduplicated working set of one orchestration run, keyed by normalized identity
#[derive(Debug, Default)]
pub struct RecommendationPool {
    entries: HashMap<NormalizedKey, CandidateRecommendation>,
    policy: DuplicatePolicy,
}

impl RecommendationPool {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            entries: HashMap::new(),
            policy,
        }
    }

    /// Admit `candidate` unless its identity is already pooled
    ///
    /// Returns true when the candidate was inserted. Under `KeepHighest` a
    /// duplicate with a strictly higher score replaces the pooled entry and
    /// also counts as admitted.
    pub fn try_admit(&mut self, candidate: CandidateRecommendation) -> bool {
        match self.entries.entry(candidate.key()) {
            Entry::Vacant(slot) => {
                slot.insert(candidate);
                true
            }
            Entry::Occupied(mut slot) => match self.policy {
                DuplicatePolicy::KeepFirst => false,
                DuplicatePolicy::KeepHighest => {
                    if candidate.match_score > slot.get().match_score {
                        slot.insert(candidate);
                        true
                    } else {
                        false
                    }
                }
            },
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> impl Iterator<Item = (NormalizedKey, CandidateRecommendation)> {
        self.entries.into_iter()
    }
}
