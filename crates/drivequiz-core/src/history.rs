//! History of correctly answered questions and the retry preference.
//!
//! The history set holds each question's most recent outcome only: a correct
//! answer adds the id, a later wrong answer removes it. Both the set and the
//! preference flag are written back to the store after every change.
//!
//! Storage problems never reach the caller. A value that cannot be read is
//! treated as absent, and the first failed write switches the store to
//! memory-only for the rest of the session.

use std::collections::BTreeSet;

use crate::store::KeyValueStore;

/// Store key for the JSON array of correctly answered ids.
pub const CORRECT_QUESTIONS_KEY: &str = "correctQuestions";

/// Store key for the JSON boolean preference flag.
pub const USE_PREVIOUS_CORRECT_KEY: &str = "usePreviousCorrect";

/// Persisted history set and preference flag.
pub struct HistoryStore {
    store: Box<dyn KeyValueStore>,
    correct: BTreeSet<String>,
    use_previous_correct: bool,
    persistent: bool,
}

impl HistoryStore {
    /// Load history and preference from `store`.
    pub fn open(store: Box<dyn KeyValueStore>) -> Self {
        let mut persistent = true;

        let correct = match read_json::<Vec<String>>(store.as_ref(), CORRECT_QUESTIONS_KEY) {
            Ok(ids) => ids.unwrap_or_default().into_iter().collect(),
            Err(e) => {
                tracing::warn!("could not load answer history, starting empty: {e:#}");
                persistent = is_readable(store.as_ref());
                BTreeSet::new()
            }
        };

        let use_previous_correct =
            match read_json::<bool>(store.as_ref(), USE_PREVIOUS_CORRECT_KEY) {
                Ok(flag) => flag.unwrap_or(false),
                Err(e) => {
                    tracing::warn!("could not load preference, using default: {e:#}");
                    false
                }
            };

        if !persistent {
            tracing::warn!("storage unavailable, history is kept in memory for this session");
        }

        Self {
            store,
            correct,
            use_previous_correct,
            persistent,
        }
    }

    /// Record the latest outcome for one question.
    pub fn record_outcome(&mut self, id: &str, was_correct: bool) {
        let changed = if was_correct {
            self.correct.insert(id.to_string())
        } else {
            self.correct.remove(id)
        };
        if changed {
            self.save_history();
        }
    }

    pub fn is_previously_correct(&self, id: &str) -> bool {
        self.correct.contains(id)
    }

    /// Ids most recently answered correctly.
    pub fn correct_ids(&self) -> &BTreeSet<String> {
        &self.correct
    }

    pub fn get_preference(&self) -> bool {
        self.use_previous_correct
    }

    pub fn set_preference(&mut self, use_previous_correct: bool) {
        self.use_previous_correct = use_previous_correct;
        self.write(USE_PREVIOUS_CORRECT_KEY, &use_previous_correct.to_string());
    }

    /// Flip the preference flag and return the new value.
    pub fn toggle_preference(&mut self) -> bool {
        let flag = !self.use_previous_correct;
        self.set_preference(flag);
        flag
    }

    /// Forget every recorded outcome.
    pub fn clear(&mut self) {
        self.correct.clear();
        self.save_history();
    }

    /// Whether changes are still being written to the store.
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Give back the underlying store.
    pub fn into_store(self) -> Box<dyn KeyValueStore> {
        self.store
    }

    fn save_history(&mut self) {
        let ids: Vec<&String> = self.correct.iter().collect();
        match serde_json::to_string(&ids) {
            Ok(json) => self.write(CORRECT_QUESTIONS_KEY, &json),
            Err(e) => tracing::warn!("failed to encode answer history: {e}"),
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        if !self.persistent {
            return;
        }
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!(
                "failed to persist {key}, keeping history in memory for this session: {e:#}"
            );
            self.persistent = false;
        }
    }
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("correct", &self.correct.len())
            .field("use_previous_correct", &self.use_previous_correct)
            .field("persistent", &self.persistent)
            .finish()
    }
}

fn read_json<T: serde::de::DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> anyhow::Result<Option<T>> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

// A malformed value is recoverable by overwriting it; an unreadable store is not.
fn is_readable(store: &dyn KeyValueStore) -> bool {
    store.get(CORRECT_QUESTIONS_KEY).is_ok()
}
