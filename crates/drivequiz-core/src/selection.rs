//! Batch selection.
//!
//! All functions take the random source as a parameter so callers decide
//! between the thread RNG and a seeded one. Shuffles are Fisher-Yates via
//! [`SliceRandom::shuffle`].

use std::collections::{BTreeSet, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::QuizError;
use crate::model::{Batch, Question, BATCH_SIZE};

/// Pick [`BATCH_SIZE`] distinct questions uniformly at random.
///
/// Fails with [`QuizError::BankTooSmall`] if the bank cannot fill a batch.
pub fn fresh_batch<R: Rng + ?Sized>(bank: &[Question], rng: &mut R) -> Result<Batch, QuizError> {
    ensure_bank_size(bank)?;
    let mut pool: Vec<&Question> = bank.iter().collect();
    pool.shuffle(rng);
    Ok(Batch::new(
        pool.into_iter().take(BATCH_SIZE).cloned().collect(),
    ))
}

/// Pick a fresh batch, skipping previously-correct questions unless
/// `use_previous_correct` is set.
///
/// The bank must still be able to fill a batch on its own. When the filtered
/// pool is smaller than [`BATCH_SIZE`] the batch comes back short.
pub fn preference_batch<R: Rng + ?Sized>(
    bank: &[Question],
    history: &BTreeSet<String>,
    use_previous_correct: bool,
    rng: &mut R,
) -> Result<Batch, QuizError> {
    ensure_bank_size(bank)?;
    let mut pool: Vec<&Question> = bank
        .iter()
        .filter(|q| use_previous_correct || !history.contains(&q.id))
        .collect();
    pool.shuffle(rng);

    let batch = Batch::new(pool.into_iter().take(BATCH_SIZE).cloned().collect());
    if batch.is_short() {
        tracing::warn!(
            "only {} questions not yet answered correctly, returning a short batch",
            batch.len()
        );
    }
    Ok(batch)
}

/// Build a batch around the questions answered wrongly in `current`.
///
/// The wrong questions are kept and the rest is filled from `bank`, skipping
/// anything already in `current` and, unless `use_previous_correct` is set,
/// anything in `history`. If too few candidates remain the batch is short;
/// it is never padded with excluded questions. The result is shuffled so the
/// wrong questions are spread across the batch.
pub fn retry_batch<R: Rng + ?Sized>(
    bank: &[Question],
    current: &Batch,
    wrong_indexes: &[usize],
    history: &BTreeSet<String>,
    use_previous_correct: bool,
    rng: &mut R,
) -> Batch {
    let mut wrong_ids = HashSet::new();
    let mut selected: Vec<Question> = Vec::with_capacity(BATCH_SIZE);
    for &slot in wrong_indexes {
        match current.get(slot) {
            Some(q) if wrong_ids.insert(q.id.as_str()) => selected.push(q.clone()),
            Some(_) => {}
            None => tracing::debug!("ignoring wrong index {slot} outside current batch"),
        }
    }

    let needed = BATCH_SIZE.saturating_sub(selected.len());
    let mut candidates: Vec<&Question> = bank
        .iter()
        .filter(|q| !wrong_ids.contains(q.id.as_str()))
        .filter(|q| !current.contains_id(&q.id))
        .filter(|q| use_previous_correct || !history.contains(&q.id))
        .collect();
    candidates.shuffle(rng);

    let available = candidates.len();
    selected.extend(candidates.into_iter().take(needed).cloned());
    selected.shuffle(rng);

    if available < needed {
        tracing::warn!(
            wrong = wrong_ids.len(),
            needed,
            available,
            "not enough eligible questions, returning a short retry batch"
        );
    }
    tracing::debug!(
        "retry batch: {} wrong + {} new",
        wrong_ids.len(),
        selected.len() - wrong_ids.len()
    );

    Batch::new(selected)
}

fn ensure_bank_size(bank: &[Question]) -> Result<(), QuizError> {
    if bank.len() < BATCH_SIZE {
        return Err(QuizError::BankTooSmall {
            required: BATCH_SIZE,
            available: bank.len(),
        });
    }
    Ok(())
}
