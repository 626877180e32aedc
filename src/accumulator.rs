use std::collections::HashMap;

use rayon::prelude::*;

use crate::derived_stats::{DerivedObservation, STAT_FIELD_COUNT, derive_observation};
use crate::fight_dataset::MatchRecord;

const FOLD_CHUNK: usize = 512;

/// Running `(sum, count)` for one stat field.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FieldTotals {
    pub sum: f64,
    pub count: u32,
}

impl FieldTotals {
    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub fn merge(&mut self, other: FieldTotals) {
        self.sum += other.sum;
        self.count += other.count;
    }

    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.sum / self.count as f64)
    }
}

/// Per-key totals across all 12 derived fields.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatTotals {
    pub fields: [FieldTotals; STAT_FIELD_COUNT],
}

impl StatTotals {
    fn fold(&mut self, obs: &DerivedObservation) {
        for (slot, value) in self.fields.iter_mut().zip(obs.values) {
            if let Some(v) = value {
                slot.add(v);
            }
        }
    }

    fn merge(&mut self, other: &StatTotals) {
        for (slot, theirs) in self.fields.iter_mut().zip(other.fields) {
            slot.merge(theirs);
        }
    }
}

/// One fighter within one weight class. Both strings are used verbatim, so
/// the same person under two spellings is two fighters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FighterKey {
    pub weight_class: String,
    pub name: String,
}

impl FighterKey {
    pub fn new(weight_class: &str, name: &str) -> Self {
        Self {
            weight_class: weight_class.to_string(),
            name: name.to_string(),
        }
    }

    pub fn composite(&self) -> String {
        format!("{}|{}", self.weight_class, self.name)
    }
}

/// Dual-level fold state: per-fighter and per-weight-class `(sum, count)`
/// pairs for every derived field. The fold is commutative and associative,
/// so record order never changes the final state and partial accumulators
/// merge by pairwise addition.
#[derive(Debug, Clone, Default)]
pub struct StatsAccumulator {
    by_fighter: HashMap<FighterKey, StatTotals>,
    by_class: HashMap<String, StatTotals>,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds both sides of one record. A record with an empty weight class
    /// contributes nothing; a side with an empty name is skipped while the
    /// other side still counts.
    pub fn observe_record(&mut self, record: &MatchRecord) {
        if record.weight_class.is_empty() {
            return;
        }
        if !record.fighter_a.name.is_empty() {
            let obs = derive_observation(&record.fighter_a, &record.fighter_b);
            self.observe(&record.weight_class, &record.fighter_a.name, &obs);
        }
        if !record.fighter_b.name.is_empty() {
            let obs = derive_observation(&record.fighter_b, &record.fighter_a);
            self.observe(&record.weight_class, &record.fighter_b.name, &obs);
        }
    }

    /// Folds one derived observation into both levels. The fighter key is
    /// registered even when every field is missing, so the fighter still
    /// appears in the output with class-mean values.
    pub fn observe(&mut self, weight_class: &str, name: &str, obs: &DerivedObservation) {
        self.by_fighter
            .entry(FighterKey::new(weight_class, name))
            .or_default()
            .fold(obs);
        self.by_class
            .entry(weight_class.to_string())
            .or_default()
            .fold(obs);
    }

    pub fn merge(&mut self, other: StatsAccumulator) {
        for (key, totals) in other.by_fighter {
            self.by_fighter.entry(key).or_default().merge(&totals);
        }
        for (class, totals) in other.by_class {
            self.by_class.entry(class).or_default().merge(&totals);
        }
    }

    pub fn fighter_totals(&self, key: &FighterKey) -> Option<&StatTotals> {
        self.by_fighter.get(key)
    }

    pub fn class_totals(&self, weight_class: &str) -> Option<&StatTotals> {
        self.by_class.get(weight_class)
    }

    pub fn fighter_count(&self) -> usize {
        self.by_fighter.len()
    }

    pub fn class_count(&self) -> usize {
        self.by_class.len()
    }

    /// Observed fighter keys in (weight class, name) order, stable across
    /// runs regardless of input order.
    pub fn sorted_fighters(&self) -> Vec<&FighterKey> {
        let mut keys: Vec<&FighterKey> = self.by_fighter.keys().collect();
        keys.sort();
        keys
    }
}

pub fn fold_records(records: &[MatchRecord]) -> StatsAccumulator {
    let mut acc = StatsAccumulator::new();
    for record in records {
        acc.observe_record(record);
    }
    acc
}

/// Sharded fold for large datasets: each chunk builds a partial accumulator,
/// reduced by `merge`. Yields the same state as `fold_records`.
pub fn fold_records_par(records: &[MatchRecord]) -> StatsAccumulator {
    records
        .par_chunks(FOLD_CHUNK)
        .map(fold_records)
        .reduce(StatsAccumulator::new, |mut left, right| {
            left.merge(right);
            left
        })
}
