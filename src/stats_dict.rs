use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::accumulator::StatsAccumulator;
use crate::derived_stats::{STAT_FIELD_COUNT, STAT_FIELD_NAMES};
use crate::shrinkage::{ShrinkageConfig, round6, shrink_toward_class};

/// Blended stat line for one fighter. Field order matches
/// `STAT_FIELD_NAMES`, which is also the serialized order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FighterStats {
    pub height: f64,
    pub reach: f64,
    pub age: f64,
    pub sig_str_pm: f64,
    pub sig_acc: f64,
    pub sig_abs: f64,
    pub sig_def: f64,
    pub td_avg: f64,
    pub td_acc: f64,
    pub td_def: f64,
    pub sub_avg: f64,
    pub weight: f64,
}

impl FighterStats {
    pub fn from_values(v: [f64; STAT_FIELD_COUNT]) -> Self {
        Self {
            height: v[0],
            reach: v[1],
            age: v[2],
            sig_str_pm: v[3],
            sig_acc: v[4],
            sig_abs: v[5],
            sig_def: v[6],
            td_avg: v[7],
            td_acc: v[8],
            td_def: v[9],
            sub_avg: v[10],
            weight: v[11],
        }
    }

    pub fn values(&self) -> [f64; STAT_FIELD_COUNT] {
        [
            self.height,
            self.reach,
            self.age,
            self.sig_str_pm,
            self.sig_acc,
            self.sig_abs,
            self.sig_def,
            self.td_avg,
            self.td_acc,
            self.td_def,
            self.sub_avg,
            self.weight,
        ]
    }

    pub fn value(&self, field: &str) -> Option<f64> {
        let idx = STAT_FIELD_NAMES.iter().position(|name| *name == field)?;
        Some(self.values()[idx])
    }
}

/// The output artifact: `"weight_class|fighter_name"` to blended stat line,
/// iterated and serialized in sorted key order.
pub type StatsDict = BTreeMap<String, FighterStats>;

/// Walks observed fighters in (class, name) order and blends every field
/// against its class prior. Read-only over the accumulator, so the same
/// state can be queried again later.
pub fn build_stats_dict(acc: &StatsAccumulator, cfg: ShrinkageConfig) -> StatsDict {
    let mut out = StatsDict::new();
    for key in acc.sorted_fighters() {
        let fighter = acc.fighter_totals(key).copied().unwrap_or_default();
        let class = acc
            .class_totals(&key.weight_class)
            .copied()
            .unwrap_or_default();

        let mut values = [0.0; STAT_FIELD_COUNT];
        for (idx, slot) in values.iter_mut().enumerate() {
            *slot = round6(shrink_toward_class(
                fighter.fields[idx],
                class.fields[idx],
                cfg,
            ));
        }
        out.insert(key.composite(), FighterStats::from_values(values));
    }
    out
}

pub fn save_stats_dict(path: &Path, dict: &StatsDict) -> Result<()> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string(dict).context("serialize fighter stats dict")?;
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}

pub fn load_stats_dict(path: &Path) -> Result<StatsDict> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read fighter stats dict {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("parse fighter stats dict {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::fold_records;
    use crate::fight_dataset::{MatchRecord, SideCounters};

    fn striker(name: &str, landed: f64, minutes: f64) -> SideCounters {
        SideCounters {
            name: name.to_string(),
            sig_strikes_landed: Some(landed),
            fight_minutes: Some(minutes),
            ..SideCounters::default()
        }
    }

    #[test]
    fn shrinks_both_fighters_toward_class_mean() {
        // Two one-fight fighters at 5.0 and 3.0 strikes per minute; with
        // prior_weight 6 the blends are 29/7 and 27/7.
        let records = vec![
            MatchRecord {
                weight_class: "Lightweight".to_string(),
                fighter_a: striker("Alice", 75.0, 15.0),
                fighter_b: SideCounters::default(),
            },
            MatchRecord {
                weight_class: "Lightweight".to_string(),
                fighter_a: striker("Bob", 45.0, 15.0),
                fighter_b: SideCounters::default(),
            },
        ];
        let acc = fold_records(&records);
        let dict = build_stats_dict(&acc, ShrinkageConfig { prior_weight: 6.0 });

        assert_eq!(dict["Lightweight|Alice"].sig_str_pm, 4.142857);
        assert_eq!(dict["Lightweight|Bob"].sig_str_pm, 3.857143);
    }

    #[test]
    fn unobserved_fields_take_the_class_mean() {
        let records = vec![
            MatchRecord {
                weight_class: "Flyweight".to_string(),
                fighter_a: SideCounters {
                    height: Some(64.0),
                    ..striker("One", 30.0, 15.0)
                },
                fighter_b: SideCounters::default(),
            },
            MatchRecord {
                weight_class: "Flyweight".to_string(),
                // No counters at all: every field falls back per-field.
                fighter_a: SideCounters {
                    name: "Two".to_string(),
                    ..SideCounters::default()
                },
                fighter_b: SideCounters::default(),
            },
        ];
        let acc = fold_records(&records);
        let dict = build_stats_dict(&acc, ShrinkageConfig::default());

        let sparse = &dict["Flyweight|Two"];
        assert_eq!(sparse.height, 64.0);
        assert_eq!(sparse.sig_str_pm, 2.0);
        // Nobody in the class reported reach, so its mean is the 0.0 fallback.
        assert_eq!(sparse.reach, 0.0);
    }

    #[test]
    fn keys_are_sorted_by_class_then_name() {
        let records = vec![
            MatchRecord {
                weight_class: "Welterweight".to_string(),
                fighter_a: striker("Zed", 10.0, 15.0),
                fighter_b: striker("Abe", 20.0, 15.0),
            },
            MatchRecord {
                weight_class: "Bantamweight".to_string(),
                fighter_a: striker("Moe", 30.0, 15.0),
                fighter_b: SideCounters::default(),
            },
        ];
        let acc = fold_records(&records);
        let dict = build_stats_dict(&acc, ShrinkageConfig::default());

        let keys: Vec<&str> = dict.keys().map(|k| k.as_str()).collect();
        assert_eq!(
            keys,
            ["Bantamweight|Moe", "Welterweight|Abe", "Welterweight|Zed"]
        );
    }

    #[test]
    fn stat_line_round_trips_through_json() {
        let stats = FighterStats::from_values([
            70.0, 72.0, 28.0, 4.2, 0.48, 3.1, 0.55, 1.5, 0.33, 0.7, 0.4, 155.0,
        ]);
        let json = serde_json::to_string(&stats).unwrap();
        // Serialized field order is the derivation order.
        assert!(json.starts_with("{\"height\":70.0,\"reach\":72.0"));
        let back: FighterStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
        assert_eq!(back.value("td_acc"), Some(0.33));
        assert_eq!(back.value("elo"), None);
    }
}
