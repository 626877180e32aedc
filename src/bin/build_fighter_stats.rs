use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use fight_stats::accumulator::{fold_records, fold_records_par};
use fight_stats::fight_dataset::read_fights_csv;
use fight_stats::shrinkage::ShrinkageConfig;
use fight_stats::stats_dict::{build_stats_dict, save_stats_dict};

fn main() -> Result<()> {
    let started_at = chrono::Utc::now().to_rfc3339();

    let dataset = parse_path_arg("--dataset")
        .unwrap_or_else(|| PathBuf::from("data/ufc_fights_full_with_odds.csv"));
    let out_path =
        parse_path_arg("--out").unwrap_or_else(|| PathBuf::from("data/fighter_stats_dict.json"));
    let parallel = has_flag("--parallel");

    let mut cfg = ShrinkageConfig::default();
    if let Some(raw) = parse_value_arg("--prior-weight") {
        let weight = raw
            .trim()
            .parse::<f64>()
            .with_context(|| format!("invalid --prior-weight {raw}"))?;
        if !weight.is_finite() || weight < 0.0 {
            return Err(anyhow!("--prior-weight must be a non-negative number"));
        }
        cfg.prior_weight = weight;
    }

    let records = read_fights_csv(&dataset)?;
    let acc = if parallel {
        fold_records_par(&records)
    } else {
        fold_records(&records)
    };
    let dict = build_stats_dict(&acc, cfg);
    save_stats_dict(&out_path, &dict)?;

    println!("build started at {started_at}");
    println!(
        "folded {} records into {} fighters across {} weight classes (prior_weight={})",
        records.len(),
        acc.fighter_count(),
        acc.class_count(),
        cfg.prior_weight
    );
    println!("Wrote {} fighter entries to {}", dict.len(), out_path.display());
    Ok(())
}

fn parse_path_arg(flag: &str) -> Option<PathBuf> {
    parse_value_arg(flag).map(PathBuf::from)
}

fn parse_value_arg(flag: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(v) = arg.strip_prefix(&prefix) {
            if !v.trim().is_empty() {
                return Some(v.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.to_string());
        }
    }
    None
}

fn has_flag(flag: &str) -> bool {
    std::env::args().skip(1).any(|a| a == flag)
}
