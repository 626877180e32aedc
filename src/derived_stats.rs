use crate::fight_dataset::SideCounters;

pub const STAT_FIELD_COUNT: usize = 12;

pub const STAT_FIELD_NAMES: [&str; STAT_FIELD_COUNT] = [
    "height",
    "reach",
    "age",
    "sig_str_pm",
    "sig_acc",
    "sig_abs",
    "sig_def",
    "td_avg",
    "td_acc",
    "td_def",
    "sub_avg",
    "weight",
];

/// One fighter's derived metric vector for a single bout, in
/// `STAT_FIELD_NAMES` order. Missing entries never reach the accumulator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DerivedObservation {
    pub values: [Option<f64>; STAT_FIELD_COUNT],
}

impl DerivedObservation {
    pub fn get(&self, field: &str) -> Option<f64> {
        let idx = STAT_FIELD_NAMES.iter().position(|name| *name == field)?;
        self.values[idx]
    }
}

/// Derives the 12 per-bout metrics for `own`; `opp` supplies the absorbed and
/// defended rates. Rate denominators must be present and positive, and an
/// absent numerator also leaves the field missing.
pub fn derive_observation(own: &SideCounters, opp: &SideCounters) -> DerivedObservation {
    let minutes = positive(own.fight_minutes);
    DerivedObservation {
        values: [
            own.height,
            own.reach,
            own.age,
            ratio(own.sig_strikes_landed, minutes),
            ratio(own.sig_strikes_landed, positive(own.sig_strikes_attempted)),
            ratio(opp.sig_strikes_landed, minutes),
            complement(ratio(
                opp.sig_strikes_landed,
                positive(opp.sig_strikes_attempted),
            )),
            per_15(ratio(own.takedowns_landed, minutes)),
            ratio(own.takedowns_landed, positive(own.takedowns_attempted)),
            complement(ratio(
                opp.takedowns_landed,
                positive(opp.takedowns_attempted),
            )),
            per_15(ratio(own.submission_attempts, minutes)),
            own.weight,
        ],
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    Some(numerator? / denominator?)
}

fn complement(value: Option<f64>) -> Option<f64> {
    value.map(|v| 1.0 - v)
}

fn per_15(value: Option<f64>) -> Option<f64> {
    value.map(|v| v * 15.0)
}
