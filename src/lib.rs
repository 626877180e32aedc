pub mod accumulator;
pub mod coerce;
pub mod derived_stats;
pub mod fight_dataset;
pub mod shrinkage;
pub mod stats_dict;
