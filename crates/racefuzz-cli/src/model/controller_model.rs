use std::path::Path;

use chrono::{DateTime, Utc};
use racefuzz_controller::{fuzzy::ControllerConfig, genome::Genome};
use serde::{Deserialize, Serialize};

use crate::util;

/// A trained controller: one genome plus the steering table it indexes into.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ControllerModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub final_fitness: f32,
    /// Whether the genome completed a lap when it was recorded
    pub finished: bool,
    pub genome: Genome,
    #[serde(flatten)]
    pub controller: ControllerConfig,
}

impl ControllerModel {
    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        util::read_json_file("controller model", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_json_layout() {
        let model = ControllerModel {
            name: "lap".to_owned(),
            trained_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            final_fitness: 101_234.0,
            finished: true,
            genome: Genome::uniform(2),
            controller: ControllerConfig::default(),
        };
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["name"], "lap");
        assert_eq!(json["genome"].as_array().map(Vec::len), Some(25));
        assert_eq!(json["steering_options"].as_array().map(Vec::len), Some(5));
        assert!(json["activation_threshold"].is_number());

        let back: ControllerModel = serde_json::from_value(json).unwrap();
        assert_eq!(back, model);
    }
}
