//! Configuration payload sent to the simulation engine.

use serde::Serialize;

/// Where the engine should take the topology from.
///
/// Flattened into the payload as exactly one of `topology` or `customYAML`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TopologySource {
    /// A file held by the engine
    #[serde(rename = "topology")]
    File(String),
    /// Descriptor text supplied by the operator
    #[serde(rename = "customYAML")]
    Inline(String),
}

/// Parameters for one configuration attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    /// Probability in `[0, 1]` that a hop is dropped
    pub drop_rate: f64,
    /// Initial hop budget for each message
    pub ttl: u32,
    #[serde(flatten)]
    pub source: TopologySource,
}

impl SimulationConfig {
    /// Create a config, clamping the drop rate into `[0, 1]`.
    pub fn new(drop_rate: f64, ttl: u32, source: TopologySource) -> Self {
        Self {
            drop_rate: drop_rate.clamp(0.0, 1.0),
            ttl,
            source,
        }
    }

    /// Whether the topology comes from an engine-held file.
    pub fn is_existing(&self) -> bool {
        matches!(self.source, TopologySource::File(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn existing_payload_shape() {
        let config = SimulationConfig::new(0.1, 4, TopologySource::File("ring5.yaml".into()));
        let value = serde_json::to_value(&config).unwrap();

        assert_eq!(value, json!({"dropRate": 0.1, "ttl": 4, "topology": "ring5.yaml"}));
    }

    #[test]
    fn inline_payload_shape() {
        let config = SimulationConfig::new(0.0, 2, TopologySource::Inline("nodes: []".into()));
        let value = serde_json::to_value(&config).unwrap();

        assert_eq!(value, json!({"dropRate": 0.0, "ttl": 2, "customYAML": "nodes: []"}));
        assert!(value.get("topology").is_none());
    }

    #[test]
    fn drop_rate_is_clamped() {
        let config = SimulationConfig::new(1.7, 1, TopologySource::File("a.yaml".into()));
        assert_eq!(config.drop_rate, 1.0);
        assert!(config.is_existing());
    }
}
