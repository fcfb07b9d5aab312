use anyhow::Context;
use carriercore::element_interface::CarrierSchema;
use carriercore::simulation::SimulatedElement;
use carriercore::ControllerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

/// Behaviour of the in-process simulated element.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub preset_name: String,
    pub creation_latency_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            preset_name: "Common Satellite spectrum".into(),
            creation_latency_ms: 0,
        }
    }
}

impl SimulationConfig {
    pub fn build_element(&self, schema: &CarrierSchema) -> SimulatedElement {
        SimulatedElement::new(*schema)
            .with_preset_name(self.preset_name.clone())
            .with_creation_latency(Duration::from_millis(self.creation_latency_ms))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Base URL of a remote element bridge; the simulated element is used when absent.
    pub element_url: Option<String>,
    pub bind_address: SocketAddr,
    pub script_timeout_ms: Option<u64>,
    pub simulation: SimulationConfig,
    pub controller: ControllerConfig,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            element_url: None,
            bind_address: default_bind_address(),
            script_timeout_ms: None,
            simulation: SimulationConfig::default(),
            controller: ControllerConfig::default(),
        }
    }
}

impl ScriptConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading script config {}", path_ref.display()))?;
        let config: ScriptConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing script config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn script_timeout(&self) -> Option<Duration> {
        self.script_timeout_ms.map(Duration::from_millis)
    }
}
