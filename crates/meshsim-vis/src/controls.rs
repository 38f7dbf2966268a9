//! Simulation controls: parameter sliders, topology choices and the
//! sender/recipient selection used to inject messages.

use crate::error::{Error, Result};

/// Default drop rate slider position.
pub const DEFAULT_DROP_RATE: f64 = 0.0;

/// Default TTL slider position.
pub const DEFAULT_TTL: u32 = 5;

/// A drop-down of node ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dropdown {
    pub options: Vec<String>,
    pub selected: Option<String>,
    pub enabled: bool,
}

impl Dropdown {
    /// Replace the options and select the first one.
    fn fill(&mut self, options: &[String]) {
        self.options = options.to_vec();
        self.selected = self.options.first().cloned();
        self.enabled = true;
    }

    /// Select an option. Returns `false` if it is not offered.
    pub fn select(&mut self, id: &str) -> bool {
        if self.options.iter().any(|o| o == id) {
            self.selected = Some(id.to_string());
            true
        } else {
            false
        }
    }
}

/// Control surface state.
#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    drop_rate: f64,
    ttl: u32,
    /// Topology files offered by the engine
    pub topologies: Vec<String>,
    pub sender: Dropdown,
    pub recipient: Dropdown,
    pub send_enabled: bool,
    pub reset_enabled: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            drop_rate: DEFAULT_DROP_RATE,
            ttl: DEFAULT_TTL,
            topologies: Vec::new(),
            sender: Dropdown::default(),
            recipient: Dropdown::default(),
            send_enabled: false,
            reset_enabled: false,
        }
    }
}

impl Controls {
    pub fn drop_rate(&self) -> f64 {
        self.drop_rate
    }

    /// Move the drop rate slider, clamped into `[0, 1]`.
    pub fn set_drop_rate(&mut self, drop_rate: f64) {
        self.drop_rate = if drop_rate.is_nan() {
            DEFAULT_DROP_RATE
        } else {
            drop_rate.clamp(0.0, 1.0)
        };
    }

    /// Label mirrored next to the drop rate slider.
    pub fn drop_rate_label(&self) -> String {
        self.drop_rate.to_string()
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn set_ttl(&mut self, ttl: u32) {
        self.ttl = ttl;
    }

    /// Label mirrored next to the TTL slider.
    pub fn ttl_label(&self) -> String {
        self.ttl.to_string()
    }

    /// Fill both selections from the engine's node roster and enable
    /// message submission and reset.
    pub fn set_roster(&mut self, roster: &[String]) {
        self.sender.fill(roster);
        self.recipient.fill(roster);
        self.send_enabled = true;
        self.reset_enabled = true;
    }

    /// The selected sender and recipient.
    pub fn route(&self) -> Result<(String, String)> {
        match (&self.sender.selected, &self.recipient.selected) {
            (Some(from), Some(to)) if !from.is_empty() && !to.is_empty() => {
                Ok((from.clone(), to.clone()))
            }
            _ => Err(Error::MissingRoute),
        }
    }
}
