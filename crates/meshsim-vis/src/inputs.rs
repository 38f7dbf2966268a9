//! The topology input panel.
//!
//! Holds everything the operator has entered on each surface. Switching
//! modes only changes which surface is read; text and form rows survive.

use meshsim_topology::{
    existing_topology, form_descriptor, pasted_descriptor, NodeForm, SimulationConfig,
    TopologySource,
};

use crate::mode::{InputState, Selection, Surface};

/// Operator input for the next configuration.
#[derive(Debug, Clone, Default)]
pub struct InputPanel {
    pub state: InputState,
    /// Chosen engine-held topology file
    pub topology: Option<String>,
    /// Text in the paste area
    pub paste: String,
    pub form: NodeForm,
}

impl InputPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a radio selection.
    pub fn select(&mut self, selection: Selection) {
        self.state = self.state.transition(selection);
    }

    /// Build and validate a configuration from the active surface.
    pub fn simulation_config(&self, drop_rate: f64, ttl: u32) -> meshsim_topology::Result<SimulationConfig> {
        let source = match self.state.surface() {
            Surface::ExistingFile => TopologySource::File(existing_topology(self.topology.as_deref())?),
            Surface::PasteDescriptor => TopologySource::Inline(pasted_descriptor(&self.paste)?),
            Surface::BuildForm => TopologySource::Inline(form_descriptor(&self.form)?),
        };
        Ok(SimulationConfig::new(drop_rate, ttl, source))
    }

    /// Re-derive descriptor text from the active custom surface.
    ///
    /// Reads the surface as it is now, without validation. Returns `None` in
    /// existing mode, where the text comes from the engine instead.
    pub fn custom_descriptor_text(&self) -> Option<meshsim_topology::Result<String>> {
        match self.state.surface() {
            Surface::ExistingFile => None,
            Surface::PasteDescriptor => Some(Ok(self.paste.trim().to_string())),
            Surface::BuildForm => Some(self.form.to_descriptor().to_yaml()),
        }
    }
}
