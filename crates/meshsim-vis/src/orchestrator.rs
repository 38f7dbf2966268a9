//! Configuration pipeline.
//!
//! One run validates the operator's input, clears the scene, submits the
//! configuration, loads the node roster into the controls, obtains the
//! descriptor text, parses it and renders it. Each step either hands a value
//! to the next or stops the run with a [`PipelineError`] naming what failed.
//!
//! Runs are not serialized against each other. Two overlapping runs both
//! clear and render; whichever renders last is what stays on screen.

use std::sync::Arc;

use meshsim_topology::{SimulationConfig, TopologyDescriptor, TopologySource};
use thiserror::Error;

use crate::client::EngineClient;
use crate::error::Error;
use crate::layout::LayoutError;
use crate::state::AppState;

/// Why a configuration run stopped.
///
/// The display text is exactly what the operator sees: a blocking notice for
/// [`PipelineError::Invalid`] and [`PipelineError::Rejected`], a log line for
/// everything else.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// Input failed validation; nothing was sent
    #[error(transparent)]
    Invalid(#[from] meshsim_topology::Error),

    /// The engine refused the configuration
    #[error("Configuration failed: {0}")]
    Rejected(String),

    /// `/configure` could not be reached
    #[error("Error: could not reach /configure.")]
    Unreachable,

    /// `/nodes` answered with a failure
    #[error("Error: could not fetch node list.")]
    RosterRejected,

    /// `/nodes` could not be reached or read
    #[error("Error: network problem getting nodes.")]
    RosterUnreachable,

    /// The topology file could not be reached
    #[error("Error: could not fetch topology file.")]
    FileUnreachable,

    /// The engine does not have the topology file
    #[error("Error: topology file not found.")]
    FileMissing,

    /// The descriptor text did not parse
    #[error("Error: invalid YAML.")]
    Parse,

    /// The descriptor parsed but cannot be drawn
    #[error("Error: {0}.")]
    Render(LayoutError),
}

impl PipelineError {
    /// Blocking notice text, for failures the operator must acknowledge.
    pub fn notice(&self) -> Option<String> {
        match self {
            PipelineError::Invalid(_) | PipelineError::Rejected(_) => Some(self.to_string()),
            _ => None,
        }
    }

    /// Log line text, for failures recorded in the event log.
    pub fn log_line(&self) -> Option<String> {
        match self.notice() {
            Some(_) => None,
            None => Some(self.to_string()),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Node ids reported by the engine
    pub roster: Vec<String>,
    /// Rendered node count
    pub nodes: usize,
    /// Rendered edge count
    pub edges: usize,
}

/// Drives configuration and message submission against the engine.
#[derive(Clone)]
pub struct Orchestrator {
    client: EngineClient,
    state: Arc<AppState>,
}

impl Orchestrator {
    pub fn new(client: EngineClient, state: Arc<AppState>) -> Self {
        Self { client, state }
    }

    pub fn client(&self) -> &EngineClient {
        &self.client
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Fill the topology choices from the engine.
    ///
    /// The first file becomes the selection if none is chosen yet. A failure
    /// only produces a diagnostic.
    pub async fn load_topologies(&self) -> Vec<String> {
        let files = match self.client.topologies().await {
            Ok(files) => files,
            Err(e) => {
                tracing::error!(error = %e, "Error fetching /topologies");
                return Vec::new();
            }
        };

        self.state.scene.write().await.controls.topologies = files.clone();
        let mut inputs = self.state.inputs.write().await;
        if inputs.topology.is_none() {
            inputs.topology = files.first().cloned();
        }
        files
    }

    /// Run the configuration pipeline.
    ///
    /// Also used for reset: every run starts from an empty log and graph.
    pub async fn configure(&self) -> Result<PipelineReport, PipelineError> {
        let result = self.run().await;
        if let Err(e) = &result {
            self.report(e).await;
        }
        result
    }

    /// Re-run the pipeline with the current input.
    pub async fn reset(&self) -> Result<PipelineReport, PipelineError> {
        self.configure().await
    }

    async fn run(&self) -> Result<PipelineReport, PipelineError> {
        let config = self.prepare().await?;
        self.state.scene.write().await.clear();
        self.submit(&config).await?;
        let roster = self.fetch_roster().await?;
        self.state.scene.write().await.controls.set_roster(&roster);
        let text = self.descriptor_text(&config).await?;
        let topology = parse(&text)?;
        let (nodes, edges) = self.render(&topology).await?;

        tracing::info!(nodes, edges, roster = roster.len(), "Topology rendered");
        Ok(PipelineReport {
            roster,
            nodes,
            edges,
        })
    }

    async fn prepare(&self) -> Result<SimulationConfig, PipelineError> {
        let (drop_rate, ttl) = {
            let scene = self.state.scene.read().await;
            (scene.controls.drop_rate(), scene.controls.ttl())
        };
        let config = self.state.inputs.read().await.simulation_config(drop_rate, ttl)?;
        Ok(config)
    }

    async fn submit(&self, config: &SimulationConfig) -> Result<(), PipelineError> {
        match self.client.configure(config).await {
            Ok(()) => {}
            Err(Error::Status { body, .. }) => return Err(PipelineError::Rejected(body)),
            Err(_) => return Err(PipelineError::Unreachable),
        }

        let described = match &config.source {
            TopologySource::File(name) => format!("existing \"{name}\""),
            TopologySource::Inline(_) => "\"custom YAML\" (built from form)".to_string(),
        };
        self.state.scene.write().await.log.push(format!(
            "Configured {described}, dropRate={}, ttl={}",
            config.drop_rate, config.ttl
        ));
        Ok(())
    }

    async fn fetch_roster(&self) -> Result<Vec<String>, PipelineError> {
        self.client.nodes().await.map_err(|e| match e {
            Error::Status { .. } => PipelineError::RosterRejected,
            _ => PipelineError::RosterUnreachable,
        })
    }

    /// Descriptor text for the active input surface.
    ///
    /// Custom input is re-read from the panel as it is now. Existing mode
    /// fetches the chosen file from the engine.
    async fn descriptor_text(&self, config: &SimulationConfig) -> Result<String, PipelineError> {
        let (custom, chosen) = {
            let inputs = self.state.inputs.read().await;
            (inputs.custom_descriptor_text(), inputs.topology.clone())
        };

        match custom {
            Some(text) => text.map_err(|e| {
                tracing::error!(error = %e, "Error serializing form topology");
                PipelineError::Parse
            }),
            None => {
                let name = match (&config.source, chosen) {
                    (TopologySource::File(name), _) => name.clone(),
                    (_, Some(name)) => name,
                    (_, None) => String::new(),
                };
                self.client.topology_file(&name).await.map_err(|e| match e {
                    Error::Status { .. } => PipelineError::FileMissing,
                    _ => PipelineError::FileUnreachable,
                })
            }
        }
    }

    async fn render(&self, topology: &TopologyDescriptor) -> Result<(usize, usize), PipelineError> {
        let mut scene = self.state.scene.write().await;
        scene
            .layout
            .render(topology)
            .map_err(PipelineError::Render)?;
        Ok((scene.layout.len(), scene.layout.edges().len()))
    }

    async fn report(&self, error: &PipelineError) {
        match error.log_line() {
            Some(line) => {
                tracing::error!(%error, "Configuration stopped");
                self.state.scene.write().await.log.push(line);
            }
            None => tracing::warn!(%error, "Configuration not submitted"),
        }
    }

    /// Queue a message between the selected sender and recipient.
    ///
    /// A missing selection is returned as [`Error::MissingRoute`] without
    /// touching the log. Engine failures are logged and returned.
    pub async fn send_message(&self) -> crate::Result<()> {
        let (from, to) = self.state.scene.read().await.controls.route()?;

        let (line, result) = match self.client.send(&from, &to).await {
            Ok(()) => (format!("Queued message from {from} → {to}"), Ok(())),
            Err(e @ Error::Status { .. }) => ("Error: message not queued.".to_string(), Err(e)),
            Err(e) => ("Error sending message.".to_string(), Err(e)),
        };
        self.state.scene.write().await.log.push(line);
        result
    }

    /// Select a sender and recipient, then queue a message.
    pub async fn send_between(&self, from: &str, to: &str) -> crate::Result<()> {
        {
            let mut scene = self.state.scene.write().await;
            if !scene.controls.sender.select(from) || !scene.controls.recipient.select(to) {
                return Err(Error::MissingRoute);
            }
        }
        self.send_message().await
    }
}

fn parse(text: &str) -> Result<TopologyDescriptor, PipelineError> {
    TopologyDescriptor::parse(text).map_err(|e| {
        tracing::error!(error = %e, "Error parsing YAML text");
        PipelineError::Parse
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_and_rejection_are_notices() {
        let invalid = PipelineError::Invalid(meshsim_topology::Error::EmptyDescriptor);
        assert_eq!(invalid.notice().as_deref(), Some("Paste your YAML first."));
        assert!(invalid.log_line().is_none());

        let rejected = PipelineError::Rejected("ttl must be ≥ 1\n".into());
        assert_eq!(
            rejected.notice().as_deref(),
            Some("Configuration failed: ttl must be ≥ 1\n")
        );
    }

    #[test]
    fn operational_failures_are_log_lines() {
        let cases = [
            (PipelineError::Unreachable, "Error: could not reach /configure."),
            (PipelineError::RosterRejected, "Error: could not fetch node list."),
            (PipelineError::RosterUnreachable, "Error: network problem getting nodes."),
            (PipelineError::FileUnreachable, "Error: could not fetch topology file."),
            (PipelineError::FileMissing, "Error: topology file not found."),
            (PipelineError::Parse, "Error: invalid YAML."),
            (
                PipelineError::Render(LayoutError::UnknownNode("Z".into())),
                "Error: topology references unknown node Z.",
            ),
        ];
        for (error, line) in cases {
            assert!(error.notice().is_none());
            assert_eq!(error.log_line().as_deref(), Some(line));
        }
    }

    #[test]
    fn parse_step_rejects_bad_yaml() {
        assert_eq!(parse("nodes: [").unwrap_err(), PipelineError::Parse);
        assert_eq!(parse("nodes:\n- id: A\n").unwrap().len(), 1);
    }
}
