//! Meshsim Visualization Client
//!
//! Configures a running mesh simulation engine and follows what happens
//! inside it.
//!
//! # Architecture
//!
//! - **Inputs**: mode controller and input panel deciding which topology
//!   surface is submitted
//! - **Orchestrator**: the configuration pipeline and message submission
//! - **Layout**: force-directed graph over the rendered topology
//! - **Stream**: WebSocket subscriber turning engine events into log lines
//!   and packet animations
//!
//! All live state sits in one [`AppState`], shared by the orchestrator, the
//! event stream and the frame loop.
//!
//! # Usage
//!
//! ```ignore
//! let config = ConsoleConfig::from_env()?;
//! let state = AppState::new(config.viewport);
//! let client = EngineClient::new(config.engine_url.clone(), config.request_timeout)?;
//!
//! EventStream::new(config.events_url()?, state.clone()).spawn();
//! spawn_frame_loop(state.clone(), config.frame_period);
//!
//! let orchestrator = Orchestrator::new(client, state);
//! orchestrator.load_topologies().await;
//! orchestrator.configure().await?;
//! ```

pub mod animation;
pub mod client;
pub mod config;
pub mod controls;
pub mod error;
pub mod events;
pub mod inputs;
pub mod layout;
pub mod log;
pub mod mode;
pub mod orchestrator;
pub mod scene;
pub mod state;
pub mod stream;

pub use animation::{Animations, PacketMarker, DELIVERY_DURATION, MARKER_RADIUS};
pub use client::EngineClient;
pub use config::ConsoleConfig;
pub use controls::{Controls, Dropdown};
pub use error::{Error, Result};
pub use events::{decode, DecodeError, Decoded, SimEvent};
pub use inputs::InputPanel;
pub use layout::{ForceLayout, ForceParams, GraphEdge, GraphNode, LayoutError, Point, Viewport};
pub use log::{EventLog, LogEntry};
pub use mode::{CustomTab, InputState, Mode, Selection, Surface, Visibility};
pub use orchestrator::{Orchestrator, PipelineError, PipelineReport};
pub use scene::Scene;
pub use state::{spawn_frame_loop, AppState};
pub use stream::EventStream;
