//! Everything the operator sees: the graph, packets in flight, the event
//! log and the controls.

use std::time::Duration;

use crate::animation::Animations;
use crate::controls::Controls;
use crate::events::{decode, Decoded, SimEvent};
use crate::layout::{ForceLayout, Viewport};
use crate::log::EventLog;

/// Render surface and log.
pub struct Scene {
    pub layout: ForceLayout,
    pub animations: Animations,
    pub log: EventLog,
    pub controls: Controls,
}

impl Scene {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            layout: ForceLayout::new(viewport),
            animations: Animations::default(),
            log: EventLog::new(),
            controls: Controls::default(),
        }
    }

    /// Empty the log, the graph and any packets in flight. Controls keep
    /// their state.
    pub fn clear(&mut self) {
        self.log.clear();
        self.layout.clear();
        self.animations.clear();
    }

    /// Log an event and animate deliveries.
    ///
    /// Returns `true` if a packet marker was spawned. A delivery between
    /// nodes that are not on the graph is logged without animation.
    pub fn handle_event(&mut self, event: &SimEvent) -> bool {
        self.log.push(event.to_string());

        let SimEvent::Delivered { from, to, .. } = event else {
            return false;
        };
        match (self.layout.position(from), self.layout.position(to)) {
            (Some(source), Some(dest)) => {
                self.animations.spawn(from, to, source, dest);
                true
            }
            _ => {
                tracing::debug!(%from, %to, "delivery between nodes not on the graph");
                false
            }
        }
    }

    /// Apply one text unit from the event channel.
    pub fn apply_frame(&mut self, text: &str) {
        match decode(text) {
            Ok(Decoded::Event(event)) => {
                self.handle_event(&event);
            }
            Ok(unknown) => self.log.push(unknown.log_line()),
            Err(e) => {
                tracing::warn!(error = %e, "malformed event");
                self.log.push(format!("Error: invalid event ({e})"));
            }
        }
    }

    /// Advance physics and animations by one frame.
    pub fn frame(&mut self, dt: Duration) {
        self.layout.tick();
        self.animations.advance(dt);
    }
}
