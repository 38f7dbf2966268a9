//! Shared client state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};

use crate::inputs::InputPanel;
use crate::layout::Viewport;
use crate::scene::Scene;

/// State shared between the orchestrator, the event stream and the frame
/// loop. Locks are held only for in-memory work, never across a request.
pub struct AppState {
    pub inputs: RwLock<InputPanel>,
    pub scene: RwLock<Scene>,
}

impl AppState {
    pub fn new(viewport: Viewport) -> Arc<Self> {
        Arc::new(Self {
            inputs: RwLock::new(InputPanel::new()),
            scene: RwLock::new(Scene::new(viewport)),
        })
    }
}

/// Drive physics and animations at a fixed frame period.
///
/// Each frame advances by the time that actually passed since the previous
/// one, including any ticks that were skipped.
pub fn spawn_frame_loop(state: Arc<AppState>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last = Instant::now();
        loop {
            ticker.tick().await;
            let mut scene = state.scene.write().await;
            let now = Instant::now();
            scene.frame(now.saturating_duration_since(last));
            last = now;
        }
    })
}
