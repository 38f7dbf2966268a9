//! Transient packet-travel animations.
//!
//! A delivered message is drawn as a marker that leaves the sender, travels
//! to the recipient and fades out on the way. Positions are captured when the
//! marker spawns; later layout motion does not bend its path.

use std::time::Duration;

use crate::layout::Point;

/// How long a marker takes to travel.
pub const DELIVERY_DURATION: Duration = Duration::from_millis(1000);

/// Marker radius in viewport units.
pub const MARKER_RADIUS: f64 = 6.0;

/// Opacity a marker starts at.
const START_OPACITY: f64 = 0.8;

/// A marker traveling between two nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct PacketMarker {
    pub from: String,
    pub to: String,
    /// Sender position at spawn
    pub source: Point,
    /// Recipient position at spawn
    pub dest: Point,
    /// Progress along path (0.0 = source, 1.0 = destination)
    pub progress: f64,
}

impl PacketMarker {
    /// Create a marker at the start of its path.
    pub fn new(from: impl Into<String>, to: impl Into<String>, source: Point, dest: Point) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            source,
            dest,
            progress: 0.0,
        }
    }

    /// Get current interpolated position.
    pub fn current_position(&self) -> Point {
        self.source.lerp(&self.dest, self.progress.min(1.0))
    }

    /// Current opacity, fading linearly to zero on arrival.
    pub fn opacity(&self) -> f64 {
        START_OPACITY * (1.0 - self.progress).clamp(0.0, 1.0)
    }

    /// Check if the marker has arrived.
    pub fn arrived(&self) -> bool {
        self.progress >= 1.0
    }
}

/// Animation statistics.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct AnimationStats {
    /// Markers spawned
    pub spawned: u64,
    /// Markers that completed and were discarded
    pub finished: u64,
}

/// All markers currently in flight.
#[derive(Debug)]
pub struct Animations {
    markers: Vec<PacketMarker>,
    duration: Duration,
    pub stats: AnimationStats,
}

impl Default for Animations {
    fn default() -> Self {
        Self::new(DELIVERY_DURATION)
    }
}

impl Animations {
    /// Create an empty set of animations with a travel duration.
    pub fn new(duration: Duration) -> Self {
        Self {
            markers: Vec::new(),
            duration,
            stats: AnimationStats::default(),
        }
    }

    /// Start a marker from `source` to `dest`.
    pub fn spawn(&mut self, from: &str, to: &str, source: Point, dest: Point) {
        self.markers.push(PacketMarker::new(from, to, source, dest));
        self.stats.spawned += 1;
    }

    /// Advance every marker by `dt`, discarding those that arrived.
    pub fn advance(&mut self, dt: Duration) {
        let step = if self.duration.is_zero() {
            1.0
        } else {
            dt.as_secs_f64() / self.duration.as_secs_f64()
        };
        for marker in &mut self.markers {
            marker.progress += step;
        }

        let before = self.markers.len();
        self.markers.retain(|m| !m.arrived());
        self.stats.finished += (before - self.markers.len()) as u64;
    }

    /// Markers in flight.
    pub fn markers(&self) -> &[PacketMarker] {
        &self.markers
    }

    /// Get number of markers in flight.
    pub fn active(&self) -> usize {
        self.markers.len()
    }

    /// Discard all markers.
    pub fn clear(&mut self) {
        self.markers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker_at(progress: f64) -> PacketMarker {
        PacketMarker {
            progress,
            ..PacketMarker::new("A", "B", Point::new(0.0, 0.0), Point::new(10.0, 0.0))
        }
    }

    #[test]
    fn marker_interpolation() {
        let pos = marker_at(0.5).current_position();
        assert!((pos.x - 5.0).abs() < 0.001);
        assert_eq!(marker_at(1.5).current_position(), Point::new(10.0, 0.0));
    }

    #[test]
    fn marker_fades_out() {
        assert_eq!(marker_at(0.0).opacity(), 0.8);
        assert!((marker_at(0.5).opacity() - 0.4).abs() < 1e-12);
        assert_eq!(marker_at(1.0).opacity(), 0.0);
    }

    #[test]
    fn markers_are_discarded_after_duration() {
        let mut anims = Animations::default();
        anims.spawn("A", "B", Point::new(0.0, 0.0), Point::new(10.0, 0.0));

        anims.advance(Duration::from_millis(400));
        assert_eq!(anims.active(), 1);
        anims.advance(Duration::from_millis(400));
        assert_eq!(anims.active(), 1);
        anims.advance(Duration::from_millis(250));
        assert_eq!(anims.active(), 0);
        assert_eq!(anims.stats, AnimationStats { spawned: 1, finished: 1 });
    }

    #[test]
    fn staggered_markers_finish_independently() {
        let mut anims = Animations::new(Duration::from_millis(100));
        anims.spawn("A", "B", Point::default(), Point::new(1.0, 1.0));
        anims.advance(Duration::from_millis(60));
        anims.spawn("B", "C", Point::default(), Point::new(1.0, 1.0));
        anims.advance(Duration::from_millis(60));

        assert_eq!(anims.active(), 1);
        assert_eq!(anims.markers()[0].from, "B");
    }

    #[test]
    fn clear_drops_markers() {
        let mut anims = Animations::default();
        anims.spawn("A", "B", Point::default(), Point::default());
        anims.clear();
        assert_eq!(anims.active(), 0);
    }
}
