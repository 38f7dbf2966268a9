//! Force-directed graph layout.
//!
//! A velocity-based solver over the rendered topology with three forces:
//!
//! - **Link**: springs along edges pulling endpoints toward a fixed separation
//! - **Charge**: pairwise repulsion between every pair of nodes
//! - **Center**: translation keeping the centroid on the viewport midpoint
//!
//! The solver "cools" as `alpha` decays toward `alpha_target` and stops
//! ticking once it drops below `alpha_min`. Dragging a node pins it and
//! warms the solver so its neighbors can settle around the new position.

use std::collections::HashMap;

use meshsim_topology::TopologyDescriptor;
use thiserror::Error;

/// Errors raised when a topology cannot be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// An edge endpoint is not a declared node
    #[error("topology references unknown node {0}")]
    UnknownNode(String),

    /// Two nodes share an id
    #[error("duplicate node id {0}")]
    DuplicateNode(String),
}

/// A 2D point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Linear interpolation toward `other` (`t = 0` is `self`).
    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Size of the render surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Midpoint of the viewport.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(960.0, 600.0)
    }
}

/// Solver parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceParams {
    /// Target separation along an edge
    pub link_distance: f64,
    /// Pairwise charge (negative repels)
    pub charge_strength: f64,
    /// Squared distance below which charge stops growing
    pub charge_distance_min2: f64,
    /// Solver stops once alpha falls below this
    pub alpha_min: f64,
    /// Fraction of the gap to `alpha_target` closed each tick
    pub alpha_decay: f64,
    /// Fraction of velocity lost each tick
    pub velocity_decay: f64,
    /// Alpha target held while a node is dragged
    pub drag_alpha_target: f64,
    /// Alpha set when the viewport is resized
    pub resize_alpha: f64,
}

impl Default for ForceParams {
    fn default() -> Self {
        let alpha_min = 0.001;
        Self {
            link_distance: 80.0,
            charge_strength: -300.0,
            charge_distance_min2: 1.0,
            alpha_min,
            // Cools from 1 to alpha_min in ~300 ticks
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            velocity_decay: 0.4,
            drag_alpha_target: 0.3,
            resize_alpha: 0.3,
        }
    }
}

/// A rendered node.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    fixed: Option<Point>,
}

impl GraphNode {
    fn new(id: String, at: Point) -> Self {
        Self {
            id,
            x: at.x,
            y: at.y,
            vx: 0.0,
            vy: 0.0,
            fixed: None,
        }
    }

    /// Current position.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Whether the node is pinned out of the solver's control.
    pub fn is_pinned(&self) -> bool {
        self.fixed.is_some()
    }
}

/// A rendered edge between two node indices.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub source_id: String,
    pub target_id: String,
    source: usize,
    target: usize,
    strength: f64,
    bias: f64,
}

/// Force-directed layout over the current topology.
pub struct ForceLayout {
    params: ForceParams,
    viewport: Viewport,
    center: Point,
    nodes: Vec<GraphNode>,
    index: HashMap<String, usize>,
    edges: Vec<GraphEdge>,
    alpha: f64,
    alpha_target: f64,
    running: bool,
    active_drags: usize,
    ticks: u64,
    rng_state: u64,
}

impl ForceLayout {
    /// Create an empty layout for a viewport.
    pub fn new(viewport: Viewport) -> Self {
        Self::with_params(viewport, ForceParams::default())
    }

    /// Create an empty layout with explicit solver parameters.
    pub fn with_params(viewport: Viewport, params: ForceParams) -> Self {
        Self {
            params,
            viewport,
            center: viewport.center(),
            nodes: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            alpha: 1.0,
            alpha_target: 0.0,
            running: false,
            active_drags: 0,
            ticks: 0,
            rng_state: 12345,
        }
    }

    /// Replace the rendered graph with a topology.
    ///
    /// Nodes start on a spiral around the viewport center and the solver is
    /// reheated. On error the current graph is left untouched.
    pub fn render(&mut self, topology: &TopologyDescriptor) -> Result<(), LayoutError> {
        let mut index = HashMap::with_capacity(topology.len());
        for (i, id) in topology.node_ids().enumerate() {
            if index.insert(id.to_string(), i).is_some() {
                return Err(LayoutError::DuplicateNode(id.to_string()));
            }
        }

        let mut endpoints = Vec::new();
        for edge in topology.edges() {
            let source = *index
                .get(&edge.source)
                .ok_or_else(|| LayoutError::UnknownNode(edge.source.clone()))?;
            let target = *index
                .get(&edge.target)
                .ok_or_else(|| LayoutError::UnknownNode(edge.target.clone()))?;
            endpoints.push((edge, source, target));
        }

        let mut degree = vec![0usize; topology.len()];
        for (_, s, t) in &endpoints {
            degree[*s] += 1;
            degree[*t] += 1;
        }

        self.nodes = topology
            .node_ids()
            .enumerate()
            .map(|(i, id)| GraphNode::new(id.to_string(), self.initial_position(i)))
            .collect();
        self.index = index;
        self.edges = endpoints
            .into_iter()
            .map(|(edge, source, target)| {
                let (ds, dt) = (degree[source] as f64, degree[target] as f64);
                GraphEdge {
                    source_id: edge.source,
                    target_id: edge.target,
                    source,
                    target,
                    strength: 1.0 / ds.min(dt),
                    bias: ds / (ds + dt),
                }
            })
            .collect();

        self.alpha = 1.0;
        self.alpha_target = 0.0;
        self.active_drags = 0;
        self.ticks = 0;
        self.running = !self.nodes.is_empty();

        tracing::debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "Rendered topology"
        );
        Ok(())
    }

    /// Remove every node and edge and stop the solver.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.edges.clear();
        self.active_drags = 0;
        self.alpha_target = 0.0;
        self.running = false;
    }

    /// Phyllotaxis spiral, so no two nodes start on top of each other.
    fn initial_position(&self, i: usize) -> Point {
        const INITIAL_RADIUS: f64 = 10.0;
        let golden_angle = std::f64::consts::PI * (3.0 - 5f64.sqrt());
        let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
        let angle = i as f64 * golden_angle;
        Point::new(
            self.center.x + radius * angle.cos(),
            self.center.y + radius * angle.sin(),
        )
    }

    /// Rendered nodes.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Rendered edges.
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Current position of a node.
    pub fn position(&self, id: &str) -> Option<Point> {
        self.node(id).map(GraphNode::position)
    }

    /// Whether a node is present in the current render.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Point the center force pulls toward.
    pub fn center(&self) -> Point {
        self.center
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f64 {
        self.alpha_target
    }

    /// Whether the solver is still ticking.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ticks since the last render.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Mean node position.
    pub fn centroid(&self) -> Option<Point> {
        if self.nodes.is_empty() {
            return None;
        }
        let n = self.nodes.len() as f64;
        let (sx, sy) = self
            .nodes
            .iter()
            .fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
        Some(Point::new(sx / n, sy / n))
    }

    /// Resume ticking without touching positions.
    pub fn restart(&mut self) {
        self.running = !self.nodes.is_empty();
    }

    /// Advance the solver one step. Returns `false` if it was not running.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;

        self.apply_links();
        self.apply_charge();
        self.apply_center();
        self.integrate();

        self.ticks += 1;
        if self.alpha < self.params.alpha_min {
            self.running = false;
        }
        true
    }

    /// Tick until the solver stops or `max_ticks` is reached.
    pub fn settle(&mut self, max_ticks: usize) -> usize {
        let mut n = 0;
        while n < max_ticks && self.tick() {
            n += 1;
        }
        n
    }

    fn apply_links(&mut self) {
        for k in 0..self.edges.len() {
            let (s, t, strength, bias) = {
                let e = &self.edges[k];
                (e.source, e.target, e.strength, e.bias)
            };
            let (src, dst) = (&self.nodes[s], &self.nodes[t]);
            let mut x = dst.x + dst.vx - src.x - src.vx;
            let mut y = dst.y + dst.vy - src.y - src.vy;
            if x == 0.0 {
                x = self.jiggle();
            }
            if y == 0.0 {
                y = self.jiggle();
            }

            let len = (x * x + y * y).sqrt();
            let l = (len - self.params.link_distance) / len * self.alpha * strength;
            x *= l;
            y *= l;

            let dst = &mut self.nodes[t];
            dst.vx -= x * bias;
            dst.vy -= y * bias;
            let src = &mut self.nodes[s];
            src.vx += x * (1.0 - bias);
            src.vy += y * (1.0 - bias);
        }
    }

    fn apply_charge(&mut self) {
        let n = self.nodes.len();
        let strength = self.params.charge_strength * self.alpha;
        let mut dv = vec![(0.0, 0.0); n];

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let mut x = self.nodes[j].x - self.nodes[i].x;
                let mut y = self.nodes[j].y - self.nodes[i].y;
                let mut l = x * x + y * y;
                if x == 0.0 {
                    x = self.jiggle();
                    l += x * x;
                }
                if y == 0.0 {
                    y = self.jiggle();
                    l += y * y;
                }
                if l < self.params.charge_distance_min2 {
                    l = (self.params.charge_distance_min2 * l).sqrt();
                }
                let w = strength / l;
                dv[i].0 += x * w;
                dv[i].1 += y * w;
            }
        }

        for (node, (dx, dy)) in self.nodes.iter_mut().zip(dv) {
            node.vx += dx;
            node.vy += dy;
        }
    }

    fn apply_center(&mut self) {
        let Some(centroid) = self.centroid() else {
            return;
        };
        let (sx, sy) = (centroid.x - self.center.x, centroid.y - self.center.y);
        for node in &mut self.nodes {
            node.x -= sx;
            node.y -= sy;
        }
    }

    fn integrate(&mut self) {
        let keep = 1.0 - self.params.velocity_decay;
        for node in &mut self.nodes {
            match node.fixed {
                Some(p) => {
                    node.x = p.x;
                    node.y = p.y;
                    node.vx = 0.0;
                    node.vy = 0.0;
                }
                None => {
                    node.vx *= keep;
                    node.vy *= keep;
                    node.x += node.vx;
                    node.y += node.vy;
                }
            }
        }
    }

    /// Tiny offset separating coincident nodes.
    fn jiggle(&mut self) -> f64 {
        // LCG parameters from Numerical Recipes
        self.rng_state = self
            .rng_state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1);
        let unit = (self.rng_state >> 11) as f64 / (1u64 << 53) as f64;
        (unit - 0.5) * 1e-6
    }

    /// Start dragging a node: pin it where it is and warm the solver.
    ///
    /// Returns `false` if the node is unknown or already pinned.
    pub fn pin(&mut self, id: &str) -> bool {
        let Some(&i) = self.index.get(id) else {
            return false;
        };
        if self.nodes[i].fixed.is_some() {
            return false;
        }
        if self.active_drags == 0 {
            self.alpha_target = self.params.drag_alpha_target;
            self.restart();
        }
        self.active_drags += 1;
        let node = &mut self.nodes[i];
        node.fixed = Some(node.position());
        true
    }

    /// Move a pinned node. Returns `false` if it is not pinned.
    pub fn drag_to(&mut self, id: &str, to: Point) -> bool {
        match self.index.get(id).map(|&i| &mut self.nodes[i]) {
            Some(node) if node.fixed.is_some() => {
                node.fixed = Some(to);
                true
            }
            _ => false,
        }
    }

    /// End a drag and return the node to the solver.
    ///
    /// Returns `false` if the node was not pinned.
    pub fn release(&mut self, id: &str) -> bool {
        let Some(&i) = self.index.get(id) else {
            return false;
        };
        if self.nodes[i].fixed.take().is_none() {
            return false;
        }
        self.active_drags = self.active_drags.saturating_sub(1);
        if self.active_drags == 0 {
            self.alpha_target = 0.0;
        }
        true
    }

    /// Re-center on a new viewport and nudge the solver back into motion.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.center = viewport.center();
        self.alpha = self.params.resize_alpha;
        self.restart();
        tracing::debug!(width = viewport.width, height = viewport.height, "Viewport resized");
    }
}
