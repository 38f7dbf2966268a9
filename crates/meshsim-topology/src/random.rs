//! Random topology generation.

use rand::Rng;

use crate::descriptor::{NodeSpec, TopologyDescriptor};
use crate::MAX_NODES;

/// Generate a random topology of `Node1..NodeN`.
///
/// Each unordered pair is linked with probability `edge_probability`, and a
/// link is declared by both ends. The count is capped at [`MAX_NODES`].
/// A probability that is not finite links nothing.
pub fn random_topology<R: Rng + ?Sized>(
    count: usize,
    edge_probability: f64,
    rng: &mut R,
) -> TopologyDescriptor {
    let count = count.min(MAX_NODES);
    let p = if edge_probability.is_finite() {
        edge_probability.clamp(0.0, 1.0)
    } else {
        0.0
    };

    let mut nodes: Vec<NodeSpec> = (1..=count)
        .map(|i| NodeSpec::new(format!("Node{}", i), Vec::<String>::new()))
        .collect();

    for i in 0..count {
        for j in (i + 1)..count {
            if rng.gen_bool(p) {
                let (a, b) = (nodes[i].id.clone(), nodes[j].id.clone());
                nodes[i].neighbors.push(b);
                nodes[j].neighbors.push(a);
            }
        }
    }

    TopologyDescriptor::new(nodes)
}
