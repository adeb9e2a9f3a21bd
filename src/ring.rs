//! Self-contained consistent-hash ring.

use xxhash_rust::xxh3::xxh3_64;

/// Virtual points placed on the ring per node. More points smooth the key
/// distribution across nodes at the cost of a larger (still tiny) ring.
const POINTS_PER_NODE: usize = 100;

/// Immutable consistent-hash ring over node names.
///
/// Each name is placed at [`POINTS_PER_NODE`] hashed positions; a key
/// resolves to the first point clockwise from its own hash, wrapping at the
/// end of the circle. Built once, never rebalanced.
#[derive(Debug)]
pub(crate) struct HashRing {
    nodes: Vec<String>,
    /// (position, index into `nodes`), sorted by position.
    points: Vec<(u64, usize)>,
}

impl HashRing {
    pub(crate) fn new(names: impl IntoIterator<Item = String>) -> Self {
        let nodes: Vec<String> = names.into_iter().collect();
        let mut points = Vec::with_capacity(nodes.len() * POINTS_PER_NODE);
        for (index, name) in nodes.iter().enumerate() {
            for replica in 0..POINTS_PER_NODE {
                let position = xxh3_64(format!("{name}-{replica}").as_bytes());
                points.push((position, index));
            }
        }
        points.sort_unstable();
        points.dedup_by_key(|(position, _)| *position);
        Self { nodes, points }
    }

    /// Resolves the owning node for `key`. `None` only for an empty ring.
    pub(crate) fn node_for(&self, key: &str) -> Option<&str> {
        if self.points.is_empty() {
            return None;
        }
        let hash = xxh3_64(key.as_bytes());
        let index = match self.points.binary_search_by_key(&hash, |(position, _)| *position) {
            Ok(index) => index,
            Err(index) if index == self.points.len() => 0,
            Err(index) => index,
        };
        let (_, node_index) = self.points[index];
        Some(self.nodes[node_index].as_str())
    }
}
