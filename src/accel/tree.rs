//! Alternating-axis acceleration tree builder.
//!
//! Builds a flat, append-only node array via an explicit stack (mirrors the
//! GPU BVH builder this renderer inherited its bones from), but partitions
//! by splitting each node's bounds at the midpoint along a rotating axis
//! rather than a surface-area heuristic — see the crate's design notes for
//! why SAH is out of scope here.

use crate::geometry::{Aabb, Triangle, Vertex};

const MAX_DEPTH: u32 = 39;
const MAX_LEAF_TRIANGLES: usize = 16;

/// A single node of an [`AccelerationTree`]. Non-empty `triangles` marks a
/// leaf; `child0`/`child1` are `None` when absent. `bounds` always contains
/// every triangle assigned to this node or any of its descendants.
#[derive(Debug, Clone)]
pub struct AccelerationTreeNode {
    pub bounds: Aabb,
    pub triangles: Vec<u32>,
    pub child0: Option<u32>,
    pub child1: Option<u32>,
    pub parent: Option<u32>,
}

impl AccelerationTreeNode {
    pub fn is_leaf(&self) -> bool {
        self.child0.is_none() && self.child1.is_none()
    }
}

/// Flat, contiguous sequence of nodes. Node 0 is the root; indices never
/// move once assigned (append-only during [`AccelerationTree::build`]).
#[derive(Debug, Clone)]
pub struct AccelerationTree {
    pub nodes: Vec<AccelerationTreeNode>,
}

struct BuildTask {
    node_idx: u32,
    triangle_indices: Vec<u32>,
    depth: u32,
}

impl AccelerationTree {
    #[tracing::instrument(skip_all, fields(tri_count = triangles.len()))]
    pub fn build(triangles: &[Triangle], vertices: &[Vertex]) -> Self {
        if triangles.is_empty() {
            return Self {
                nodes: vec![AccelerationTreeNode {
                    bounds: Aabb::vacuum(),
                    triangles: Vec::new(),
                    child0: None,
                    child1: None,
                    parent: None,
                }],
            };
        }

        let mut root_bounds = Aabb::vacuum();
        for t in triangles {
            root_bounds.union_box(&t.aabb(vertices));
        }

        let mut nodes = vec![AccelerationTreeNode {
            bounds: root_bounds,
            triangles: Vec::new(),
            child0: None,
            child1: None,
            parent: None,
        }];

        let all_indices: Vec<u32> = (0..triangles.len() as u32).collect();
        let mut stack = vec![BuildTask { node_idx: 0, triangle_indices: all_indices, depth: 0 }];

        while let Some(task) = stack.pop() {
            let node_bounds = nodes[task.node_idx as usize].bounds;

            if task.depth > MAX_DEPTH || task.triangle_indices.len() <= MAX_LEAF_TRIANGLES {
                nodes[task.node_idx as usize].triangles = task.triangle_indices;
                continue;
            }

            let axis = (task.depth % 3) as usize;
            let (bounds0, bounds1) = node_bounds.split(axis);

            let mut indices0 = Vec::new();
            let mut indices1 = Vec::new();
            for &ti in &task.triangle_indices {
                let tri_bounds = triangles[ti as usize].aabb(vertices);
                if bounds0.intersects(&tri_bounds) {
                    indices0.push(ti);
                }
                if bounds1.intersects(&tri_bounds) {
                    indices1.push(ti);
                }
            }

            let parent_idx = task.node_idx;
            if !indices0.is_empty() {
                let child_idx = nodes.len() as u32;
                nodes.push(AccelerationTreeNode {
                    bounds: bounds0,
                    triangles: Vec::new(),
                    child0: None,
                    child1: None,
                    parent: Some(parent_idx),
                });
                nodes[parent_idx as usize].child0 = Some(child_idx);
                stack.push(BuildTask { node_idx: child_idx, triangle_indices: indices0, depth: task.depth + 1 });
            }
            if !indices1.is_empty() {
                let child_idx = nodes.len() as u32;
                nodes.push(AccelerationTreeNode {
                    bounds: bounds1,
                    triangles: Vec::new(),
                    child0: None,
                    child1: None,
                    parent: Some(parent_idx),
                });
                nodes[parent_idx as usize].child1 = Some(child_idx);
                stack.push(BuildTask { node_idx: child_idx, triangle_indices: indices1, depth: task.depth + 1 });
            }
        }

        Self { nodes }
    }

    pub fn root(&self) -> &AccelerationTreeNode {
        &self.nodes[0]
    }
}
