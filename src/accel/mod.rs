//! Acceleration tree: alternating-axis space partition over the scene's
//! triangle soup (spec component C3).

mod tree;

pub use tree::{AccelerationTree, AccelerationTreeNode};
