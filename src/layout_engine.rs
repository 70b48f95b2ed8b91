pub mod binary_tree;
pub mod engine;
pub mod geometry;
pub(crate) mod graph;
pub mod systems;
pub mod utils;

pub use binary_tree::{PackerNode, PackerNodeId, PackerTree};
pub use engine::{LayoutEngine, LayoutError, LayoutPlan};
pub use geometry::{Point, Rect};
pub use graph::GrowDirection;
pub use systems::{
    GrowingPackSystem, PackError, PackItem, Packing, PackingSystem, PackingSystemKind, Placement,
    PotpackSystem,
};
