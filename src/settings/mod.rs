//! Config tree: named nodes holding ordered values and child nodes

pub mod node;
pub mod tree;
pub mod value;

pub use node::{Child, NodeKind, NodeSnapshot};
pub use tree::{BoolId, ConfigTree, FloatId, FloatRangeId, IntId, IntRangeId};
pub use value::{Input, Value, ValueKind};
