pub mod algorithms;
pub mod node;
pub mod point;
pub mod rectangle;
#[allow(clippy::module_inception)]
pub mod rtree;

// 重新导出主要类型
pub use algorithms::debug::InvariantViolation;
pub use node::{Entry, Node, NodeId, NodeType};
pub use point::Point;
pub use rectangle::Rectangle;
pub use rtree::{RStarTree, TreeStats};
