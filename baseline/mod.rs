//! 点索引的公共接口与基准对照实现
//!
//! 线性扫描和区域四叉树与 R*-tree 暴露相同的 `insert` / `range_query`，
//! 可以互相替换，用于正确性对照和性能比较。

pub mod linear;
pub mod quadtree;

pub use linear::LinearScan;
pub use quadtree::QuadTree;

use crate::rtree::{Point, RStarTree, Rectangle};

/// 支持插入点与矩形范围查询的索引
pub trait SpatialIndex {
    /// 索引名称，用于基准测试输出
    fn name(&self) -> &'static str;

    fn insert(&mut self, point: Point);

    /// 返回所有坐标落在闭矩形内的点
    fn range_query(&self, query: &Rectangle) -> Vec<Point>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SpatialIndex for RStarTree {
    fn name(&self) -> &'static str {
        "rstar"
    }

    fn insert(&mut self, point: Point) {
        RStarTree::insert(self, point)
    }

    fn range_query(&self, query: &Rectangle) -> Vec<Point> {
        RStarTree::range_query(self, query)
    }

    fn len(&self) -> usize {
        RStarTree::len(self)
    }
}
