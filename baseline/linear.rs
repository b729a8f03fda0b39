use crate::baseline::SpatialIndex;
use crate::rtree::{Point, Rectangle};

/// 线性扫描 - 逐点检查，作为查询结果的基准答案
#[derive(Debug, Clone, Default)]
pub struct LinearScan {
    points: Vec<Point>,
}

impl LinearScan {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpatialIndex for LinearScan {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn insert(&mut self, point: Point) {
        self.points.push(point);
    }

    fn range_query(&self, query: &Rectangle) -> Vec<Point> {
        self.points
            .iter()
            .filter(|point| point.within(query))
            .copied()
            .collect()
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}
