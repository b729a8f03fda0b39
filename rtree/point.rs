use crate::rtree::rectangle::Rectangle;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// 索引中的二维点
///
/// `id` 由调用方分配并保证唯一，结果集以 `id` 识别点。
#[derive(Debug, Display, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[display(fmt = "Point({}, {}, {})", id, x, y)]
pub struct Point {
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Point { id, x, y }
    }

    /// 点的退化边界框
    pub fn bbox(&self) -> Rectangle {
        Rectangle::from_point(self.x, self.y)
    }

    /// 判断点是否落在闭矩形内
    pub fn within(&self, rect: &Rectangle) -> bool {
        rect.contains_point(self.x, self.y)
    }
}
