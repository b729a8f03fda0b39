use serde::{Deserialize, Serialize};
use std::fmt;

/// 轴对齐矩形 - 用于表示R*-tree中的最小边界矩形(MBR)以及查询范围
///
/// 约定 `min[i] <= max[i]`；当两者相等时矩形退化为线段或点。
/// 矩形是值类型，所有计算都返回新值，只有 `expand_to_include` 会修改自身。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub min: [f64; 2], // [x_min, y_min]
    pub max: [f64; 2], // [x_max, y_max]
}

impl Rectangle {
    /// 创建新的矩形
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        assert!(x_min <= x_max && y_min <= y_max, "Invalid rectangle bounds");
        Rectangle {
            min: [x_min, y_min],
            max: [x_max, y_max],
        }
    }

    /// 创建一个点矩形
    pub fn from_point(x: f64, y: f64) -> Self {
        Rectangle {
            min: [x, y],
            max: [x, y],
        }
    }

    /// 计算一组矩形的并集，空集合返回 None
    pub fn union_all<'a, I>(rects: I) -> Option<Rectangle>
    where
        I: IntoIterator<Item = &'a Rectangle>,
    {
        let mut iter = rects.into_iter();
        let mut mbr = *iter.next()?;
        for rect in iter {
            mbr.expand_to_include(rect);
        }
        Some(mbr)
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    /// 计算矩形面积，退化矩形面积为0
    pub fn area(&self) -> f64 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    /// 计算两个矩形的并集MBR
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        let mut mbr = *self;
        mbr.expand_to_include(other);
        mbr
    }

    /// 原地扩展到包含另一个矩形
    pub fn expand_to_include(&mut self, other: &Rectangle) {
        self.min[0] = self.min[0].min(other.min[0]);
        self.min[1] = self.min[1].min(other.min[1]);
        self.max[0] = self.max[0].max(other.max[0]);
        self.max[1] = self.max[1].max(other.max[1]);
    }

    /// 计算扩大到包含另一个矩形所需的面积增量
    pub fn enlargement(&self, other: &Rectangle) -> f64 {
        self.union(other).area() - self.area()
    }

    /// 计算两个矩形的交集面积，任一轴上不相交时为0
    pub fn overlap(&self, other: &Rectangle) -> f64 {
        let x_overlap = (self.max[0].min(other.max[0]) - self.min[0].max(other.min[0])).max(0.0);
        let y_overlap = (self.max[1].min(other.max[1]) - self.min[1].max(other.min[1])).max(0.0);

        x_overlap * y_overlap
    }

    /// 判断两个矩形是否相交（边界接触也算相交）
    pub fn intersects(&self, other: &Rectangle) -> bool {
        !(self.max[0] < other.min[0]
            || self.max[1] < other.min[1]
            || self.min[0] > other.max[0]
            || self.min[1] > other.max[1])
    }

    /// 判断当前矩形是否完全包含另一个矩形（允许边界重合）
    pub fn contains(&self, other: &Rectangle) -> bool {
        self.min[0] <= other.min[0]
            && self.min[1] <= other.min[1]
            && self.max[0] >= other.max[0]
            && self.max[1] >= other.max[1]
    }

    /// 判断当前矩形是否包含一个点（闭区间）
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.min[0] <= x && x <= self.max[0] && self.min[1] <= y && y <= self.max[1]
    }

    /// 计算矩形中心点
    pub fn center(&self) -> [f64; 2] {
        [
            self.min[0] + self.width() / 2.0,
            self.min[1] + self.height() / 2.0,
        ]
    }

    /// 矩形中心到给定点的欧氏距离
    pub fn center_distance(&self, point: [f64; 2]) -> f64 {
        let [cx, cy] = self.center();
        (cx - point[0]).hypot(cy - point[1])
    }

    /// 判断矩形是否为点（宽度和高度都为0）
    pub fn is_point(&self) -> bool {
        self.min[0] == self.max[0] && self.min[1] == self.max[1]
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.2},{:.2},{:.2},{:.2}]",
            self.min[0], self.min[1], self.max[0], self.max[1]
        )
    }
}
