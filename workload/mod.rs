//! 基准测试工作负载
//!
//! 生成均匀或聚簇分布的点集和随机查询矩形，并驱动各索引计时。

pub mod runner;
pub mod stats;

pub use runner::{BenchmarkRunner, IndexTiming, ScenarioRow};
pub use stats::Summary;

use crate::rtree::{Point, Rectangle};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 聚簇中心，按空间边长的比例给出
const CLUSTER_CENTERS: [[f64; 2]; 5] = [
    [0.25, 0.25],
    [0.75, 0.25],
    [0.25, 0.75],
    [0.75, 0.75],
    [0.50, 0.50],
];

/// 聚簇的标准差，按空间边长的比例给出
const CLUSTER_SIGMA: f64 = 0.05;

/// 点集分布
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    Uniform,
    Clustered,
}

impl Distribution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Distribution::Uniform => "uniform",
            Distribution::Clustered => "clustered",
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 生成 n 个点，编号为 0..n
///
/// 均匀分布落在 `[0, space)²`；聚簇分布围绕五个中心做高斯偏移，
/// 可能落到空间之外
pub fn generate_points<R: Rng>(
    rng: &mut R,
    n: usize,
    space: f64,
    distribution: Distribution,
) -> Vec<Point> {
    (0..n as u64)
        .map(|id| match distribution {
            Distribution::Uniform => Point::new(id, rng.gen::<f64>() * space, rng.gen::<f64>() * space),
            Distribution::Clustered => {
                let [cx, cy] = CLUSTER_CENTERS[rng.gen_range(0..CLUSTER_CENTERS.len())];
                let sigma = space * CLUSTER_SIGMA;
                let x = cx * space + next_gaussian(rng) * sigma;
                let y = cy * space + next_gaussian(rng) * sigma;
                Point::new(id, x, y)
            }
        })
        .collect()
}

/// 生成边长为 `space * fraction` 的正方形查询
///
/// 聚簇分布下以随机选取的已有点为中心，并限制在空间之内
pub fn generate_query<R: Rng>(
    rng: &mut R,
    space: f64,
    fraction: f64,
    points: &[Point],
    distribution: Distribution,
) -> Rectangle {
    let size = space * fraction;
    let max_corner = (space - size).max(0.0);

    let (x, y) = match distribution {
        Distribution::Clustered if !points.is_empty() => {
            let p = points[rng.gen_range(0..points.len())];
            (
                (p.x - size / 2.0).min(max_corner).max(0.0),
                (p.y - size / 2.0).min(max_corner).max(0.0),
            )
        }
        _ => (rng.gen::<f64>() * max_corner, rng.gen::<f64>() * max_corner),
    };

    Rectangle::new(x, y, x + size, y + size)
}

/// 标准正态分布采样（Box-Muller 变换）
fn next_gaussian<R: Rng>(rng: &mut R) -> f64 {
    // u1 取 (0, 1]，避免 ln(0)
    let u1 = 1.0 - rng.gen::<f64>();
    let u2 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
