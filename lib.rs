pub mod baseline;
pub mod config;
pub mod rtree;
pub mod workload;

use std::error::Error;

// 重新导出主要的公共接口
pub use rtree::{Entry, InvariantViolation, Node, NodeId, Point, RStarTree, Rectangle, TreeStats};

// 重新导出基准测试相关类型，便于二进制文件使用
pub use baseline::{LinearScan, QuadTree, SpatialIndex};
pub use config::{BenchConfig, ConfigError};
pub use workload::{BenchmarkRunner, Distribution, ScenarioRow};

pub type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;
