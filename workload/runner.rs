use crate::baseline::{LinearScan, QuadTree, SpatialIndex};
use crate::config::BenchmarkConfig;
use crate::rtree::{RStarTree, Rectangle};
use crate::workload::stats::Summary;
use crate::workload::{generate_points, generate_query, Distribution};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

/// 参与比较的索引名称，顺序与输出列一致；第一个是基准答案
pub const INDEX_NAMES: [&str; 3] = ["linear", "quadtree", "rstar"];

/// 单个索引在一组查询上的耗时
#[derive(Debug, Clone, Serialize)]
pub struct IndexTiming {
    pub index: &'static str,
    #[serde(flatten)]
    pub summary: Summary,
}

/// 一个场景（分布、点数、查询比例）的结果
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioRow {
    pub scenario: Distribution,
    pub n: usize,
    pub query_fraction: f64,
    pub timings: Vec<IndexTiming>,
    /// 结果数量与线性扫描不一致的查询数
    pub mismatched_queries: usize,
}

impl ScenarioRow {
    /// CSV 表头，分号分隔
    pub fn csv_header() -> String {
        let mut header = String::from("scenario;n;query_frac");
        for name in INDEX_NAMES {
            header.push_str(&format!(";{name}_avg_ms;{name}_std_ms"));
        }
        header
    }

    pub fn to_csv(&self) -> String {
        let mut line = format!("{};{};{:.2}", self.scenario, self.n, self.query_fraction);
        for timing in &self.timings {
            line.push_str(&format!(
                ";{:.4};{:.4}",
                timing.summary.mean, timing.summary.std_dev
            ));
        }
        line
    }
}

/// 基准测试驱动
///
/// 对每个点数和分布，用同一组点构建全部索引，然后按查询比例计时
pub struct BenchmarkRunner {
    config: BenchmarkConfig,
    rng: StdRng,
}

impl BenchmarkRunner {
    pub fn new(config: BenchmarkConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        BenchmarkRunner { config, rng }
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// 运行全部场景
    pub fn run(&mut self) -> Vec<ScenarioRow> {
        let sizes = self.config.sizes.clone();
        let distributions = self.config.distributions.clone();

        let mut rows = Vec::new();
        for n in sizes {
            for &distribution in &distributions {
                rows.extend(self.run_scenario(n, distribution));
            }
        }
        rows
    }

    /// 按 `INDEX_NAMES` 的顺序构建空索引
    fn build_indexes(&self) -> Vec<Box<dyn SpatialIndex>> {
        let space = self.config.space;
        vec![
            Box::new(LinearScan::new()),
            Box::new(QuadTree::new(Rectangle::new(0.0, 0.0, space, space))),
            Box::new(RStarTree::new(self.config.max_entries)),
        ]
    }

    /// 运行单个点数与分布下的所有查询比例
    pub fn run_scenario(&mut self, n: usize, distribution: Distribution) -> Vec<ScenarioRow> {
        let space = self.config.space;
        let points = generate_points(&mut self.rng, n, space, distribution);

        let mut indexes = self.build_indexes();
        for index in indexes.iter_mut() {
            let start = Instant::now();
            for point in &points {
                index.insert(*point);
            }
            info!(
                "built {} over {} {} points in {:.2?} ({} indexed)",
                index.name(),
                n,
                distribution,
                start.elapsed(),
                index.len()
            );
        }

        let mut rows = Vec::with_capacity(self.config.query_fractions.len());
        for &fraction in &self.config.query_fractions {
            let mut samples = vec![Vec::with_capacity(self.config.repetitions); indexes.len()];
            let mut mismatched_queries = 0;

            for _ in 0..self.config.repetitions {
                let query = generate_query(&mut self.rng, space, fraction, &points, distribution);

                let mut expected = None;
                let mut mismatch = false;
                for (k, index) in indexes.iter().enumerate() {
                    let start = Instant::now();
                    let found = index.range_query(&query).len();
                    samples[k].push(start.elapsed().as_secs_f64() * 1000.0);

                    match expected {
                        None => expected = Some(found),
                        Some(count) if count != found => mismatch = true,
                        Some(_) => {}
                    }
                }
                if mismatch {
                    mismatched_queries += 1;
                }
            }

            if mismatched_queries > 0 {
                warn!(
                    "{} of {} queries disagreed with the linear scan ({} n={} frac={})",
                    mismatched_queries, self.config.repetitions, distribution, n, fraction
                );
            }

            let timings = indexes
                .iter()
                .zip(&samples)
                .map(|(index, samples)| IndexTiming {
                    index: index.name(),
                    summary: Summary::from_samples(samples).unwrap_or_default(),
                })
                .collect();

            rows.push(ScenarioRow {
                scenario: distribution,
                n,
                query_fraction: fraction,
                timings,
                mismatched_queries,
            });
        }

        rows
    }
}
