use crate::workload::Distribution;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 基准测试配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchConfig {
    /// 工作负载配置
    pub benchmark: BenchmarkConfig,

    /// 日志配置
    pub logging: LoggingConfig,
}

/// 工作负载配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// 每个场景的点数
    #[serde(default = "default_sizes")]
    pub sizes: Vec<usize>,

    /// 每个查询比例下的查询次数
    #[serde(default = "default_repetitions")]
    pub repetitions: usize,

    /// 空间边长，点和查询落在 [0, space]² 内
    #[serde(default = "default_space")]
    pub space: f64,

    /// 查询边长相对空间边长的比例
    #[serde(default = "default_query_fractions")]
    pub query_fractions: Vec<f64>,

    /// R*-tree 节点最大条目数
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// 随机数种子
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// 点集分布：uniform, clustered
    #[serde(default = "default_distributions")]
    pub distributions: Vec<Distribution>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别：trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 日志输出：stderr, file
    #[serde(default = "default_log_output")]
    pub output: String,

    /// 日志文件路径（当 output = file 时）
    pub log_file: Option<PathBuf>,
}

/// 配置加载与校验错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(#[from] config::ConfigError),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// 默认值函数
// ============================================================================

fn default_sizes() -> Vec<usize> {
    vec![10_000, 50_000, 100_000]
}

fn default_repetitions() -> usize {
    100
}

fn default_space() -> f64 {
    1000.0
}

fn default_query_fractions() -> Vec<f64> {
    vec![0.01, 0.05, 0.2]
}

fn default_max_entries() -> usize {
    16
}

fn default_seed() -> u64 {
    12345
}

fn default_distributions() -> Vec<Distribution> {
    vec![Distribution::Uniform, Distribution::Clustered]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_output() -> String {
    "stderr".to_string()
}

// ============================================================================
// 实现
// ============================================================================

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            sizes: default_sizes(),
            repetitions: default_repetitions(),
            space: default_space(),
            query_fractions: default_query_fractions(),
            max_entries: default_max_entries(),
            seed: default_seed(),
            distributions: default_distributions(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            output: default_log_output(),
            log_file: None,
        }
    }
}

impl BenchConfig {
    /// 从文件加载配置
    ///
    /// 配置加载顺序（优先级从低到高）：
    /// 1. 默认配置（内嵌的 default.toml）
    /// 2. 用户配置文件（可选）
    /// 3. 环境变量（RSTAR__ 前缀，使用双下划线分隔嵌套）
    ///
    /// # 示例
    ///
    /// ```no_run
    /// use rstar_points::config::BenchConfig;
    ///
    /// // 加载配置（如果文件不存在，使用默认配置）
    /// let config = BenchConfig::from_file("rstar-bench.toml").unwrap();
    /// ```
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("default.toml"),
                config::FileFormat::Toml,
            ))
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("RSTAR").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }

    /// 验证配置
    ///
    /// 检查点数、查询次数、空间边长、查询比例、分布和日志设置
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bench = &self.benchmark;

        if bench.sizes.is_empty() || bench.sizes.contains(&0) {
            return Err(ConfigError::Invalid(format!(
                "sizes must be a non-empty list of positive counts, got {:?}",
                bench.sizes
            )));
        }

        if bench.repetitions == 0 {
            return Err(ConfigError::Invalid("repetitions must be positive".to_string()));
        }

        if !bench.space.is_finite() || bench.space <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "space must be a finite positive length, got {}",
                bench.space
            )));
        }

        if bench.query_fractions.is_empty()
            || bench
                .query_fractions
                .iter()
                .any(|&f| !(f > 0.0 && f <= 1.0))
        {
            return Err(ConfigError::Invalid(format!(
                "query_fractions must lie in (0, 1], got {:?}",
                bench.query_fractions
            )));
        }

        if bench.distributions.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one distribution is required".to_string(),
            ));
        }

        // 验证日志级别
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Invalid log level: '{}'. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        // 验证日志文件配置
        if self.logging.output == "file" && self.logging.log_file.is_none() {
            return Err(ConfigError::Invalid(
                "Log output is 'file' but log_file path is not specified".to_string(),
            ));
        }

        Ok(())
    }

    /// 打印配置摘要
    pub fn print_summary(&self) {
        let bench = &self.benchmark;
        let distributions: Vec<&str> = bench.distributions.iter().map(|d| d.as_str()).collect();

        eprintln!("R*-tree Benchmark Configuration:");
        eprintln!("   Sizes:       {:?}", bench.sizes);
        eprintln!("   Fractions:   {:?}", bench.query_fractions);
        eprintln!("   Repetitions: {}", bench.repetitions);
        eprintln!("   Space:       {}", bench.space);
        eprintln!("   Max Entries: {}", bench.max_entries);
        eprintln!("   Seed:        {}", bench.seed);
        eprintln!("   Scenarios:   {}", distributions.join(", "));
        eprintln!();
        eprintln!("   Log Level:   {}", self.logging.level);
        eprintln!("   Log Output:  {}", self.logging.output);
        if let Some(ref log_file) = self.logging.log_file {
            eprintln!("   Log File:    {}", log_file.display());
        }
        eprintln!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BenchConfig::default();
        assert_eq!(config.benchmark.sizes, vec![10_000, 50_000, 100_000]);
        assert_eq!(config.benchmark.repetitions, 100);
        assert_eq!(config.benchmark.max_entries, 16);
        assert_eq!(config.benchmark.query_fractions, vec![0.01, 0.05, 0.2]);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_embedded_defaults_match() {
        let embedded: BenchConfig =
            toml::from_str(include_str!("default.toml")).expect("embedded default.toml");
        let defaults = BenchConfig::default();

        assert_eq!(embedded.benchmark.sizes, defaults.benchmark.sizes);
        assert_eq!(embedded.benchmark.seed, defaults.benchmark.seed);
        assert_eq!(embedded.benchmark.distributions, defaults.benchmark.distributions);
        assert_eq!(embedded.logging.output, defaults.logging.output);
    }

    #[test]
    fn test_config_validation() {
        let mut config = BenchConfig::default();
        assert!(config.validate().is_ok());

        config.benchmark.sizes = vec![100, 0];
        assert!(config.validate().is_err());
        config.benchmark.sizes = vec![100];

        config.benchmark.repetitions = 0;
        assert!(config.validate().is_err());
        config.benchmark.repetitions = 10;

        config.benchmark.space = f64::NAN;
        assert!(config.validate().is_err());
        config.benchmark.space = 1000.0;

        config.benchmark.query_fractions = vec![0.1, 1.5];
        assert!(config.validate().is_err());
        config.benchmark.query_fractions = vec![1.0];
        assert!(config.validate().is_ok());

        config.benchmark.distributions.clear();
        assert!(config.validate().is_err());
        config.benchmark.distributions = vec![Distribution::Clustered];

        // 无效日志级别
        config.logging.level = "invalid".to_string();
        let err = config.validate().expect_err("invalid level");
        assert!(err.to_string().contains("Invalid log level"));
        config.logging.level = "debug".to_string();

        config.logging.output = "file".to_string();
        assert!(config.validate().is_err());
        config.logging.log_file = Some(PathBuf::from("bench.log"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let mut config = BenchConfig::default();
        config.benchmark.sizes = vec![500, 1000, 2000];
        config.benchmark.seed = 7;
        config.benchmark.distributions = vec![Distribution::Clustered, Distribution::Uniform];

        let temp_file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        let path = temp_file.path().to_str().unwrap();

        // 保存
        config.save_to_file(path).unwrap();

        // 加载
        let loaded = BenchConfig::from_file(path).unwrap();
        assert_eq!(loaded.benchmark.sizes, vec![500, 1000, 2000]);
        assert_eq!(loaded.benchmark.seed, 7);
        assert_eq!(
            loaded.benchmark.distributions,
            vec![Distribution::Clustered, Distribution::Uniform]
        );
        assert_eq!(loaded.benchmark.repetitions, config.benchmark.repetitions);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let loaded = BenchConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.benchmark.max_entries, 16);
        assert_eq!(loaded.logging.output, "stderr");
    }
}
