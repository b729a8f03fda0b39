use clap::{Parser, ValueEnum};
use colored::*;
use rstar_points::config::{BenchConfig, LoggingConfig};
use rstar_points::workload::{BenchmarkRunner, ScenarioRow};
use rstar_points::Result;
use tracing::{info, Level};

/// 结果输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Range query benchmark: R*-tree vs quadtree vs linear scan", long_about = None)]
struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value = "rstar-bench.toml")]
    config: String,

    /// 生成默认配置文件并退出
    #[arg(long)]
    generate_config: bool,

    /// Point counts, comma separated (overrides config file)
    #[arg(long, value_delimiter = ',')]
    sizes: Option<Vec<usize>>,

    /// Queries per scenario and fraction (overrides config file)
    #[arg(short, long)]
    repetitions: Option<usize>,

    /// R*-tree node capacity (overrides config file)
    #[arg(short, long)]
    max_entries: Option<usize>,

    /// Random seed (overrides config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (overrides config file)
    #[arg(long)]
    log_level: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 生成默认配置文件
    if args.generate_config {
        let config = BenchConfig::default();
        config.save_to_file(&args.config)?;
        eprintln!("{} {}", "Generated default configuration:".green(), args.config);
        return Ok(());
    }

    // 加载配置
    let mut config = BenchConfig::from_file(&args.config)?;

    // 命令行参数覆盖配置文件
    if let Some(sizes) = args.sizes {
        config.benchmark.sizes = sizes;
    }
    if let Some(repetitions) = args.repetitions {
        config.benchmark.repetitions = repetitions;
    }
    if let Some(max_entries) = args.max_entries {
        config.benchmark.max_entries = max_entries;
    }
    if let Some(seed) = args.seed {
        config.benchmark.seed = seed;
    }
    if let Some(log_level) = args.log_level {
        config.logging.level = log_level;
    }

    // 验证配置
    if let Err(e) = config.validate() {
        eprintln!("{} {}", "error:".red().bold(), e);
        return Err(e.into());
    }

    // 初始化日志系统
    init_logging(&config.logging)?;

    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    config.print_summary();

    let scenarios = config.benchmark.sizes.len() * config.benchmark.distributions.len();
    eprintln!(
        "{} {} scenarios x {} fractions x {} queries",
        "Running".cyan().bold(),
        scenarios,
        config.benchmark.query_fractions.len(),
        config.benchmark.repetitions
    );

    let mut runner = BenchmarkRunner::new(config.benchmark.clone());
    let rows = runner.run();

    match args.format {
        OutputFormat::Csv => {
            println!("{}", ScenarioRow::csv_header());
            for row in &rows {
                println!("{}", row.to_csv());
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }

    let mismatched: usize = rows.iter().map(|row| row.mismatched_queries).sum();
    if mismatched > 0 {
        eprintln!(
            "{} {} queries disagreed with the linear scan",
            "Warning:".yellow().bold(),
            mismatched
        );
    } else {
        eprintln!("{} {} result rows", "Done:".green().bold(), rows.len());
    }

    Ok(())
}

/// 初始化日志系统
///
/// 日志写到 stderr 或追加到文件，stdout 只输出结果
fn init_logging(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = match config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    match (config.output.as_str(), &config.log_file) {
        ("file", Some(log_file)) => {
            // 确保日志目录存在
            if let Some(parent) = log_file.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)?;

            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(file)
                        .with_ansi(false)
                        .with_target(false),
                )
                .with(tracing_subscriber::filter::LevelFilter::from_level(filter))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false),
                )
                .with(tracing_subscriber::filter::LevelFilter::from_level(filter))
                .init();
        }
    }

    Ok(())
}
