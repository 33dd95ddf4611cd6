use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use labkit::application::Config;
use labkit::domain::{FileSearcher, PermutationGenerator, Strategy};
use labkit::infrastructure::{ErrorLogger, Logger, LoggerTrait};
use labkit::presentation::{self, SearchSummary, TimingReport};

/// 递归文件名搜索与字符串排列工具
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// 配置文件路径 (默认为程序所在目录下的 config.toml)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// 启用详细日志记录，日志文件保存到配置的 log_dir
    #[clap(long, global = true)]
    log: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 在目录树中递归查找指定名称的文件
    Search {
        /// 要搜索的目录路径
        dir: PathBuf,

        /// 要查找的文件名 (可以指定多个)
        #[clap(required = true)]
        names: Vec<String>,

        /// 不区分大小写
        #[clap(short = 'i', long)]
        ignore_case: bool,
    },
    /// 生成字符串的全部排列
    Permute {
        /// 输入字符串
        input: String,

        /// 去除重复的排列
        #[clap(short, long)]
        dedup: bool,

        /// 使用的算法
        #[clap(short, long, value_enum)]
        strategy: Option<Strategy>,

        /// 对比三种算法的性能
        #[clap(short, long)]
        compare: bool,
    },
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::default_config_path()?,
    };

    let config = Config::load_or_create(&path)?;
    config
        .validate()
        .with_context(|| format!("配置无效: {}", path.display()))?;
    Ok(config)
}

fn run_search(
    config: &Config,
    logger: Arc<Logger>,
    dir: &Path,
    names: &[String],
    ignore_case: bool,
) -> Result<()> {
    let case_sensitive = !ignore_case && config.search.case_sensitive;
    let error_logger = ErrorLogger::new(logger.is_enabled(), &config.logging.log_dir)?;

    println!("在 {} 中搜索: {:?}", dir.display(), names);
    println!("区分大小写: {}", case_sensitive);

    let mut summary = SearchSummary::new();

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .context("无效的进度条模板")?,
    );
    progress.set_message("正在搜索...");
    progress.enable_steady_tick(Duration::from_millis(100));

    let searcher = FileSearcher::new(case_sensitive).with_logger(logger.clone());
    let result = searcher.search(Some(dir), names);
    progress.finish_and_clear();

    let outcome = result?;

    error_logger.log_traversal_errors(&outcome.errors)?;
    summary.record(&outcome);

    presentation::print_search_outcome(&outcome)?;
    summary.print()?;
    error_logger.print_error_summary();

    error_logger.finalize()?;
    logger.finalize(
        summary.start_time.elapsed(),
        &[
            ("扫描条目数", summary.entries_visited),
            ("匹配项总数", summary.total_matches as u64),
            ("遍历错误数", summary.errors as u64),
        ],
    )?;
    if logger.is_enabled() {
        println!("完整日志已保存到: {}", logger.log_path().display());
    }

    Ok(())
}

fn run_permute(
    config: &Config,
    logger: Arc<Logger>,
    input: &str,
    dedup: bool,
    strategy: Option<Strategy>,
    compare: bool,
) -> Result<()> {
    let max_len = config.permutation.max_input_length;
    let len = input.chars().count();
    if len > max_len {
        anyhow::bail!(
            "输入长度 {} 超过上限 {} (可在配置文件中调整 max_input_length)",
            len,
            max_len
        );
    }

    let include_duplicates = !dedup && config.permutation.include_duplicates;
    let generator = PermutationGenerator::new(include_duplicates);
    let start = Instant::now();

    if compare {
        let mut report = TimingReport::new(input);
        for strategy in Strategy::ALL {
            let started = Instant::now();
            let permutations = generator.generate(Some(input), strategy)?;
            report.push(strategy, started.elapsed(), permutations.len());
            logger.log_message(&format!(
                "{} 生成 {} 个排列",
                strategy,
                permutations.len()
            ))?;
        }
        report.print()?;
    } else {
        let strategy = strategy.unwrap_or(config.permutation.strategy);
        println!("使用算法: {}", strategy);

        let permutations = generator.generate(Some(input), strategy)?;
        logger.log_message(&format!(
            "输入: {:?} | 算法: {} | 保留重复: {} | 排列数: {}",
            input,
            strategy,
            include_duplicates,
            permutations.len()
        ))?;
        presentation::print_permutations(&permutations)?;
    }

    logger.finalize(start.elapsed(), &[("输入长度", len as u64)])?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let logger = Arc::new(Logger::new(
        cli.log || config.logging.enabled,
        &config.logging.log_dir,
    )?);

    match cli.command {
        Command::Search {
            dir,
            names,
            ignore_case,
        } => run_search(&config, logger, &dir, &names, ignore_case),
        Command::Permute {
            input,
            dedup,
            strategy,
            compare,
        } => run_permute(&config, logger, &input, dedup, strategy, compare),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("错误: {:#}", err);
        std::process::exit(1);
    }
}
