use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::domain::{SearchOutcome, Strategy};

/// 格式化持续时间
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, mins, secs)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else if secs > 0 || duration.subsec_millis() > 0 {
        format!("{}.{:03}s", secs, duration.subsec_millis())
    } else {
        format!("{:.3}ms", duration.as_secs_f64() * 1000.0)
    }
}

/// 输出搜索结果（按请求顺序）
pub fn write_search_outcome<W: Write>(out: &mut W, outcome: &SearchOutcome) -> Result<()> {
    writeln!(out, "\n=== 搜索结果 ===")?;

    for entry in outcome.iter() {
        writeln!(out, "\n文件: \x1b[1;32m{}\x1b[0m", entry.name)?;
        writeln!(out, "出现次数: {}", entry.paths.len())?;

        if entry.paths.is_empty() {
            writeln!(out, "状态: \x1b[1;31m未找到\x1b[0m")?;
        } else {
            writeln!(out, "状态: \x1b[1;34m已找到\x1b[0m")?;
            writeln!(out, "位置:")?;
            for path in &entry.paths {
                writeln!(out, "  - {}", path.display())?;
            }
        }
    }

    Ok(())
}

pub fn print_search_outcome(outcome: &SearchOutcome) -> Result<()> {
    write_search_outcome(&mut io::stdout().lock(), outcome)
}

/// 输出排列列表
pub fn write_permutations<W: Write>(out: &mut W, permutations: &[String]) -> Result<()> {
    writeln!(out, "\n=== 排列 ===")?;
    writeln!(out, "总数: {}", permutations.len())?;
    writeln!(out, "\n排列:")?;

    for (i, permutation) in permutations.iter().enumerate() {
        writeln!(out, "{:>4}: {}", i + 1, permutation)?;
    }

    Ok(())
}

pub fn print_permutations(permutations: &[String]) -> Result<()> {
    write_permutations(&mut io::stdout().lock(), permutations)
}

/// 搜索摘要
pub struct SearchSummary {
    pub start_time: Instant,
    pub entries_visited: u64,
    pub names_found: usize,
    pub names_requested: usize,
    pub total_matches: usize,
    pub errors: usize,
}

impl SearchSummary {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            entries_visited: 0,
            names_found: 0,
            names_requested: 0,
            total_matches: 0,
            errors: 0,
        }
    }

    /// 从搜索结果中汇总统计
    pub fn record(&mut self, outcome: &SearchOutcome) {
        self.entries_visited = outcome.entries_visited;
        self.names_found = outcome.found_names();
        self.names_requested = outcome.iter().count();
        self.total_matches = outcome.total_matches();
        self.errors = outcome.errors.len();
    }

    pub fn print(&self) -> Result<()> {
        let duration = self.start_time.elapsed();

        println!("\n搜索摘要:");
        println!("----------------------------");
        println!("总用时: {}", format_duration(duration));
        println!("扫描条目: {}", self.entries_visited);
        println!("找到名称: {}/{}", self.names_found, self.names_requested);
        println!("匹配项数: {}", self.total_matches);
        if self.errors > 0 {
            println!("跳过的错误: {}", self.errors);
        }

        Ok(())
    }
}

impl Default for SearchSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// 单个算法的计时结果
#[derive(Debug, Clone)]
pub struct StrategyTiming {
    pub strategy: Strategy,
    pub elapsed: Duration,
    pub count: usize,
}

/// 多个算法的性能对比
#[derive(Debug, Clone, Default)]
pub struct TimingReport {
    pub input: String,
    pub timings: Vec<StrategyTiming>,
}

impl TimingReport {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
            timings: Vec::new(),
        }
    }

    pub fn push(&mut self, strategy: Strategy, elapsed: Duration, count: usize) {
        self.timings.push(StrategyTiming {
            strategy,
            elapsed,
            count,
        });
    }

    pub fn fastest(&self) -> Option<&StrategyTiming> {
        self.timings.iter().min_by_key(|t| t.elapsed)
    }

    pub fn slowest(&self) -> Option<&StrategyTiming> {
        self.timings.iter().max_by_key(|t| t.elapsed)
    }

    /// 最慢与最快之间的倍数
    pub fn speedup(&self) -> Option<f64> {
        let fastest = self.fastest()?.elapsed.as_secs_f64();
        let slowest = self.slowest()?.elapsed.as_secs_f64();
        if fastest > 0.0 {
            Some(slowest / fastest)
        } else {
            None
        }
    }

    pub fn write<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "\n=== 性能对比 ===")?;
        writeln!(
            out,
            "输入字符串: \"{}\" (长度: {})",
            self.input,
            self.input.chars().count()
        )?;

        for timing in &self.timings {
            writeln!(out, "\n{}:", timing.strategy)?;
            writeln!(out, "  用时: {}", format_duration(timing.elapsed))?;
            writeln!(out, "  排列数: {}", timing.count)?;
        }

        if let (Some(fastest), Some(speedup)) = (self.fastest(), self.speedup()) {
            writeln!(out, "\n速度对比:")?;
            writeln!(out, "  {} 最快，比最慢的快 {:.2} 倍", fastest.strategy, speedup)?;
        }

        Ok(())
    }

    pub fn print(&self) -> Result<()> {
        self.write(&mut io::stdout().lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FileSearcher;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(3725)), "1h 2m 5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.500s");
        assert_eq!(format_duration(Duration::from_micros(250)), "0.250ms");
    }

    #[test]
    fn test_write_search_outcome() {
        let temp_dir = tempdir().unwrap();
        File::create(temp_dir.path().join("found.txt")).unwrap();

        let outcome = FileSearcher::new(true)
            .search(Some(temp_dir.path()), &["found.txt", "missing.txt"])
            .unwrap();

        let mut buf = Vec::new();
        write_search_outcome(&mut buf, &outcome).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let found_at = text.find("found.txt").unwrap();
        let missing_at = text.find("missing.txt").unwrap();
        assert!(found_at < missing_at);
        assert!(text.contains("已找到"));
        assert!(text.contains("未找到"));
        assert!(text.contains("出现次数: 1"));
        assert!(text.contains("出现次数: 0"));
    }

    #[test]
    fn test_write_permutations() {
        let perms = vec!["AB".to_string(), "BA".to_string()];
        let mut buf = Vec::new();
        write_permutations(&mut buf, &perms).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("总数: 2"));
        assert!(text.contains("   1: AB"));
        assert!(text.contains("   2: BA"));
    }

    #[test]
    fn test_search_summary_record() {
        let temp_dir = tempdir().unwrap();
        File::create(temp_dir.path().join("a.txt")).unwrap();
        File::create(temp_dir.path().join("b.txt")).unwrap();

        let outcome = FileSearcher::new(true)
            .search(Some(temp_dir.path()), &["a.txt", "c.txt"])
            .unwrap();

        let mut summary = SearchSummary::new();
        summary.record(&outcome);
        assert_eq!(summary.entries_visited, 2);
        assert_eq!(summary.names_found, 1);
        assert_eq!(summary.names_requested, 2);
        assert_eq!(summary.total_matches, 1);
        assert_eq!(summary.errors, 0);
    }

    #[test]
    fn test_timing_report() {
        let mut report = TimingReport::new("ABC");
        report.push(Strategy::Backtracking, Duration::from_millis(30), 6);
        report.push(Strategy::Heap, Duration::from_millis(10), 6);
        report.push(Strategy::Prefix, Duration::from_millis(20), 6);

        assert_eq!(report.fastest().unwrap().strategy, Strategy::Heap);
        assert_eq!(report.slowest().unwrap().strategy, Strategy::Backtracking);
        assert!((report.speedup().unwrap() - 3.0).abs() < 1e-9);

        let mut buf = Vec::new();
        report.write(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("heap 最快，比最慢的快 3.00 倍"));
    }

    #[test]
    fn test_empty_timing_report() {
        let report = TimingReport::new("");
        assert!(report.fastest().is_none());
        assert!(report.speedup().is_none());
    }
}
