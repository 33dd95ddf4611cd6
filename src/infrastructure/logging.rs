use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;

/// 日志记录器trait
pub trait LoggerTrait: Send + Sync {
    fn is_enabled(&self) -> bool;
    fn log_message(&self, message: &str) -> Result<()>;
    fn log_entry(&self, path: &Path, status: &str) -> Result<()>;
    fn finalize(&self, duration: Duration, stats: &[(&str, u64)]) -> Result<()>;
}

/// 调试日志记录器（记录搜索过程、匹配项和运行统计）
pub struct Logger {
    log_file: Arc<Mutex<Option<File>>>,
    log_path: PathBuf,
    enabled: bool,
}

impl Logger {
    /// 创建新的日志记录器，日志文件写入 `log_dir`
    pub fn new(enabled: bool, log_dir: &Path) -> Result<Self> {
        if !enabled {
            return Ok(Self::disabled());
        }

        fs::create_dir_all(log_dir)
            .with_context(|| format!("无法创建日志目录: {}", log_dir.display()))?;

        // 获取当前时间作为文件名的一部分
        let now = Local::now();
        let timestamp = now.format("%Y%m%d_%H%M%S");
        let log_path = log_dir.join(format!("debug_{}.log", timestamp));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("无法创建日志文件: {}", log_path.display()))?;

        // 写入UTF-8 BOM以确保文件被正确识别为UTF-8
        let mut file_clone = file.try_clone()?;
        file_clone.write_all(&[0xEF, 0xBB, 0xBF])?;

        writeln!(file_clone, "# labkit 调试日志")?;
        writeln!(file_clone, "# 开始时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file_clone, "# --------------------------------------------")?;

        Ok(Self {
            log_file: Arc::new(Mutex::new(Some(file))),
            log_path,
            enabled: true,
        })
    }

    /// 不写任何内容的日志记录器
    pub fn disabled() -> Self {
        Self {
            log_file: Arc::new(Mutex::new(None)),
            log_path: PathBuf::new(),
            enabled: false,
        }
    }

    /// 获取日志文件路径
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    fn write_line(&self, line: &str) -> Result<()> {
        if let Ok(mut file_guard) = self.log_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "{}", line)?;
                file.flush()?;
            }
        }
        Ok(())
    }
}

impl LoggerTrait for Logger {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn log_message(&self, message: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        self.write_line(&format!("[{}] {}", timestamp, message))
    }

    fn log_entry(&self, path: &Path, status: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        self.write_line(&format!(
            "[{}] 条目: {} | 状态: {}",
            timestamp,
            path.display(),
            status
        ))
    }

    fn finalize(&self, duration: Duration, stats: &[(&str, u64)]) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let now = Local::now();
        self.write_line("# --------------------------------------------")?;
        self.write_line(&format!("# 完成时间: {}", now.format("%Y-%m-%d %H:%M:%S")))?;
        self.write_line(&format!("# 总用时: {:.3}秒", duration.as_secs_f64()))?;
        for (label, value) in stats {
            self.write_line(&format!("# {}: {}", label, value))?;
        }
        self.write_line("# ============================================")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_logger_creation() {
        let temp_dir = tempdir().unwrap();

        let logger = Logger::new(false, temp_dir.path()).unwrap();
        assert!(!logger.is_enabled());
        assert!(fs::read_dir(temp_dir.path()).unwrap().next().is_none());

        let logger = Logger::new(true, temp_dir.path()).unwrap();
        assert!(logger.is_enabled());
        assert!(logger.log_path().exists());
    }

    #[test]
    fn test_logger_trait() {
        let temp_dir = tempdir().unwrap();
        let logger = Logger::new(true, temp_dir.path()).unwrap();
        let logger_trait: &dyn LoggerTrait = &logger;

        assert!(logger_trait.is_enabled());
        assert!(logger_trait.log_message("test message").is_ok());
        assert!(logger_trait.log_entry(Path::new("/tmp/a.txt"), "匹配").is_ok());
        assert!(logger_trait
            .finalize(Duration::from_millis(1500), &[("匹配数", 3)])
            .is_ok());

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("test message"));
        assert!(content.contains("/tmp/a.txt"));
        assert!(content.contains("# 匹配数: 3"));
        assert!(content.contains("1.500秒"));
    }

    #[test]
    fn test_disabled_logger_is_noop() {
        let logger = Logger::disabled();
        assert!(logger.log_message("ignored").is_ok());
        assert!(logger.log_entry(Path::new("x"), "ignored").is_ok());
        assert_eq!(logger.log_path(), Path::new(""));
    }
}
