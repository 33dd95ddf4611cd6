use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Local;

use crate::domain::{TraversalError, TraversalErrorKind};

/// 错误类型分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// 目录无法读取（整个子树被跳过）
    DirectoryRead,
    /// 单个条目无法访问
    EntryAccess,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::DirectoryRead => "目录读取",
            ErrorType::EntryAccess => "条目访问",
        }
    }

    /// 使用遍历时记录的错误类别
    pub fn classify(error: &TraversalError) -> Self {
        error.kind.into()
    }
}

impl From<TraversalErrorKind> for ErrorType {
    fn from(kind: TraversalErrorKind) -> Self {
        match kind {
            TraversalErrorKind::DirectoryRead => ErrorType::DirectoryRead,
            TraversalErrorKind::EntryAccess => ErrorType::EntryAccess,
        }
    }
}

/// 错误日志记录器
pub struct ErrorLogger {
    error_file: Arc<Mutex<Option<File>>>,
    error_path: PathBuf,
    enabled: bool,
    error_counts: Arc<Mutex<HashMap<ErrorType, usize>>>,
}

impl ErrorLogger {
    /// 创建新的错误日志记录器
    ///
    /// 未启用时不写文件，但仍然统计错误数量，以便在控制台输出摘要。
    pub fn new(enabled: bool, log_dir: &Path) -> Result<Self> {
        if !enabled {
            return Ok(Self {
                error_file: Arc::new(Mutex::new(None)),
                error_path: PathBuf::new(),
                enabled: false,
                error_counts: Arc::new(Mutex::new(HashMap::new())),
            });
        }

        fs::create_dir_all(log_dir)
            .with_context(|| format!("无法创建日志目录: {}", log_dir.display()))?;

        let now = Local::now();
        let timestamp = now.format("%Y%m%d_%H%M%S");
        let error_path = log_dir.join(format!("error_{}.log", timestamp));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&error_path)
            .with_context(|| format!("无法创建错误日志文件: {}", error_path.display()))?;

        let mut file_clone = file.try_clone()?;
        file_clone.write_all(&[0xEF, 0xBB, 0xBF])?; // UTF-8 BOM

        writeln!(file_clone, "# labkit 错误日志")?;
        writeln!(file_clone, "# 开始时间: {}", now.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(file_clone, "# ============================================")?;
        writeln!(file_clone)?;

        Ok(Self {
            error_file: Arc::new(Mutex::new(Some(file))),
            error_path,
            enabled: true,
            error_counts: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// 记录错误
    pub fn log_error(
        &self,
        error_type: ErrorType,
        path: Option<&Path>,
        message: &str,
    ) -> Result<()> {
        if let Ok(mut counts) = self.error_counts.lock() {
            *counts.entry(error_type).or_insert(0) += 1;
        }

        if !self.enabled {
            return Ok(());
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");

        if let Ok(mut file_guard) = self.error_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "[{}] {} - {}", timestamp, error_type.as_str(), message)?;
                if let Some(path) = path {
                    writeln!(file, "  路径: {}", path.display())?;
                }
                writeln!(file)?;
                file.flush()?;
            }
        }

        Ok(())
    }

    /// 记录一次搜索中收集到的全部遍历错误
    pub fn log_traversal_errors(&self, errors: &[TraversalError]) -> Result<()> {
        for error in errors {
            self.log_error(
                ErrorType::classify(error),
                error.path.as_deref(),
                &error.message,
            )?;
        }
        Ok(())
    }

    /// 获取错误统计信息
    pub fn get_error_summary(&self) -> HashMap<ErrorType, usize> {
        self.error_counts
            .lock()
            .map(|counts| counts.clone())
            .unwrap_or_default()
    }

    /// 获取总错误数
    pub fn get_total_errors(&self) -> usize {
        self.error_counts
            .lock()
            .map(|counts| counts.values().sum())
            .unwrap_or(0)
    }

    pub fn has_errors(&self) -> bool {
        self.get_total_errors() > 0
    }

    /// 完成错误日志记录
    pub fn finalize(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let summary = self.get_error_summary();
        let total = self.get_total_errors();

        if let Ok(mut file_guard) = self.error_file.lock() {
            if let Some(ref mut file) = *file_guard {
                writeln!(file, "# ============================================")?;
                writeln!(file, "# 结束时间: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;

                if summary.is_empty() {
                    writeln!(file, "# 无错误记录")?;
                } else {
                    writeln!(file, "# 错误统计:")?;
                    for (error_type, count) in &summary {
                        writeln!(file, "#   {}: {} 次", error_type.as_str(), count)?;
                    }
                    writeln!(file, "#   总计: {} 个错误", total)?;
                }

                file.flush()?;
            }
        }

        Ok(())
    }

    /// 打印错误摘要到控制台
    pub fn print_error_summary(&self) {
        if !self.has_errors() {
            return;
        }

        println!("\n⚠️  搜索过程中发现错误 (对应子树已跳过):");
        println!("----------------------------");

        for (error_type, count) in &self.get_error_summary() {
            println!("  {}: {} 次", error_type.as_str(), count);
        }

        println!("  总计: {} 个错误", self.get_total_errors());
        if self.enabled {
            println!("  详细错误信息请查看: {}", self.error_path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_error_logger_creation() {
        let temp_dir = tempdir().unwrap();
        let logger = ErrorLogger::new(false, temp_dir.path()).unwrap();
        assert_eq!(logger.get_total_errors(), 0);
        assert!(!logger.has_errors());
    }

    #[test]
    fn test_error_logging() {
        let temp_dir = tempdir().unwrap();
        let logger = ErrorLogger::new(true, temp_dir.path()).unwrap();

        logger
            .log_error(ErrorType::EntryAccess, Some(Path::new("/test/path")), "权限不足")
            .unwrap();

        assert_eq!(logger.get_total_errors(), 1);
        assert!(logger.has_errors());

        let summary = logger.get_error_summary();
        assert_eq!(summary.get(&ErrorType::EntryAccess), Some(&1));

        logger.finalize().unwrap();
        let content = fs::read_to_string(&logger.error_path).unwrap();
        assert!(content.contains("权限不足"));
        assert!(content.contains("/test/path"));
        assert!(content.contains("总计: 1 个错误"));
    }

    #[test]
    fn test_disabled_logger_still_counts() {
        let temp_dir = tempdir().unwrap();
        let logger = ErrorLogger::new(false, temp_dir.path()).unwrap();

        let errors = vec![
            TraversalError {
                kind: TraversalErrorKind::DirectoryRead,
                path: Some(temp_dir.path().to_path_buf()),
                message: "denied".to_string(),
            },
            TraversalError {
                kind: TraversalErrorKind::EntryAccess,
                path: None,
                message: "loop".to_string(),
            },
        ];
        logger.log_traversal_errors(&errors).unwrap();

        let summary = logger.get_error_summary();
        assert_eq!(summary.get(&ErrorType::DirectoryRead), Some(&1));
        assert_eq!(summary.get(&ErrorType::EntryAccess), Some(&1));
        assert_eq!(logger.get_total_errors(), 2);
    }

    #[test]
    fn test_classify_uses_recorded_kind() {
        // 路径已不存在，分类仍取自遍历时记录的类别
        let error = TraversalError {
            kind: TraversalErrorKind::DirectoryRead,
            path: Some(PathBuf::from("/no/longer/exists")),
            message: "Permission denied".to_string(),
        };
        assert_eq!(ErrorType::classify(&error), ErrorType::DirectoryRead);

        let temp_dir = tempdir().unwrap();
        let error = TraversalError {
            kind: TraversalErrorKind::EntryAccess,
            path: Some(temp_dir.path().to_path_buf()),
            message: "Permission denied".to_string(),
        };
        assert_eq!(ErrorType::classify(&error), ErrorType::EntryAccess);
    }

    #[test]
    fn test_error_types() {
        assert_eq!(ErrorType::DirectoryRead.as_str(), "目录读取");
        assert_eq!(ErrorType::EntryAccess.as_str(), "条目访问");
    }
}
