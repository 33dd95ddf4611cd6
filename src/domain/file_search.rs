use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::WalkBuilder;

use crate::domain::error::{Error, Result};
use crate::infrastructure::LoggerTrait;

/// 遍历错误的类别，在遇到错误时确定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalErrorKind {
    /// 目录无法读取（整个子树被跳过）
    DirectoryRead,
    /// 单个条目无法访问
    EntryAccess,
}

/// 遍历过程中遇到的可恢复错误（对应子树被跳过）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalError {
    pub kind: TraversalErrorKind,
    pub path: Option<PathBuf>,
    pub message: String,
}

impl TraversalError {
    fn from_walk(err: &ignore::Error) -> Self {
        let path = error_path(err);
        let is_dir = path
            .as_deref()
            .and_then(|p| fs::symlink_metadata(p).ok())
            .map_or(false, |m| m.is_dir());

        Self {
            kind: if is_dir {
                TraversalErrorKind::DirectoryRead
            } else {
                TraversalErrorKind::EntryAccess
            },
            path,
            message: error_message(err),
        }
    }
}

/// 单个目标名称的匹配结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatches {
    pub name: String,
    pub paths: Vec<PathBuf>,
}

/// 一次搜索的结果
///
/// 每个请求的名称都有对应条目（按请求顺序），即使没有任何匹配。
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    matches: Vec<NameMatches>,
    pub errors: Vec<TraversalError>,
    pub entries_visited: u64,
}

impl SearchOutcome {
    fn with_targets(targets: &[String]) -> Self {
        Self {
            matches: targets
                .iter()
                .map(|name| NameMatches {
                    name: name.clone(),
                    paths: Vec::new(),
                })
                .collect(),
            errors: Vec::new(),
            entries_visited: 0,
        }
    }

    /// 获取某个名称匹配到的绝对路径
    pub fn get(&self, name: &str) -> Option<&[PathBuf]> {
        self.matches
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.paths.as_slice())
    }

    /// 获取某个名称的出现次数，未请求的名称返回 0
    pub fn count(&self, name: &str) -> usize {
        self.get(name).map_or(0, <[PathBuf]>::len)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NameMatches> {
        self.matches.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.matches.iter().map(|m| m.name.as_str())
    }

    /// 至少匹配到一次的名称数量
    pub fn found_names(&self) -> usize {
        self.matches.iter().filter(|m| !m.paths.is_empty()).count()
    }

    pub fn total_matches(&self) -> usize {
        self.matches.iter().map(|m| m.paths.len()).sum()
    }
}

/// 递归文件名搜索器
///
/// 搜索器本身只保存配置，每次调用的累积状态都是局部的，因此可以在多个线程中共享。
pub struct FileSearcher {
    case_sensitive: bool,
    logger: Option<Arc<dyn LoggerTrait>>,
}

impl FileSearcher {
    pub fn new(case_sensitive: bool) -> Self {
        Self {
            case_sensitive,
            logger: None,
        }
    }

    /// 附加日志记录器，用于记录匹配项和被跳过的条目
    pub fn with_logger(mut self, logger: Arc<dyn LoggerTrait>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// 在 `root` 下递归搜索所有名称为 `targets` 之一的条目
    ///
    /// 参数校验在遍历开始之前完成：
    /// - `root` 缺失或为空、`targets` 为空或包含空名称时返回 [`Error::InvalidArgument`]
    /// - `root` 不存在时返回 [`Error::NotFound`]
    /// - `root` 不是目录时返回 [`Error::InvalidArgument`]
    ///
    /// 符号链接既不匹配也不跟随。无法读取的目录或条目会被跳过并记录在
    /// [`SearchOutcome::errors`] 中，不会中断搜索。
    pub fn search<S: AsRef<str>>(&self, root: Option<&Path>, targets: &[S]) -> Result<SearchOutcome> {
        let root = require_root(root)?;
        let targets = validate_targets(targets)?;
        let root = resolve_root(root)?;
        let (root, cwd_error) = absolutize(&root, env::current_dir());
        if let Some(err) = cwd_error {
            self.log(&format!(
                "无法获取当前目录 ({})，结果路径将相对于 {}",
                err,
                root.display()
            ));
        }

        let keys: Vec<String> = targets.iter().map(|t| self.fold(t)).collect();
        let mut outcome = SearchOutcome::with_targets(&targets);

        self.log(&format!(
            "开始搜索: {} | 目标: {:?} | 区分大小写: {}",
            root.display(),
            targets,
            self.case_sensitive
        ));

        let mut builder = WalkBuilder::new(&root);
        builder
            .standard_filters(false) // 搜索隐藏文件，忽略 .gitignore 等规则
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b));

        for result in builder.build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    let error = TraversalError::from_walk(&err);
                    self.log(&format!("遍历错误(已跳过): {}", error.message));
                    outcome.errors.push(error);
                    continue;
                }
            };

            // 根目录本身不参与匹配
            if entry.depth() == 0 {
                continue;
            }

            if entry.path_is_symlink() {
                self.log_entry(entry.path(), "已跳过(符号链接)");
                continue;
            }

            outcome.entries_visited += 1;

            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            let name = self.fold(name);

            for (matches, key) in outcome.matches.iter_mut().zip(&keys) {
                if name == *key {
                    matches.paths.push(entry.path().to_path_buf());
                    self.log_entry(entry.path(), &format!("匹配 {}", matches.name));
                }
            }
        }

        Ok(outcome)
    }

    fn fold(&self, name: &str) -> String {
        if self.case_sensitive {
            name.to_string()
        } else {
            name.to_lowercase()
        }
    }

    fn log(&self, message: &str) {
        if let Some(logger) = self.logger.as_ref().filter(|l| l.is_enabled()) {
            let _ = logger.log_message(message);
        }
    }

    fn log_entry(&self, path: &Path, status: &str) {
        if let Some(logger) = self.logger.as_ref().filter(|l| l.is_enabled()) {
            let _ = logger.log_entry(path, status);
        }
    }
}

impl Default for FileSearcher {
    fn default() -> Self {
        Self::new(true)
    }
}

fn require_root(root: Option<&Path>) -> Result<&Path> {
    match root {
        Some(root) if !root.to_string_lossy().trim().is_empty() => Ok(root),
        Some(_) => Err(Error::invalid("目录路径不能为空")),
        None => Err(Error::invalid("目录路径不能为 null")),
    }
}

fn resolve_root(root: &Path) -> Result<PathBuf> {
    if !root.exists() {
        return Err(Error::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(Error::invalid(format!("路径不是目录: {}", root.display())));
    }

    Ok(root.to_path_buf())
}

/// 转为绝对路径，但不解析符号链接
///
/// 无法获取当前目录时保留相对路径，并返回该错误供调用方记录。
fn absolutize(root: &Path, cwd: io::Result<PathBuf>) -> (PathBuf, Option<io::Error>) {
    if root.is_absolute() {
        return (root.to_path_buf(), None);
    }
    match cwd {
        Ok(cwd) => (cwd.join(root), None),
        Err(err) => (root.to_path_buf(), Some(err)),
    }
}

/// 校验目标名称并按首次出现顺序去重
fn validate_targets<S: AsRef<str>>(targets: &[S]) -> Result<Vec<String>> {
    if targets.is_empty() {
        return Err(Error::invalid("文件名列表不能为空"));
    }

    let mut names: Vec<String> = Vec::with_capacity(targets.len());
    for target in targets {
        let target = target.as_ref();
        if target.is_empty() {
            return Err(Error::invalid("文件名不能为空字符串"));
        }
        if !names.iter().any(|n| n == target) {
            names.push(target.to_string());
        }
    }

    Ok(names)
}

fn error_path(err: &ignore::Error) -> Option<PathBuf> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.clone()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child.clone()),
        ignore::Error::Partial(errs) => errs.iter().find_map(error_path),
        _ => None,
    }
}

/// 去掉 `ignore` 附加的路径和深度前缀，路径已单独保存在 `TraversalError::path`
fn error_message(err: &ignore::Error) -> String {
    match err {
        ignore::Error::WithPath { err, .. }
        | ignore::Error::WithDepth { err, .. }
        | ignore::Error::WithLineNumber { err, .. } => error_message(err),
        _ => err.to_string(),
    }
}
