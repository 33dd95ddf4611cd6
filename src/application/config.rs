use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::Strategy;

/// 单次列出排列时允许的最大输入长度上限 (12! ≈ 4.8 亿)
pub const MAX_PERMUTATION_INPUT: usize = 12;

/// 应用程序配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 文件搜索相关配置
    pub search: SearchConfig,
    /// 排列生成相关配置
    pub permutation: PermutationConfig,
    /// 日志相关配置
    pub logging: LoggingConfig,
}

/// 搜索配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// 是否区分大小写
    pub case_sensitive: bool,
}

/// 排列配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermutationConfig {
    /// 是否保留重复排列
    pub include_duplicates: bool,
    /// 默认算法
    pub strategy: Strategy,
    /// 命令行允许的最大输入长度
    pub max_input_length: usize,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 是否写入调试日志和错误日志
    pub enabled: bool,
    /// 日志文件目录
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig {
                case_sensitive: true,
            },
            permutation: PermutationConfig {
                include_duplicates: true,
                strategy: Strategy::Backtracking,
                max_input_length: 10,
            },
            logging: LoggingConfig {
                enabled: false,
                log_dir: PathBuf::from("."),
            },
        }
    }
}

impl Config {
    /// 从配置文件加载配置，如果文件不存在则创建默认配置文件
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            let config = Self::default();
            config.save_to_file(config_path)?;
            println!("已创建默认配置文件: {}", config_path.display());
            Ok(config)
        }
    }

    /// 从文件加载配置
    pub fn load_from_file(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("无法读取配置文件: {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", config_path.display()))?;

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("无法创建配置目录: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("无法序列化配置")?;

        fs::write(config_path, content)
            .with_context(|| format!("无法写入配置文件: {}", config_path.display()))?;

        Ok(())
    }

    /// 获取配置文件的默认路径（程序所在目录下的 config.toml）
    pub fn default_config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("无法获取程序路径")?;

        let exe_dir = exe_path.parent().context("无法获取程序目录")?;

        Ok(exe_dir.join("config.toml"))
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        let max_len = self.permutation.max_input_length;
        if max_len == 0 {
            anyhow::bail!("max_input_length 不能为 0");
        }
        if max_len > MAX_PERMUTATION_INPUT {
            anyhow::bail!("max_input_length 不能超过 {}", MAX_PERMUTATION_INPUT);
        }

        if self.logging.enabled && self.logging.log_dir.as_os_str().is_empty() {
            anyhow::bail!("启用日志时 log_dir 不能为空");
        }

        Ok(())
    }
}
