use std::path::PathBuf;

use thiserror::Error;

/// 领域层结果类型
pub type Result<T> = std::result::Result<T, Error>;

/// 领域层错误
///
/// 只有调用前的参数校验会产生这些错误；遍历过程中的单个条目错误
/// 记录在 [`SearchOutcome::errors`](crate::domain::SearchOutcome) 中，不会中断调用。
#[derive(Debug, Error)]
pub enum Error {
    /// 缺失或格式错误的输入
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    /// 根目录不存在
    #[error("目录不存在: {}", .0.display())]
    NotFound(PathBuf),
}

impl Error {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = Error::invalid("目录路径不能为空");
        assert!(err.is_invalid_argument());
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("目录路径不能为空"));

        let err = Error::NotFound(PathBuf::from("/does/not/exist"));
        assert!(err.is_not_found());
        assert!(err.to_string().contains("/does/not/exist"));
    }
}
