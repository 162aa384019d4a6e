//! 错误类型：构建期的配置错误与执行期的驱动错误分开。

use crate::flavor::InterpolateError;
use crate::valuer::ValuerError;

/// crate 统一的 Result 别名。
pub type Result<T, E = QueryError> = std::result::Result<T, E>;

/// 构建期错误：在出错的那一次调用上同步返回，且不会修改任何缓冲区。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("builder invalid operator `{0}`")]
    InvalidOperator(String),
    #[error("builder invalid logical connective `{0}`")]
    InvalidConnective(String),
    #[error("builder invalid order direction `{direction}` for column `{column}`")]
    InvalidDirection { column: String, direction: String },
    #[error("builder BETWEEN on `{column}` requires exactly 2 values, got {len}")]
    InvalidBetween { column: String, len: usize },
    #[error("builder IN on `{0}` requires a non-empty list")]
    EmptyIn(String),
    #[error("builder IN on `{0}` requires a list or a subquery")]
    InvalidInValue(String),
    #[error("builder NULL value can not be used with operator `{0}`")]
    InvalidNullOperator(String),
    #[error("builder list value can not be used with operator `{0}`")]
    InvalidListOperator(String),
    #[error("builder unknown binding bucket `{0}`")]
    UnknownBucket(String),
    #[error("builder subquery used as a table requires an alias")]
    MissingAlias,
    #[error("builder criteria group takes no operand, got operator `{0}` or a value")]
    CriteriaOperand(String),
}

/// 执行期错误：原样透传驱动的失败。
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("builder has no driver attached")]
    NoDriver,
    #[error(transparent)]
    Driver(Box<dyn std::error::Error + Send + Sync>),
}

impl ExecutionError {
    pub fn driver(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Driver(err.into())
    }
}

/// builder 对外暴露的总错误。
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    #[error(transparent)]
    Interpolate(#[from] InterpolateError),
    #[error(transparent)]
    Valuer(#[from] ValuerError),
}

impl QueryError {
    /// 若为构建期错误，返回其引用（测试与调用方匹配时常用）。
    pub fn as_config(&self) -> Option<&ConfigError> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}
