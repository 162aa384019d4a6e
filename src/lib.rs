//! halo-query：流式、参数化的 SQL 查询构建器。
//!
//! 所有值都以 `?` 占位符输出并按片段分桶收集，最终得到一条 SQL 和与之对齐的绑定序列；
//! 只有 [`raw`] 会原样拼入 SQL。

pub mod args;
mod clause_buffer;
pub mod driver;
pub mod error;
pub mod flavor;
pub mod grammar;
pub mod interpolate;
#[cfg(test)]
mod interpolate_tests;
pub mod macros;
pub mod modifiers;
pub mod operator;
pub mod predicate;
pub mod query;
#[cfg(test)]
mod query_tests;
pub mod value;
pub mod valuer;
pub mod where_clause;

pub use crate::args::{Bindings, Bucket};
pub use crate::driver::{Driver, Statement};
pub use crate::error::{ConfigError, ExecutionError, QueryError, Result};
pub use crate::flavor::{
    DefaultFlavorGuard, Flavor, InterpolateError, default_flavor, set_default_flavor,
    set_default_flavor_scoped,
};
pub use crate::grammar::{Grammar, Ident, PLACEHOLDER};
pub use crate::interpolate::interpolate;
pub use crate::modifiers::{Arg, FlattenIntoArgs, Raw, flatten, list, raw};
pub use crate::operator::{Connective, Logic, Operator};
pub use crate::predicate::{ClauseKind, Column, Criterion};
pub use crate::query::{JoinOption, QueryBuilder, RANDOM_ORDER};
pub use crate::value::SqlValue;
pub use crate::valuer::{SqlValuer, ValuerError};
