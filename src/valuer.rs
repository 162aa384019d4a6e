//! SqlValuer：在执行或调试渲染时才计算的绑定值。
//!
//! 构建阶段只固定占位符的位置，值本身留到 [`Bindings::resolve`](crate::Bindings::resolve)
//! （由 `execute()` 调用）或 `compile_debug()` 时才求出。
//! 同一个 Valuer 在两条路径上各求值一次，实现方不应依赖调用次数。

use crate::value::SqlValue;

/// 求值失败。经由 `QueryError::Valuer` 透传给调用方，驱动不会被调用。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("builder sql valuer error: {0}")]
pub struct ValuerError(pub String);

/// 延迟求值的绑定。
///
/// ```
/// use halo_query::{Flavor, QueryBuilder, SqlValue, SqlValuer, ValuerError};
///
/// #[derive(Debug, Clone)]
/// struct Tenant;
///
/// impl SqlValuer for Tenant {
///     fn value(&self) -> Result<SqlValue, ValuerError> {
///         Ok(SqlValue::I64(7))
///     }
/// }
///
/// let mut qb = QueryBuilder::with_flavor(Flavor::MySQL);
/// let tenant: Box<dyn SqlValuer> = Box::new(Tenant);
/// qb.from("orders").where_eq("tenant_id", tenant)?;
/// assert_eq!(qb.compile(), "SELECT * FROM `orders` WHERE `tenant_id` = ?");
/// assert_eq!(qb.compile_debug()?, "SELECT * FROM `orders` WHERE `tenant_id` = 7");
/// # Ok::<(), halo_query::QueryError>(())
/// ```
pub trait SqlValuer: dyn_clone::DynClone + std::fmt::Debug {
    fn value(&self) -> Result<SqlValue, ValuerError>;
}

dyn_clone::clone_trait_object!(SqlValuer);
