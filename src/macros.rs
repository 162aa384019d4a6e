//! 宏集合：异构参数的便捷写法。

/// 条件映射。两种写法：
///
/// - `criteria! { "a" => 1, "b" => "x" }`：逐项 `=`，以 AND 连接；
/// - `criteria![("age", ">", 18), ("name", "like", "a%")]`：带运算符。
///
/// ```
/// use halo_query::{Flavor, QueryBuilder, criteria};
///
/// let mut qb = QueryBuilder::with_flavor(Flavor::MySQL);
/// qb.where_map(criteria! { "a" => 1, "b" => 2 })?;
/// assert_eq!(qb.compile(), "SELECT * WHERE (`a` = ? AND `b` = ?)");
/// # Ok::<(), halo_query::QueryError>(())
/// ```
#[macro_export]
macro_rules! criteria {
    () => {
        ::std::vec::Vec::<$crate::Criterion>::new()
    };
    ($(($col:expr, $op:expr, $val:expr)),+ $(,)?) => {
        ::std::vec![$($crate::Criterion::cmp($col, $op, $val)),+]
    };
    ($($col:expr => $val:expr),+ $(,)?) => {
        ::std::vec![$($crate::Criterion::eq($col, $val)),+]
    };
}

/// 混合普通名字与 `raw(..)` 的标识符列表，供 `select`/`group_by` 等使用。
#[macro_export]
macro_rules! idents {
    ($($ident:expr),* $(,)?) => {
        ::std::vec![$($crate::Ident::from($ident)),*]
    };
}
