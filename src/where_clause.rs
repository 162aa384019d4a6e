//! WHERE/HAVING 的流式接口。
//!
//! 所有方法都是原子的：返回 `Err` 时构建器保持调用前的状态，可以继续使用。

use crate::error::Result;
use crate::modifiers::{Arg, FlattenIntoArgs, list};
use crate::operator::Connective;
use crate::predicate::{ClauseKind, Column, Criterion};
use crate::query::QueryBuilder;
use crate::value::SqlValue;

use ClauseKind::{Having, Where};

impl QueryBuilder {
    // ==================== 基本比较 ====================

    /// `column operator ?`，以 AND 连接。
    ///
    /// ```
    /// use halo_query::{Flavor, QueryBuilder};
    ///
    /// let mut qb = QueryBuilder::with_flavor(Flavor::MySQL);
    /// qb.from("users").where_("age", ">", 18)?.where_("age", "<", 65)?;
    /// assert_eq!(
    ///     qb.compile(),
    ///     "SELECT * FROM `users` WHERE `age` > ? AND `age` < ?"
    /// );
    /// # Ok::<(), halo_query::QueryError>(())
    /// ```
    pub fn where_(&mut self, column: impl Into<Column>, operator: &str, value: impl Into<Arg>) -> Result<&mut Self> {
        self.add_predicate(Where, column.into(), operator, value.into(), Connective::AND)
    }

    pub fn or_where(&mut self, column: impl Into<Column>, operator: &str, value: impl Into<Arg>) -> Result<&mut Self> {
        self.add_predicate(Where, column.into(), operator, value.into(), Connective::OR)
    }

    pub fn xor_where(&mut self, column: impl Into<Column>, operator: &str, value: impl Into<Arg>) -> Result<&mut Self> {
        self.add_predicate(Where, column.into(), operator, value.into(), Connective::XOR)
    }

    /// 连接词由调用方给出，例如 `"or not"`。
    pub fn where_with(
        &mut self,
        column: impl Into<Column>,
        operator: &str,
        value: impl Into<Arg>,
        connective: &str,
    ) -> Result<&mut Self> {
        let connective: Connective = connective.parse()?;
        self.add_predicate(Where, column.into(), operator, value.into(), connective)
    }

    /// 省略运算符的写法，等价于 `where_(column, "=", value)`。
    pub fn where_eq(&mut self, column: impl Into<Column>, value: impl Into<Arg>) -> Result<&mut Self> {
        self.where_(column, "=", value)
    }

    pub fn or_where_eq(&mut self, column: impl Into<Column>, value: impl Into<Arg>) -> Result<&mut Self> {
        self.or_where(column, "=", value)
    }

    // ==================== 分组与映射 ====================

    pub fn where_group<F>(&mut self, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        self.add_group(Where, Connective::AND, f)
    }

    pub fn or_where_group<F>(&mut self, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        self.add_group(Where, Connective::OR, f)
    }

    /// `NOT (...)`。
    pub fn where_not<F>(&mut self, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        self.add_group(Where, Connective::AND.negated(), f)
    }

    pub fn or_where_not<F>(&mut self, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        self.add_group(Where, Connective::OR.negated(), f)
    }

    /// 条件映射，整体包在括号里；见 [`criteria!`](crate::criteria)。
    pub fn where_map(&mut self, criteria: impl Into<Vec<Criterion>>) -> Result<&mut Self> {
        self.where_criteria(criteria.into(), Connective::AND)
    }

    pub fn or_where_map(&mut self, criteria: impl Into<Vec<Criterion>>) -> Result<&mut Self> {
        self.where_criteria(criteria.into(), Connective::OR)
    }

    fn where_criteria(&mut self, criteria: Vec<Criterion>, connective: Connective) -> Result<&mut Self> {
        self.atomic(move |qb| qb.push_criteria(Where, criteria, connective))
    }

    // ==================== IN ====================

    /// `column IN (?,?,?)`；空列表返回 `EmptyIn`。
    pub fn where_in(&mut self, column: impl Into<Column>, values: impl FlattenIntoArgs) -> Result<&mut Self> {
        self.add_predicate(Where, column.into(), "in", list(values), Connective::AND)
    }

    pub fn or_where_in(&mut self, column: impl Into<Column>, values: impl FlattenIntoArgs) -> Result<&mut Self> {
        self.add_predicate(Where, column.into(), "in", list(values), Connective::OR)
    }

    pub fn where_not_in(&mut self, column: impl Into<Column>, values: impl FlattenIntoArgs) -> Result<&mut Self> {
        self.add_predicate(Where, column.into(), "not in", list(values), Connective::AND)
    }

    pub fn or_where_not_in(&mut self, column: impl Into<Column>, values: impl FlattenIntoArgs) -> Result<&mut Self> {
        self.add_predicate(Where, column.into(), "not in", list(values), Connective::OR)
    }

    /// `column IN (<sub>)`。
    pub fn where_in_sub<F>(&mut self, column: impl Into<Column>, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        self.add_value_subquery(Where, column.into(), "in", f, Connective::AND)
    }

    pub fn where_not_in_sub<F>(&mut self, column: impl Into<Column>, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        self.add_value_subquery(Where, column.into(), "not in", f, Connective::AND)
    }

    // ==================== BETWEEN ====================

    /// `column BETWEEN ? AND ?`；必须恰好两个值。
    pub fn where_between(&mut self, column: impl Into<Column>, values: impl FlattenIntoArgs) -> Result<&mut Self> {
        self.add_predicate(Where, column.into(), "between", list(values), Connective::AND)
    }

    pub fn or_where_between(&mut self, column: impl Into<Column>, values: impl FlattenIntoArgs) -> Result<&mut Self> {
        self.add_predicate(Where, column.into(), "between", list(values), Connective::OR)
    }

    pub fn where_not_between(&mut self, column: impl Into<Column>, values: impl FlattenIntoArgs) -> Result<&mut Self> {
        self.add_predicate(Where, column.into(), "not between", list(values), Connective::AND)
    }

    pub fn or_where_not_between(
        &mut self,
        column: impl Into<Column>,
        values: impl FlattenIntoArgs,
    ) -> Result<&mut Self> {
        self.add_predicate(Where, column.into(), "not between", list(values), Connective::OR)
    }

    // ==================== NULL ====================

    pub fn where_null(&mut self, column: impl Into<Column>) -> Result<&mut Self> {
        self.add_predicate(Where, column.into(), "is", SqlValue::Null.into(), Connective::AND)
    }

    pub fn or_where_null(&mut self, column: impl Into<Column>) -> Result<&mut Self> {
        self.add_predicate(Where, column.into(), "is", SqlValue::Null.into(), Connective::OR)
    }

    pub fn where_not_null(&mut self, column: impl Into<Column>) -> Result<&mut Self> {
        self.add_predicate(Where, column.into(), "is not", SqlValue::Null.into(), Connective::AND)
    }

    pub fn or_where_not_null(&mut self, column: impl Into<Column>) -> Result<&mut Self> {
        self.add_predicate(Where, column.into(), "is not", SqlValue::Null.into(), Connective::OR)
    }

    // ==================== LIKE ====================

    pub fn where_like(&mut self, column: impl Into<Column>, pattern: impl Into<Arg>) -> Result<&mut Self> {
        self.add_predicate(Where, column.into(), "like", pattern.into(), Connective::AND)
    }

    pub fn where_not_like(&mut self, column: impl Into<Column>, pattern: impl Into<Arg>) -> Result<&mut Self> {
        self.add_predicate(Where, column.into(), "not like", pattern.into(), Connective::AND)
    }

    // ==================== EXISTS ====================

    pub fn where_exists<F>(&mut self, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        self.add_exists(Where, Connective::AND, f)
    }

    pub fn or_where_exists<F>(&mut self, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        self.add_exists(Where, Connective::OR, f)
    }

    pub fn where_not_exists<F>(&mut self, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        self.add_exists(Where, Connective::AND.negated(), f)
    }

    pub fn or_where_not_exists<F>(&mut self, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        self.add_exists(Where, Connective::OR.negated(), f)
    }

    // ==================== RAW ====================

    /// 原样谓词。`sql` 中的 `?` 由调用方负责与 `bindings` 对齐。
    pub fn where_raw(&mut self, sql: impl Into<String>, bindings: impl FlattenIntoArgs) -> Result<&mut Self> {
        self.add_raw_predicate(Where, sql.into(), list(bindings), Connective::AND)
    }

    pub fn or_where_raw(&mut self, sql: impl Into<String>, bindings: impl FlattenIntoArgs) -> Result<&mut Self> {
        self.add_raw_predicate(Where, sql.into(), list(bindings), Connective::OR)
    }

    // ==================== 子查询与列比较 ====================

    /// `column op (<sub>)`。
    pub fn where_sub<F>(&mut self, column: impl Into<Column>, operator: &str, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        self.add_value_subquery(Where, column.into(), operator, f, Connective::AND)
    }

    /// `(<sub>) op ?`：子查询的绑定排在 `value` 之前。
    pub fn where_lhs_sub<F>(&mut self, f: F, operator: &str, value: impl Into<Arg>) -> Result<&mut Self>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        self.add_column_subquery(Where, f, operator, value.into(), Connective::AND)
    }

    /// `first op second`，两侧都是标识符。
    pub fn where_column(&mut self, first: &str, operator: &str, second: &str) -> Result<&mut Self> {
        self.add_column_comparison(Where, first, operator, second, Connective::AND)
    }

    pub fn or_where_column(&mut self, first: &str, operator: &str, second: &str) -> Result<&mut Self> {
        self.add_column_comparison(Where, first, operator, second, Connective::OR)
    }

    // ==================== HAVING ====================

    pub fn having(&mut self, column: impl Into<Column>, operator: &str, value: impl Into<Arg>) -> Result<&mut Self> {
        self.add_predicate(Having, column.into(), operator, value.into(), Connective::AND)
    }

    pub fn or_having(&mut self, column: impl Into<Column>, operator: &str, value: impl Into<Arg>) -> Result<&mut Self> {
        self.add_predicate(Having, column.into(), operator, value.into(), Connective::OR)
    }

    pub fn having_eq(&mut self, column: impl Into<Column>, value: impl Into<Arg>) -> Result<&mut Self> {
        self.having(column, "=", value)
    }

    pub fn having_group<F>(&mut self, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        self.add_group(Having, Connective::AND, f)
    }

    pub fn having_map(&mut self, criteria: impl Into<Vec<Criterion>>) -> Result<&mut Self> {
        let criteria = criteria.into();
        self.atomic(move |qb| qb.push_criteria(Having, criteria, Connective::AND))
    }

    pub fn having_in(&mut self, column: impl Into<Column>, values: impl FlattenIntoArgs) -> Result<&mut Self> {
        self.add_predicate(Having, column.into(), "in", list(values), Connective::AND)
    }

    pub fn having_between(&mut self, column: impl Into<Column>, values: impl FlattenIntoArgs) -> Result<&mut Self> {
        self.add_predicate(Having, column.into(), "between", list(values), Connective::AND)
    }

    pub fn having_null(&mut self, column: impl Into<Column>) -> Result<&mut Self> {
        self.add_predicate(Having, column.into(), "is", SqlValue::Null.into(), Connective::AND)
    }

    pub fn having_not_null(&mut self, column: impl Into<Column>) -> Result<&mut Self> {
        self.add_predicate(Having, column.into(), "is not", SqlValue::Null.into(), Connective::AND)
    }

    pub fn having_raw(&mut self, sql: impl Into<String>, bindings: impl FlattenIntoArgs) -> Result<&mut Self> {
        self.add_raw_predicate(Having, sql.into(), list(bindings), Connective::AND)
    }

    pub fn or_having_raw(&mut self, sql: impl Into<String>, bindings: impl FlattenIntoArgs) -> Result<&mut Self> {
        self.add_raw_predicate(Having, sql.into(), list(bindings), Connective::OR)
    }
}
