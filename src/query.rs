//! QueryBuilder：SELECT 语句的各个片段与最终组装。
//!
//! WHERE/HAVING 的谓词编译见 `predicate` 与 `where_clause` 模块。

use crate::args::{Bindings, Bucket};
use crate::clause_buffer::ClauseBuffer;
use crate::driver::Driver;
use crate::error::{ConfigError, Result};
use crate::flavor::{Flavor, default_flavor};
use crate::grammar::{Grammar, Ident};
use crate::modifiers::{Arg, FlattenIntoArgs, list};
use crate::operator::Operator;
use std::rc::Rc;

/// `order_by` 的随机排序哨兵列，搭配空方向使用。
pub const RANDOM_ORDER: &str = "<random>";

/// JOIN 类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinOption {
    #[default]
    InnerJoin,
    LeftJoin,
    LeftOuterJoin,
    RightJoin,
    RightOuterJoin,
    CrossJoin,
}

impl JoinOption {
    fn as_str(self) -> &'static str {
        match self {
            Self::InnerJoin => "INNER JOIN",
            Self::LeftJoin => "LEFT JOIN",
            Self::LeftOuterJoin => "LEFT OUTER JOIN",
            Self::RightJoin => "RIGHT JOIN",
            Self::RightOuterJoin => "RIGHT OUTER JOIN",
            Self::CrossJoin => "CROSS JOIN",
        }
    }
}

#[derive(Debug, Clone)]
struct UnionPart {
    all: bool,
    sql: String,
    /// 自带 ORDER BY/LIMIT/OFFSET 或嵌套 UNION。
    tail: bool,
}

/// 流式 SQL 构建器。每个逻辑查询（或子查询）一个实例，单一所有者，不可跨线程共享。
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    pub(crate) grammar: Grammar,
    pub(crate) driver: Option<Rc<dyn Driver>>,
    pub(crate) bindings: Bindings,

    distinct: bool,
    columns: Vec<String>,
    from: Option<String>,
    joins: Vec<String>,
    pub(crate) wheres: ClauseBuffer,
    groups: Vec<String>,
    pub(crate) havings: ClauseBuffer,
    orders: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,

    unions: Vec<UnionPart>,
    union_orders: Vec<String>,
    union_limit: Option<u64>,
    union_offset: Option<u64>,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryBuilder {
    /// 使用全局默认 flavor，不带驱动（只能编译，不能执行）。
    pub fn new() -> Self {
        Self::with_flavor(default_flavor())
    }

    pub fn with_flavor(flavor: Flavor) -> Self {
        Self {
            grammar: Grammar::new(flavor),
            driver: None,
            bindings: Bindings::new(),
            distinct: false,
            columns: Vec::new(),
            from: None,
            joins: Vec::new(),
            wheres: ClauseBuffer::new(),
            groups: Vec::new(),
            havings: ClauseBuffer::new(),
            orders: Vec::new(),
            limit: None,
            offset: None,
            unions: Vec::new(),
            union_orders: Vec::new(),
            union_limit: None,
            union_offset: None,
        }
    }

    /// 注入驱动；flavor 取自驱动。
    pub fn with_driver(driver: Rc<dyn Driver>) -> Self {
        let mut qb = Self::with_flavor(driver.flavor());
        qb.driver = Some(driver);
        qb
    }

    pub fn set_flavor(&mut self, flavor: Flavor) -> Flavor {
        let old = self.grammar.flavor();
        self.grammar = Grammar::new(flavor);
        old
    }

    pub fn flavor(&self) -> Flavor {
        self.grammar.flavor()
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn driver(&self) -> Option<&Rc<dyn Driver>> {
        self.driver.as_ref()
    }

    /// 同 flavor、同驱动的空白子构建器。
    pub fn child(&self) -> Self {
        let mut qb = Self::with_flavor(self.flavor());
        qb.driver = self.driver.clone();
        qb
    }

    /// 在独立子构建器中构建并编译子查询，返回其 SQL 与全部绑定。
    pub(crate) fn build_subquery<F>(&self, f: F) -> Result<(String, Bindings)>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        let mut child = self.child();
        f(&mut child)?;
        let sql = child.compile();
        Ok((sql, child.bindings))
    }

    /// 把子查询绑定并入某个桶，返回带括号的子查询文本。
    pub(crate) fn absorb_subquery(&mut self, sql: String, child: Bindings, bucket: Bucket) -> String {
        tracing::trace!(
            target: "halo_query::sql",
            bucket = %bucket,
            bindings = child.len(),
            "absorb subquery"
        );
        self.bindings.absorb(child, bucket);
        format!("({sql})")
    }

    // ==================== SELECT ====================

    /// 替换选择列（逐个包装）。
    pub fn select<I, T>(&mut self, cols: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Ident>,
    {
        self.columns.clear();
        self.bindings.clear(Bucket::Select);
        self.add_select(cols)
    }

    pub fn add_select<I, T>(&mut self, cols: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Ident>,
    {
        for c in cols {
            let wrapped = self.grammar.wrap_ident(&c.into());
            self.columns.push(wrapped);
        }
        self
    }

    /// 原样选择表达式，`bindings` 进入 select 桶。
    pub fn select_raw(&mut self, sql: impl Into<String>, bindings: impl FlattenIntoArgs) -> &mut Self {
        self.columns.push(sql.into());
        self.bindings.add(list(bindings), Bucket::Select);
        self
    }

    /// `(<子查询>) AS alias`。
    pub fn select_sub<F>(&mut self, f: F, alias: &str) -> Result<&mut Self>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        if alias.trim().is_empty() {
            return Err(ConfigError::MissingAlias.into());
        }
        let (sql, child) = self.build_subquery(f)?;
        let sub = self.absorb_subquery(sql, child, Bucket::Select);
        let col = format!("{sub} AS {}", self.grammar.wrap(alias));
        self.columns.push(col);
        Ok(self)
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    // ==================== FROM ====================

    pub fn from(&mut self, table: impl Into<Ident>) -> &mut Self {
        self.bindings.clear(Bucket::From);
        self.from = Some(self.grammar.wrap_ident(&table.into()));
        self
    }

    pub fn from_raw(&mut self, sql: impl Into<String>, bindings: impl FlattenIntoArgs) -> &mut Self {
        self.bindings.clear(Bucket::From);
        self.from = Some(sql.into());
        self.bindings.add(list(bindings), Bucket::From);
        self
    }

    /// 子查询作为表，必须提供别名。
    pub fn from_sub<F>(&mut self, f: F, alias: &str) -> Result<&mut Self>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        if alias.trim().is_empty() {
            return Err(ConfigError::MissingAlias.into());
        }
        let (sql, child) = self.build_subquery(f)?;
        self.bindings.clear(Bucket::From);
        let sub = self.absorb_subquery(sql, child, Bucket::From);
        self.from = Some(format!("{sub} AS {}", self.grammar.wrap(alias)));
        Ok(self)
    }

    // ==================== JOIN ====================

    /// `INNER JOIN table ON first op second`，两侧都按标识符包装。
    pub fn join(&mut self, table: impl Into<Ident>, first: &str, operator: &str, second: &str) -> Result<&mut Self> {
        self.join_with_option(JoinOption::InnerJoin, table, first, operator, second)
    }

    pub fn left_join(&mut self, table: impl Into<Ident>, first: &str, operator: &str, second: &str) -> Result<&mut Self> {
        self.join_with_option(JoinOption::LeftJoin, table, first, operator, second)
    }

    pub fn right_join(&mut self, table: impl Into<Ident>, first: &str, operator: &str, second: &str) -> Result<&mut Self> {
        self.join_with_option(JoinOption::RightJoin, table, first, operator, second)
    }

    pub fn cross_join(&mut self, table: impl Into<Ident>) -> &mut Self {
        let table = self.grammar.wrap_ident(&table.into());
        self.joins.push(format!("{} {table}", JoinOption::CrossJoin.as_str()));
        self
    }

    pub fn join_with_option(
        &mut self,
        option: JoinOption,
        table: impl Into<Ident>,
        first: &str,
        operator: &str,
        second: &str,
    ) -> Result<&mut Self> {
        let op = comparison_operator(operator)?;
        let table = self.grammar.wrap_ident(&table.into());
        let on = format!("{} {op} {}", self.grammar.wrap(first), self.grammar.wrap(second));
        self.joins.push(format!("{} {table} ON {on}", option.as_str()));
        Ok(self)
    }

    /// `JOIN table ON first op ?`，值进入 join 桶。
    pub fn join_where(
        &mut self,
        option: JoinOption,
        table: impl Into<Ident>,
        first: &str,
        operator: &str,
        value: impl Into<Arg>,
    ) -> Result<&mut Self> {
        let op = comparison_operator(operator)?;
        let value = value.into();
        if matches!(value, Arg::List(_)) {
            return Err(ConfigError::InvalidListOperator(op.as_sql().to_string()).into());
        }
        let table = self.grammar.wrap_ident(&table.into());
        let param = self.grammar.parameter(&value);
        self.joins.push(format!(
            "{} {table} ON {} {op} {param}",
            option.as_str(),
            self.grammar.wrap(first)
        ));
        self.bindings.add(value, Bucket::Join);
        Ok(self)
    }

    /// 子查询 JOIN：`JOIN (<sub>) AS alias ON first op second`，子查询绑定进入 join 桶。
    pub fn join_sub<F>(
        &mut self,
        option: JoinOption,
        f: F,
        alias: &str,
        first: &str,
        operator: &str,
        second: &str,
    ) -> Result<&mut Self>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        if alias.trim().is_empty() {
            return Err(ConfigError::MissingAlias.into());
        }
        let op = comparison_operator(operator)?;
        let (sql, child) = self.build_subquery(f)?;
        let sub = self.absorb_subquery(sql, child, Bucket::Join);
        let on = format!("{} {op} {}", self.grammar.wrap(first), self.grammar.wrap(second));
        self.joins.push(format!(
            "{} {sub} AS {} ON {on}",
            option.as_str(),
            self.grammar.wrap(alias)
        ));
        Ok(self)
    }

    // ==================== GROUP BY ====================

    pub fn group_by<I, T>(&mut self, cols: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Ident>,
    {
        for c in cols {
            let wrapped = self.grammar.wrap_ident(&c.into());
            self.groups.push(wrapped);
        }
        self
    }

    pub fn group_by_raw(&mut self, sql: impl Into<String>, bindings: impl FlattenIntoArgs) -> &mut Self {
        self.groups.push(sql.into());
        self.bindings.add(list(bindings), Bucket::GroupBy);
        self
    }

    // ==================== ORDER BY ====================

    /// 方向只接受 ASC/DESC（大小写不敏感）；[`RANDOM_ORDER`] 搭配空方向表示随机排序。
    pub fn order_by(&mut self, column: impl Into<Ident>, direction: &str) -> Result<&mut Self> {
        let clause = self.order_clause(column.into(), direction)?;
        self.orders.push(clause);
        Ok(self)
    }

    pub fn order_by_desc(&mut self, column: impl Into<Ident>) -> Result<&mut Self> {
        self.order_by(column, "DESC")
    }

    pub fn order_by_rand(&mut self) -> &mut Self {
        self.orders.push(self.flavor().random_function().to_string());
        self
    }

    pub fn order_by_raw(&mut self, sql: impl Into<String>, bindings: impl FlattenIntoArgs) -> &mut Self {
        self.orders.push(sql.into());
        self.bindings.add(list(bindings), Bucket::Order);
        self
    }

    fn order_clause(&self, column: Ident, direction: &str) -> Result<String, ConfigError> {
        let dir = direction.trim().to_ascii_uppercase();
        let invalid = |column: &Ident| ConfigError::InvalidDirection {
            column: match column {
                Ident::Name(n) => n.clone(),
                Ident::Raw(r) => r.to_string(),
            },
            direction: direction.to_string(),
        };

        match (&column, dir.as_str()) {
            (Ident::Name(name), "") if name == RANDOM_ORDER => {
                Ok(self.flavor().random_function().to_string())
            }
            (Ident::Name(name), _) if name == RANDOM_ORDER => Err(invalid(&column)),
            (_, "ASC" | "DESC") => Ok(format!("{} {dir}", self.grammar.wrap_ident(&column))),
            _ => Err(invalid(&column)),
        }
    }

    // ==================== LIMIT / OFFSET ====================

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    // ==================== UNION ====================

    pub fn union<F>(&mut self, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        self.push_union(false, f)
    }

    pub fn union_all<F>(&mut self, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        self.push_union(true, f)
    }

    fn push_union<F>(&mut self, all: bool, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        let mut child = self.child();
        f(&mut child)?;
        let sql = child.compile();
        let tail = child.has_tail() || !child.unions.is_empty();
        self.bindings.absorb(child.bindings, Bucket::Union);
        self.unions.push(UnionPart { all, sql, tail });
        Ok(self)
    }

    pub fn union_order_by(&mut self, column: impl Into<Ident>, direction: &str) -> Result<&mut Self> {
        let clause = self.order_clause(column.into(), direction)?;
        self.union_orders.push(clause);
        Ok(self)
    }

    pub fn union_order_by_raw(&mut self, sql: impl Into<String>, bindings: impl FlattenIntoArgs) -> &mut Self {
        self.union_orders.push(sql.into());
        self.bindings.add(list(bindings), Bucket::UnionOrder);
        self
    }

    pub fn union_limit(&mut self, limit: u64) -> &mut Self {
        self.union_limit = Some(limit);
        self
    }

    pub fn union_offset(&mut self, offset: u64) -> &mut Self {
        self.union_offset = Some(offset);
        self
    }

    // ==================== 组装 ====================

    /// 按固定顺序组装 SQL：SELECT、FROM、JOIN、WHERE、GROUP BY、HAVING、ORDER BY、LIMIT、OFFSET，
    /// 之后是 UNION 及其 ORDER BY/LIMIT/OFFSET。
    pub fn compile(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        let base = self.compile_base();
        if self.unions.is_empty() {
            parts.push(base);
        } else {
            // 不允许括号的方言里，带尾部子句的部分改写成派生表。
            let wrap = self.flavor().wraps_union_parts();
            let enclose = |sql: &str, tail: bool| match (wrap, tail) {
                (true, _) => format!("({sql})"),
                (false, true) => format!("SELECT * FROM ({sql})"),
                (false, false) => sql.to_string(),
            };

            parts.push(enclose(&base, self.has_tail()));
            for u in &self.unions {
                parts.push(if u.all { "UNION ALL" } else { "UNION" }.to_string());
                parts.push(enclose(&u.sql, u.tail));
            }
            write_tail(
                &mut parts,
                &self.union_orders,
                self.union_limit,
                self.union_offset,
            );
        }

        collapse_whitespace(&parts.join(" "))
    }

    /// 基础查询是否带 ORDER BY/LIMIT/OFFSET。
    fn has_tail(&self) -> bool {
        !self.orders.is_empty() || self.limit.is_some() || self.offset.is_some()
    }

    fn compile_base(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        let mut select = String::from("SELECT");
        if self.distinct {
            select.push_str(" DISTINCT");
        }
        select.push(' ');
        if self.columns.is_empty() {
            select.push('*');
        } else {
            select.push_str(&self.columns.join(", "));
        }
        parts.push(select);

        if let Some(from) = &self.from {
            parts.push(format!("FROM {from}"));
        }
        parts.extend(self.joins.iter().cloned());
        if !self.wheres.is_empty() {
            parts.push(self.wheres.as_str().to_string());
        }
        if !self.groups.is_empty() {
            parts.push(format!("GROUP BY {}", self.groups.join(", ")));
        }
        if !self.havings.is_empty() {
            parts.push(self.havings.as_str().to_string());
        }
        write_tail(&mut parts, &self.orders, self.limit, self.offset);

        parts.join(" ")
    }

    /// 与 `compile()` 中占位符一一对应的绑定序列。
    pub fn all_bindings(&self) -> Vec<Arg> {
        self.bindings.all()
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// 直接向某个桶追加绑定（配合手写的 raw 片段使用）。
    pub fn add_binding(&mut self, value: impl Into<Arg>, bucket: Bucket) -> &mut Self {
        self.bindings.add(value, bucket);
        self
    }
}

fn write_tail(parts: &mut Vec<String>, orders: &[String], limit: Option<u64>, offset: Option<u64>) {
    if !orders.is_empty() {
        parts.push(format!("ORDER BY {}", orders.join(", ")));
    }
    if let Some(limit) = limit {
        parts.push(format!("LIMIT {limit}"));
    }
    if let Some(offset) = offset {
        parts.push(format!("OFFSET {offset}"));
    }
}

fn collapse_whitespace(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn comparison_operator(operator: &str) -> Result<Operator, ConfigError> {
    let op: Operator = operator.parse()?;
    if !op.is_comparison() {
        return Err(ConfigError::InvalidOperator(operator.to_string()));
    }
    Ok(op)
}
