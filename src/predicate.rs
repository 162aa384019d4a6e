//! Predicate：WHERE/HAVING 谓词的递归编译。
//!
//! 每次追加谓词都同步写入两处：子句缓冲区里的文本，以及对应绑定桶里的值。
//! 校验全部在写入之前完成，公开方法再用 [`QueryBuilder::atomic`] 兜底回滚，
//! 因此任何一次失败的调用都不会留下半截状态。

use crate::args::{Bindings, Bucket};
use crate::clause_buffer::{Boundary, ClauseBuffer};
use crate::error::{ConfigError, Result};
use crate::modifiers::{Arg, Raw, raw};
use crate::operator::{Connective, Operator};
use crate::query::QueryBuilder;
use crate::value::SqlValue;

/// 谓词写入的子句。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    Where,
    Having,
}

impl ClauseKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Where => "WHERE",
            Self::Having => "HAVING",
        }
    }

    pub fn bucket(self) -> Bucket {
        match self {
            Self::Where => Bucket::Where,
            Self::Having => Bucket::Having,
        }
    }
}

/// 谓词左侧：列名、原样表达式，或一组条件（整体包在括号里）。
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Name(String),
    Raw(Raw),
    Criteria(Vec<Criterion>),
}

impl From<&str> for Column {
    fn from(v: &str) -> Self {
        Self::Name(v.to_string())
    }
}

impl From<String> for Column {
    fn from(v: String) -> Self {
        Self::Name(v)
    }
}

impl From<&String> for Column {
    fn from(v: &String) -> Self {
        Self::Name(v.clone())
    }
}

impl From<Raw> for Column {
    fn from(v: Raw) -> Self {
        Self::Raw(v)
    }
}

impl From<Vec<Criterion>> for Column {
    fn from(v: Vec<Criterion>) -> Self {
        Self::Criteria(v)
    }
}

impl<const N: usize> From<[Criterion; N]> for Column {
    fn from(v: [Criterion; N]) -> Self {
        Self::Criteria(v.into())
    }
}

/// 条件映射中的一项。
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    /// `column = value`，以 AND 连接。
    Eq { column: String, value: Arg },
    /// `(column, operator, value[, connective])`。
    Cmp {
        column: Column,
        operator: String,
        value: Arg,
        connective: Connective,
    },
}

impl Criterion {
    pub fn eq(column: impl Into<String>, value: impl Into<Arg>) -> Self {
        Self::Eq {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn cmp(column: impl Into<Column>, operator: impl Into<String>, value: impl Into<Arg>) -> Self {
        Self::Cmp {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
            connective: Connective::AND,
        }
    }

    /// 改用指定连接词；`Eq` 会被转换为 `Cmp`。
    pub fn connective(self, connective: Connective) -> Self {
        match self {
            Self::Eq { column, value } => Self::Cmp {
                column: Column::Name(column),
                operator: Operator::Eq.as_sql().to_string(),
                value,
                connective,
            },
            Self::Cmp {
                column,
                operator,
                value,
                ..
            } => Self::Cmp {
                column,
                operator,
                value,
                connective,
            },
        }
    }

    pub fn or(self) -> Self {
        self.connective(Connective::OR)
    }

    /// 嵌套的一组条件，整体包在括号里。
    ///
    /// 左侧为条件组时只允许 `=` 且不带右操作数，否则返回 `CriteriaOperand`。
    pub fn group(items: impl Into<Vec<Criterion>>) -> Self {
        Self::Cmp {
            column: Column::Criteria(items.into()),
            operator: Operator::Eq.as_sql().to_string(),
            value: no_value(),
            connective: Connective::AND,
        }
    }
}

/// 无右操作数时的占位值：空列表不生成占位符也不绑定。
fn no_value() -> Arg {
    Arg::List(Vec::new())
}

fn is_no_value(value: &Arg) -> bool {
    matches!(value, Arg::List(items) if items.is_empty())
}

impl QueryBuilder {
    pub(crate) fn clause(&self, kind: ClauseKind) -> &ClauseBuffer {
        match kind {
            ClauseKind::Where => &self.wheres,
            ClauseKind::Having => &self.havings,
        }
    }

    pub(crate) fn clause_mut(&mut self, kind: ClauseKind) -> &mut ClauseBuffer {
        match kind {
            ClauseKind::Where => &mut self.wheres,
            ClauseKind::Having => &mut self.havings,
        }
    }

    /// 执行 `f`；失败时整个构建器恢复到调用前。
    ///
    /// 分组回调拿到的是整个构建器，可能写入任意片段，所以快照覆盖全部文本与绑定。
    pub(crate) fn atomic<F>(&mut self, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let snapshot = self.clone();
        match f(self) {
            Ok(()) => Ok(self),
            Err(err) => {
                *self = snapshot;
                Err(err)
            }
        }
    }

    /// 按当前边界写入关键字与连接词。
    pub(crate) fn push_connective(&mut self, kind: ClauseKind, connective: Connective) {
        let buf = self.clause_mut(kind);
        match buf.boundary() {
            Boundary::Empty => {
                buf.push_open(kind.keyword());
                if let Some(m) = connective.modifiers() {
                    buf.push_open(m);
                }
            }
            Boundary::Open => {
                if let Some(m) = connective.modifiers() {
                    buf.push_open(m);
                }
            }
            Boundary::Term => buf.push_open(&connective.to_sql()),
        }
    }

    /// 追加一个谓词。
    pub(crate) fn push_predicate(
        &mut self,
        kind: ClauseKind,
        column: Column,
        operator: Operator,
        value: Arg,
        connective: Connective,
    ) -> Result<()> {
        let column = match column {
            Column::Criteria(items) => {
                if operator != Operator::Eq || !is_no_value(&value) {
                    return Err(ConfigError::CriteriaOperand(operator.as_sql().to_string()).into());
                }
                return self.push_criteria(kind, items, connective);
            }
            Column::Name(name) => self.grammar.wrap(&name),
            Column::Raw(expr) => expr.into_inner(),
        };

        let (operator, param, value) = self.render_value(&column, operator, value)?;
        let term = match param {
            Some(param) => format!("{column} {operator} {param}"),
            None => column,
        };

        self.push_connective(kind, connective);
        self.clause_mut(kind).push_term(&term);
        if let Some(value) = value {
            self.bindings.add(value, kind.bucket());
        }
        Ok(())
    }

    /// 校验值的形状并生成右侧占位符。返回 (最终运算符, 占位符文本, 需要绑定的值)。
    fn render_value(
        &self,
        column: &str,
        operator: Operator,
        value: Arg,
    ) -> Result<(Operator, Option<String>, Option<Arg>), ConfigError> {
        if operator == Operator::Blank {
            return Ok((operator, None, Some(value)));
        }

        if let Arg::Value(SqlValue::Null) = value {
            let op = operator
                .null_rewrite()
                .ok_or_else(|| ConfigError::InvalidNullOperator(operator.as_sql().to_string()))?;
            return Ok((op, Some("NULL".to_string()), None));
        }

        if operator.is_between() {
            return match &value {
                Arg::List(items) if items.len() == 2 => {
                    let param = format!(
                        "{} AND {}",
                        self.grammar.parameter(&items[0]),
                        self.grammar.parameter(&items[1])
                    );
                    Ok((operator, Some(param), Some(value)))
                }
                Arg::List(items) => Err(ConfigError::InvalidBetween {
                    column: column.to_string(),
                    len: items.len(),
                }),
                _ => Err(ConfigError::InvalidBetween {
                    column: column.to_string(),
                    len: 1,
                }),
            };
        }

        if operator.is_in() {
            return match &value {
                Arg::List(items) if items.is_empty() => Err(ConfigError::EmptyIn(column.to_string())),
                Arg::List(items) => {
                    let param = format!("({})", self.grammar.parameterize(items).join(","));
                    Ok((operator, Some(param), Some(value)))
                }
                Arg::Raw(expr) => Ok((operator, Some(expr.as_str().to_string()), None)),
                _ => Err(ConfigError::InvalidInValue(column.to_string())),
            };
        }

        if matches!(value, Arg::List(_)) {
            return Err(ConfigError::InvalidListOperator(operator.as_sql().to_string()));
        }

        let param = self.grammar.parameter(&value);
        Ok((operator, Some(param), Some(value)))
    }

    /// 一组条件：括号包裹，逐项按各自连接词追加；空列表不产生任何输出。
    pub(crate) fn push_criteria(
        &mut self,
        kind: ClauseKind,
        items: Vec<Criterion>,
        connective: Connective,
    ) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }
        self.push_group(kind, connective, move |qb| {
            for item in items {
                qb.push_criterion(kind, item)?;
            }
            Ok(())
        })
    }

    fn push_criterion(&mut self, kind: ClauseKind, item: Criterion) -> Result<()> {
        match item {
            Criterion::Eq { column, value } => {
                self.push_predicate(kind, Column::Name(column), Operator::Eq, value, Connective::AND)
            }
            Criterion::Cmp {
                column,
                operator,
                value,
                connective,
            } => {
                let operator: Operator = operator.parse()?;
                self.push_predicate(kind, column, operator, value, connective)
            }
        }
    }

    /// 括号分组：`f` 在同一个构建器上运行，嵌套谓词落在同一缓冲区。
    /// 分组里什么都没写时，连接词和括号一并撤销。
    pub(crate) fn push_group<F>(&mut self, kind: ClauseKind, connective: Connective, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let mark = self.clause(kind).mark();
        self.push_connective(kind, connective);
        self.clause_mut(kind).open_group();
        let inner = self.clause(kind).len();

        f(self)?;

        if self.clause(kind).len() == inner {
            self.clause_mut(kind).rollback(mark);
        } else {
            self.clause_mut(kind).close_group();
        }
        Ok(())
    }

    /// 编译子查询并把它的绑定并入 `kind` 对应的桶，返回 `Raw("(<sql>)")`。
    pub(crate) fn push_subquery(&mut self, kind: ClauseKind, sql: String, child: Bindings) -> Raw {
        raw(self.absorb_subquery(sql, child, kind.bucket()))
    }

    /// 解析运算符字符串后追加谓词；供公开方法使用。
    pub(crate) fn add_predicate(
        &mut self,
        kind: ClauseKind,
        column: Column,
        operator: &str,
        value: Arg,
        connective: Connective,
    ) -> Result<&mut Self> {
        let operator: Operator = operator.parse()?;
        self.atomic(move |qb| {
            qb.push_predicate(kind, column, operator, value, connective)
        })
    }

    /// 原样谓词：`sql` 直接写入，`bindings` 进入对应桶。
    pub(crate) fn add_raw_predicate(
        &mut self,
        kind: ClauseKind,
        sql: String,
        bindings: Arg,
        connective: Connective,
    ) -> Result<&mut Self> {
        self.atomic(move |qb| {
            qb.push_predicate(kind, Column::Raw(raw(sql)), Operator::Blank, bindings, connective)
        })
    }

    pub(crate) fn add_group<F>(&mut self, kind: ClauseKind, connective: Connective, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        self.atomic(move |qb| {
            qb.push_group(kind, connective, |qb| f(qb).map(|_| ()))
        })
    }

    /// `[NOT] EXISTS (<sub>)`。
    pub(crate) fn add_exists<F>(&mut self, kind: ClauseKind, connective: Connective, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        let (sql, child) = self.build_subquery(f)?;
        self.atomic(move |qb| {
            let sub = qb.push_subquery(kind, sql, child);
            qb.push_predicate(kind, Column::Raw(sub), Operator::Blank, no_value(), connective.exists())
        })
    }

    /// 值侧子查询：`column op (<sub>)`。
    pub(crate) fn add_value_subquery<F>(
        &mut self,
        kind: ClauseKind,
        column: Column,
        operator: &str,
        f: F,
        connective: Connective,
    ) -> Result<&mut Self>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        let operator: Operator = operator.parse()?;
        if operator.is_between() {
            return Err(ConfigError::InvalidListOperator(operator.as_sql().to_string()).into());
        }
        let (sql, child) = self.build_subquery(f)?;
        self.atomic(move |qb| {
            let sub = qb.push_subquery(kind, sql, child);
            qb.push_predicate(kind, column, operator, Arg::Raw(sub), connective)
        })
    }

    /// 列侧子查询：`(<sub>) op value`。
    pub(crate) fn add_column_subquery<F>(
        &mut self,
        kind: ClauseKind,
        f: F,
        operator: &str,
        value: Arg,
        connective: Connective,
    ) -> Result<&mut Self>
    where
        F: FnOnce(&mut QueryBuilder) -> Result<&mut QueryBuilder>,
    {
        let operator: Operator = operator.parse()?;
        let (sql, child) = self.build_subquery(f)?;
        self.atomic(move |qb| {
            let sub = qb.push_subquery(kind, sql, child);
            qb.push_predicate(kind, Column::Raw(sub), operator, value, connective)
        })
    }

    /// 两列比较，右侧同样按标识符包装，不产生绑定。
    pub(crate) fn add_column_comparison(
        &mut self,
        kind: ClauseKind,
        first: &str,
        operator: &str,
        second: &str,
        connective: Connective,
    ) -> Result<&mut Self> {
        let op: Operator = operator.parse()?;
        if !op.is_comparison() {
            return Err(ConfigError::InvalidOperator(operator.to_string()).into());
        }
        let rhs = Arg::Raw(raw(self.grammar.wrap(second)));
        self.atomic(move |qb| {
            qb.push_predicate(kind, Column::from(first), op, rhs, connective)
        })
    }
}
