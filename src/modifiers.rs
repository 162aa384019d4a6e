//! 参数修饰器：Raw 原样片段、List 列表参数，以及 `Arg` 的各种转换。

use crate::value::SqlValue;
use crate::valuer::SqlValuer;
use std::fmt;

/// Raw：原样拼入 SQL 的文本，既不加引号也不生成占位符、不进入绑定。
///
/// 这是整个 builder 唯一的信任边界：调用方必须保证这里不会混入不可信输入。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Raw {
    pub(crate) expr: String,
}

impl Raw {
    pub fn as_str(&self) -> &str {
        &self.expr
    }

    pub fn into_inner(self) -> String {
        self.expr
    }
}

impl fmt::Display for Raw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}

/// 构造 Raw 表达式。
pub fn raw(expr: impl Into<String>) -> Raw {
    Raw { expr: expr.into() }
}

/// List：标记为参数列表，IN 会展开成 `(?,?,?)`，BETWEEN 会展开成 `? AND ?`。
pub fn list<T: FlattenIntoArgs>(values: T) -> Arg {
    Arg::List(flatten(values))
}

/// Flatten：把任意嵌套的值展开成 `Vec<Arg>`。
pub fn flatten<T: FlattenIntoArgs>(v: T) -> Vec<Arg> {
    let mut out = Vec::new();
    v.flatten_into(&mut out);
    out
}

/// 值位置上可以出现的参数。
#[derive(Clone)]
pub enum Arg {
    Value(SqlValue),
    Valuer(Box<dyn SqlValuer>),
    Raw(Raw),
    List(Vec<Arg>),
}

impl Arg {
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Value(SqlValue::Null))
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Valuer(_) => f.write_str("Valuer(..)"),
            Self::Raw(v) => f.debug_tuple("Raw").field(v).finish(),
            Self::List(args) => f.debug_tuple("List").field(args).finish(),
        }
    }
}

impl PartialEq for Arg {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            (Self::Raw(a), Self::Raw(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            _ => false,
        }
    }
}

impl From<SqlValue> for Arg {
    fn from(v: SqlValue) -> Self {
        Self::Value(v)
    }
}

impl From<Raw> for Arg {
    fn from(v: Raw) -> Self {
        Self::Raw(v)
    }
}

impl From<Box<dyn SqlValuer>> for Arg {
    fn from(v: Box<dyn SqlValuer>) -> Self {
        Self::Valuer(v)
    }
}

impl From<i64> for Arg {
    fn from(v: i64) -> Self {
        SqlValue::I64(v).into()
    }
}
impl From<i32> for Arg {
    fn from(v: i32) -> Self {
        SqlValue::I64(v as i64).into()
    }
}
impl From<u64> for Arg {
    fn from(v: u64) -> Self {
        SqlValue::U64(v).into()
    }
}
impl From<u32> for Arg {
    fn from(v: u32) -> Self {
        SqlValue::U64(v as u64).into()
    }
}
impl From<bool> for Arg {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v).into()
    }
}
impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        SqlValue::F64(v).into()
    }
}
impl From<&'static str> for Arg {
    fn from(v: &'static str) -> Self {
        SqlValue::from(v).into()
    }
}
impl From<String> for Arg {
    fn from(v: String) -> Self {
        SqlValue::from(v).into()
    }
}
impl From<Vec<u8>> for Arg {
    fn from(v: Vec<u8>) -> Self {
        SqlValue::Bytes(v).into()
    }
}
impl From<time::OffsetDateTime> for Arg {
    fn from(v: time::OffsetDateTime) -> Self {
        SqlValue::from(v).into()
    }
}

impl<T> From<Option<T>> for Arg
where
    T: Into<SqlValue>,
{
    fn from(v: Option<T>) -> Self {
        SqlValue::from_option(v).into()
    }
}

/// 递归展开成参数序列（用 trait 代替运行时的数组判断）。
pub trait FlattenIntoArgs {
    fn flatten_into(self, out: &mut Vec<Arg>);
}

impl<T: Into<Arg>> FlattenIntoArgs for T {
    fn flatten_into(self, out: &mut Vec<Arg>) {
        out.push(self.into());
    }
}

impl<T: FlattenIntoArgs> FlattenIntoArgs for Vec<T> {
    fn flatten_into(self, out: &mut Vec<Arg>) {
        for v in self {
            v.flatten_into(out);
        }
    }
}

impl<T: FlattenIntoArgs, const N: usize> FlattenIntoArgs for [T; N] {
    fn flatten_into(self, out: &mut Vec<Arg>) {
        for v in self {
            v.flatten_into(out);
        }
    }
}
