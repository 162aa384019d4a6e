//! 运算符白名单与逻辑连接词。

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// 谓词运算符。除 `Blank` 外都可以从字符串解析（大小写不敏感）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
    /// `<>`
    Ne,
    /// `!=`
    NotEq,
    /// `<=>`
    NullSafeEq,
    Between,
    NotBetween,
    In,
    NotIn,
    Is,
    IsNot,
    Like,
    NotLike,
    /// 内部哨兵：没有右操作数的谓词（EXISTS、原样谓词）。
    Blank,
}

impl Operator {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Ne => "<>",
            Self::NotEq => "!=",
            Self::NullSafeEq => "<=>",
            Self::Between => "BETWEEN",
            Self::NotBetween => "NOT BETWEEN",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Is => "IS",
            Self::IsNot => "IS NOT",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::Blank => "",
        }
    }

    pub fn is_between(self) -> bool {
        matches!(self, Self::Between | Self::NotBetween)
    }

    pub fn is_in(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }

    /// 两列比较（JOIN ON、where_column）允许的运算符。
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq
                | Self::Lt
                | Self::Gt
                | Self::Le
                | Self::Ge
                | Self::Ne
                | Self::NotEq
                | Self::NullSafeEq
        )
    }

    /// NULL 值只允许搭配这几个运算符，并被改写为 IS / IS NOT。
    pub(crate) fn null_rewrite(self) -> Option<Operator> {
        match self {
            Self::Eq | Self::Is => Some(Self::Is),
            Self::Ne | Self::NotEq | Self::IsNot => Some(Self::IsNot),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for Operator {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.split_whitespace().collect::<Vec<_>>().join(" ");
        let op = match norm.to_ascii_lowercase().as_str() {
            "=" => Self::Eq,
            "<" => Self::Lt,
            ">" => Self::Gt,
            "<=" => Self::Le,
            ">=" => Self::Ge,
            "<>" => Self::Ne,
            "!=" => Self::NotEq,
            "<=>" => Self::NullSafeEq,
            "between" => Self::Between,
            "not between" => Self::NotBetween,
            "in" => Self::In,
            "not in" => Self::NotIn,
            "is" => Self::Is,
            "is not" => Self::IsNot,
            "like" => Self::Like,
            "not like" => Self::NotLike,
            _ => return Err(ConfigError::InvalidOperator(s.to_string())),
        };
        Ok(op)
    }
}

/// 连接两个谓词的逻辑运算。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Logic {
    #[default]
    And,
    Or,
    Xor,
}

impl Logic {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Xor => "XOR",
        }
    }
}

/// 逻辑连接词：`AND`/`OR`/`XOR`，可选附带 `NOT` 与 `EXISTS`。
///
/// 第一个谓词只输出修饰部分（`WHERE NOT ...`、`WHERE EXISTS ...`），
/// 连接运算本身由子句关键字代替。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Connective {
    pub logic: Logic,
    pub not: bool,
    pub exists: bool,
}

impl Connective {
    pub const AND: Connective = Connective::new(Logic::And);
    pub const OR: Connective = Connective::new(Logic::Or);
    pub const XOR: Connective = Connective::new(Logic::Xor);

    pub const fn new(logic: Logic) -> Self {
        Self {
            logic,
            not: false,
            exists: false,
        }
    }

    pub const fn negated(mut self) -> Self {
        self.not = true;
        self
    }

    pub const fn exists(mut self) -> Self {
        self.exists = true;
        self
    }

    /// 只含修饰部分，例如 `NOT EXISTS`；没有修饰时为 `None`。
    pub(crate) fn modifiers(self) -> Option<&'static str> {
        match (self.not, self.exists) {
            (false, false) => None,
            (true, false) => Some("NOT"),
            (false, true) => Some("EXISTS"),
            (true, true) => Some("NOT EXISTS"),
        }
    }

    pub(crate) fn to_sql(self) -> String {
        match self.modifiers() {
            Some(m) => format!("{} {m}", self.logic.as_sql()),
            None => self.logic.as_sql().to_string(),
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

impl FromStr for Connective {
    type Err = ConfigError;

    /// 解析 `and`、`or not`、`AND NOT EXISTS` 这类写法；省略逻辑运算时按 AND 处理。
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut c = Connective::AND;
        let mut words = s.split_whitespace().peekable();
        if let Some(first) = words.peek() {
            let logic = match first.to_ascii_uppercase().as_str() {
                "AND" => Some(Logic::And),
                "OR" => Some(Logic::Or),
                "XOR" => Some(Logic::Xor),
                _ => None,
            };
            if let Some(logic) = logic {
                c.logic = logic;
                words.next();
            }
        }
        for w in words {
            match w.to_ascii_uppercase().as_str() {
                "NOT" if !c.not && !c.exists => c.not = true,
                "EXISTS" if !c.exists => c.exists = true,
                _ => return Err(ConfigError::InvalidConnective(s.to_string())),
            }
        }
        Ok(c)
    }
}
