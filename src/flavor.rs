//! SQL Flavor（方言）：控制标识符引号、随机排序函数、字面量转义等少量差异。

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard};

/// 支持的方言。也是驱动向 builder 报告的“驱动名”。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Flavor {
    #[default]
    MySQL,
    PostgreSQL,
    SQLite,
    SQLServer,
}

static DEFAULT_FLAVOR: AtomicU8 = AtomicU8::new(Flavor::MySQL as u8);
static DEFAULT_FLAVOR_LOCK: Mutex<()> = Mutex::new(());

impl Flavor {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::PostgreSQL,
            2 => Self::SQLite,
            3 => Self::SQLServer,
            _ => Self::MySQL,
        }
    }

    fn to_u8(self) -> u8 {
        self as u8
    }
}

/// 获取当前全局默认 Flavor（未注入驱动的 builder 使用）。
pub fn default_flavor() -> Flavor {
    Flavor::from_u8(DEFAULT_FLAVOR.load(Ordering::Relaxed))
}

/// 设置全局默认 Flavor，返回旧值。
pub fn set_default_flavor(flavor: Flavor) -> Flavor {
    let old = DEFAULT_FLAVOR.swap(flavor.to_u8(), Ordering::Relaxed);
    Flavor::from_u8(old)
}

/// 修改全局默认 Flavor 的 RAII guard（会持有一个全局锁，避免并行测试互相干扰）。
pub struct DefaultFlavorGuard {
    _lock: MutexGuard<'static, ()>,
    old: Flavor,
}

impl Drop for DefaultFlavorGuard {
    fn drop(&mut self) {
        set_default_flavor(self.old);
    }
}

/// 在一个作用域内临时设置 DefaultFlavor，并保证退出作用域后自动恢复。
pub fn set_default_flavor_scoped(flavor: Flavor) -> DefaultFlavorGuard {
    let lock = DEFAULT_FLAVOR_LOCK
        .lock()
        .unwrap_or_else(|e| e.into_inner());
    let old = set_default_flavor(flavor);
    DefaultFlavorGuard { _lock: lock, old }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MySQL => "MySQL",
            Self::PostgreSQL => "PostgreSQL",
            Self::SQLite => "SQLite",
            Self::SQLServer => "SQLServer",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InterpolateError {
    #[error("builder not enough args when interpolating")]
    MissingArgs,
    #[error("builder unsupported args when interpolating")]
    UnsupportedArgs,
    #[error("builder too many args when interpolating")]
    ExtraArgs,
}

impl Flavor {
    /// 标识符引号字符。
    pub fn quote_char(self) -> char {
        match self {
            Self::MySQL => '`',
            Self::PostgreSQL | Self::SQLite | Self::SQLServer => '"',
        }
    }

    /// 为单个标识符片段加引号，片段内的引号字符会被双写。
    pub fn quote(self, name: &str) -> String {
        let q = self.quote_char();
        let mut out = String::with_capacity(name.len() + 2);
        out.push(q);
        for ch in name.chars() {
            if ch == q {
                out.push(q);
            }
            out.push(ch);
        }
        out.push(q);
        out
    }

    /// `ORDER BY` 随机排序时使用的函数。
    pub fn random_function(self) -> &'static str {
        match self {
            Self::MySQL => "RAND()",
            Self::PostgreSQL | Self::SQLite => "RANDOM()",
            Self::SQLServer => "NEWID()",
        }
    }

    /// UNION 的每个分支是否需要加括号（SQLite 不接受带括号的复合 SELECT）。
    pub(crate) fn wraps_union_parts(self) -> bool {
        !matches!(self, Self::SQLite)
    }

    /// 把字符串渲染为字面量，仅用于调试输出。
    pub fn quote_literal(self, s: &str) -> String {
        let mut out = String::with_capacity(s.len() + 3);
        match self {
            Self::PostgreSQL => out.push('E'),
            Self::SQLServer => out.push('N'),
            _ => {}
        }

        out.push('\'');
        for ch in s.chars() {
            match ch {
                '\u{0000}' => out.push_str("\\0"),
                '\u{0008}' => out.push_str("\\b"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                '\u{001a}' => out.push_str("\\Z"),
                '\'' => match self {
                    Self::SQLite | Self::SQLServer => out.push_str("''"),
                    _ => out.push_str("\\'"),
                },
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                _ => out.push(ch),
            }
        }
        out.push('\'');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flavor_display() {
        let cases = vec![
            (Flavor::MySQL, "MySQL"),
            (Flavor::PostgreSQL, "PostgreSQL"),
            (Flavor::SQLite, "SQLite"),
            (Flavor::SQLServer, "SQLServer"),
        ];

        for (f, expected) in cases {
            assert_eq!(f.to_string(), expected);
        }
    }

    #[test]
    fn quote_doubles_embedded_quote_char() {
        assert_eq!(Flavor::MySQL.quote("user"), "`user`");
        assert_eq!(Flavor::MySQL.quote("we`ird"), "`we``ird`");
        assert_eq!(Flavor::PostgreSQL.quote("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn random_function_by_flavor() {
        assert_eq!(Flavor::MySQL.random_function(), "RAND()");
        assert_eq!(Flavor::PostgreSQL.random_function(), "RANDOM()");
        assert_eq!(Flavor::SQLite.random_function(), "RANDOM()");
        assert_eq!(Flavor::SQLServer.random_function(), "NEWID()");
    }

    #[test]
    fn quote_literal_escapes() {
        assert_eq!(Flavor::MySQL.quote_literal("I'm"), "'I\\'m'");
        assert_eq!(Flavor::SQLite.quote_literal("I'm"), "'I''m'");
        assert_eq!(Flavor::PostgreSQL.quote_literal("hi"), "E'hi'");
        assert_eq!(Flavor::SQLServer.quote_literal("x"), "N'x'");
    }

    #[test]
    fn scoped_default_swaps() {
        let _g = set_default_flavor_scoped(Flavor::SQLite);
        assert_eq!(default_flavor(), Flavor::SQLite);
        assert_eq!(set_default_flavor(Flavor::PostgreSQL), Flavor::SQLite);
        assert_eq!(default_flavor(), Flavor::PostgreSQL);
    }
}
