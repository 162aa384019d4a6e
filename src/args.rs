//! Bindings：按 SQL 片段分桶存放绑定值，保证与占位符的出现顺序一致。
//!
//! 组装 SQL 时片段按固定顺序拼接，`Bindings::all` 也必须按同样顺序拼接各桶，
//! 否则占位符与值会错位。

use crate::error::ConfigError;
use crate::modifiers::Arg;
use crate::value::SqlValue;
use crate::valuer::ValuerError;
use std::fmt;
use std::str::FromStr;

/// 绑定桶。声明顺序即 `all()` 的拼接顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Select,
    From,
    Join,
    Where,
    GroupBy,
    Having,
    Order,
    Union,
    UnionOrder,
}

impl Bucket {
    /// 规范顺序。
    pub const ALL: [Bucket; 9] = [
        Bucket::Select,
        Bucket::From,
        Bucket::Join,
        Bucket::Where,
        Bucket::GroupBy,
        Bucket::Having,
        Bucket::Order,
        Bucket::Union,
        Bucket::UnionOrder,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::From => "from",
            Self::Join => "join",
            Self::Where => "where",
            Self::GroupBy => "groupBy",
            Self::Having => "having",
            Self::Order => "order",
            Self::Union => "union",
            Self::UnionOrder => "unionOrder",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Bucket {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bucket::ALL
            .into_iter()
            .find(|b| b.name() == s)
            .ok_or_else(|| ConfigError::UnknownBucket(s.to_string()))
    }
}

/// 分桶的绑定值存储。
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    buckets: [Vec<Arg>; 9],
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add：Raw 不入桶（已经内联到 SQL），List 逐个展开，其余值追加一个。
    pub fn add(&mut self, arg: impl Into<Arg>, bucket: Bucket) {
        push_arg(&mut self.buckets[bucket.index()], arg.into());
    }

    /// 把已编译子查询的全部绑定（按其规范顺序）并入一个桶。
    pub fn absorb(&mut self, child: Bindings, bucket: Bucket) {
        let dst = &mut self.buckets[bucket.index()];
        for src in child.buckets {
            dst.extend(src);
        }
    }

    pub fn bucket(&self, bucket: Bucket) -> &[Arg] {
        &self.buckets[bucket.index()]
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// 按规范顺序拼接所有桶。
    pub fn all(&self) -> Vec<Arg> {
        let mut out = Vec::with_capacity(self.len());
        for b in Bucket::ALL {
            out.extend(self.buckets[b.index()].iter().cloned());
        }
        out
    }

    /// 求值 Valuer，得到交给驱动的最终值序列。
    pub fn resolve(&self) -> Result<Vec<SqlValue>, ValuerError> {
        let mut out = Vec::with_capacity(self.len());
        for b in Bucket::ALL {
            for arg in &self.buckets[b.index()] {
                match arg {
                    Arg::Value(v) => out.push(v.clone()),
                    Arg::Valuer(v) => out.push(v.value()?),
                    Arg::Raw(_) | Arg::List(_) => {}
                }
            }
        }
        Ok(out)
    }

    /// 片段被整体替换时，对应桶也要清空。
    pub(crate) fn clear(&mut self, bucket: Bucket) {
        self.buckets[bucket.index()].clear();
    }
}

fn push_arg(dst: &mut Vec<Arg>, arg: Arg) {
    match arg {
        Arg::Raw(_) => {}
        Arg::List(args) => {
            for a in args {
                push_arg(dst, a);
            }
        }
        v => dst.push(v),
    }
}
