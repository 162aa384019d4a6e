//! Grammar：标识符包装与占位符生成，两者都是纯函数式的值变换。

use crate::flavor::Flavor;
use crate::modifiers::{Arg, Raw};

/// 单一占位符记号。生成器从不检查值类型，类型化绑定由驱动在执行期完成。
pub const PLACEHOLDER: &str = "?";

/// 标识符位置上可以出现的输入：普通名字或 Raw。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ident {
    Name(String),
    Raw(Raw),
}

impl From<&str> for Ident {
    fn from(v: &str) -> Self {
        Self::Name(v.to_string())
    }
}

impl From<String> for Ident {
    fn from(v: String) -> Self {
        Self::Name(v)
    }
}

impl From<&String> for Ident {
    fn from(v: &String) -> Self {
        Self::Name(v.clone())
    }
}

impl From<Raw> for Ident {
    fn from(v: Raw) -> Self {
        Self::Raw(v)
    }
}

/// 按 flavor 渲染标识符与参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grammar {
    flavor: Flavor,
}

impl Grammar {
    pub fn new(flavor: Flavor) -> Self {
        Self { flavor }
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// 包装一个标识符字符串。
    ///
    /// - `col` → `` `col` ``
    /// - `t.col` → `` `t`.`col` ``
    /// - `t.col as c`（大小写不敏感）→ `` `t`.`col` AS `c` ``
    /// - `*`、`t.*` 中的 `*` 保持原样
    pub fn wrap(&self, value: &str) -> String {
        if let Some(pos) = value.to_ascii_lowercase().find(" as ") {
            let (name, alias) = (&value[..pos], &value[pos + 4..]);
            return format!(
                "{} AS {}",
                self.wrap_segments(name.trim()),
                self.wrap_segments(alias.trim())
            );
        }
        self.wrap_segments(value)
    }

    fn wrap_segments(&self, value: &str) -> String {
        value
            .split('.')
            .map(|seg| {
                if seg == "*" {
                    seg.to_string()
                } else {
                    self.flavor.quote(seg)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Raw 原样返回；名字走 [`Grammar::wrap`]。
    pub fn wrap_ident(&self, ident: &Ident) -> String {
        match ident {
            Ident::Name(name) => self.wrap(name),
            Ident::Raw(raw) => raw.as_str().to_string(),
        }
    }

    /// 把参数变成占位符：Raw 输出其文本，List 逐个生成后以 `,` 连接，其余为 `?`。
    pub fn parameter(&self, arg: &Arg) -> String {
        match arg {
            Arg::Raw(raw) => raw.as_str().to_string(),
            Arg::List(args) => self.parameterize(args).join(","),
            Arg::Value(_) | Arg::Valuer(_) => PLACEHOLDER.to_string(),
        }
    }

    /// 逐个生成占位符。
    pub fn parameterize(&self, args: &[Arg]) -> Vec<String> {
        args.iter().map(|a| self.parameter(a)).collect()
    }
}
