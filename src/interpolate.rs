//! 调试渲染：把 SQL 中的 `?` 依次替换为绑定值的字面量。
//!
//! 安全警告：结果只用于日志与排错，永远不要拿去执行。

use crate::error::Result;
use crate::flavor::{Flavor, InterpolateError};
use crate::modifiers::Arg;
use crate::query::QueryBuilder;
use crate::value::SqlValue;
use time::OffsetDateTime;
use time::macros::format_description;

impl QueryBuilder {
    /// 编译并内联所有绑定。字符串字面量优先使用驱动的 `quote_literal`。
    pub fn compile_debug(&self) -> Result<String> {
        let sql = self.compile();
        let args = self.all_bindings();
        let flavor = self.flavor();
        match &self.driver {
            Some(driver) => interpolate(&sql, &args, flavor, |s| driver.quote_literal(s)),
            None => interpolate(&sql, &args, flavor, |s| flavor.quote_literal(s)),
        }
    }
}

/// 扫描 `sql`，跳过引号内的内容，逐个替换占位符。
///
/// 反斜杠只在字符串字面量里转义；标识符引号内的 `\` 是普通字符。
/// 占位符与参数个数必须一致。
pub fn interpolate<Q>(sql: &str, args: &[Arg], flavor: Flavor, quote: Q) -> Result<String>
where
    Q: Fn(&str) -> String,
{
    let mut out = String::with_capacity(sql.len() + args.len() * 8);
    let mut quoted: Option<char> = None;
    let mut escaping = false;
    let mut idx = 0usize;

    for c in sql.chars() {
        if escaping {
            out.push(c);
            escaping = false;
            continue;
        }

        match c {
            '\\' if quoted == Some('\'') => {
                out.push(c);
                escaping = true;
            }
            '\'' | '"' | '`' => {
                if quoted == Some(c) {
                    quoted = None;
                } else if quoted.is_none() {
                    quoted = Some(c);
                }
                out.push(c);
            }
            '?' if quoted.is_none() => {
                let arg = args.get(idx).ok_or(InterpolateError::MissingArgs)?;
                encode_arg(&mut out, arg, flavor, &quote)?;
                idx += 1;
            }
            _ => out.push(c),
        }
    }

    if idx != args.len() {
        return Err(InterpolateError::ExtraArgs.into());
    }
    Ok(out)
}

fn encode_arg<Q>(out: &mut String, arg: &Arg, flavor: Flavor, quote: &Q) -> Result<()>
where
    Q: Fn(&str) -> String,
{
    match arg {
        Arg::Value(v) => encode_value(out, v, flavor, quote),
        Arg::Valuer(v) => {
            let v = v.value()?;
            encode_value(out, &v, flavor, quote)
        }
        Arg::Raw(_) | Arg::List(_) => Err(InterpolateError::UnsupportedArgs.into()),
    }
}

fn encode_value<Q>(out: &mut String, v: &SqlValue, flavor: Flavor, quote: &Q) -> Result<()>
where
    Q: Fn(&str) -> String,
{
    match v {
        SqlValue::Null => out.push_str("NULL"),
        SqlValue::Bool(b) => out.push(if *b { '1' } else { '0' }),
        SqlValue::I64(n) => out.push_str(&n.to_string()),
        SqlValue::U64(n) => out.push_str(&n.to_string()),
        SqlValue::F64(n) => out.push_str(&n.to_string()),
        SqlValue::String(s) => out.push_str(&quote(s)),
        SqlValue::Bytes(b) => encode_bytes(out, b, flavor),
        SqlValue::DateTime(dt) => encode_datetime(out, dt, flavor)?,
    }
    Ok(())
}

fn encode_bytes(out: &mut String, data: &[u8], flavor: Flavor) {
    if data.is_empty() {
        out.push_str("NULL");
        return;
    }

    match flavor {
        Flavor::MySQL | Flavor::SQLite => {
            out.push_str("X'");
            push_hex(out, data);
            out.push('\'');
        }
        Flavor::PostgreSQL => {
            out.push_str("E'\\\\x");
            push_hex(out, data);
            out.push_str("'::bytea");
        }
        Flavor::SQLServer => {
            out.push_str("0x");
            push_hex(out, data);
        }
    }
}

fn push_hex(out: &mut String, data: &[u8]) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    for &b in data {
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0xF) as usize] as char);
    }
}

fn encode_datetime(out: &mut String, dt: &OffsetDateTime, flavor: Flavor) -> Result<(), InterpolateError> {
    let formatted = match flavor {
        Flavor::SQLite => dt.format(format_description!(
            "'[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]'"
        )),
        Flavor::SQLServer => dt.format(format_description!(
            "'[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:6] [offset_hour sign:mandatory]:[offset_minute]'"
        )),
        Flavor::MySQL | Flavor::PostgreSQL => dt.format(format_description!(
            "'[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:6]'"
        )),
    };
    let s = formatted.map_err(|_| InterpolateError::UnsupportedArgs)?;
    out.push_str(&s);
    Ok(())
}
