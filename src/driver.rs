//! Driver：执行层的注入点。构建器只负责生成 SQL 和绑定，预编译与执行交给驱动。

use crate::error::{ExecutionError, Result};
use crate::flavor::Flavor;
use crate::query::QueryBuilder;
use crate::value::SqlValue;
use std::fmt::Debug;

/// 数据库驱动。
pub trait Driver: Debug {
    /// 驱动对应的方言，决定标识符引号与随机排序函数。
    fn flavor(&self) -> Flavor;

    /// 字符串字面量渲染，只用于 `compile_debug`。
    fn quote_literal(&self, s: &str) -> String {
        self.flavor().quote_literal(s)
    }

    fn prepare(&self, sql: &str) -> Result<Box<dyn Statement + '_>, ExecutionError>;
}

/// 预编译语句。
pub trait Statement {
    /// 按位置绑定并执行，返回受影响行数。
    fn execute(&mut self, params: &[SqlValue]) -> Result<u64, ExecutionError>;
}

impl QueryBuilder {
    /// 编译、预编译并执行。驱动返回的错误原样透传。
    pub fn execute(&self) -> Result<u64> {
        let driver = self.driver.as_ref().ok_or(ExecutionError::NoDriver)?;
        let sql = self.compile();
        let params = self.bindings.resolve()?;

        tracing::debug!(
            target: "halo_query::sql",
            flavor = %self.flavor(),
            param_count = params.len(),
            sql = %sql,
            "execute"
        );

        let result = driver
            .prepare(&sql)
            .and_then(|mut stmt| stmt.execute(&params));
        match result {
            Ok(affected) => Ok(affected),
            Err(err) => {
                tracing::warn!(target: "halo_query::sql", sql = %sql, error = %err, "driver error");
                Err(err.into())
            }
        }
    }
}
