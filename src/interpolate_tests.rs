#[cfg(test)]
mod tests {
    use crate::error::QueryError;
    use crate::flavor::{Flavor, InterpolateError};
    use crate::interpolate::interpolate;
    use crate::modifiers::Arg;
    use crate::query::QueryBuilder;
    use crate::value::SqlValue;
    use crate::valuer::{SqlValuer, ValuerError};
    use pretty_assertions::assert_eq;
    use time::macros::datetime;

    fn mysql(sql: &str, args: &[Arg]) -> Result<String, QueryError> {
        interpolate(sql, args, Flavor::MySQL, |s| Flavor::MySQL.quote_literal(s))
    }

    #[derive(Debug, Clone)]
    struct Failing;

    impl SqlValuer for Failing {
        fn value(&self) -> Result<SqlValue, ValuerError> {
            Err(ValuerError("clock unavailable".into()))
        }
    }

    #[test]
    fn replaces_placeholders_in_order() {
        let args = vec![
            Arg::from("I'm fine"),
            Arg::from(42_i64),
            Arg::from(true),
            Arg::from(SqlValue::Null),
        ];
        let q = mysql("SELECT * FROM a WHERE name = ? AND n = ? AND b = ? AND c IS ?", &args).unwrap();
        assert_eq!(
            q,
            "SELECT * FROM a WHERE name = 'I\\'m fine' AND n = 42 AND b = 1 AND c IS NULL"
        );
    }

    #[test]
    fn skips_question_marks_inside_quotes() {
        let q = mysql("SELECT '?', `a?` FROM t WHERE x = ?", &[Arg::from(7_i64)]).unwrap();
        assert_eq!(q, "SELECT '?', `a?` FROM t WHERE x = 7");
    }

    #[test]
    fn missing_args_is_an_error() {
        let err = mysql("a = ? AND b = ?", &[Arg::from(1_i64)]).unwrap_err();
        assert!(matches!(err, QueryError::Interpolate(InterpolateError::MissingArgs)));
    }

    #[test]
    fn extra_args_is_an_error() {
        let err = mysql("a = ?", &[Arg::from(1_i64), Arg::from(2_i64)]).unwrap_err();
        assert!(matches!(err, QueryError::Interpolate(InterpolateError::ExtraArgs)));
    }

    #[test]
    fn backslash_in_identifier_is_literal() {
        let q = mysql("`a\\` = ? AND `b` = ?", &[Arg::from(1_i64), Arg::from(2_i64)]).unwrap();
        assert_eq!(q, "`a\\` = 1 AND `b` = 2");

        let mut qb = QueryBuilder::with_flavor(Flavor::MySQL);
        qb.from("t").where_eq("a\\", 1).unwrap().where_eq("b", 2).unwrap();
        assert_eq!(
            qb.compile_debug().unwrap(),
            "SELECT * FROM `t` WHERE `a\\` = 1 AND `b` = 2"
        );
    }

    #[test]
    fn valuer_failure_propagates() {
        let boxed: Box<dyn SqlValuer> = Box::new(Failing);
        let err = mysql("a = ?", &[Arg::from(boxed)]).unwrap_err();
        assert!(matches!(err, QueryError::Valuer(_)));
    }

    #[test]
    fn bytes_and_datetime_by_flavor() {
        let dt = datetime!(2024-03-05 06:07:08.123456 UTC);
        let args = vec![Arg::from(vec![0xAB_u8, 0x01]), Arg::from(dt)];

        let q = mysql("?, ?", &args).unwrap();
        assert_eq!(q, "X'AB01', '2024-03-05 06:07:08.123456'");

        let q = interpolate("?, ?", &args, Flavor::SQLite, |s| Flavor::SQLite.quote_literal(s)).unwrap();
        assert_eq!(q, "X'AB01', '2024-03-05 06:07:08.123'");

        let q = interpolate("?", &args[..1], Flavor::SQLServer, |s| s.to_string()).unwrap();
        assert_eq!(q, "0xAB01");
    }

    #[test]
    fn compile_debug_renders_literals() {
        let mut qb = QueryBuilder::with_flavor(Flavor::MySQL);
        qb.from("users")
            .where_eq("name", "bob")
            .unwrap()
            .where_("active", "=", true)
            .unwrap()
            .where_in("id", [1_i64, 2])
            .unwrap();
        assert_eq!(
            qb.compile_debug().unwrap(),
            "SELECT * FROM `users` WHERE `name` = 'bob' AND `active` = 1 AND `id` IN (1,2)"
        );
    }

    #[test]
    fn compile_debug_uses_flavor_literal_quoting() {
        let mut qb = QueryBuilder::with_flavor(Flavor::PostgreSQL);
        qb.from("t").where_eq("s", "x").unwrap();
        assert_eq!(
            qb.compile_debug().unwrap(),
            "SELECT * FROM \"t\" WHERE \"s\" = E'x'"
        );
    }
}
