#[cfg(test)]
mod tests {
    use crate::args::Bucket;
    use crate::error::ConfigError;
    use crate::flavor::{Flavor, set_default_flavor_scoped};
    use crate::modifiers::{Arg, raw};
    use crate::query::{JoinOption, QueryBuilder, RANDOM_ORDER};
    use crate::{idents, Ident};
    use pretty_assertions::assert_eq;

    fn mysql() -> QueryBuilder {
        QueryBuilder::with_flavor(Flavor::MySQL)
    }

    fn args<const N: usize>(values: [i64; N]) -> Vec<Arg> {
        values.into_iter().map(Arg::from).collect()
    }

    #[test]
    fn select_defaults_to_star() {
        let mut qb = mysql();
        qb.from("users");
        assert_eq!(qb.compile(), "SELECT * FROM `users`");
    }

    #[test]
    fn select_wraps_columns_and_aliases() {
        let mut qb = mysql();
        qb.select(["id", "u.name AS n", "u.*"]).from("users AS u");
        assert_eq!(
            qb.compile(),
            "SELECT `id`, `u`.`name` AS `n`, `u`.* FROM `users` AS `u`"
        );
    }

    #[test]
    fn select_mixed_raw_and_names() {
        let mut qb = mysql();
        qb.select(idents!["id", raw("COUNT(*) AS n")])
            .from("users")
            .group_by(vec![Ident::from("id")]);
        assert_eq!(
            qb.compile(),
            "SELECT `id`, COUNT(*) AS n FROM `users` GROUP BY `id`"
        );
    }

    #[test]
    fn select_replaces_and_add_select_appends() {
        let mut qb = mysql();
        qb.select_raw("? AS tag", ["x"]).from("t");
        assert_eq!(qb.bindings().bucket(Bucket::Select).len(), 1);

        qb.select(["a"]).add_select(["b"]);
        assert_eq!(qb.compile(), "SELECT `a`, `b` FROM `t`");
        assert!(qb.all_bindings().is_empty());
    }

    #[test]
    fn distinct() {
        let mut qb = mysql();
        qb.distinct().select(["name"]).from("users");
        assert_eq!(qb.compile(), "SELECT DISTINCT `name` FROM `users`");
    }

    #[test]
    fn select_subquery_with_alias() {
        let mut qb = mysql();
        qb.select(["id"])
            .select_sub(
                |q| {
                    q.select_raw("COUNT(*)", Vec::<Arg>::new())
                        .from("orders")
                        .where_eq("status", 1)
                },
                "cnt",
            )
            .unwrap()
            .from("users")
            .where_eq("active", 2)
            .unwrap();
        assert_eq!(
            qb.compile(),
            "SELECT `id`, (SELECT COUNT(*) FROM `orders` WHERE `status` = ?) AS `cnt` FROM `users` WHERE `active` = ?"
        );
        assert_eq!(qb.all_bindings(), args([1, 2]));
    }

    #[test]
    fn from_subquery_requires_alias() {
        let mut qb = mysql();
        let err = qb.from_sub(|q| Ok(q.from("users")), "").unwrap_err();
        assert_eq!(err.as_config(), Some(&ConfigError::MissingAlias));

        let err = qb.select_sub(|q| Ok(q.from("users")), "  ").unwrap_err();
        assert_eq!(err.as_config(), Some(&ConfigError::MissingAlias));

        qb.from_sub(|q| q.from("users").where_eq("active", true), "u")
            .unwrap()
            .where_eq("u.id", 3)
            .unwrap();
        assert_eq!(
            qb.compile(),
            "SELECT * FROM (SELECT * FROM `users` WHERE `active` = ?) AS `u` WHERE `u`.`id` = ?"
        );
        assert_eq!(qb.all_bindings(), vec![Arg::from(true), Arg::from(3_i64)]);
    }

    #[test]
    fn from_raw_replaces_bindings() {
        let mut qb = mysql();
        qb.from_raw("generate_series(?, ?) AS s", [1_i64, 10]);
        assert_eq!(qb.compile(), "SELECT * FROM generate_series(?, ?) AS s");
        assert_eq!(qb.all_bindings(), args([1, 10]));

        qb.from("t");
        assert!(qb.all_bindings().is_empty());
    }

    #[test]
    fn joins() {
        let mut qb = mysql();
        qb.from("users AS u")
            .join("orders AS o", "o.user_id", "=", "u.id")
            .unwrap()
            .left_join("profiles", "profiles.user_id", "=", "u.id")
            .unwrap()
            .right_join("teams", "teams.id", "<>", "u.team_id")
            .unwrap()
            .cross_join("regions");
        assert_eq!(
            qb.compile(),
            "SELECT * FROM `users` AS `u` INNER JOIN `orders` AS `o` ON `o`.`user_id` = `u`.`id` LEFT JOIN `profiles` ON `profiles`.`user_id` = `u`.`id` RIGHT JOIN `teams` ON `teams`.`id` <> `u`.`team_id` CROSS JOIN `regions`"
        );
    }

    #[test]
    fn join_operator_must_be_comparison() {
        let mut qb = mysql();
        let err = qb.join("orders", "a", "in", "b").unwrap_err();
        assert_eq!(
            err.as_config(),
            Some(&ConfigError::InvalidOperator("in".into()))
        );
        qb.from("users");
        assert_eq!(qb.compile(), "SELECT * FROM `users`");
    }

    #[test]
    fn join_where_binds_into_join_bucket() {
        let mut qb = mysql();
        qb.from("users")
            .where_eq("users.active", 1)
            .unwrap()
            .join_where(JoinOption::LeftOuterJoin, "orders", "orders.status", "=", "paid")
            .unwrap();
        assert_eq!(
            qb.compile(),
            "SELECT * FROM `users` LEFT OUTER JOIN `orders` ON `orders`.`status` = ? WHERE `users`.`active` = ?"
        );
        assert_eq!(qb.all_bindings(), vec![Arg::from("paid"), Arg::from(1_i64)]);
        assert_eq!(qb.bindings().bucket(Bucket::Join).len(), 1);
    }

    #[test]
    fn join_subquery() {
        let mut qb = mysql();
        qb.from("users")
            .join_sub(
                JoinOption::InnerJoin,
                |q| {
                    q.select(["user_id"])
                        .from("orders")
                        .where_("total", ">", 100)
                },
                "o",
                "o.user_id",
                "=",
                "users.id",
            )
            .unwrap();
        assert_eq!(
            qb.compile(),
            "SELECT * FROM `users` INNER JOIN (SELECT `user_id` FROM `orders` WHERE `total` > ?) AS `o` ON `o`.`user_id` = `users`.`id`"
        );
        assert_eq!(qb.bindings().bucket(Bucket::Join), &args([100])[..]);
    }

    #[test]
    fn group_by_raw_binds() {
        let mut qb = mysql();
        qb.from("t")
            .group_by(["a"])
            .group_by_raw("DATE_FORMAT(created_at, ?)", ["%Y"]);
        assert_eq!(
            qb.compile(),
            "SELECT * FROM `t` GROUP BY `a`, DATE_FORMAT(created_at, ?)"
        );
        assert_eq!(qb.bindings().bucket(Bucket::GroupBy).len(), 1);
    }

    #[test]
    fn order_by_directions() {
        let mut qb = mysql();
        qb.from("t")
            .order_by("a", "asc")
            .unwrap()
            .order_by_desc("b")
            .unwrap()
            .order_by_raw("FIELD(c, ?, ?)", [3_i64, 1]);
        assert_eq!(
            qb.compile(),
            "SELECT * FROM `t` ORDER BY `a` ASC, `b` DESC, FIELD(c, ?, ?)"
        );
        assert_eq!(qb.bindings().bucket(Bucket::Order), &args([3, 1])[..]);
    }

    #[test]
    fn order_by_invalid_direction() {
        let mut qb = mysql();
        let err = qb.order_by("a", "up").unwrap_err();
        assert_eq!(
            err.as_config(),
            Some(&ConfigError::InvalidDirection {
                column: "a".into(),
                direction: "up".into()
            })
        );

        assert!(qb.order_by("a", "").is_err());
        assert!(qb.order_by(RANDOM_ORDER, "asc").is_err());
        assert_eq!(qb.compile(), "SELECT *");
    }

    #[test]
    fn random_order_per_flavor() {
        let cases = [
            (Flavor::MySQL, "SELECT * ORDER BY RAND()"),
            (Flavor::PostgreSQL, "SELECT * ORDER BY RANDOM()"),
            (Flavor::SQLite, "SELECT * ORDER BY RANDOM()"),
            (Flavor::SQLServer, "SELECT * ORDER BY NEWID()"),
        ];
        for (flavor, expected) in cases {
            let mut qb = QueryBuilder::with_flavor(flavor);
            qb.order_by(RANDOM_ORDER, "").unwrap();
            assert_eq!(qb.compile(), expected);

            let mut qb = QueryBuilder::with_flavor(flavor);
            qb.order_by_rand();
            assert_eq!(qb.compile(), expected);
        }
    }

    #[test]
    fn limit_and_offset_are_inlined() {
        let mut qb = mysql();
        qb.from("t").limit(10).offset(20);
        assert_eq!(qb.compile(), "SELECT * FROM `t` LIMIT 10 OFFSET 20");
        assert!(qb.all_bindings().is_empty());
    }

    #[test]
    fn clause_order_is_fixed() {
        let mut qb = mysql();
        qb.limit(5)
            .order_by("id", "desc")
            .unwrap()
            .having("cnt", ">", 1)
            .unwrap()
            .group_by(["id"])
            .where_eq("a", 2)
            .unwrap()
            .join("b", "b.id", "=", "a.b_id")
            .unwrap()
            .from("a")
            .select(["id"]);
        assert_eq!(
            qb.compile(),
            "SELECT `id` FROM `a` INNER JOIN `b` ON `b`.`id` = `a`.`b_id` WHERE `a` = ? GROUP BY `id` HAVING `cnt` > ? ORDER BY `id` DESC LIMIT 5"
        );
        assert_eq!(qb.all_bindings(), args([2, 1]));
    }

    #[test]
    fn unions_are_parenthesized() {
        let mut qb = mysql();
        qb.from("a")
            .where_eq("x", 1)
            .unwrap()
            .union_all(|q| q.from("b").where_eq("y", 2))
            .unwrap()
            .union(|q| Ok(q.from("c")))
            .unwrap()
            .union_order_by("id", "desc")
            .unwrap()
            .union_order_by_raw("FIELD(id, ?)", [9_i64])
            .union_limit(10)
            .union_offset(5);
        assert_eq!(
            qb.compile(),
            "(SELECT * FROM `a` WHERE `x` = ?) UNION ALL (SELECT * FROM `b` WHERE `y` = ?) UNION (SELECT * FROM `c`) ORDER BY `id` DESC, FIELD(id, ?) LIMIT 10 OFFSET 5"
        );
        assert_eq!(qb.all_bindings(), args([1, 2, 9]));
    }

    #[test]
    fn sqlite_unions_are_bare() {
        let mut qb = QueryBuilder::with_flavor(Flavor::SQLite);
        qb.from("a").union(|q| Ok(q.from("b"))).unwrap();
        assert_eq!(
            qb.compile(),
            "SELECT * FROM \"a\" UNION SELECT * FROM \"b\""
        );
    }

    #[test]
    fn sqlite_union_parts_with_tail_become_derived_tables() {
        let mut qb = QueryBuilder::with_flavor(Flavor::SQLite);
        qb.from("a")
            .limit(1)
            .union(|q| Ok(q.from("b")))
            .unwrap()
            .union_all(|q| Ok(q.from("c").order_by("id", "desc")?.limit(2)))
            .unwrap();
        assert_eq!(
            qb.compile(),
            "SELECT * FROM (SELECT * FROM \"a\" LIMIT 1) UNION SELECT * FROM \"b\" \
             UNION ALL SELECT * FROM (SELECT * FROM \"c\" ORDER BY \"id\" DESC LIMIT 2)"
        );
    }

    #[test]
    fn whitespace_is_collapsed() {
        let mut qb = mysql();
        qb.select_raw("  a   +\n b ", Vec::<Arg>::new())
            .from("t")
            .where_raw("x  =   ?", [1_i64])
            .unwrap();
        assert_eq!(qb.compile(), "SELECT a + b FROM `t` WHERE x = ?");
    }

    #[test]
    fn flavor_controls_quoting() {
        let mut qb = QueryBuilder::with_flavor(Flavor::PostgreSQL);
        qb.select(["t.id"]).from("t").where_eq("t.a", 1).unwrap();
        assert_eq!(
            qb.compile(),
            "SELECT \"t\".\"id\" FROM \"t\" WHERE \"t\".\"a\" = ?"
        );
    }

    #[test]
    fn set_flavor_returns_previous() {
        let mut qb = mysql();
        assert_eq!(qb.set_flavor(Flavor::SQLServer), Flavor::MySQL);
        assert_eq!(qb.flavor(), Flavor::SQLServer);
        qb.from("t");
        assert_eq!(qb.compile(), "SELECT * FROM \"t\"");
    }

    #[test]
    fn new_uses_default_flavor() {
        let _g = set_default_flavor_scoped(Flavor::PostgreSQL);
        let mut qb = QueryBuilder::new();
        qb.from("t");
        assert_eq!(qb.flavor(), Flavor::PostgreSQL);
        assert_eq!(qb.compile(), "SELECT * FROM \"t\"");
    }

    #[test]
    fn add_binding_targets_bucket() {
        let mut qb = mysql();
        qb.from_raw("t AS t", Vec::<Arg>::new())
            .add_binding(5_i64, Bucket::From)
            .add_binding(raw("NOW()"), Bucket::From);
        assert_eq!(qb.bindings().bucket(Bucket::From), &args([5])[..]);
    }
}
