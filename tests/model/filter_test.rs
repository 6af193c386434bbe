#[cfg(test)]
mod tests {
    use ferry::expr::{render, Expression, Literal};
    use ferry::filter::{build, flatten, FilterRow};

    /// Round-trip comparison ignores the ephemeral row ids.
    fn fields(rows: &[FilterRow]) -> Vec<(String, Option<String>, String, String)> {
        rows.iter()
            .map(|r| {
                (
                    r.entity.clone(),
                    r.column.clone(),
                    r.op.clone(),
                    r.value.clone(),
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_list_builds_to_none() {
        assert_eq!(build(&[]), None);
    }

    #[test]
    fn test_missing_expression_flattens_to_empty() {
        assert!(flatten(None).is_empty());
    }

    #[test]
    fn test_single_filter_is_a_bare_condition() {
        let rows = vec![FilterRow::new("users", Some("id".into()), "=", "5")];
        let expr = build(&rows).unwrap();

        // Not wrapped in AND.
        match &expr {
            Expression::Condition { op, left, right } => {
                assert_eq!(op, "=");
                assert_eq!(**left, Expression::lookup("users", "id"));
                assert_eq!(
                    **right,
                    Expression::Literal(Literal::String("5".to_string()))
                );
            }
            other => panic!("expected condition, got {:?}", other),
        }

        assert_eq!(render(Some(&expr)), "(users.id = '5')");
    }

    #[test]
    fn test_three_filters_round_trip_in_order() {
        let rows = vec![
            FilterRow::new("users", Some("id".into()), "=", "5"),
            FilterRow::new("users", Some("region".into()), "!=", "EU"),
            FilterRow::new("orders", Some("total".into()), ">", "100"),
        ];

        let expr = build(&rows).unwrap();
        let recovered = flatten(Some(&expr));

        // Oldest first, not newest first.
        assert_eq!(fields(&recovered), fields(&rows));
    }

    #[test]
    fn test_chain_nests_newest_at_the_top() {
        let rows = vec![
            FilterRow::new("t", Some("a".into()), "=", "1"),
            FilterRow::new("t", Some("b".into()), "=", "2"),
            FilterRow::new("t", Some("c".into()), "=", "3"),
        ];

        let expr = build(&rows).unwrap();

        // Top level: AND(<rest>, c-condition).
        let Expression::Condition { op, left, right } = &expr else {
            panic!("expected condition");
        };
        assert_eq!(op, "AND");
        assert!(matches!(
            right.as_ref(),
            Expression::Condition { left: l, .. }
                if **l == Expression::lookup("t", "c")
        ));
        // Next level down: AND(a-condition, b-condition).
        let Expression::Condition { op, left: inner_left, right: inner_right } = left.as_ref()
        else {
            panic!("expected nested condition");
        };
        assert_eq!(op, "AND");
        assert!(matches!(
            inner_left.as_ref(),
            Expression::Condition { left: l, .. }
                if **l == Expression::lookup("t", "a")
        ));
        assert!(matches!(
            inner_right.as_ref(),
            Expression::Condition { left: l, .. }
                if **l == Expression::lookup("t", "b")
        ));
    }

    #[test]
    fn test_arbitrary_operators_round_trip() {
        let rows = vec![
            FilterRow::new("users", Some("name".into()), "LIKE", "a%"),
            FilterRow::new("users", Some("id".into()), "NOT IN", "1,2,3"),
            FilterRow::new("users", Some("age".into()), "Equal", "30"),
        ];

        let expr = build(&rows).unwrap();
        assert_eq!(fields(&flatten(Some(&expr))), fields(&rows));
    }

    #[test]
    fn test_unpicked_column_round_trips() {
        let rows = vec![
            FilterRow::new("users", None, "=", "x"),
            FilterRow::new("users", Some("id".into()), "=", "1"),
        ];

        let expr = build(&rows).unwrap();
        assert_eq!(fields(&flatten(Some(&expr))), fields(&rows));
    }

    #[test]
    fn test_values_always_stored_as_strings() {
        // Numeric-looking input stays a string literal; the form edits text.
        let rows = vec![FilterRow::new("orders", Some("total".into()), ">", "100")];
        let expr = build(&rows).unwrap();

        let Expression::Condition { right, .. } = &expr else {
            panic!("expected condition");
        };
        assert_eq!(
            **right,
            Expression::Literal(Literal::String("100".to_string()))
        );
    }

    #[test]
    fn test_non_string_literals_degrade_to_text() {
        // A chain written by an older client can carry typed literals; they
        // flatten to their display text and round-trip as strings after.
        let expr = Expression::condition(
            "=",
            Expression::lookup("orders", "total"),
            Expression::lit_int(100),
        );
        let rows = flatten(Some(&expr));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, "100");
    }

    #[test]
    fn test_or_tree_flattens_as_single_row() {
        // OR is view-only; flatten treats a top-level OR as one simple
        // filter rather than walking it as a chain.
        let expr = Expression::condition(
            "=",
            Expression::lookup("u", "region"),
            Expression::lit_str("EU"),
        )
        .or(Expression::condition(
            "=",
            Expression::lookup("u", "region"),
            Expression::lit_str("US"),
        ));

        let rows = flatten(Some(&expr));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].op, "OR");
    }

    #[test]
    fn test_flatten_regenerates_ids() {
        let rows = vec![FilterRow::new("t", Some("a".into()), "=", "1")];
        let expr = build(&rows).unwrap();

        let first = flatten(Some(&expr));
        let second = flatten(Some(&expr));
        assert_ne!(first[0].id, second[0].id);
        assert_eq!(fields(&first), fields(&second));
    }
}
