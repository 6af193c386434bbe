#[cfg(test)]
mod tests {
    use ferry::expr::Expression;
    use ferry::load::{JoinSide, LoadStep};

    fn tables() -> Vec<String> {
        vec![
            "orders".to_string(),
            "customers".to_string(),
            "order_items".to_string(),
        ]
    }

    fn lookup_parts(expr: &Expression) -> (&str, Option<&str>) {
        match expr {
            Expression::Lookup { entity, field } => (entity.as_str(), field.as_deref()),
            other => panic!("expected lookup, got {:?}", other),
        }
    }

    #[test]
    fn test_add_join_defaults_to_first_available() {
        let mut load = LoadStep::new();
        assert!(load.add_join("orders", &tables()));

        assert_eq!(load.entities, vec!["customers"]);
        assert_eq!(load.matches.len(), 1);

        // Both sides start column-less: source on the left, target on the right.
        assert_eq!(lookup_parts(&load.matches[0].left), ("orders", None));
        assert_eq!(lookup_parts(&load.matches[0].right), ("customers", None));
    }

    #[test]
    fn test_add_join_without_candidates_is_a_noop() {
        let mut load = LoadStep::new();
        load.add_join("orders", &tables());
        load.add_join("orders", &tables());

        // Source and both targets are used now.
        assert!(!load.add_join("orders", &tables()));
        assert_eq!(load.len(), 2);
    }

    #[test]
    fn test_available_targets_excludes_source_and_used() {
        let mut load = LoadStep::new();
        assert_eq!(
            load.available_targets("orders", &tables()),
            vec!["customers", "order_items"]
        );

        load.add_join("orders", &tables());
        assert_eq!(load.available_targets("orders", &tables()), vec!["order_items"]);
    }

    #[test]
    fn test_table_swap_resets_both_columns() {
        let mut load = LoadStep::new();
        load.add_join("orders", &tables());
        load.set_join_column(0, JoinSide::Left, "customer_id");
        load.set_join_column(0, JoinSide::Right, "id");

        load.set_join_table(0, "order_items");

        assert_eq!(load.entities, vec!["order_items"]);
        // A column picked for the old table may not exist on the new one.
        assert_eq!(lookup_parts(&load.matches[0].left), ("orders", None));
        assert_eq!(lookup_parts(&load.matches[0].right), ("order_items", None));
    }

    #[test]
    fn test_set_join_entity_resets_that_sides_column() {
        let mut load = LoadStep::new();
        load.add_join("orders", &tables());
        load.set_join_column(0, JoinSide::Left, "customer_id");
        load.set_join_column(0, JoinSide::Right, "id");

        load.set_join_entity(0, JoinSide::Left, "customers");

        assert_eq!(lookup_parts(&load.matches[0].left), ("customers", None));
        // The other side keeps its selection.
        assert_eq!(lookup_parts(&load.matches[0].right), ("customers", Some("id")));
    }

    #[test]
    fn test_set_join_column() {
        let mut load = LoadStep::new();
        load.add_join("orders", &tables());

        load.set_join_column(0, JoinSide::Left, "customer_id");
        load.set_join_column(0, JoinSide::Right, "id");

        assert_eq!(
            lookup_parts(&load.matches[0].left),
            ("orders", Some("customer_id"))
        );
        assert_eq!(lookup_parts(&load.matches[0].right), ("customers", Some("id")));
    }

    #[test]
    fn test_remove_join_keeps_sequences_aligned() {
        let mut load = LoadStep::new();
        load.add_join("orders", &tables());
        load.add_join("orders", &tables());

        load.remove_join(0);

        assert_eq!(load.entities, vec!["order_items"]);
        assert_eq!(load.matches.len(), 1);
        assert_eq!(lookup_parts(&load.matches[0].right), ("order_items", None));
    }

    #[test]
    fn test_out_of_range_operations_do_not_panic() {
        let mut load = LoadStep::new();
        load.set_join_table(0, "customers");
        load.set_join_entity(5, JoinSide::Right, "customers");
        load.set_join_column(5, JoinSide::Left, "id");
        load.remove_join(9);
        assert!(load.is_empty());
    }
}
