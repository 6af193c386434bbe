#[cfg(test)]
mod tests {
    use ferry::schema::{flatten_table_metadata, ForeignKeyMetadata, TableMetadata};
    use std::collections::HashMap;

    fn table(name: &str) -> TableMetadata {
        TableMetadata {
            name: name.to_string(),
            ..TableMetadata::default()
        }
    }

    fn table_in(schema: &str, name: &str) -> TableMetadata {
        TableMetadata {
            name: name.to_string(),
            schema: Some(schema.to_string()),
            ..TableMetadata::default()
        }
    }

    fn fk(name: &str, column: &str, referenced: &str) -> ForeignKeyMetadata {
        ForeignKeyMetadata {
            name: name.to_string(),
            columns: vec![column.to_string()],
            referenced_schema: None,
            referenced_table: referenced.to_string(),
            referenced_columns: vec!["id".to_string()],
        }
    }

    #[test]
    fn test_mutually_referencing_tables_terminate() {
        // A and B each hold a foreign key to the other; the backend's
        // neighbor maps repeat the nodes at every hop.
        let mut a_inner = table("a");
        a_inner.referenced_tables.insert("b".into(), table("b"));

        let mut b = table("b");
        b.foreign_keys.insert("fk_b_a".into(), fk("fk_b_a", "a_id", "a"));
        b.referenced_tables.insert("a".into(), a_inner);

        let mut a = table("a");
        a.foreign_keys.insert("fk_a_b".into(), fk("fk_a_b", "b_id", "b"));
        a.referenced_tables.insert("b".into(), b.clone());
        a.referencing_tables.insert("b".into(), b.clone());

        let mut input = HashMap::new();
        input.insert("a".to_string(), a);
        input.insert("b".to_string(), b);

        let reachable = flatten_table_metadata(&input);

        // Exactly {a, b}, no duplicates, no runaway recursion.
        assert_eq!(reachable.len(), 2);
        assert!(reachable.contains_key("a"));
        assert!(reachable.contains_key("b"));
    }

    #[test]
    fn test_self_referencing_table_terminates() {
        let mut employees = table("employees");
        employees
            .foreign_keys
            .insert("fk_manager".into(), fk("fk_manager", "manager_id", "employees"));
        employees
            .referenced_tables
            .insert("employees".into(), table("employees"));
        employees
            .referencing_tables
            .insert("employees".into(), table("employees"));

        let mut input = HashMap::new();
        input.insert("employees".to_string(), employees);

        let reachable = flatten_table_metadata(&input);
        assert_eq!(reachable.len(), 1);
        assert!(reachable.contains_key("employees"));
    }

    #[test]
    fn test_closure_reaches_multi_hop_neighbors() {
        // order_items -> orders -> customers, only order_items given.
        let mut orders = table("orders");
        orders
            .referenced_tables
            .insert("customers".into(), table("customers"));

        let mut order_items = table("order_items");
        order_items.referenced_tables.insert("orders".into(), orders);

        let mut input = HashMap::new();
        input.insert("order_items".to_string(), order_items);

        let reachable = flatten_table_metadata(&input);
        assert_eq!(reachable.len(), 3);
        assert!(reachable.contains_key("customers"));
    }

    #[test]
    fn test_closure_keys_are_schema_qualified() {
        let mut orders = table_in("sales", "orders");
        orders
            .referenced_tables
            .insert("customers".into(), table_in("crm", "customers"));
        orders
            .referencing_tables
            .insert("order_items".into(), table("order_items"));

        let mut input = HashMap::new();
        input.insert("orders".to_string(), orders);

        let reachable = flatten_table_metadata(&input);
        assert_eq!(reachable.len(), 3);
        assert!(reachable.contains_key("sales.orders"));
        assert!(reachable.contains_key("crm.customers"));
        // No schema means the bare name is the id.
        assert!(reachable.contains_key("order_items"));
    }

    #[test]
    fn test_same_table_via_both_directions_appears_once() {
        let mut a = table("a");
        a.referenced_tables.insert("shared".into(), table("shared"));
        let mut b = table("b");
        b.referencing_tables.insert("shared".into(), table("shared"));

        let mut input = HashMap::new();
        input.insert("a".to_string(), a);
        input.insert("b".to_string(), b);

        let reachable = flatten_table_metadata(&input);
        assert_eq!(reachable.len(), 3);
        assert!(reachable.contains_key("shared"));
    }

    #[test]
    fn test_metadata_wire_shape_is_snake_case() {
        let json = r#"{
            "name": "orders",
            "schema": "sales",
            "columns": {
                "id": {"name": "id", "data_type": "bigint", "is_nullable": false}
            },
            "primary_keys": ["id"],
            "foreign_keys": {
                "fk_customer": {
                    "name": "fk_customer",
                    "columns": ["customer_id"],
                    "referenced_table": "customers",
                    "referenced_columns": ["id"]
                }
            }
        }"#;

        let metadata: TableMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.qualified_id(), "sales.orders");
        assert_eq!(metadata.primary_keys, vec!["id"]);
        assert_eq!(
            metadata.foreign_keys["fk_customer"].referenced_table,
            "customers"
        );
        assert!(metadata.referenced_tables.is_empty());
    }
}
