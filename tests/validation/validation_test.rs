#[cfg(test)]
mod tests {
    use ferry::expr::Expression;
    use ferry::job::{DataSource, MapStep, Mapping, MigrateItem, MigrationConfig};
    use ferry::load::{JoinCondition, LoadStep};
    use ferry::validation::{validate, ValidationError};

    fn config_with(item: MigrateItem) -> MigrationConfig {
        let mut config = MigrationConfig::new("job", "2024-03-01T00:00:00Z");
        config.migration.migrate_items.push(item);
        config
    }

    fn item(source: &str) -> MigrateItem {
        MigrateItem {
            source: DataSource {
                kind: "table".into(),
                names: vec![source.into()],
            },
            destination: DataSource {
                kind: "table".into(),
                names: vec![format!("{}_hist", source)],
            },
            ..MigrateItem::default()
        }
    }

    fn join(left_entity: &str, right_entity: &str) -> JoinCondition {
        JoinCondition {
            left: Expression::lookup(left_entity, "id"),
            right: Expression::lookup(right_entity, "id"),
        }
    }

    #[test]
    fn test_missing_job_name() {
        let errors = validate(&MigrationConfig::default());
        assert!(errors.contains(&ValidationError::MissingJobName));
    }

    #[test]
    fn test_missing_source_and_destination() {
        let config = config_with(MigrateItem::default());
        let errors = validate(&config);
        assert!(errors.contains(&ValidationError::MissingSource { item: 0 }));
        assert!(errors.contains(&ValidationError::MissingDestination { item: 0 }));
    }

    #[test]
    fn test_valid_join_chain_passes() {
        let mut it = item("orders");
        it.load = LoadStep {
            entities: vec!["customers".into(), "addresses".into()],
            matches: vec![
                // First join reaches back to the source.
                join("orders", "customers"),
                // Second join reaches back to the first join target.
                join("customers", "addresses"),
            ],
        };

        assert!(validate(&config_with(it)).is_empty());
    }

    #[test]
    fn test_forward_reference_is_flagged() {
        let mut it = item("orders");
        it.load = LoadStep {
            entities: vec!["customers".into(), "addresses".into()],
            matches: vec![
                // References "addresses", which is only defined one position
                // later in the chain.
                join("addresses", "customers"),
                join("customers", "addresses"),
            ],
        };

        let errors = validate(&config_with(it));
        assert!(errors.contains(&ValidationError::JoinForwardReference {
            item: 0,
            join: 0,
            entity: "addresses".into(),
        }));
    }

    #[test]
    fn test_unrelated_left_entity_is_flagged() {
        let mut it = item("orders");
        it.load = LoadStep {
            entities: vec!["customers".into()],
            matches: vec![join("warehouses", "customers")],
        };

        let errors = validate(&config_with(it));
        assert!(errors.contains(&ValidationError::JoinForwardReference {
            item: 0,
            join: 0,
            entity: "warehouses".into(),
        }));
    }

    #[test]
    fn test_misaligned_sequences_are_flagged() {
        let mut it = item("orders");
        it.load = LoadStep {
            entities: vec!["customers".into(), "addresses".into()],
            matches: vec![join("orders", "customers")],
        };

        let errors = validate(&config_with(it));
        assert!(errors.contains(&ValidationError::JoinMisaligned {
            item: 0,
            entities: 2,
            matches: 1,
        }));
    }

    #[test]
    fn test_join_target_mismatch_is_flagged() {
        let mut it = item("orders");
        it.load = LoadStep {
            entities: vec!["customers".into()],
            // Condition points at a different table than the join target.
            matches: vec![join("orders", "addresses")],
        };

        let errors = validate(&config_with(it));
        assert!(errors.contains(&ValidationError::JoinTargetMismatch {
            item: 0,
            join: 0,
            entity: "addresses".into(),
            expected: "customers".into(),
        }));
    }

    #[test]
    fn test_non_lookup_join_side_is_flagged() {
        let mut it = item("orders");
        it.load = LoadStep {
            entities: vec!["customers".into()],
            matches: vec![JoinCondition {
                left: Expression::lit_str("oops"),
                right: Expression::lookup("customers", "id"),
            }],
        };

        let errors = validate(&config_with(it));
        assert!(errors.contains(&ValidationError::JoinSideNotLookup { item: 0, join: 0 }));
    }

    #[test]
    fn test_mapping_target_checks() {
        let mut it = item("orders");
        it.map = MapStep {
            mappings: vec![
                Mapping {
                    source: Expression::lookup("orders", "id"),
                    target: "id".into(),
                },
                Mapping {
                    source: Expression::lookup("orders", "total"),
                    target: "".into(),
                },
                Mapping {
                    source: Expression::lookup("orders", "created"),
                    target: "id".into(),
                },
            ],
        };

        let errors = validate(&config_with(it));
        assert!(errors.contains(&ValidationError::EmptyMappingTarget { item: 0, mapping: 1 }));
        assert!(errors.contains(&ValidationError::DuplicateMappingTarget {
            item: 0,
            target: "id".into(),
        }));
    }

    #[test]
    fn test_all_findings_are_collected() {
        let mut config = MigrationConfig::default();
        config.migration.migrate_items.push(MigrateItem::default());

        let errors = validate(&config);
        // Name, source, and destination problems reported together.
        assert!(errors.len() >= 3);
    }
}
