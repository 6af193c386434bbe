#[cfg(test)]
mod tests {
    use ferry::expr::{render, render_tree, Expression, FilterTreeNode, Literal};

    #[test]
    fn test_missing_expression_renders_na() {
        assert_eq!(render(None), "N/A");
    }

    #[test]
    fn test_literal_rendering() {
        assert_eq!(render(Some(&Expression::Literal(Literal::Boolean(true)))), "TRUE");
        assert_eq!(render(Some(&Expression::Literal(Literal::Boolean(false)))), "FALSE");
        assert_eq!(render(Some(&Expression::Literal(Literal::Null))), "NULL");
        assert_eq!(render(Some(&Expression::Literal(Literal::String("x".into())))), "'x'");
        assert_eq!(render(Some(&Expression::Literal(Literal::Integer(-7)))), "-7");
        assert_eq!(render(Some(&Expression::Literal(Literal::Float(2.5)))), "2.5");
    }

    #[test]
    fn test_lookup_rendering() {
        assert_eq!(render(Some(&Expression::lookup("orders", "total"))), "orders.total");
        assert_eq!(render(Some(&Expression::lookup_entity("orders"))), "orders.?");
    }

    #[test]
    fn test_arithmetic_named_operators_render_symbolic() {
        let cases = [
            ("Add", "+"),
            ("Subtract", "-"),
            ("Multiply", "*"),
            ("Divide", "/"),
        ];
        for (named, symbol) in cases {
            let expr = Expression::arith(
                Expression::lit_int(6),
                named,
                Expression::lit_int(3),
            );
            assert_eq!(render(Some(&expr)), format!("(6 {} 3)", symbol));
        }
    }

    #[test]
    fn test_arithmetic_symbolic_operator_passes_through() {
        let expr = Expression::arith(
            Expression::lookup("o", "price"),
            "*",
            Expression::lookup("o", "qty"),
        );
        assert_eq!(render(Some(&expr)), "(o.price * o.qty)");
    }

    #[test]
    fn test_function_call_rendering() {
        let no_args = Expression::func("NOW", vec![]);
        assert_eq!(render(Some(&no_args)), "NOW()");

        let nested = Expression::func(
            "ROUND",
            vec![
                Expression::arith(
                    Expression::lookup("o", "price"),
                    "Multiply",
                    Expression::lit_float(1.2),
                ),
                Expression::lit_int(2),
            ],
        );
        assert_eq!(render(Some(&nested)), "ROUND((o.price * 1.2), 2)");
    }

    #[test]
    fn test_condition_named_comparisons_render_symbolic() {
        let cases = [
            ("Equal", "="),
            ("NotEqual", "!="),
            ("GreaterThan", ">"),
            ("GreaterThanOrEqual", ">="),
            ("LessThan", "<"),
            ("LessThanOrEqual", "<="),
        ];
        for (named, symbol) in cases {
            let expr = Expression::condition(
                named,
                Expression::lookup("users", "id"),
                Expression::lit_str("5"),
            );
            assert_eq!(render(Some(&expr)), format!("(users.id {} '5')", symbol));
        }
    }

    #[test]
    fn test_condition_connectives_render_uppercase() {
        let expr = Expression::condition(
            "or",
            Expression::lit_bool(true),
            Expression::lit_bool(false),
        );
        assert_eq!(render(Some(&expr)), "(TRUE OR FALSE)");
    }

    #[test]
    fn test_unrecognized_operators_pass_through() {
        let expr = Expression::condition(
            "IS NOT NULL",
            Expression::lookup("users", "deleted_at"),
            Expression::lit_null(),
        );
        assert_eq!(render(Some(&expr)), "(users.deleted_at IS NOT NULL NULL)");
    }

    #[test]
    fn test_tree_leaf_for_simple_condition() {
        let expr = Expression::condition(
            ">",
            Expression::lookup("orders", "total"),
            Expression::lit_str("100"),
        );
        assert_eq!(
            render_tree(&expr),
            FilterTreeNode::Leaf("orders.total > '100'".to_string())
        );
    }

    #[test]
    fn test_tree_leaf_for_non_condition() {
        let expr = Expression::lookup("orders", "total");
        assert_eq!(
            render_tree(&expr),
            FilterTreeNode::Leaf("orders.total".to_string())
        );
    }

    #[test]
    fn test_tree_terminates_on_deep_and_chain() {
        // The filter builder nests newest-at-the-top; a long chain must
        // still render without issue.
        let mut expr = Expression::condition(
            "=",
            Expression::lookup("t", "c0"),
            Expression::lit_str("0"),
        );
        for i in 1..200 {
            expr = expr.and(Expression::condition(
                "=",
                Expression::lookup("t", format!("c{}", i)),
                Expression::lit_str(i.to_string()),
            ));
        }

        let text = render_tree(&expr).to_text();
        assert!(text.contains("AND"));
        assert!(text.contains("t.c0 = '0'"));
        assert!(text.contains("t.c199 = '199'"));
    }

    #[test]
    fn test_tree_mixed_connectives() {
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

        match render_tree(&expr) {
            FilterTreeNode::Branch { op, children } => {
                assert_eq!(op, "OR");
                assert_eq!(
                    children,
                    vec![
                        FilterTreeNode::Leaf("u.region = 'EU'".to_string()),
                        FilterTreeNode::Leaf("u.region = 'US'".to_string()),
                    ]
                );
            }
            other => panic!("expected branch, got {:?}", other),
        }
    }
}
