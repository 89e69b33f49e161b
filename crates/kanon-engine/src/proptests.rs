//! Property-based tests for the canonicalisation laws.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rustc_hash::FxHashMap;

    use kanon_core::{heads, ExprHandle, ExprNode, Head};

    use crate::config::Limits;
    use crate::defs::FunctionDef;
    use crate::engine::Engine;
    use crate::rewrite::{Rule, RuleSet};

    /// A buildable expression recipe, realised into a fresh engine per
    /// test case.
    #[derive(Clone, Debug)]
    enum Tree {
        Int(i64),
        Sym(u8),
        Add(Vec<Tree>),
        Mul(Vec<Tree>),
        Neg(Box<Tree>),
        Pow(Box<Tree>, u8),
    }

    fn tree_strategy() -> impl Strategy<Value = Tree> {
        let leaf = prop_oneof![
            (-20i64..20).prop_map(Tree::Int),
            (0u8..4).prop_map(Tree::Sym),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Tree::Add),
                prop::collection::vec(inner.clone(), 0..4).prop_map(Tree::Mul),
                inner.clone().prop_map(|t| Tree::Neg(Box::new(t))),
                (inner, 0u8..4).prop_map(|(t, e)| Tree::Pow(Box::new(t), e)),
            ]
        })
    }

    const SYMBOL_NAMES: [&str; 4] = ["x", "y", "z", "w"];

    fn realize(eng: &mut Engine, tree: &Tree) -> ExprHandle {
        match tree {
            Tree::Int(n) => eng.int(*n),
            Tree::Sym(i) => eng.symbol(SYMBOL_NAMES[*i as usize % SYMBOL_NAMES.len()]),
            Tree::Add(items) => {
                let ops: Vec<ExprHandle> = items.iter().map(|t| realize(eng, t)).collect();
                eng.add(&ops)
            }
            Tree::Mul(items) => {
                let ops: Vec<ExprHandle> = items.iter().map(|t| realize(eng, t)).collect();
                eng.mul(&ops)
            }
            Tree::Neg(inner) => {
                let op = realize(eng, inner);
                eng.neg(op)
            }
            Tree::Pow(base, exp) => {
                let b = realize(eng, base);
                let e = eng.int(i64::from(*exp));
                eng.pow(b, e)
            }
        }
    }

    /// No `Add`-in-`Add`, `Multiply`-in-`Multiply`, or `Sequence`
    /// operand anywhere.
    fn assert_flat(eng: &Engine, expr: ExprHandle) {
        if let ExprNode::Function { head, ops } = eng.node(expr) {
            let ops = ops.clone();
            if let Head::Sym(sym) = head {
                for &op in &ops {
                    assert_ne!(eng.head_sym(op), Some(heads::SEQUENCE));
                    if matches!(*sym, heads::ADD | heads::MULTIPLY) {
                        assert_ne!(eng.head_sym(op), Some(*sym), "unflattened operand");
                    }
                }
            }
            for op in ops {
                assert_flat(eng, op);
            }
        }
    }

    proptest! {
        #[test]
        fn canonical_is_idempotent(tree in tree_strategy()) {
            let mut eng = Engine::new();
            let raw = realize(&mut eng, &tree);
            let once = eng.canonical(raw);
            let twice = eng.canonical(once);
            prop_assert!(eng.is_same(once, twice));
        }

        #[test]
        fn canonical_is_flat(tree in tree_strategy()) {
            let mut eng = Engine::new();
            let raw = realize(&mut eng, &tree);
            let canonical = eng.canonical(raw);
            assert_flat(&eng, canonical);
        }

        #[test]
        fn commutative_operands_are_sorted(tree in tree_strategy()) {
            let mut eng = Engine::new();
            let raw = realize(&mut eng, &tree);
            let canonical = eng.canonical(raw);
            let mut stack = vec![canonical];
            while let Some(expr) = stack.pop() {
                if let ExprNode::Function { head: Head::Sym(sym), ops } = eng.node(expr) {
                    let ops = ops.clone();
                    if matches!(*sym, heads::ADD | heads::MULTIPLY) {
                        let multiplicative = *sym == heads::MULTIPLY;
                        for pair in ops.windows(2) {
                            prop_assert!(
                                eng.canonical_cmp(pair[0], pair[1], multiplicative)
                                    != std::cmp::Ordering::Greater,
                                "operands out of order"
                            );
                        }
                    }
                    stack.extend(ops);
                }
            }
        }

        #[test]
        fn interning_is_deterministic(tree in tree_strategy()) {
            let mut eng = Engine::new();
            let first = realize(&mut eng, &tree);
            let second = realize(&mut eng, &tree);
            prop_assert!(eng.is_same(first, second));
        }

        #[test]
        fn replace_terminates_at_the_iteration_limit(tree in tree_strategy(), budget in 1usize..12) {
            // An oscillating rule pair would rewrite forever; the
            // iteration limit must stop it after exactly `budget`
            // rewrites, which the parity of the final head exposes.
            let mut eng = Engine::new();
            let ping = eng.declare_function("ping", FunctionDef::new()).unwrap();
            let pong = eng.declare_function("pong", FunctionDef::new()).unwrap();
            let wa = eng.wildcard("a");
            let ping_a = eng.function(ping, &[wa]);
            let pong_a = eng.function(pong, &[wa]);
            let rules = RuleSet::from_rules(vec![
                Rule::new("ping-to-pong", ping_a, pong_a),
                Rule::new("pong-to-ping", pong_a, ping_a),
            ]);
            eng.set_limits(Limits {
                iteration_limit: budget,
                ..Limits::default()
            });
            let inner = realize(&mut eng, &tree);
            let subject = eng.function(ping, &[inner]);
            let result = eng.replace(subject, &rules).unwrap().unwrap();
            let expected = if budget % 2 == 1 { pong } else { ping };
            prop_assert_eq!(eng.head_sym(result), Some(expected));
        }

        #[test]
        fn pattern_matching_is_idempotent(t1 in tree_strategy(), t2 in tree_strategy()) {
            // If match(p, s) = σ, then matching p against p[σ] yields σ
            // again, repeated captures included.
            let mut eng = Engine::new();
            let first = realize(&mut eng, &t1);
            let second = realize(&mut eng, &t2);
            let wa = eng.wildcard("a");
            let wb = eng.wildcard("b");
            let inner_pattern = eng.add(&[wa, wb]);
            let pattern = eng.mul(&[wa, inner_pattern]);
            let inner_subject = eng.add(&[first, second]);
            let subject = eng.mul(&[first, inner_subject]);

            let bindings = eng
                .match_pattern(subject, pattern, None)
                .expect("the subject instantiates the pattern's shape");
            let image = eng.instantiate_raw(pattern, &bindings);
            prop_assert!(eng.is_same(image, subject));
            let again = eng
                .match_pattern(image, pattern, None)
                .expect("the image must match its own pattern");
            prop_assert_eq!(again.len(), bindings.len());
            prop_assert_eq!(again.get("a"), bindings.get("a"));
            prop_assert_eq!(again.get("b"), bindings.get("b"));
        }

        #[test]
        fn substitution_commutes_with_canonicalisation(tree in tree_strategy(), value in -10i64..10) {
            let mut eng = Engine::new();
            let raw = realize(&mut eng, &tree);
            let replacement = eng.int(value);
            let x = eng.arena().find_symbol("x");
            let Some(x) = x else { return Ok(()); };
            let mut map = FxHashMap::default();
            map.insert(x, replacement);

            let substituted_first = eng.subs(raw, &map);
            let canonical = eng.canonical(raw);
            let substituted_second = eng.subs(canonical, &map);
            prop_assert!(
                eng.is_same(substituted_first, substituted_second),
                "{} vs {}",
                eng.repr(substituted_first),
                eng.repr(substituted_second)
            );
        }
    }
}
