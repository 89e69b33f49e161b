//! Property-based tests for the kernel value types.

#[cfg(test)]
mod tests {
    use num_traits::Zero;
    use proptest::prelude::*;

    use crate::{Integer, NumericValue, Rational};

    fn small_int() -> impl Strategy<Value = i64> {
        -500i64..500i64
    }

    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-500i64..=-1i64), (1i64..=500i64)]
    }

    fn rational() -> impl Strategy<Value = Rational> {
        (small_int(), non_zero_int()).prop_map(|(n, d)| Rational::from_i64(n, d))
    }

    proptest! {
        #[test]
        fn rational_add_commutative(a in rational(), b in rational()) {
            prop_assert_eq!(&a + &b, &b + &a);
        }

        #[test]
        fn rational_mul_distributes(a in rational(), b in rational(), c in rational()) {
            let sum = &b + &c;
            let left = &a * &sum;
            let ab = &a * &b;
            let ac = &a * &c;
            prop_assert_eq!(left, &ab + &ac);
        }

        #[test]
        fn rational_recip_inverts(a in rational()) {
            if !a.is_zero() {
                prop_assert_eq!(&a * &a.recip(), Rational::from_i64(1, 1));
            }
        }

        #[test]
        fn rational_denominator_positive(a in rational()) {
            prop_assert!(!a.denominator().is_negative());
        }

        #[test]
        fn integer_sqrt_exact_roundtrip(n in 0i64..30_000) {
            let squared = Integer::new(n) * Integer::new(n);
            prop_assert_eq!(squared.sqrt_exact(), Some(Integer::new(n)));
        }

        #[test]
        fn value_addition_promotes_consistently(n in small_int(), x in -500.0f64..500.0) {
            let exact = NumericValue::int(n);
            let machine = NumericValue::Machine(x);
            let sum = exact.add(&machine);
            #[allow(clippy::cast_precision_loss)]
            let expected = n as f64 + x;
            prop_assert!((sum.to_f64() - expected).abs() < 1e-9);
        }

        #[test]
        fn value_structural_identity_is_reflexive(n in small_int(), d in non_zero_int()) {
            let a = NumericValue::rational(n, d);
            let b = NumericValue::rational(n, d);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn value_pow_matches_machine(base in 1i64..20, exp in 0i64..8) {
            let exact = NumericValue::int(base).pow(&NumericValue::int(exp), true);
            #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
            let expected = (base as f64).powi(exp as i32);
            prop_assert!((exact.to_f64() - expected).abs() < 1e-6);
        }
    }
}
