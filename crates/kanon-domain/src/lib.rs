//! # kanon-domain
//!
//! The domain lattice: numeric and functional type tags with a partial
//! order. Domains annotate symbols, function signatures and inferred
//! expression types; arithmetic widens operand domains to infer result
//! domains, and signature checking narrows to detect provably disjoint
//! operands.
//!
//! The lattice is a tree under `Anything` plus a bottom element `Void`,
//! so least upper bounds and greatest lower bounds are total.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fmt;

/// A domain tag.
///
/// The order sketch (each nested line is below its parent):
///
/// ```text
/// Anything
///  ├── Functions
///  └── Values
///       ├── Strings
///       ├── Booleans
///       └── Numbers
///            └── ExtendedComplexNumbers
///                 └── ComplexNumbers
///                      ├── ImaginaryNumbers
///                      └── ExtendedRealNumbers
///                           └── RealNumbers
///                                └── AlgebraicNumbers
///                                     └── RationalNumbers
///                                          └── Integers
///                                               └── PositiveIntegers
/// ```
///
/// `Void` sits below every other element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Domain {
    /// The top element: every value.
    Anything,
    /// Function values.
    Functions,
    /// Non-function values.
    Values,
    /// Text values.
    Strings,
    /// Truth values.
    Booleans,
    /// All numbers.
    Numbers,
    /// Complex numbers together with complex infinity.
    ExtendedComplexNumbers,
    /// Finite complex numbers.
    ComplexNumbers,
    /// Purely imaginary numbers.
    ImaginaryNumbers,
    /// Real numbers together with `±∞`.
    ExtendedRealNumbers,
    /// Finite real numbers.
    RealNumbers,
    /// Real algebraic numbers.
    AlgebraicNumbers,
    /// Exact quotients of integers.
    RationalNumbers,
    /// Whole numbers.
    Integers,
    /// Integers strictly above zero.
    PositiveIntegers,
    /// The bottom element: no value.
    Void,
}

impl Domain {
    /// Returns the immediate parent, or `None` for `Anything`. `Void` is
    /// treated as a child of every leaf and reports no parent here.
    #[must_use]
    pub fn parent(self) -> Option<Domain> {
        use Domain::{
            AlgebraicNumbers, Anything, Booleans, ComplexNumbers, ExtendedComplexNumbers,
            ExtendedRealNumbers, Functions, ImaginaryNumbers, Integers, Numbers,
            PositiveIntegers, RationalNumbers, RealNumbers, Strings, Values, Void,
        };
        match self {
            Anything | Void => None,
            Functions | Values => Some(Anything),
            Strings | Booleans | Numbers => Some(Values),
            ExtendedComplexNumbers => Some(Numbers),
            ComplexNumbers => Some(ExtendedComplexNumbers),
            ImaginaryNumbers | ExtendedRealNumbers => Some(ComplexNumbers),
            RealNumbers => Some(ExtendedRealNumbers),
            AlgebraicNumbers => Some(RealNumbers),
            RationalNumbers => Some(AlgebraicNumbers),
            Integers => Some(RationalNumbers),
            PositiveIntegers => Some(Integers),
        }
    }

    /// Returns true if `self ⊑ sup`: every value of `self` is a value of
    /// `sup`.
    #[must_use]
    pub fn is_compatible(self, sup: Domain) -> bool {
        if self == Domain::Void || sup == Domain::Anything {
            return true;
        }
        let mut walk = Some(self);
        while let Some(d) = walk {
            if d == sup {
                return true;
            }
            walk = d.parent();
        }
        false
    }

    /// Least upper bound.
    #[must_use]
    pub fn widen(self, other: Domain) -> Domain {
        if self == Domain::Void {
            return other;
        }
        if other == Domain::Void {
            return self;
        }
        let mut candidate = Some(self);
        while let Some(d) = candidate {
            if other.is_compatible(d) {
                return d;
            }
            candidate = d.parent();
        }
        Domain::Anything
    }

    /// Greatest lower bound; `Void` when the domains are disjoint.
    #[must_use]
    pub fn narrow(self, other: Domain) -> Domain {
        if self.is_compatible(other) {
            return self;
        }
        if other.is_compatible(self) {
            return other;
        }
        Domain::Void
    }

    /// Returns true if values of this domain are numbers.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        self.is_compatible(Domain::Numbers)
    }

    /// The canonical name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Domain::Anything => "Anything",
            Domain::Functions => "Functions",
            Domain::Values => "Values",
            Domain::Strings => "Strings",
            Domain::Booleans => "Booleans",
            Domain::Numbers => "Numbers",
            Domain::ExtendedComplexNumbers => "ExtendedComplexNumbers",
            Domain::ComplexNumbers => "ComplexNumbers",
            Domain::ImaginaryNumbers => "ImaginaryNumbers",
            Domain::ExtendedRealNumbers => "ExtendedRealNumbers",
            Domain::RealNumbers => "RealNumbers",
            Domain::AlgebraicNumbers => "AlgebraicNumbers",
            Domain::RationalNumbers => "RationalNumbers",
            Domain::Integers => "Integers",
            Domain::PositiveIntegers => "PositiveIntegers",
            Domain::Void => "Void",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
