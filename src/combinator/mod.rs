//! Predicate and transformer combinators for per-claim policy
//!
//! Small pure building blocks: predicates decide whether a claim value is
//! acceptable, transformers rewrite a claim value before it reaches the
//! principal. Both are composed structurally and carry a structural
//! `Debug` form for diagnostics.

mod predicate;
mod transformer;

pub use predicate::{
    AnyOfPredicate, ClaimPredicate, EqualsPredicate, NoneOfPredicate, PredicateSequence,
};
pub use transformer::{
    Case, CaseFold, ClaimTransformer, DnComponent, PatternReplace, ReplaceMode, TransformError,
    TransformerSequence,
};
