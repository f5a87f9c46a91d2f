use std::any::Any;
use std::fmt::{self, Debug};
use std::rc::Rc;

use crate::{util::HashMap, EGraph, Id, Language};

/// Handle identifying a registered [`Analysis`] within an [`EGraph`].
///
/// Returned by [`EGraph::register`] and passed back into the analysis hooks
/// so they can reach their own per-class values through
/// [`EGraph::analysis_value`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AnalysisId(pub(crate) usize);

/// Arbitrary semilattice data associated with each [`EClass`].
///
/// An analysis attaches a lattice value to every e-class and keeps it
/// consistent as the graph grows and classes merge. The classic example is
/// constant folding, where the value is `Option<i64>`: the constant this
/// class is known to evaluate to, if any.
///
/// The hooks mirror the lattice structure: [`make`](Analysis::make) computes
/// the value of a freshly interned e-node from its children's values,
/// [`join`](Analysis::join) combines the values of two merging classes, and
/// [`modify`](Analysis::modify) lets the analysis react by mutating the
/// graph, typically by merging a class with the literal it folds to.
///
/// For the invariants maintained by the e-graph to hold, `join` must be
/// commutative, associative, and idempotent, and `make` must be monotone:
/// growing a child's value may only grow the parent's.
///
/// # Example
/// ```
/// use eqsat::*;
///
/// #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// struct Pair(Vec<Id>);
/// # impl Language for Pair {
/// #     fn children(&self) -> &[Id] { &self.0 }
/// #     fn children_mut(&mut self) -> &mut [Id] { &mut self.0 }
/// # }
///
/// // tracks the smallest tree size of any term in the class
/// struct TreeSize;
///
/// impl Analysis<Pair> for TreeSize {
///     type Value = usize;
///
///     fn make(&self, egraph: &EGraph<Pair>, slot: AnalysisId, enode: &Pair) -> usize {
///         let child = |&id: &Id| egraph.analysis_value::<usize>(slot, id).copied().unwrap_or(1);
///         1 + enode.children().iter().map(child).sum::<usize>()
///     }
///
///     fn join(&self, a: usize, b: usize) -> usize {
///         a.min(b)
///     }
/// }
/// ```
///
/// [`EClass`]: crate::EClass
#[allow(unused_variables)]
pub trait Analysis<L: Language>: 'static {
    /// The per-class lattice value.
    type Value: Debug + Clone + PartialEq + 'static;

    /// Computes the value for a freshly interned e-node.
    ///
    /// The children of `enode` are already in the graph, so their values can
    /// be read with [`EGraph::analysis_value`]. It is **not** `make`'s
    /// responsibility to insert the e-node; the e-node is "being inserted"
    /// when this function is called, and doing so will create an infinite
    /// loop.
    fn make(&self, egraph: &EGraph<L>, slot: AnalysisId, enode: &L) -> Self::Value;

    /// The semilattice join, applied when two classes merge.
    fn join(&self, a: Self::Value, b: Self::Value) -> Self::Value;

    /// A hook that allows the analysis to modify the e-graph after the class
    /// `id` gains or refines its value.
    ///
    /// By default this does nothing. It may call [`EGraph::merge`] (e.g. to
    /// collapse a constant-folded class into its literal), but it must not
    /// call [`EGraph::rebuild`].
    fn modify(&self, egraph: &mut EGraph<L>, slot: AnalysisId, id: Id) {}

    /// Lazy analyses are not populated on insertion; their values are
    /// computed on demand by [`EGraph::analyze`].
    fn is_lazy(&self) -> bool {
        false
    }
}

/// A utility for implementing [`Analysis::join`] when the `Value` type is an
/// [`Option`].
///
/// Always takes a `Some` over a `None` and calls the given function to join
/// two `Some`s.
pub fn join_option<T>(
    to: Option<T>,
    from: Option<T>,
    join: impl FnOnce(T, T) -> T,
) -> Option<T> {
    match (to, from) {
        (Some(a), Some(b)) => Some(join(a, b)),
        (a @ Some(_), None) => a,
        (None, b) => b,
    }
}

/// Object-safe view of an analysis value, so differently typed analyses can
/// share one registry.
pub(crate) trait Value: Any + Debug {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn boxed_clone(&self) -> Box<dyn Value>;
    fn value_eq(&self, other: &dyn Value) -> bool;
}

impl<T: Any + Debug + Clone + PartialEq> Value for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn boxed_clone(&self) -> Box<dyn Value> {
        Box::new(self.clone())
    }

    fn value_eq(&self, other: &dyn Value) -> bool {
        other.as_any().downcast_ref::<T>() == Some(self)
    }
}

/// Object-safe adapter over an [`Analysis`] implementation.
pub(crate) trait ErasedAnalysis<L: Language> {
    fn make(&self, egraph: &EGraph<L>, slot: AnalysisId, enode: &L) -> Box<dyn Value>;
    fn join(&self, a: Box<dyn Value>, b: Box<dyn Value>) -> Box<dyn Value>;
    fn modify(&self, egraph: &mut EGraph<L>, slot: AnalysisId, id: Id);
    fn is_lazy(&self) -> bool;
}

impl<L: Language, A: Analysis<L>> ErasedAnalysis<L> for A {
    fn make(&self, egraph: &EGraph<L>, slot: AnalysisId, enode: &L) -> Box<dyn Value> {
        Box::new(Analysis::make(self, egraph, slot, enode))
    }

    fn join(&self, a: Box<dyn Value>, b: Box<dyn Value>) -> Box<dyn Value> {
        let downcast = |v: Box<dyn Value>| -> A::Value {
            *v.into_any()
                .downcast()
                .expect("analysis value type mismatch")
        };
        Box::new(Analysis::join(self, downcast(a), downcast(b)))
    }

    fn modify(&self, egraph: &mut EGraph<L>, slot: AnalysisId, id: Id) {
        Analysis::modify(self, egraph, slot, id)
    }

    fn is_lazy(&self) -> bool {
        Analysis::is_lazy(self)
    }
}

/// A registered analysis: its hooks plus the per-class lattice values it has
/// computed so far.
///
/// The hooks sit behind an `Rc` so a clone of the handle can receive
/// `&mut EGraph` without aliasing the registry it lives in.
pub(crate) struct RegisteredAnalysis<L: Language> {
    pub(crate) hooks: Rc<dyn ErasedAnalysis<L>>,
    pub(crate) data: HashMap<Id, Box<dyn Value>>,
}

impl<L: Language> Clone for RegisteredAnalysis<L> {
    fn clone(&self) -> Self {
        Self {
            hooks: self.hooks.clone(),
            data: self
                .data
                .iter()
                .map(|(&id, v)| (id, v.boxed_clone()))
                .collect(),
        }
    }
}

impl<L: Language> Debug for RegisteredAnalysis<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredAnalysis")
            .field("data", &self.data)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_option_prefers_some() {
        let max = |a: u32, b: u32| a.max(b);
        assert_eq!(join_option(Some(1), Some(3), max), Some(3));
        assert_eq!(join_option(Some(2), None, max), Some(2));
        assert_eq!(join_option(None, Some(5), max), Some(5));
        assert_eq!(join_option::<u32>(None, None, max), None);
    }

    #[test]
    fn erased_values_compare_by_downcast() {
        let a: Box<dyn Value> = Box::new(Some(1i64));
        let b: Box<dyn Value> = Box::new(Some(1i64));
        let c: Box<dyn Value> = Box::new(1u32);
        assert!(a.value_eq(&*b));
        assert!(!a.value_eq(&*c));
    }
}
