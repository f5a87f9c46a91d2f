#![warn(missing_docs)]
/*!

`eqsat` is a library implementing e-graphs, the data structure at the heart
of equality saturation.

An e-graph compactly represents congruence-closed equivalence classes of
terms. Terms are inserted with [`EGraph::add`] or [`EGraph::add_expr`],
equalities are asserted with [`EGraph::merge`], and the congruence invariant
is restored on demand with [`EGraph::rebuild`]. Per-class semilattice
[`Analysis`] values can be registered to track derived facts (constant
folding being the classic example) as the graph grows.

Pattern matching, rewrite scheduling, and extraction are deliberately not
part of this crate; they can be built on top of the public API.

## Logging

Many operations dump useful logging info using the [`log`](https://docs.rs/log/)
crate. The easiest way to see this info is to use the
[`env_logger`](https://docs.rs/env_logger/) crate in your binary or test,
and set the environment variable `RUST_LOG=eqsat=info`.

*/

mod analysis;
mod dot;
mod eclass;
mod egraph;
mod language;
mod unionfind;
mod util;

/// A key to identify [`EClass`]es within an [`EGraph`].
#[derive(Clone, Copy, Default, Ord, PartialOrd, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-1", serde(transparent))]
pub struct Id(u32);

impl From<usize> for Id {
    fn from(n: usize) -> Id {
        Id(n as u32)
    }
}

impl From<Id> for usize {
    fn from(id: Id) -> usize {
        id.0 as usize
    }
}

impl std::fmt::Debug for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub(crate) use unionfind::UnionFind;

pub use {
    analysis::{join_option, Analysis, AnalysisId},
    dot::Dot,
    eclass::EClass,
    egraph::EGraph,
    language::{FromOp, FromOpError, Language, RecExpr, RecExprParseError, SymbolLang},
    util::Symbol,
};

#[cfg(test)]
fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
