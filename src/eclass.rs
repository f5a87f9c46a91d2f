use std::iter::ExactSizeIterator;

use crate::{Id, Language};

/// An equivalence class of e-nodes.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct EClass<L> {
    /// This eclass's id.
    pub id: Id,
    /// The equivalent e-nodes in this equivalence class.
    pub nodes: Vec<L>,
    /// Pairs of `(parent e-node, owning class)` for every node that refers
    /// to this class as a child.
    pub(crate) parents: Vec<(L, Id)>,
}

impl<L> EClass<L> {
    /// Returns `true` if the `eclass` is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of enodes in this eclass.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Iterates over the enodes in this eclass.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &L> {
        self.nodes.iter()
    }

    /// Iterates over the `(parent e-node, owning class)` pairs of this
    /// eclass.
    ///
    /// The owning class ids may be stale between a [`merge`] and the next
    /// [`rebuild`]; canonicalize them with [`find`] before use.
    ///
    /// [`merge`]: crate::EGraph::merge
    /// [`rebuild`]: crate::EGraph::rebuild
    /// [`find`]: crate::EGraph::find
    pub fn parents(&self) -> impl ExactSizeIterator<Item = (&L, Id)> {
        self.parents.iter().map(|(node, id)| (node, *id))
    }
}

impl<L: Language> EClass<L> {
    /// Iterates over the childless enodes in this eclass.
    pub fn leaves(&self) -> impl Iterator<Item = &L> {
        self.nodes.iter().filter(|&n| n.is_leaf())
    }
}
