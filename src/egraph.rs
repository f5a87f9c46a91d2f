use std::borrow::BorrowMut;
use std::fmt::{self, Debug};
use std::mem;
use std::rc::Rc;

use indexmap::map::Entry;
use log::*;

use crate::analysis::{Analysis, AnalysisId, RegisteredAnalysis};
use crate::unionfind::Union;
use crate::util::{concat_vecs, HashMap, HashSet, IndexMap, Instant};
use crate::{Dot, EClass, Id, Language, RecExpr, UnionFind};

/** A data structure to keep track of equalities between terms.

An e-graph is conceptually a set of e-classes, each of which contains
equivalent e-nodes. An e-node is an operator with children, but instead of
children being other operators or values, the children are e-classes.

# Invariants and rebuilding

An e-graph has two core operations that modify it: [`add`], which inserts
e-nodes, and [`merge`], which unions two e-classes. These interact with two
key invariants:

1. **Uniqueness of e-nodes** (hashconsing): no two distinct stored e-nodes
   have equal operators and equal canonical children.

2. **Congruence closure**: if `x ≡ y` then `f(x) ≡ f(y)`, so a single
   [`merge`] may require many other classes to merge.

`eqsat` takes a deferred approach to maintaining these invariants: the
effects of [`merge`] are not immediately visible, and the caller *must* call
[`rebuild`] before the next query that depends on congruence. This batching
is what makes equality saturation workloads fast; see [`rebuild`] for
details.

# Example

```
use eqsat::{EGraph, SymbolLang as S};

let mut egraph = EGraph::<S>::default();
let x = egraph.add(S::leaf("x"));
let y = egraph.add(S::leaf("y"));
let fx = egraph.add(S::new("f", vec![x]));
let fy = egraph.add(S::new("f", vec![y]));

egraph.merge(x, y);
egraph.rebuild();
assert_eq!(egraph.find(fx), egraph.find(fy));
```

[`add`]: EGraph::add()
[`merge`]: EGraph::merge()
[`rebuild`]: EGraph::rebuild()
**/
#[derive(Clone)]
pub struct EGraph<L: Language> {
    memo: HashMap<L, Id>,
    unionfind: UnionFind,
    classes: HashMap<Id, EClass<L>>,
    dirty: Vec<Id>,
    root: Option<Id>,
    analyses: Vec<RegisteredAnalysis<L>>,
    unions_performed: usize,
}

impl<L: Language> Default for EGraph<L> {
    fn default() -> Self {
        Self {
            memo: Default::default(),
            unionfind: Default::default(),
            classes: Default::default(),
            dirty: Default::default(),
            root: None,
            analyses: Default::default(),
            unions_performed: 0,
        }
    }
}

// manual debug impl to avoid bounds on the analyses field
impl<L: Language> Debug for EGraph<L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("EGraph")
            .field("memo", &self.memo)
            .field("classes", &self.classes)
            .finish()
    }
}

impl<L: Language> EGraph<L> {
    /// Creates a new, empty e-graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an e-graph containing the given expression, whose class
    /// becomes the distinguished [`root`](EGraph::root).
    pub fn from_expr(expr: &RecExpr<L>) -> (Self, Id) {
        let mut egraph = Self::default();
        let root = egraph.add_expr(expr);
        egraph.root = Some(egraph.find(root));
        (egraph, root)
    }

    /// The distinguished root class, if this graph was built with
    /// [`from_expr`](EGraph::from_expr). Kept canonical across merges.
    pub fn root(&self) -> Option<Id> {
        self.root
    }

    /// Returns `true` if the e-graph is empty.
    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }

    /// Returns the number of e-nodes in the e-graph.
    ///
    /// Actually returns the size of the hashcons index.
    pub fn total_size(&self) -> usize {
        self.memo.len()
    }

    /// Iterates over the classes, returning the total number of stored
    /// nodes.
    pub fn total_number_of_nodes(&self) -> usize {
        self.classes().map(|c| c.len()).sum()
    }

    /// Returns the number of e-classes in the e-graph.
    pub fn number_of_classes(&self) -> usize {
        self.classes.len()
    }

    /// Returns an iterator over the e-classes in the e-graph.
    pub fn classes(&self) -> impl ExactSizeIterator<Item = &EClass<L>> {
        self.classes.values()
    }

    /// Canonicalizes an e-class id.
    ///
    /// This corresponds to the `find` operation on the e-graph's underlying
    /// unionfind data structure.
    ///
    /// # Example
    /// ```
    /// use eqsat::{EGraph, SymbolLang as S};
    /// let mut egraph = EGraph::<S>::default();
    /// let x = egraph.add(S::leaf("x"));
    /// let y = egraph.add(S::leaf("y"));
    /// assert_ne!(egraph.find(x), egraph.find(y));
    ///
    /// egraph.merge(x, y);
    /// assert_eq!(egraph.find(x), egraph.find(y));
    /// ```
    pub fn find(&self, id: Id) -> Id {
        self.unionfind.find(id)
    }

    fn class_mut(&mut self, id: Id) -> &mut EClass<L> {
        self.classes
            .get_mut(&id)
            .unwrap_or_else(|| panic!("Invalid id {}", id))
    }

    /// Registers an analysis, returning the handle its hooks and callers use
    /// to address it.
    ///
    /// Analyses must be registered before any e-node is added, so that every
    /// class is covered from birth.
    pub fn register<A: Analysis<L>>(&mut self, analysis: A) -> AnalysisId {
        assert!(
            self.classes.is_empty(),
            "analyses must be registered before any e-node is added"
        );
        let slot = AnalysisId(self.analyses.len());
        self.analyses.push(RegisteredAnalysis {
            hooks: Rc::new(analysis),
            data: Default::default(),
        });
        slot
    }

    /// Reads the analysis value attached to the class of `id`, if any.
    ///
    /// The id is canonicalized first, so stale ids are fine to pass.
    ///
    /// # Panics
    ///
    /// Panics if `V` is not the `Value` type of the analysis registered
    /// under `slot`.
    pub fn analysis_value<V: 'static>(&self, slot: AnalysisId, id: Id) -> Option<&V> {
        let id = self.find(id);
        self.analyses[slot.0].data.get(&id).map(|value| {
            value
                .as_any()
                .downcast_ref::<V>()
                .expect("analysis value type mismatch")
        })
    }

    /// Populates a lazy analysis over everything reachable from `id`.
    ///
    /// Values are computed by joining [`Analysis::make`] over every member
    /// node, iterated to a fixpoint so cyclic classes converge. Eager
    /// analyses need no demand step; calling this on one is harmless.
    pub fn analyze(&mut self, slot: AnalysisId, id: Id) {
        let hooks = Rc::clone(&self.analyses[slot.0].hooks);
        let ids = self.reachable(id);

        let mut changed = true;
        while changed {
            changed = false;
            for &class in &ids {
                let nodes = self.classes[&class].nodes.clone();
                for node in nodes {
                    let made = hooks.make(self, slot, &node);
                    let current = self.analyses[slot.0]
                        .data
                        .get(&class)
                        .map(|v| v.boxed_clone());
                    let new = match current {
                        None => {
                            changed = true;
                            made
                        }
                        Some(current) => {
                            let joined = hooks.join(made, current.boxed_clone());
                            if !joined.value_eq(&*current) {
                                changed = true;
                            }
                            joined
                        }
                    };
                    self.analyses[slot.0].data.insert(class, new);
                }
            }
        }
    }

    /// Adds a [`RecExpr`] to the e-graph, returning the id of its topmost
    /// node's class.
    ///
    /// # Example
    /// ```
    /// use eqsat::{EGraph, SymbolLang as S};
    /// let mut egraph = EGraph::<S>::default();
    /// let x = egraph.add(S::leaf("x"));
    /// let y = egraph.add(S::leaf("y"));
    /// let plus = egraph.add(S::new("+", vec![x, y]));
    /// let plus_expr = "(+ x y)".parse().unwrap();
    /// assert_eq!(plus, egraph.add_expr(&plus_expr));
    /// ```
    pub fn add_expr(&mut self, expr: &RecExpr<L>) -> Id {
        let nodes = expr.as_ref();
        assert!(!nodes.is_empty(), "cannot add an empty expression");
        let mut ids = Vec::with_capacity(nodes.len());
        for node in nodes {
            // in-expression ids become e-class ids; the slab is post-order,
            // so children are always translated before their parents
            let node = node.clone().map_children(|i| ids[usize::from(i)]);
            ids.push(self.add(node));
        }
        *ids.last().unwrap()
    }

    /// Looks up the e-class of the given e-node without inserting anything.
    ///
    /// You can pass in either an owned e-node or a `&mut` e-node, in which
    /// case the e-node's children will be canonicalized.
    ///
    /// # Example
    /// ```
    /// # use eqsat::{EGraph, SymbolLang};
    /// let mut egraph: EGraph<SymbolLang> = Default::default();
    /// let a = egraph.add(SymbolLang::leaf("a"));
    /// let b = egraph.add(SymbolLang::leaf("b"));
    ///
    /// let node_f_ab = SymbolLang::new("f", vec![a, b]);
    /// assert_eq!(egraph.lookup(node_f_ab.clone()), None);
    /// let id = egraph.add(node_f_ab.clone());
    /// assert_eq!(egraph.lookup(node_f_ab), Some(id));
    /// ```
    pub fn lookup<B>(&self, mut enode: B) -> Option<Id>
    where
        B: BorrowMut<L>,
    {
        let enode = enode.borrow_mut();
        enode.update_children(|id| self.find(id));
        self.memo.get(enode).map(|&id| self.find(id))
    }

    /// Adds an e-node to the e-graph, hashconsing it.
    ///
    /// If an equal canonical e-node is already present, its class id is
    /// returned and nothing is mutated; `add` is idempotent. Otherwise a
    /// fresh class is allocated, the node is recorded as a parent of each of
    /// its children, and every eager analysis computes a value for the new
    /// class (which may in turn [`merge`](EGraph::merge) it with another).
    ///
    /// The node's children must be ids previously returned by this e-graph.
    pub fn add(&mut self, mut enode: L) -> Id {
        if cfg!(debug_assertions) {
            enode.for_each(|id| {
                if usize::from(id) >= self.unionfind.size() {
                    panic!(
                        "e-node {:?} refers to id {} but only {} ids have been allocated",
                        enode,
                        id,
                        self.unionfind.size()
                    );
                }
            });
        }

        enode.update_children(|id| self.unionfind.find_mut(id));
        if let Some(&existing) = self.memo.get(&enode) {
            return self.unionfind.find_mut(existing);
        }

        let id = self.unionfind.make_set();
        trace!("  ...adding {:?} to {}", enode, id);
        let class = EClass {
            id,
            nodes: vec![enode.clone()],
            parents: Default::default(),
        };

        // record this enode as a parent of each child, set-style: a child
        // appearing twice gets one entry
        enode.for_each(|child| {
            let parents = &mut self.class_mut(child).parents;
            if !parents.iter().any(|(node, c)| node == &enode && *c == id) {
                parents.push((enode.clone(), id));
            }
        });

        self.classes.insert(id, class);
        let old = self.memo.insert(enode.clone(), id);
        debug_assert!(old.is_none());

        for i in 0..self.analyses.len() {
            let hooks = Rc::clone(&self.analyses[i].hooks);
            if hooks.is_lazy() {
                continue;
            }
            let slot = AnalysisId(i);
            let value = hooks.make(self, slot, &enode);
            // an earlier analysis' modify hook may already have merged `id`
            let target = self.unionfind.find_mut(id);
            self.analyses[i].data.insert(target, value);
            hooks.modify(self, slot, target);
        }

        id
    }

    /// Unions two e-classes given their ids, returning the id of the
    /// surviving class.
    ///
    /// The given ids need not be canonical, and merging a class with itself
    /// is a no-op. `merge` defers congruence maintenance: the caller must
    /// [`rebuild`](EGraph::rebuild) before the next query that depends on
    /// it.
    pub fn merge(&mut self, id1: Id, id2: Id) -> Id {
        let root1 = self.unionfind.find_mut(id1);
        let root2 = self.unionfind.find_mut(id2);
        if root1 == root2 {
            return root1;
        }

        let Union { kept, other } = self.unionfind.union(root1, root2);
        trace!("merging {} into {}", other, kept);
        self.unions_performed += 1;
        self.dirty.push(kept);
        if self.root == Some(other) {
            self.root = Some(kept);
        }

        let other_class = self.classes.remove(&other).unwrap();

        // splice the parent index
        concat_vecs(&mut self.class_mut(kept).parents, other_class.parents);

        // splice class memory, re-canonicalizing the members of both sides
        // and re-keying their hashcons entries under the surviving root;
        // congruent twins from other classes keep their entries until
        // rebuild restores injectivity
        let mut nodes = mem::take(&mut self.class_mut(kept).nodes);
        concat_vecs(&mut nodes, other_class.nodes);
        for node in &mut nodes {
            self.memo.remove(node);
            node.update_children(|id| self.unionfind.find_mut(id));
        }
        nodes.sort_unstable();
        nodes.dedup();
        for node in &nodes {
            self.memo.insert(node.clone(), kept);
        }
        self.class_mut(kept).nodes = nodes;

        // join or move analysis values onto the surviving root
        for entry in &mut self.analyses {
            if let Some(from) = entry.data.remove(&other) {
                let value = match entry.data.remove(&kept) {
                    Some(to) => entry.hooks.join(from, to),
                    None => from,
                };
                entry.data.insert(kept, value);
            }
        }

        kept
    }

    /// Restores the e-graph invariants of congruence and e-node uniqueness.
    ///
    /// The effects of [`merge`](EGraph::merge) are deferred: between a merge
    /// and the next `rebuild`, the hashcons, class memory, and parent index
    /// may be transiently inconsistent. `rebuild` drains the worklist of
    /// dirty classes, re-canonicalizing their parents and merging any that
    /// have become congruent (which can cascade), and re-runs analysis
    /// propagation until everything is stable.
    ///
    /// Returns the number of unions performed while rebuilding.
    ///
    /// # Example
    /// ```
    /// use eqsat::{EGraph, SymbolLang as S};
    /// let mut egraph = EGraph::<S>::default();
    /// let x = egraph.add(S::leaf("x"));
    /// let y = egraph.add(S::leaf("y"));
    /// let ax = egraph.add_expr(&"(+ a x)".parse().unwrap());
    /// let ay = egraph.add_expr(&"(+ a y)".parse().unwrap());
    ///
    /// // The effects of this merge aren't yet visible; ax and ay
    /// // should be equivalent by congruence since x = y.
    /// egraph.merge(x, y);
    /// // Classes: [x y] [ax] [ay] [a]
    /// assert_eq!(egraph.number_of_classes(), 4);
    /// assert_ne!(egraph.find(ax), egraph.find(ay));
    ///
    /// // Rebuilding restores the invariants, finding the "missing" equivalence
    /// egraph.rebuild();
    /// // Classes: [x y] [ax ay] [a]
    /// assert_eq!(egraph.number_of_classes(), 3);
    /// assert_eq!(egraph.find(ax), egraph.find(ay));
    /// ```
    pub fn rebuild(&mut self) -> usize {
        let old_hc_size = self.memo.len();
        let old_n_classes = self.classes.len();
        let start_unions = self.unions_performed;
        let start = Instant::now();

        let mut n_rounds = 0;
        while !self.dirty.is_empty() {
            n_rounds += 1;
            // take the worklist; repairs push the next round's entries
            let mut todo = mem::take(&mut self.dirty);
            for id in &mut todo {
                *id = self.unionfind.find_mut(*id);
            }
            todo.sort_unstable();
            todo.dedup();
            for id in todo {
                self.repair(id);
            }
        }

        let trimmed_nodes = self.rebuild_classes();
        if let Some(root) = self.root {
            self.root = Some(self.unionfind.find_mut(root));
        }

        let n_unions = self.unions_performed - start_unions;
        let elapsed = start.elapsed();
        info!(
            concat!(
                "rebuilt in {} rounds ({}.{:03}s)\n",
                "  hashcons: {} -> {}\n",
                "  eclasses: {} -> {}\n",
                "  unions: {}, trimmed nodes: {}"
            ),
            n_rounds,
            elapsed.as_secs(),
            elapsed.subsec_millis(),
            old_hc_size,
            self.memo.len(),
            old_n_classes,
            self.classes.len(),
            n_unions,
            trimmed_nodes,
        );

        debug_assert!(self.check_invariants());
        n_unions
    }

    /// The worklist only reaches classes whose parents changed, so members
    /// and parent pairs of untouched classes can still hold absorbed ids.
    /// One sweep re-canonicalizes them all and drops the duplicates this
    /// uncovers. Returns the number of nodes trimmed.
    fn rebuild_classes(&mut self) -> usize {
        let uf = &mut self.unionfind;
        let mut trimmed = 0;
        for class in self.classes.values_mut() {
            let old_len = class.nodes.len();
            class
                .nodes
                .iter_mut()
                .for_each(|n| n.update_children(|id| uf.find_mut(id)));
            class.nodes.sort_unstable();
            class.nodes.dedup();
            trimmed += old_len - class.nodes.len();

            class.parents.iter_mut().for_each(|(n, c)| {
                n.update_children(|id| uf.find_mut(id));
                *c = uf.find_mut(*c);
            });
            class.parents.sort_unstable();
            class.parents.dedup();
        }
        trimmed
    }

    fn repair(&mut self, id: Id) {
        let id = self.unionfind.find_mut(id);
        let mut parents = mem::take(&mut self.class_mut(id).parents);

        // the pre-canonical keys are stale now
        for (node, _) in &parents {
            self.memo.remove(node);
        }
        for (node, class) in &mut parents {
            node.update_children(|child| self.unionfind.find_mut(child));
            *class = self.unionfind.find_mut(*class);
        }

        // collapse congruent parents; iterating in insertion order keeps
        // the surviving entry deterministic
        let mut to_union = Vec::new();
        let mut new_parents = IndexMap::default();
        for (node, class) in parents {
            match new_parents.entry(node) {
                Entry::Occupied(entry) => to_union.push((*entry.get(), class)),
                Entry::Vacant(entry) => {
                    entry.insert(class);
                }
            }
        }

        // re-hashcons under the canonical keys; a collision here is a
        // congruence with a parent of some other repaired class
        for (node, &class) in &new_parents {
            if let Some(old) = self.memo.insert(node.clone(), class) {
                to_union.push((old, class));
            }
        }

        self.class_mut(id).parents = new_parents.into_iter().collect();

        // upwards merging; these pushes keep the rebuild loop going
        for (id1, id2) in to_union {
            self.merge(id1, id2);
        }

        self.analysis_repair(id);
    }

    /// The analysis half of `repair`: run `modify` on the repaired class,
    /// then push its refined value upwards through its parents.
    fn analysis_repair(&mut self, class: Id) {
        for i in 0..self.analyses.len() {
            let slot = AnalysisId(i);
            let hooks = Rc::clone(&self.analyses[i].hooks);
            let mut id = self.unionfind.find_mut(class);

            if self.analyses[i].data.contains_key(&id) {
                hooks.modify(self, slot, id);
                // modify may have merged the class away
                id = self.unionfind.find_mut(id);
            }

            let parents = self.classes[&id].parents.clone();
            for (pnode, pclass) in parents {
                let pclass = self.unionfind.find_mut(pclass);
                let bound = self.analyses[i].data.contains_key(&pclass);
                if !bound {
                    if !hooks.is_lazy() {
                        let value = hooks.make(self, slot, &pnode);
                        self.analyses[i].data.insert(pclass, value);
                    }
                } else {
                    let current = self.analyses[i].data[&pclass].boxed_clone();
                    let made = hooks.make(self, slot, &pnode);
                    let joined = hooks.join(made, current.boxed_clone());
                    if !joined.value_eq(&*current) {
                        self.analyses[i].data.insert(pclass, joined);
                        self.dirty.push(pclass);
                    }
                }
            }
        }
    }

    /// Returns the set of class ids reachable from `id` through the
    /// children of its member nodes.
    ///
    /// E-graphs can be cyclic, so the traversal carries a visited set; it is
    /// iterative to survive deep terms.
    pub fn reachable(&self, id: Id) -> HashSet<Id> {
        let mut visited = HashSet::default();
        let mut stack = vec![self.find(id)];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            for node in &self[id].nodes {
                node.for_each(|child| {
                    let child = self.find(child);
                    if !visited.contains(&child) {
                        stack.push(child);
                    }
                });
            }
        }
        visited
    }

    /// Creates a [`Dot`] to visualize this e-graph.
    pub fn dot(&self) -> Dot<'_, L> {
        Dot::new(self)
    }

    /// Returns a more debug-able representation of the e-graph.
    ///
    /// [`EGraph`]s implement [`Debug`], but it ain't pretty. It prints a lot
    /// of stuff you probably don't care about. This method returns a wrapper
    /// that implements [`Debug`] in a slightly nicer way, just dumping
    /// e-nodes in each e-class.
    pub fn dump(&self) -> impl Debug + '_ {
        EGraphDump(self)
    }

    fn check_invariants(&self) -> bool {
        assert!(self.dirty.is_empty(), "dirty worklist was not drained");
        self.check_classes();
        self.check_memo();
        true
    }

    fn check_classes(&self) {
        for (&id, class) in &self.classes {
            assert_eq!(id, class.id);
            assert_eq!(self.find(id), id, "class {} is not canonical", id);
            for node in &class.nodes {
                let canon = node.clone().map_children(|c| self.find(c));
                assert_eq!(
                    &canon, node,
                    "node {:?} in class {} is not canonical",
                    node, id
                );
                node.for_each(|child| {
                    let parents = &self.classes[&child].parents;
                    assert!(
                        parents.iter().any(|(p, c)| p == node && self.find(*c) == id),
                        "class {} is missing parent {:?} (owned by {})",
                        child,
                        node,
                        id
                    );
                });
            }
            for (pnode, pclass) in &class.parents {
                let pclass = self.find(*pclass);
                assert!(pnode.children().contains(&id));
                assert!(self.classes[&pclass].nodes.contains(pnode));
            }
        }
        for entry in &self.analyses {
            for &id in entry.data.keys() {
                assert_eq!(self.find(id), id, "analysis value bound to stale id {}", id);
            }
        }
    }

    fn check_memo(&self) {
        let mut test_memo = HashMap::default();

        for (&id, class) in &self.classes {
            for node in &class.nodes {
                if let Some(old) = test_memo.insert(node, id) {
                    assert_eq!(
                        self.find(old),
                        self.find(id),
                        "found unexpected equivalence for {:?}\n{:?}\nvs\n{:?}",
                        node,
                        self[self.find(id)].nodes,
                        self[self.find(old)].nodes,
                    );
                }
            }
        }

        for (n, e) in test_memo {
            assert_eq!(
                Some(e),
                self.memo.get(n).map(|&id| self.find(id)),
                "hashcons entry for {:?} at {} was incorrect",
                n,
                e
            );
        }

        for node in self.memo.keys() {
            let canon = node.clone().map_children(|c| self.find(c));
            assert_eq!(&canon, node, "non-canonical hashcons key {:?}", node);
        }
    }
}

impl<L: Language> std::ops::Index<Id> for EGraph<L> {
    type Output = EClass<L>;
    fn index(&self, id: Id) -> &Self::Output {
        let id = self.find(id);
        self.classes
            .get(&id)
            .unwrap_or_else(|| panic!("Invalid id {}", id))
    }
}

struct EGraphDump<'a, L: Language>(&'a EGraph<L>);

impl<'a, L: Language> Debug for EGraphDump<'a, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<Id> = self.0.classes().map(|c| c.id).collect();
        ids.sort();
        for id in ids {
            let mut nodes = self.0[id].nodes.clone();
            nodes.sort();
            writeln!(f, "{}: {:?}", id, nodes)?
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SymbolLang as S;

    #[test]
    fn simple_add() {
        crate::init_logger();
        let mut egraph = EGraph::<S>::default();

        let x = egraph.add(S::leaf("x"));
        let x2 = egraph.add(S::leaf("x"));
        assert_eq!(x, x2);
        let plus = egraph.add(S::new("+", vec![x, x2]));

        let y = egraph.add(S::leaf("y"));

        egraph.merge(x, y);
        egraph.rebuild();

        log::debug!("{:?}", egraph.dump());
        assert_eq!(egraph.find(x), egraph.find(y));
        assert_ne!(egraph.find(plus), egraph.find(x));
    }

    #[test]
    fn lookup_canonicalizes_in_place() {
        crate::init_logger();
        let mut egraph = EGraph::<S>::default();
        let a = egraph.add(S::leaf("a"));
        let b = egraph.add(S::leaf("b"));
        let id = egraph.add(S::new("f", vec![a, b]));

        egraph.merge(a, b);
        egraph.rebuild();

        let mut node = S::new("f", vec![a, b]);
        assert_eq!(egraph.lookup(&mut node), Some(egraph.find(id)));
        let canon = egraph.find(a);
        assert_eq!(node, S::new("f", vec![canon, canon]));
    }

    #[test]
    #[cfg_attr(not(debug_assertions), ignore)]
    #[should_panic(expected = "refers to id")]
    fn add_rejects_unallocated_children() {
        let mut egraph = EGraph::<S>::default();
        egraph.add(S::new("f", vec![Id::from(17usize)]));
    }
}
