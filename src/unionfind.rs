use crate::Id;
use std::cmp::Ordering;

/// A disjoint-set forest over [`Id`]s with union by rank and path
/// compression.
///
/// Ids are allocated monotonically by [`make_set`](UnionFind::make_set) and
/// are never recycled; a non-root id stays valid forever and keeps resolving
/// to its class's current root through [`find`](UnionFind::find).
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct UnionFind {
    parents: Vec<Id>,
    ranks: Vec<u8>,
}

/// Outcome of a [`union`](UnionFind::union): the surviving root and the root
/// that was absorbed into it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Union {
    pub kept: Id,
    pub other: Id,
}

impl UnionFind {
    /// Creates a new singleton set, returning its fresh id.
    pub fn make_set(&mut self) -> Id {
        let id = Id::from(self.parents.len());
        self.parents.push(id);
        self.ranks.push(0);
        id
    }

    /// The number of ids ever allocated, roots or not.
    pub fn size(&self) -> usize {
        self.parents.len()
    }

    fn parent(&self, query: Id) -> Id {
        self.parents[usize::from(query)]
    }

    fn parent_mut(&mut self, query: Id) -> &mut Id {
        &mut self.parents[usize::from(query)]
    }

    /// Finds the root of the set that `current` is in.
    pub fn find(&self, mut current: Id) -> Id {
        while current != self.parent(current) {
            current = self.parent(current)
        }
        current
    }

    /// Like [`find`](UnionFind::find), but compresses the path it walks.
    pub fn find_mut(&mut self, mut current: Id) -> Id {
        while current != self.parent(current) {
            let grandparent = self.parent(self.parent(current));
            *self.parent_mut(current) = grandparent;
            current = grandparent;
        }
        current
    }

    /// Unions two distinct roots.
    ///
    /// The higher-ranked root survives; equal ranks keep the lower id, so
    /// the surviving root is deterministic for a fixed operation sequence.
    pub fn union(&mut self, root1: Id, root2: Id) -> Union {
        debug_assert_eq!(root1, self.find(root1));
        debug_assert_eq!(root2, self.find(root2));
        debug_assert_ne!(root1, root2);
        let (kept, other) = match self.ranks[usize::from(root1)].cmp(&self.ranks[usize::from(root2)])
        {
            Ordering::Greater => (root1, root2),
            Ordering::Less => (root2, root1),
            Ordering::Equal => {
                let kept = root1.min(root2);
                self.ranks[usize::from(kept)] += 1;
                (kept, root1.max(root2))
            }
        };
        *self.parent_mut(other) = kept;
        Union { kept, other }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(us: impl IntoIterator<Item = usize>) -> Vec<Id> {
        us.into_iter().map(Id::from).collect()
    }

    #[test]
    fn union_find() {
        let n = 10;
        let id = Id::from;

        let mut uf = UnionFind::default();
        for _ in 0..n {
            uf.make_set();
        }

        // test the initial condition of everyone in their own set
        assert_eq!(uf.parents, ids(0..n));

        // build up one set
        uf.union(id(0), id(1));
        let r = uf.find_mut(id(2));
        uf.union(id(0), r);
        let r = uf.find_mut(id(3));
        uf.union(id(0), r);

        // build up another set
        uf.union(id(6), id(7));
        let r = uf.find_mut(id(8));
        uf.union(id(6), r);
        let r = uf.find_mut(id(9));
        uf.union(id(6), r);

        // this should compress all paths
        for i in 0..n {
            uf.find_mut(id(i));
        }

        // indexes:         0, 1, 2, 3, 4, 5, 6, 7, 8, 9
        let expected = vec![0, 0, 0, 0, 4, 5, 6, 6, 6, 6];
        assert_eq!(uf.parents, ids(expected));
    }

    #[test]
    fn equal_ranks_keep_the_lower_id() {
        let mut uf = UnionFind::default();
        let a = uf.make_set();
        let b = uf.make_set();
        assert_eq!(uf.union(b, a), Union { kept: a, other: b });

        // rank of `a` is now 1, so it wins against any fresh singleton
        let c = uf.make_set();
        assert_eq!(uf.union(c, a), Union { kept: a, other: c });
    }
}
