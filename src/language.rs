use std::convert::Infallible;
use std::fmt::{self, Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

use symbolic_expressions::{parser::parse_str, Sexp, SexpError};
use thiserror::Error;

use crate::{util::pretty_print, Id, Symbol};

/// An e-node: a term constructor applied to zero or more e-class children.
///
/// Implement this trait for the node type of your language. Equality,
/// hashing, and ordering must consider the operator plus the ordered child
/// ids, which the derived implementations do as long as children are stored
/// as [`Id`]s.
///
/// A node is *canonical* when every child id is a union-find root; the
/// e-graph canonicalizes nodes by rewriting children through
/// [`update_children`](Language::update_children).
pub trait Language: Debug + Clone + Eq + Ord + Hash {
    /// Returns the children of this e-node, in order.
    fn children(&self) -> &[Id];

    /// Returns a mutable slice of this e-node's children.
    fn children_mut(&mut self) -> &mut [Id];

    /// Runs a function on each child id.
    fn for_each<F: FnMut(Id)>(&self, f: F) {
        self.children().iter().copied().for_each(f)
    }

    /// Runs a function on each child id, allowing mutation.
    fn for_each_mut<F: FnMut(&mut Id)>(&mut self, f: F) {
        self.children_mut().iter_mut().for_each(f)
    }

    /// Rewrites every child id in place.
    fn update_children<F: FnMut(Id) -> Id>(&mut self, mut f: F) {
        self.for_each_mut(|id| *id = f(*id))
    }

    /// Creates a new e-node with rewritten children.
    fn map_children<F: FnMut(Id) -> Id>(mut self, f: F) -> Self {
        self.update_children(f);
        self
    }

    /// Returns true if this e-node has no children.
    fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// Returns the number of children.
    fn len(&self) -> usize {
        self.children().len()
    }
}

/// A trait for parsing e-nodes, used by [`RecExpr`]'s [`FromStr`].
pub trait FromOp: Language + Sized {
    /// The error type returned when parsing fails.
    type Error: Debug;

    /// Parse an e-node with the given string operator and children.
    fn from_op(op: &str, children: Vec<Id>) -> Result<Self, Self::Error>;
}

/// A generic error for failing to parse an operator. This is the error type
/// used by the [`FromOp`] implementation for [`SymbolLang`]-like languages
/// with a fixed operator set.
#[derive(Debug, Clone, Error)]
#[error("could not parse an e-node with operator {op:?} and children {children:?}")]
pub struct FromOpError {
    op: String,
    children: Vec<Id>,
}

impl FromOpError {
    /// Create a new `FromOpError` for the given operator and children.
    pub fn new(op: &str, children: Vec<Id>) -> Self {
        Self {
            op: op.to_owned(),
            children,
        }
    }
}

/// A recursive expression: a term of some [`Language`].
///
/// This is the host-term representation that [`EGraph::add_expr`] inserts.
/// The nodes are stored in post-order, with child [`Id`]s indexing *into
/// this expression* rather than into an e-graph, so children always precede
/// their parents.
///
/// [`EGraph::add_expr`]: crate::EGraph::add_expr
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecExpr<L> {
    nodes: Vec<L>,
}

impl<L> Default for RecExpr<L> {
    fn default() -> Self {
        Self { nodes: vec![] }
    }
}

impl<L> AsRef<[L]> for RecExpr<L> {
    fn as_ref(&self) -> &[L] {
        &self.nodes
    }
}

impl<L> From<Vec<L>> for RecExpr<L> {
    fn from(nodes: Vec<L>) -> Self {
        Self { nodes }
    }
}

impl<L: Language> RecExpr<L> {
    /// Adds a node to this expression, returning its in-expression id.
    ///
    /// The node's children must already refer to nodes of this expression.
    pub fn add(&mut self, node: L) -> Id {
        debug_assert!(
            node.children()
                .iter()
                .all(|&id| usize::from(id) < self.nodes.len()),
            "e-node {:?} has children not in this expr: {:?}",
            node,
            self
        );
        self.nodes.push(node);
        Id::from(self.nodes.len() - 1)
    }

    /// Returns true if this expression contains no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<L: Language + Display> RecExpr<L> {
    fn to_sexp(&self, i: Id) -> Sexp {
        let node = &self.nodes[usize::from(i)];
        let op = Sexp::String(node.to_string());
        if node.is_leaf() {
            op
        } else {
            let mut vec = vec![op];
            node.for_each(|id| vec.push(self.to_sexp(id)));
            Sexp::List(vec)
        }
    }

    /// Pretty print with a maximum line length.
    ///
    /// This gives you a nice, indented, pretty-printed s-expression.
    ///
    /// # Example
    /// ```
    /// # use eqsat::*;
    /// let e: RecExpr<SymbolLang> = "(* (+ 2 2) (+ x y))".parse().unwrap();
    /// assert_eq!(e.pretty(10), "
    /// (*
    ///   (+ 2 2)
    ///   (+ x y))
    /// ".trim());
    /// ```
    pub fn pretty(&self, width: usize) -> String {
        let sexp = self.to_sexp(Id::from(self.nodes.len() - 1));
        let mut buf = String::new();
        pretty_print(&mut buf, &sexp, width, 1).unwrap();
        buf
    }
}

impl<L: Language + Display> Display for RecExpr<L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.nodes.is_empty() {
            Display::fmt("()", f)
        } else {
            let s = self.to_sexp(Id::from(self.nodes.len() - 1)).to_string();
            Display::fmt(&s, f)
        }
    }
}

/// An error type for failures when attempting to parse an s-expression as a
/// [`RecExpr<L>`].
#[derive(Debug, Error)]
pub enum RecExprParseError<E> {
    /// An empty s-expression was found. Usually this is caused by an
    /// empty list "()" somewhere in the input.
    #[error("found empty s-expression")]
    EmptySexp,

    /// A list was found where an operator was expected. This is caused by
    /// s-expressions of the form "((a b c) d e f)".
    #[error("found a list in the head position: {0}")]
    HeadList(Sexp),

    /// An error occurred while parsing an e-node's operator.
    #[error(transparent)]
    BadOp(E),

    /// An error occurred while parsing the s-expression itself, generally
    /// because the input had an invalid structure (e.g. unpaired parentheses).
    #[error(transparent)]
    BadSexp(SexpError),
}

impl<L: FromOp> FromStr for RecExpr<L> {
    type Err = RecExprParseError<L::Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use RecExprParseError::*;

        fn parse_sexp_into<L: FromOp>(
            sexp: &Sexp,
            expr: &mut RecExpr<L>,
        ) -> Result<Id, RecExprParseError<L::Error>> {
            use RecExprParseError::*;
            match sexp {
                Sexp::Empty => Err(EmptySexp),
                Sexp::String(s) => {
                    let node = L::from_op(s, vec![]).map_err(BadOp)?;
                    Ok(expr.add(node))
                }
                Sexp::List(list) if list.is_empty() => Err(EmptySexp),
                Sexp::List(list) => match &list[0] {
                    Sexp::Empty => unreachable!("Cannot be in head position"),
                    list @ Sexp::List(..) => Err(HeadList(list.to_owned())),
                    Sexp::String(op) => {
                        let arg_ids: Vec<Id> = list[1..]
                            .iter()
                            .map(|s| parse_sexp_into(s, expr))
                            .collect::<Result<_, _>>()?;
                        let node = L::from_op(op, arg_ids).map_err(BadOp)?;
                        Ok(expr.add(node))
                    }
                },
            }
        }

        let mut expr = RecExpr::default();
        let sexp = parse_str(s.trim()).map_err(BadSexp)?;
        parse_sexp_into(&sexp, &mut expr)?;
        Ok(expr)
    }
}

/// A simple language of uninterpreted operators applied to any number of
/// children.
///
/// Operators are interned [`Symbol`]s, so a leaf like `x` and an
/// application like `(f x y)` both parse into `SymbolLang` nodes.
///
/// # Example
/// ```
/// # use eqsat::*;
/// let mut egraph = EGraph::<SymbolLang>::default();
/// let x = egraph.add(SymbolLang::leaf("x"));
/// let y = egraph.add(SymbolLang::leaf("y"));
/// let fxy = egraph.add(SymbolLang::new("f", vec![x, y]));
/// assert_ne!(egraph.find(fxy), egraph.find(x));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolLang {
    /// The operator for this node.
    pub op: Symbol,
    /// The node's children, which are e-class ids.
    pub children: Vec<Id>,
}

impl SymbolLang {
    /// Create a node with the given operator and children.
    pub fn new(op: impl Into<Symbol>, children: Vec<Id>) -> Self {
        let op = op.into();
        Self { op, children }
    }

    /// Create a childless node with the given operator.
    pub fn leaf(op: impl Into<Symbol>) -> Self {
        Self::new(op, vec![])
    }
}

impl Language for SymbolLang {
    fn children(&self) -> &[Id] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [Id] {
        &mut self.children
    }
}

impl Display for SymbolLang {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.op, f)
    }
}

impl FromOp for SymbolLang {
    type Error = Infallible;

    fn from_op(op: &str, children: Vec<Id>) -> Result<Self, Self::Error> {
        Ok(Self {
            op: op.into(),
            children,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_print() {
        let expr: RecExpr<SymbolLang> = "(f (g x) y)".parse().unwrap();
        assert_eq!(expr.as_ref().len(), 4);
        assert_eq!(expr.to_string(), "(f (g x) y)");
    }

    #[test]
    fn parse_empty_sexp() {
        let res: Result<RecExpr<SymbolLang>, _> = "(f () x)".parse();
        assert!(matches!(res, Err(RecExprParseError::EmptySexp)));
    }

    #[test]
    fn from_op_error_names_the_operator() {
        let err = FromOpError::new("madeup", vec![Id::from(0usize)]);
        assert!(err.to_string().contains("madeup"));
    }
}
