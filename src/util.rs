use symbolic_expressions::Sexp;

/// An interned string.
///
/// This is provided by the [`symbol_table`](https://crates.io/crates/symbol_table) crate.
///
/// Internally, `eqsat` frequently compares operators. To keep comparisons
/// fast, [`Symbol`] wraps an interned string: a 4-byte index into a global
/// table that cheaply implements `Copy`, `Eq`, `Ord`, and `Hash`.
///
/// The internal symbol cache leaks the strings, which should be fine if you
/// only put in things like operator names and identifiers.
///
/// # Example
/// ```rust
/// use eqsat::Symbol;
///
/// assert_eq!(Symbol::from("foo"), Symbol::from("foo"));
/// assert_ne!(Symbol::from("foo"), Symbol::from("bar"));
/// ```
pub use symbol_table::GlobalSymbol as Symbol;

pub(crate) type BuildHasher = fxhash::FxBuildHasher;

pub(crate) use hashmap::*;

#[cfg(feature = "deterministic")]
mod hashmap {
    use super::BuildHasher;
    pub(crate) type HashMap<K, V> = super::IndexMap<K, V>;
    pub(crate) type HashSet<K> = indexmap::IndexSet<K, BuildHasher>;
}
#[cfg(not(feature = "deterministic"))]
mod hashmap {
    use super::BuildHasher;
    pub(crate) type HashMap<K, V> = hashbrown::HashMap<K, V, BuildHasher>;
    pub(crate) type HashSet<K> = hashbrown::HashSet<K, BuildHasher>;
}

pub(crate) type IndexMap<K, V> = indexmap::IndexMap<K, V, BuildHasher>;

pub(crate) use instant::Instant;

pub(crate) fn concat_vecs<T>(to: &mut Vec<T>, mut from: Vec<T>) {
    if to.len() < from.len() {
        std::mem::swap(to, &mut from)
    }
    to.extend(from);
}

pub(crate) fn pretty_print(
    buf: &mut String,
    sexp: &Sexp,
    width: usize,
    level: usize,
) -> std::fmt::Result {
    use std::fmt::Write;
    if let Sexp::List(list) = sexp {
        let indent = sexp.to_string().len() > width;
        write!(buf, "(")?;

        for (i, val) in list.iter().enumerate() {
            if indent && i > 0 {
                writeln!(buf)?;
                for _ in 0..level {
                    write!(buf, "  ")?;
                }
            }
            pretty_print(buf, val, width, level + 1)?;
            if !indent && i < list.len() - 1 {
                write!(buf, " ")?;
            }
        }

        write!(buf, ")")?;
        Ok(())
    } else {
        // I don't care about quotes
        write!(buf, "{}", sexp.to_string().trim_matches('"'))
    }
}
