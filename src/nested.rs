//! Arbitrarily nested values for deep flattening
//!
//! [`Nested`] is either a leaf (`Item`) or a sequence of further nested values
//! (`Seq`). Leaves are atomic no matter what they hold, which is what keeps
//! text from being split into characters when a structure is flattened.
//!
//! # Examples
//!
//! ```ignore
//! let tree = Nested::seq(vec![
//!     Nested::item("a"),
//!     Nested::seq(vec![Nested::item("b"), Nested::seq(vec![Nested::item("c")])]),
//! ]);
//! assert_eq!(tree.depth(), 3);
//! assert_eq!(tree.into_flat().collect::<Vec<_>>(), vec!["a", "b", "c"]);
//! ```

/// A leaf value or a sequence of nested values.
///
/// `depth` and [`DeepFlatten`] walk the tree with an explicit stack. The derived
/// `Clone`, `PartialEq`, `Hash`, `Debug` and the default drop glue still recurse
/// once per level.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Nested<T> {
    Item(T),
    Seq(Vec<Nested<T>>),
}

impl<T> Nested<T> {
    pub fn item(value: T) -> Self {
        Nested::Item(value)
    }

    pub fn seq(children: impl IntoIterator<Item = Nested<T>>) -> Self {
        Nested::Seq(children.into_iter().collect())
    }

    pub fn is_item(&self) -> bool {
        matches!(self, Nested::Item(_))
    }

    /// Levels of nesting: 0 for a leaf, 1 for a sequence of leaves (or an empty one).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0)];
        while let Some((node, level)) = pending.pop() {
            if let Nested::Seq(children) = node {
                deepest = deepest.max(level + 1);
                pending.extend(children.iter().map(|child| (child, level + 1)));
            }
        }
        deepest
    }

    /// Iterate over every leaf, depth first, left to right.
    pub fn into_flat(self) -> DeepFlatten<std::iter::Once<Nested<T>>, T> {
        DeepFlatten::new(std::iter::once(self))
    }
}

impl<T> From<Vec<T>> for Nested<T> {
    fn from(values: Vec<T>) -> Self {
        Nested::Seq(values.into_iter().map(Nested::Item).collect())
    }
}

/// Depth-first leaf iterator over a stream of [`Nested`] values.
///
/// Uses an explicit stack of child iterators, so the depth of the input is not
/// bounded by the call stack.
pub struct DeepFlatten<I, T> {
    outer: I,
    stack: Vec<std::vec::IntoIter<Nested<T>>>,
}

impl<I, T> DeepFlatten<I, T>
where
    I: Iterator<Item = Nested<T>>,
{
    pub fn new(outer: I) -> Self {
        DeepFlatten {
            outer,
            stack: Vec::new(),
        }
    }
}

impl<I, T> Iterator for DeepFlatten<I, T>
where
    I: Iterator<Item = Nested<T>>,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            let next = match self.stack.last_mut() {
                Some(children) => match children.next() {
                    Some(node) => node,
                    None => {
                        self.stack.pop();
                        continue;
                    }
                },
                None => self.outer.next()?,
            };
            match next {
                Nested::Item(value) => return Some(value),
                Nested::Seq(children) => self.stack.push(children.into_iter()),
            }
        }
    }
}
