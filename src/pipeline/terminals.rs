//! Terminal operations
//!
//! Terminals consume the pipeline and return a concrete value. Those with a
//! natural "nothing there" answer return `Option` on an empty source; `reduce`
//! without a seed has no such answer and fails with `Exhausted` instead.

use super::Pipeline;
use crate::collector::{Collected, Collector};
use crate::error::{PipelineError, Result};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt::{Display, Write};
use std::hash::Hash;
use tracing::debug;

impl<'a, T: 'a> Pipeline<'a, T> {
    pub fn to_list(self) -> Vec<T> {
        self.cursor.collect()
    }

    /// Immutable ordered snapshot.
    pub fn to_tuple(self) -> Box<[T]> {
        self.to_list().into_boxed_slice()
    }

    pub fn to_set(self) -> HashSet<T>
    where
        T: Eq + Hash,
    {
        self.cursor.collect()
    }

    /// Build a map from each element; a repeated key keeps the last value.
    ///
    /// The key stays at the position where it was first inserted.
    pub fn to_dict<K, V, KF, VF>(self, mut key_fn: KF, mut value_fn: VF) -> IndexMap<K, V>
    where
        K: Eq + Hash,
        KF: FnMut(&T) -> K,
        VF: FnMut(T) -> V,
    {
        let mut map = IndexMap::new();
        for item in self.cursor {
            let key = key_fn(&item);
            map.insert(key, value_fn(item));
        }
        map
    }

    /// Group elements by key, keys in first-seen order.
    pub fn group_by<K, F>(self, mut key_fn: F) -> IndexMap<K, Vec<T>>
    where
        K: Eq + Hash,
        F: FnMut(&T) -> K,
    {
        let mut groups: IndexMap<K, Vec<T>> = IndexMap::new();
        for item in self.cursor {
            groups.entry(key_fn(&item)).or_default().push(item);
        }
        debug!(groups = groups.len(), "group_by materialized");
        groups
    }

    /// Hand the remaining elements to `collector`.
    pub fn collect<K>(self, collector: Collector<'_, T, K>) -> Result<Collected<T, K>>
    where
        K: Eq + Hash,
    {
        collector.collect(Some(self))
    }

    pub fn count(self) -> usize {
        self.cursor.count()
    }

    pub fn first(self) -> Option<T> {
        let mut cursor = self.cursor;
        cursor.next()
    }

    pub fn first_where<P>(self, predicate: P) -> Option<T>
    where
        P: FnMut(&T) -> bool + 'a,
    {
        self.filter(predicate).first()
    }

    pub fn last(self) -> Option<T> {
        self.cursor.last()
    }

    pub fn last_where<P>(self, predicate: P) -> Option<T>
    where
        P: FnMut(&T) -> bool + 'a,
    {
        self.filter(predicate).last()
    }

    /// Smallest element; the first of several equal minima.
    pub fn min(self) -> Option<T>
    where
        T: Ord,
    {
        self.cursor.min()
    }

    /// Largest element; the first of several equal maxima.
    pub fn max(self) -> Option<T>
    where
        T: Ord,
    {
        self.cursor
            .reduce(|best, item| if item > best { item } else { best })
    }

    pub fn min_by_key<K, F>(self, key_fn: F) -> Option<T>
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.cursor.min_by_key(key_fn)
    }

    pub fn max_by_key<K, F>(self, mut key_fn: F) -> Option<T>
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.cursor
            .map(|item| (key_fn(&item), item))
            .reduce(|best, candidate| if candidate.0 > best.0 { candidate } else { best })
            .map(|(_, item)| item)
    }

    /// True as soon as one element matches. False on an empty source.
    pub fn any<P>(mut self, predicate: P) -> bool
    where
        P: FnMut(T) -> bool,
    {
        self.cursor.any(predicate)
    }

    /// False as soon as one element fails. True on an empty source.
    pub fn all<P>(mut self, predicate: P) -> bool
    where
        P: FnMut(T) -> bool,
    {
        self.cursor.all(predicate)
    }

    /// Index of the first match, or -1.
    pub fn find_index<P>(mut self, predicate: P) -> isize
    where
        P: FnMut(T) -> bool,
    {
        self.cursor
            .position(predicate)
            .map_or(-1, |index| index as isize)
    }

    /// Index of the last match, or -1. Always scans the whole source.
    pub fn find_last_index<P>(self, mut predicate: P) -> isize
    where
        P: FnMut(T) -> bool,
    {
        self.cursor
            .enumerate()
            .fold(-1, |found, (index, item)| {
                if predicate(item) {
                    index as isize
                } else {
                    found
                }
            })
    }

    /// Display every element, separated by `separator`.
    pub fn join(self, separator: &str) -> String
    where
        T: Display,
    {
        let mut out = String::new();
        for (index, item) in self.cursor.enumerate() {
            if index > 0 {
                out.push_str(separator);
            }
            // Writing into a String cannot fail
            let _ = write!(out, "{}", item);
        }
        out
    }

    /// Left fold seeded with the first element.
    ///
    /// # Errors
    ///
    /// `PipelineError::Exhausted` on an empty source.
    pub fn reduce<F>(self, f: F) -> Result<T>
    where
        F: FnMut(T, T) -> T,
    {
        self.cursor.reduce(f).ok_or(PipelineError::Exhausted)
    }

    /// Left fold from an explicit seed; the seed is returned for an empty source.
    pub fn fold<A, F>(self, initial: A, f: F) -> A
    where
        F: FnMut(A, T) -> A,
    {
        self.cursor.fold(initial, f)
    }

    pub fn for_each<F>(self, f: F)
    where
        F: FnMut(T),
    {
        self.cursor.for_each(f)
    }
}

impl<'a, T: 'a, E: 'a> Pipeline<'a, std::result::Result<T, E>> {
    /// Collect the values, stopping at the first error.
    pub fn try_to_list(self) -> std::result::Result<Vec<T>, E> {
        self.cursor.collect()
    }
}
