//! Pluggable final accumulation for [`Pipeline::collect`](crate::Pipeline::collect)
//!
//! A [`Collector`] is one of a closed set of strategies. Each drains a sequence
//! into a [`Collected`] value of the matching shape:
//!
//! | collector              | result                           |
//! |------------------------|----------------------------------|
//! | `Collector::list()`    | `Collected::List(Vec<T>)`        |
//! | `Collector::group_by`  | `Collected::Groups(key -> Vec)`  |
//! | `Collector::count_by`  | `Collected::Counts(key -> usize)`|
//!
//! Keys keep first-seen order and elements keep source order within a group.

use crate::error::{PipelineError, Result};
use indexmap::IndexMap;
use std::fmt;
use std::hash::Hash;

type KeyFn<'f, T, K> = Box<dyn FnMut(&T) -> K + 'f>;

/// Accumulation strategy handed to `collect`.
pub enum Collector<'f, T, K> {
    List,
    GroupBy(KeyFn<'f, T, K>),
    CountBy(KeyFn<'f, T, K>),
}

/// Output of a [`Collector`].
#[derive(Debug)]
pub enum Collected<T, K> {
    List(Vec<T>),
    Groups(IndexMap<K, Vec<T>>),
    Counts(IndexMap<K, usize>),
}

impl<T> Collector<'static, T, ()> {
    pub fn list() -> Self {
        Collector::List
    }
}

impl<'f, T, K> Collector<'f, T, K>
where
    K: Eq + Hash,
{
    pub fn group_by(key_fn: impl FnMut(&T) -> K + 'f) -> Self {
        Collector::GroupBy(Box::new(key_fn))
    }

    pub fn count_by(key_fn: impl FnMut(&T) -> K + 'f) -> Self {
        Collector::CountBy(Box::new(key_fn))
    }

    /// Drain `source` with this strategy.
    ///
    /// # Errors
    ///
    /// `PipelineError::InvalidArgument` when `source` is `None`.
    pub fn collect<I>(self, source: Option<I>) -> Result<Collected<T, K>>
    where
        I: IntoIterator<Item = T>,
    {
        let source = source
            .ok_or_else(|| PipelineError::invalid("None iterable passed to collector"))?;

        let collected = match self {
            Collector::List => Collected::List(source.into_iter().collect()),
            Collector::GroupBy(mut key_fn) => {
                let mut groups: IndexMap<K, Vec<T>> = IndexMap::new();
                for item in source {
                    groups.entry(key_fn(&item)).or_default().push(item);
                }
                Collected::Groups(groups)
            }
            Collector::CountBy(mut key_fn) => {
                let mut counts: IndexMap<K, usize> = IndexMap::new();
                for item in source {
                    *counts.entry(key_fn(&item)).or_insert(0) += 1;
                }
                Collected::Counts(counts)
            }
        };
        Ok(collected)
    }
}

impl<T, K> fmt::Debug for Collector<'_, T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collector::List => write!(f, "Collector::List"),
            Collector::GroupBy(_) => write!(f, "Collector::GroupBy"),
            Collector::CountBy(_) => write!(f, "Collector::CountBy"),
        }
    }
}

impl<T, K> Collected<T, K> {
    pub fn into_list(self) -> Option<Vec<T>> {
        match self {
            Collected::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn into_groups(self) -> Option<IndexMap<K, Vec<T>>> {
        match self {
            Collected::Groups(groups) => Some(groups),
            _ => None,
        }
    }

    pub fn into_counts(self) -> Option<IndexMap<K, usize>> {
        match self {
            Collected::Counts(counts) => Some(counts),
            _ => None,
        }
    }
}
