//! Adapter operations
//!
//! Every adapter consumes its pipeline and returns a new one whose producer pulls
//! from the old cursor on demand. Calling an adapter never pulls an element.
//!
//! A few adapters cannot answer without seeing the whole source (`sort`,
//! `take_right_while`, `drop_right_while`, `fill`) or keep a bounded window of it
//! (`take_right`, `drop_right`). The materializing ones still defer the work to
//! the first pull, so building the chain stays free.
//!
//! `partition_by` is the exception: it has to hand back two pipelines, so it
//! drains the source when called.

use super::{Cursor, Pipeline};
use crate::error::{PipelineError, Result};
use crate::nested::{DeepFlatten, Nested};
use std::cmp::Ordering;
use std::collections::{HashSet, VecDeque};
use std::hash::Hash;
use tracing::debug;

impl<'a, T: 'a> Pipeline<'a, T> {
    pub fn map<U, F>(self, f: F) -> Pipeline<'a, U>
    where
        U: 'a,
        F: FnMut(T) -> U + 'a,
    {
        Pipeline::wrap(self.cursor.map(f))
    }

    pub fn filter<P>(self, predicate: P) -> Pipeline<'a, T>
    where
        P: FnMut(&T) -> bool + 'a,
    {
        Pipeline::wrap(self.cursor.filter(predicate))
    }

    /// Complement of [`Pipeline::filter`]: keeps elements the predicate rejects.
    pub fn exclude<P>(self, mut predicate: P) -> Pipeline<'a, T>
    where
        P: FnMut(&T) -> bool + 'a,
    {
        self.filter(move |item| !predicate(item))
    }

    /// Alias of [`Pipeline::exclude`].
    pub fn remove<P>(self, predicate: P) -> Pipeline<'a, T>
    where
        P: FnMut(&T) -> bool + 'a,
    {
        self.exclude(predicate)
    }

    /// Run `action` on each element as it flows past.
    pub fn peek<F>(self, action: F) -> Pipeline<'a, T>
    where
        F: FnMut(&T) + 'a,
    {
        Pipeline::wrap(self.cursor.inspect(action))
    }

    /// Append `other` after this pipeline is exhausted.
    pub fn chain<I>(self, other: I) -> Pipeline<'a, T>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Pipeline::wrap(self.cursor.chain(other))
    }

    /// Append several sources, each exhausted before the next starts.
    pub fn chain_all<S, I>(self, others: S) -> Pipeline<'a, T>
    where
        S: IntoIterator<Item = I>,
        S::IntoIter: 'a,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Pipeline::wrap(self.cursor.chain(others.into_iter().flatten()))
    }

    /// Flatten exactly one level.
    ///
    /// Text is never expanded into characters: `String` and `&str` are not
    /// `IntoIterator`, so a pipeline of strings cannot be flattened by accident.
    pub fn flatten(self) -> Pipeline<'a, T::Item>
    where
        T: IntoIterator,
        T::IntoIter: 'a,
        T::Item: 'a,
    {
        Pipeline::wrap(self.cursor.flatten())
    }

    /// Chain every element (each itself a sequence) one after another.
    pub fn concat(self) -> Pipeline<'a, T::Item>
    where
        T: IntoIterator,
        T::IntoIter: 'a,
        T::Item: 'a,
    {
        self.flatten()
    }

    pub fn flat_map<I, F>(self, f: F) -> Pipeline<'a, I::Item>
    where
        I: IntoIterator + 'a,
        I::IntoIter: 'a,
        I::Item: 'a,
        F: FnMut(T) -> I + 'a,
    {
        Pipeline::wrap(self.cursor.flat_map(f))
    }

    /// Drop repeated elements, keeping the first occurrence of each.
    ///
    /// Membership is tracked in a `HashSet`. Element types that cannot be hashed
    /// go through [`Pipeline::distinct_by`] with a hashable surrogate key.
    pub fn distinct(self) -> Pipeline<'a, T>
    where
        T: Eq + Hash + Clone,
    {
        self.distinct_by(|item: &T| item.clone())
    }

    /// Drop elements whose key was already seen, keeping first-seen order.
    pub fn distinct_by<K, F>(self, mut key_fn: F) -> Pipeline<'a, T>
    where
        K: Eq + Hash + 'a,
        F: FnMut(&T) -> K + 'a,
    {
        let mut seen = HashSet::new();
        self.filter(move |item| seen.insert(key_fn(item)))
    }

    /// Group consecutive elements into vectors of `size`.
    ///
    /// The last chunk is shorter when the length is not a multiple of `size`.
    /// An empty source yields no chunks at all.
    ///
    /// # Errors
    ///
    /// `PipelineError::InvalidArgument` if `size` is zero.
    pub fn chunk(self, size: usize) -> Result<Pipeline<'a, Vec<T>>> {
        if size < 1 {
            return Err(PipelineError::invalid("chunk size must be at least one"));
        }
        let mut cursor = self.cursor;
        Ok(Pipeline::wrap(std::iter::from_fn(move || {
            let batch: Vec<T> = cursor.by_ref().take(size).collect();
            if batch.is_empty() {
                None
            } else {
                Some(batch)
            }
        })))
    }

    /// At most `n` elements. `limit(0)` never pulls from the source.
    pub fn limit(self, n: usize) -> Pipeline<'a, T> {
        if n == 0 {
            return Pipeline::new();
        }
        Pipeline::wrap(self.cursor.take(n))
    }

    /// Alias of [`Pipeline::limit`].
    pub fn take(self, n: usize) -> Pipeline<'a, T> {
        self.limit(n)
    }

    pub fn take_while<P>(self, predicate: P) -> Pipeline<'a, T>
    where
        P: FnMut(&T) -> bool + 'a,
    {
        Pipeline::wrap(self.cursor.take_while(predicate))
    }

    /// The last `n` elements in their original order.
    ///
    /// At most `n` elements are held at a time, and never more than the source
    /// holds. `n <= 0` yields nothing.
    pub fn take_right(self, n: isize) -> Pipeline<'a, T> {
        if n <= 0 {
            return Pipeline::new();
        }
        let window = n as usize;
        deferred(self.cursor, move |cursor| {
            let mut ring = VecDeque::new();
            for item in cursor {
                if ring.len() == window {
                    ring.pop_front();
                }
                ring.push_back(item);
            }
            ring.into_iter().collect()
        })
    }

    /// The longest suffix whose elements all satisfy `predicate`, in order.
    pub fn take_right_while<P>(self, mut predicate: P) -> Pipeline<'a, T>
    where
        P: FnMut(&T) -> bool + 'a,
    {
        deferred(self.cursor, move |cursor| {
            let mut items: Vec<T> = cursor.collect();
            let kept = items.iter().rev().take_while(|item| predicate(*item)).count();
            let split = items.len() - kept;
            debug!(total = items.len(), kept, "take_right_while materialized");
            items.split_off(split)
        })
    }

    /// Skip the first `n` elements (all of them when `n` exceeds the length).
    ///
    /// # Errors
    ///
    /// `PipelineError::InvalidArgument` for negative `n`.
    pub fn skip(self, n: isize) -> Result<Pipeline<'a, T>> {
        if n < 0 {
            return Err(PipelineError::invalid(format!(
                "cannot skip a negative count ({n})"
            )));
        }
        Ok(Pipeline::wrap(self.cursor.skip(n as usize)))
    }

    /// Alias of [`Pipeline::skip`].
    pub fn drop(self, n: isize) -> Result<Pipeline<'a, T>> {
        self.skip(n)
    }

    pub fn skip_while<P>(self, predicate: P) -> Pipeline<'a, T>
    where
        P: FnMut(&T) -> bool + 'a,
    {
        Pipeline::wrap(self.cursor.skip_while(predicate))
    }

    /// Everything except the last `n` elements.
    ///
    /// Streams through a queue of at most `n + 1` elements, grown only as elements
    /// arrive. An element is emitted once `n` newer ones are known to follow it.
    /// Unlike [`Pipeline::skip`], a negative `n` is accepted and drops nothing.
    pub fn drop_right(self, n: isize) -> Pipeline<'a, T> {
        if n <= 0 {
            return self;
        }
        let delay = n as usize;
        let mut cursor = self.cursor;
        let mut queue = VecDeque::new();
        Pipeline::wrap(std::iter::from_fn(move || loop {
            queue.push_back(cursor.next()?);
            if queue.len() > delay {
                return queue.pop_front();
            }
        }))
    }

    /// Everything except the longest suffix satisfying `predicate`.
    pub fn drop_right_while<P>(self, mut predicate: P) -> Pipeline<'a, T>
    where
        P: FnMut(&T) -> bool + 'a,
    {
        deferred(self.cursor, move |cursor| {
            let mut items: Vec<T> = cursor.collect();
            while items.last().is_some_and(&mut predicate) {
                items.pop();
            }
            items
        })
    }

    /// Replace the elements at indices `start..end` with clones of `value`.
    ///
    /// `end` of `None` means the length of the source. Bounds are compared
    /// literally against each index: a negative `start` reaches back to index 0,
    /// and `start > end` replaces nothing.
    pub fn fill(self, value: T, start: isize, end: Option<isize>) -> Pipeline<'a, T>
    where
        T: Clone,
    {
        deferred(self.cursor, move |cursor| {
            let mut items: Vec<T> = cursor.collect();
            let end = end.unwrap_or(items.len() as isize);
            if start <= end {
                for (index, item) in items.iter_mut().enumerate() {
                    let index = index as isize;
                    if start <= index && index < end {
                        *item = value.clone();
                    }
                }
            }
            items
        })
    }

    /// Elements whose index lies in `start..end`.
    pub fn substream(self, start: usize, end: usize) -> Pipeline<'a, T> {
        if start >= end {
            return Pipeline::new();
        }
        Pipeline::wrap(self.cursor.skip(start).take(end - start))
    }

    /// Stable ascending sort.
    pub fn sort(self) -> Pipeline<'a, T>
    where
        T: Ord,
    {
        self.sort_by(T::cmp)
    }

    /// Alias of [`Pipeline::sort`].
    pub fn sorted(self) -> Pipeline<'a, T>
    where
        T: Ord,
    {
        self.sort()
    }

    pub fn sort_by<C>(self, mut compare: C) -> Pipeline<'a, T>
    where
        C: FnMut(&T, &T) -> Ordering + 'a,
    {
        deferred(self.cursor, move |cursor| {
            let mut items: Vec<T> = cursor.collect();
            debug!(len = items.len(), "sort materialized");
            items.sort_by(&mut compare);
            items
        })
    }

    /// Stable sort by key, descending when `reverse` is set.
    ///
    /// Elements with equal keys keep their relative order in both directions.
    pub fn sort_by_key<K, F>(self, mut key_fn: F, reverse: bool) -> Pipeline<'a, T>
    where
        K: Ord,
        F: FnMut(&T) -> K + 'a,
    {
        self.sort_by(move |a, b| {
            let ordering = key_fn(a).cmp(&key_fn(b));
            if reverse {
                ordering.reverse()
            } else {
                ordering
            }
        })
    }

    /// Split into `(matching, non_matching)`, each in original order.
    ///
    /// Drains the source immediately.
    pub fn partition_by<P>(self, predicate: P) -> (Pipeline<'a, T>, Pipeline<'a, T>)
    where
        P: FnMut(&T) -> bool,
    {
        let (matching, rest): (Vec<T>, Vec<T>) = self.cursor.partition(predicate);
        debug!(
            matching = matching.len(),
            rest = rest.len(),
            "partition_by materialized"
        );
        (Pipeline::from(matching), Pipeline::from(rest))
    }
}

impl<'a, T: 'a> Pipeline<'a, Option<T>> {
    /// Drop `None` values.
    ///
    /// Only absence is removed; zero, empty strings and `false` stay.
    pub fn compact(self) -> Pipeline<'a, T> {
        Pipeline::wrap(self.cursor.flatten())
    }
}

impl<'a, T: 'a> Pipeline<'a, Nested<T>> {
    /// Flatten every level of nesting, depth first.
    ///
    /// Leaves are yielded as-is, so a leaf string stays one element.
    pub fn flatten_deep(self) -> Pipeline<'a, T> {
        Pipeline::wrap(DeepFlatten::new(self.cursor))
    }
}

/// Run `build` over the whole cursor on the first pull, then yield its output.
fn deferred<'a, T, U, F>(cursor: Cursor<'a, T>, build: F) -> Pipeline<'a, U>
where
    T: 'a,
    U: 'a,
    F: FnOnce(Cursor<'a, T>) -> Vec<U> + 'a,
{
    let mut pending = Some((cursor, build));
    let mut buffered = Vec::new().into_iter();
    Pipeline::wrap(std::iter::from_fn(move || {
        if let Some((cursor, build)) = pending.take() {
            buffered = build(cursor).into_iter();
        }
        buffered.next()
    }))
}
