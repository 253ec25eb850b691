//! The lazy pipeline type
//!
//! A [`Pipeline`] owns exactly one single-pass [`Cursor`]. Adapters (see
//! `adapters`) move that cursor into a new pipeline wrapping a derived producer;
//! terminals (see `terminals`) drain it into a concrete value. Nothing is pulled
//! from the source until a terminal runs or the caller iterates.
//!
//! # Consumption
//!
//! Most operations take `self`, so a consumed pipeline cannot be touched again.
//! The by-reference accessors [`Pipeline::next_value`], [`Pipeline::at`] and
//! [`Pipeline::size`] drain the cursor in place; after them the pipeline is simply
//! empty and every further operation sees an exhausted source, never an error.
//!
//! # Examples
//!
//! ```ignore
//! let evens = Pipeline::range(10)
//!     .filter(|x| x % 2 == 0)
//!     .map(|x| x * 10)
//!     .to_list();
//! assert_eq!(evens, vec![0, 20, 40, 60, 80]);
//! ```

mod adapters;
mod cursor;
mod terminals;

pub use cursor::Cursor;

use crate::error::{PipelineError, Result};
use std::fmt;

/// A lazy, single-consumption sequence wrapper.
pub struct Pipeline<'a, T> {
    cursor: Cursor<'a, T>,
}

impl<'a, T: 'a> Pipeline<'a, T> {
    /// An empty pipeline.
    pub fn new() -> Self {
        Pipeline {
            cursor: Cursor::Exhausted,
        }
    }

    /// Wrap a single source.
    ///
    /// The source is converted into its iterator immediately but nothing is
    /// pulled from it.
    pub fn of<I>(source: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Self::wrap(source.into_iter())
    }

    /// Wrap an optional source, rejecting an absent one.
    ///
    /// # Errors
    ///
    /// `PipelineError::Construction("Argument is None")` when `source` is `None`.
    pub fn from_option<I>(source: Option<I>) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        match source {
            Some(source) => Ok(Self::of(source)),
            None => Err(PipelineError::Construction("Argument is None".into())),
        }
    }

    /// Build from a list of candidate sources.
    ///
    /// No sources gives an empty pipeline and exactly one is wrapped. Anything
    /// more is rejected rather than silently chained.
    ///
    /// # Errors
    ///
    /// `PipelineError::Construction("Takes only one argument")` for more than one source.
    pub fn from_sources<I>(sources: Vec<I>) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        if sources.len() > 1 {
            return Err(PipelineError::Construction(
                "Takes only one argument".into(),
            ));
        }
        match sources.into_iter().next() {
            Some(source) => Ok(Self::of(source)),
            None => Ok(Self::new()),
        }
    }

    pub(crate) fn wrap(producer: impl Iterator<Item = T> + 'a) -> Self {
        Pipeline {
            cursor: Cursor::new(producer),
        }
    }

    /// Pull one element.
    ///
    /// # Errors
    ///
    /// `PipelineError::Exhausted` once the source has nothing left.
    pub fn next_value(&mut self) -> Result<T> {
        self.cursor.next().ok_or(PipelineError::Exhausted)
    }

    /// Walk forward to the element at `index`, consuming everything up to it.
    ///
    /// Indices are relative to the current position: after `at(2)` the next
    /// element returned is the fourth of the original source.
    ///
    /// # Errors
    ///
    /// `PipelineError::IndexOutOfRange` if the source ends first. The elements
    /// walked over are gone either way.
    pub fn at(&mut self, index: usize) -> Result<T> {
        self.cursor
            .nth(index)
            .ok_or(PipelineError::IndexOutOfRange { index })
    }

    /// Drain the pipeline and return how many elements it held.
    ///
    /// Destructive: the pipeline is empty afterwards.
    pub fn size(&mut self) -> usize {
        self.cursor.by_ref().count()
    }

    /// True once the end of the source has been observed.
    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_exhausted()
    }
}

impl Pipeline<'static, i64> {
    /// `0, 1, ..., stop - 1`.
    pub fn range(stop: i64) -> Self {
        Self::wrap(stepped(0, stop, 1))
    }

    /// `start, start + 1, ..., stop - 1`.
    pub fn range_from(start: i64, stop: i64) -> Self {
        Self::wrap(stepped(start, stop, 1))
    }

    /// `start, start + step, ...` while short of `stop` in the direction of `step`.
    ///
    /// # Errors
    ///
    /// `PipelineError::InvalidArgument` when `step` is zero.
    pub fn range_step(start: i64, stop: i64, step: i64) -> Result<Self> {
        if step == 0 {
            return Err(PipelineError::invalid("range step must not be zero"));
        }
        Ok(Self::wrap(stepped(start, stop, step)))
    }
}

fn stepped(start: i64, stop: i64, step: i64) -> impl Iterator<Item = i64> {
    let mut current = start;
    std::iter::from_fn(move || {
        let in_range = if step > 0 {
            current < stop
        } else {
            current > stop
        };
        if !in_range {
            return None;
        }
        let value = current;
        current = current.saturating_add(step);
        Some(value)
    })
}

impl<'a, T: 'a> Default for Pipeline<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: 'a> From<Vec<T>> for Pipeline<'a, T> {
    fn from(items: Vec<T>) -> Self {
        Self::of(items)
    }
}

/// Collects eagerly; use [`Pipeline::of`] to wrap an iterator lazily.
impl<'a, T: 'a> FromIterator<T> for Pipeline<'a, T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<T>>())
    }
}

impl<'a, T> IntoIterator for Pipeline<'a, T> {
    type Item = T;
    type IntoIter = Cursor<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.cursor
    }
}

impl<T> fmt::Debug for Pipeline<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("cursor", &self.cursor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let mut pipeline: Pipeline<'_, i32> = Pipeline::new();
        assert_eq!(pipeline.size(), 0);
    }

    #[test]
    fn test_of_vec_and_slice() {
        assert_eq!(Pipeline::of(vec![1]).count(), 1);
        let data = [1, 2, 3];
        let borrowed: Vec<&i32> = Pipeline::of(data.iter()).to_list();
        assert_eq!(borrowed, vec![&1, &2, &3]);
    }

    #[test]
    fn test_from_option_none_fails() {
        let err = Pipeline::<i32>::from_option(None::<Vec<i32>>).unwrap_err();
        assert_eq!(err.to_string(), "construction error: Argument is None");
    }

    #[test]
    fn test_from_sources_arity() {
        let empty = Pipeline::<i32>::from_sources(Vec::<Vec<i32>>::new()).unwrap();
        assert_eq!(empty.count(), 0);

        let one = Pipeline::from_sources(vec![vec![1, 2]]).unwrap();
        assert_eq!(one.to_list(), vec![1, 2]);

        let err = Pipeline::from_sources(vec![vec![1], vec![2]]).unwrap_err();
        assert!(matches!(err, PipelineError::Construction(msg) if msg == "Takes only one argument"));
    }

    #[test]
    fn test_next_value_errors_when_drained() {
        let mut pipeline = Pipeline::of(vec![7]);
        assert_eq!(pipeline.next_value().unwrap(), 7);
        assert!(matches!(pipeline.next_value(), Err(PipelineError::Exhausted)));
    }

    #[test]
    fn test_at_walks_forward() {
        let mut pipeline = Pipeline::range(430);
        assert_eq!(pipeline.at(50).unwrap(), 50);
        // Position advanced past index 50
        assert_eq!(pipeline.at(0).unwrap(), 51);
    }

    #[test]
    fn test_at_out_of_range() {
        let mut pipeline: Pipeline<'_, i32> = Pipeline::of(vec![]);
        let err = pipeline.at(1).unwrap_err();
        assert!(matches!(err, PipelineError::IndexOutOfRange { index: 1 }));
    }

    #[test]
    fn test_size_is_destructive() {
        let mut pipeline = Pipeline::range(999);
        assert_eq!(pipeline.size(), 999);
        assert!(pipeline.is_exhausted());
        assert_eq!(pipeline.size(), 0);
        assert_eq!(pipeline.to_list(), Vec::<i64>::new());
    }

    #[test]
    fn test_range_forms() {
        assert_eq!(Pipeline::range(0).count(), 0);
        assert_eq!(Pipeline::range(-3).count(), 0);
        assert_eq!(Pipeline::range_from(3, 6).to_list(), vec![3, 4, 5]);
        assert_eq!(
            Pipeline::range_step(10, 0, -3).unwrap().to_list(),
            vec![10, 7, 4, 1]
        );
        assert_eq!(
            Pipeline::range_step(0, 10, 4).unwrap().to_list(),
            vec![0, 4, 8]
        );
        assert!(Pipeline::range_step(0, 10, 0).is_err());
    }

    #[test]
    fn test_range_near_bounds_terminates() {
        let tail = Pipeline::range_from(i64::MAX - 2, i64::MAX).to_list();
        assert_eq!(tail, vec![i64::MAX - 2, i64::MAX - 1]);
    }

    #[test]
    fn test_into_iterator() {
        let mut seen = Vec::new();
        for item in Pipeline::range(3) {
            seen.push(item);
        }
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn test_from_iterator_and_debug() {
        let pipeline: Pipeline<'_, i32> = (1..=3).collect();
        assert_eq!(format!("{:?}", pipeline), "Pipeline { cursor: Cursor::Active }");
        assert_eq!(pipeline.to_list(), vec![1, 2, 3]);
    }
}
