//! Owned single-pass cursor behind every pipeline
//!
//! A cursor is either `Active`, holding the boxed producer it pulls from, or
//! `Exhausted`. The only transition is `Active -> Exhausted`, taken the first time
//! the producer reports the end. Dropping the producer at that point releases
//! whatever it holds (file handles, buffers) before the pipeline itself goes away.

use std::fmt;

/// Single-pass cursor with explicit `Active`/`Exhausted` states.
pub enum Cursor<'a, T> {
    /// Still pulling from the wrapped producer.
    Active(Box<dyn Iterator<Item = T> + 'a>),
    /// The producer reported its end; every further pull yields `None`.
    Exhausted,
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) fn new(producer: impl Iterator<Item = T> + 'a) -> Self {
        Cursor::Active(Box::new(producer))
    }

    /// True once the end of the producer has been observed.
    ///
    /// A fresh cursor over an empty source reports `false` until it is pulled.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Cursor::Exhausted)
    }
}

impl<T> Iterator for Cursor<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match self {
            Cursor::Active(producer) => match producer.next() {
                Some(item) => Some(item),
                None => {
                    *self = Cursor::Exhausted;
                    None
                }
            },
            Cursor::Exhausted => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Cursor::Active(producer) => producer.size_hint(),
            Cursor::Exhausted => (0, Some(0)),
        }
    }
}

impl<T> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cursor::Active(_) => write!(f, "Cursor::Active"),
            Cursor::Exhausted => write!(f, "Cursor::Exhausted"),
        }
    }
}
