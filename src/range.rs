//! Type-erased lazy ranges.
//!
//! [`AnyRange`] is forward-only: a single pull-based pass whose length may be
//! unknown or infinite. [`AnyRandomRange`] knows its length, indexes in O(1)
//! and can be walked any number of times, in either direction. The two are
//! separate types, so random-access calls on a forward range do not compile:
//!
//! ```compile_fail
//! use chainwalk::range::AnyRange;
//!
//! let forward = AnyRange::new(vec![1, 2, 3]);
//! let _ = forward.get(0);
//! ```
//!
//! Nor does asking a forward range for its length:
//!
//! ```compile_fail
//! use chainwalk::range::AnyRange;
//!
//! let forward = AnyRange::new(vec![1, 2, 3]);
//! let _ = forward.len();
//! ```
//!
//! The same calls on a random-access range are fine:
//!
//! ```
//! use chainwalk::range::AnyRandomRange;
//!
//! let random = AnyRandomRange::from_vec(vec![1, 2, 3]);
//! assert_eq!(random.len(), 3);
//! assert_eq!(random.get(0), Some(1));
//! ```
//!
//! A random-access range only becomes forward-only through an explicit
//! [`AnyRandomRange::into_forward`] (or `From`).

use std::fmt;
use std::iter::FusedIterator;
use std::ops::{Bound, RangeBounds};
use std::rc::Rc;

/// A producer that can hand out the element at any position.
pub trait IndexedSource<T> {
    fn len(&self) -> usize;

    /// Element at `index`. Callers guarantee `index < len()`.
    fn at(&self, index: usize) -> T;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> IndexedSource<T> for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn at(&self, index: usize) -> T {
        self[index].clone()
    }
}

struct FromFn<F> {
    len: usize,
    f: F,
}

impl<T, F> IndexedSource<T> for FromFn<F>
where
    F: Fn(usize) -> T,
{
    fn len(&self) -> usize {
        self.len
    }

    fn at(&self, index: usize) -> T {
        (self.f)(index)
    }
}

struct Mapped<'a, S, F> {
    inner: Rc<dyn IndexedSource<S> + 'a>,
    f: F,
}

impl<'a, S, T, F> IndexedSource<T> for Mapped<'a, S, F>
where
    F: Fn(S) -> T,
{
    fn len(&self) -> usize {
        self.inner.len()
    }

    fn at(&self, index: usize) -> T {
        (self.f)(self.inner.at(index))
    }
}

struct Slice<'a, T> {
    inner: Rc<dyn IndexedSource<T> + 'a>,
    offset: usize,
    len: usize,
}

impl<'a, T> IndexedSource<T> for Slice<'a, T> {
    fn len(&self) -> usize {
        self.len
    }

    fn at(&self, index: usize) -> T {
        self.inner.at(self.offset + index)
    }
}

/// Random-access range over any [`IndexedSource`].
///
/// Cloning shares the source; elements are produced on each access.
pub struct AnyRandomRange<'a, T> {
    source: Rc<dyn IndexedSource<T> + 'a>,
}

impl<'a, T: 'a> AnyRandomRange<'a, T> {
    pub fn new<S>(source: S) -> Self
    where
        S: IndexedSource<T> + 'a,
    {
        Self {
            source: Rc::new(source),
        }
    }

    /// `len` elements computed as `f(index)` on access.
    pub fn from_fn<F>(len: usize, f: F) -> Self
    where
        F: Fn(usize) -> T + 'a,
    {
        Self::new(FromFn { len, f })
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<T> {
        (index < self.len()).then(|| self.source.at(index))
    }

    pub fn first(&self) -> Option<T> {
        self.get(0)
    }

    pub fn last(&self) -> Option<T> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// A fresh pass over the range.
    pub fn iter(&self) -> RandomIter<'a, T> {
        RandomIter {
            source: Rc::clone(&self.source),
            front: 0,
            back: self.len(),
        }
    }

    /// Lazily apply `f` to each element; the result stays random-access.
    pub fn map<R, F>(&self, f: F) -> AnyRandomRange<'a, R>
    where
        R: 'a,
        F: Fn(T) -> R + 'a,
    {
        AnyRandomRange::new(Mapped {
            inner: Rc::clone(&self.source),
            f,
        })
    }

    /// Sub-range by position. Out-of-range bounds are clamped, never an error.
    pub fn slice<B: RangeBounds<usize>>(&self, bounds: B) -> Self {
        let len = self.len();
        let start = match bounds.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match bounds.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .clamp(start, len);
        Self::new(Slice {
            inner: Rc::clone(&self.source),
            offset: start,
            len: end - start,
        })
    }

    /// Elements matching `pred`. Positions are unknown until visited, so the
    /// result is forward-only.
    pub fn filter<P>(&self, pred: P) -> AnyRange<'a, T>
    where
        P: FnMut(&T) -> bool + 'a,
    {
        AnyRange::new(self.iter().filter(pred))
    }

    pub fn into_forward(self) -> AnyRange<'a, T> {
        AnyRange::new(self)
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

impl<'a, T: Clone + 'a> AnyRandomRange<'a, T> {
    pub fn from_vec(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T> Clone for AnyRandomRange<'_, T> {
    fn clone(&self) -> Self {
        Self {
            source: Rc::clone(&self.source),
        }
    }
}

impl<'a, T: 'a> IntoIterator for AnyRandomRange<'a, T> {
    type Item = T;
    type IntoIter = RandomIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        let back = self.len();
        RandomIter {
            source: self.source,
            front: 0,
            back,
        }
    }
}

impl<'a, T: 'a> IntoIterator for &AnyRandomRange<'a, T> {
    type Item = T;
    type IntoIter = RandomIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T: Clone + 'a> FromIterator<T> for AnyRandomRange<'a, T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T> fmt::Debug for AnyRandomRange<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyRandomRange")
            .field("len", &self.source.len())
            .finish()
    }
}

/// Cursor over an [`AnyRandomRange`]; owns only its two positions.
pub struct RandomIter<'a, T> {
    source: Rc<dyn IndexedSource<T> + 'a>,
    front: usize,
    back: usize,
}

impl<T> Iterator for RandomIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front >= self.back {
            return None;
        }
        let item = self.source.at(self.front);
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<T> {
        if n >= self.back - self.front {
            self.front = self.back;
            return None;
        }
        self.front += n;
        self.next()
    }
}

impl<T> DoubleEndedIterator for RandomIter<'_, T> {
    fn next_back(&mut self) -> Option<T> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.source.at(self.back))
    }
}

impl<T> ExactSizeIterator for RandomIter<'_, T> {}

impl<T> FusedIterator for RandomIter<'_, T> {}

impl<T> Clone for RandomIter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            source: Rc::clone(&self.source),
            front: self.front,
            back: self.back,
        }
    }
}

/// Forward-only range over any iterator.
///
/// Single pass: once drained it stays drained. Stop pulling at any point to
/// cancel; dropping it releases the producer.
pub struct AnyRange<'a, T> {
    inner: Box<dyn Iterator<Item = T> + 'a>,
}

impl<'a, T: 'a> AnyRange<'a, T> {
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Self {
            inner: Box::new(items.into_iter()),
        }
    }

    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }

    /// `first`, then `succ` of the previous element until it returns `None`.
    pub fn successors<F>(first: Option<T>, succ: F) -> Self
    where
        F: FnMut(&T) -> Option<T> + 'a,
    {
        Self::new(std::iter::successors(first, succ))
    }

    /// Lazily apply `f` to each element; the result stays forward-only.
    pub fn map<R, F>(self, f: F) -> AnyRange<'a, R>
    where
        R: 'a,
        F: FnMut(T) -> R + 'a,
    {
        AnyRange::new(self.inner.map(f))
    }

    pub fn filter<P>(self, pred: P) -> Self
    where
        P: FnMut(&T) -> bool + 'a,
    {
        Self::new(self.inner.filter(pred))
    }
}

impl<'a, T: 'a> From<AnyRandomRange<'a, T>> for AnyRange<'a, T> {
    fn from(range: AnyRandomRange<'a, T>) -> Self {
        range.into_forward()
    }
}

impl<T> Iterator for AnyRange<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> fmt::Debug for AnyRange<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyRange").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn wrapping_preserves_order_and_values() {
        let items = vec![3, 1, 4, 1, 5];
        let random = AnyRandomRange::from_vec(items.clone());
        assert_eq!(random.to_vec(), items);
        let forward: Vec<_> = AnyRange::new(items.clone()).collect();
        assert_eq!(forward, items);
    }

    #[test]
    fn random_access_is_multi_pass() {
        let range = AnyRandomRange::from_fn(4, |i| i * 10);
        assert_eq!(range.len(), 4);
        assert_eq!(range.get(2), Some(20));
        assert_eq!(range.get(4), None);
        let first: Vec<_> = range.iter().collect();
        let second: Vec<_> = (&range).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(range.first(), Some(0));
        assert_eq!(range.last(), Some(30));
    }

    #[test]
    fn iterates_from_both_ends() {
        let range = AnyRandomRange::from_fn(5, |i| i);
        let rev: Vec<_> = range.iter().rev().collect();
        assert_eq!(rev, vec![4, 3, 2, 1, 0]);

        let mut it = range.iter();
        assert_eq!(it.len(), 5);
        assert_eq!(it.next(), Some(0));
        assert_eq!(it.next_back(), Some(4));
        assert_eq!(it.len(), 3);
        assert_eq!(it.nth(1), Some(2));
        assert_eq!(it.nth(5), None);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn map_is_lazy() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let doubled = AnyRandomRange::from_fn(1_000_000, |i| i).map(move |i| {
            counter.set(counter.get() + 1);
            i * 2
        });
        assert_eq!(calls.get(), 0);
        assert_eq!(doubled.len(), 1_000_000);
        assert_eq!(doubled.get(21), Some(42));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn forward_map_pulls_on_demand() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut naturals = AnyRange::successors(Some(0u64), |n| Some(n + 1)).map(move |n| {
            counter.set(counter.get() + 1);
            n
        });
        assert_eq!(naturals.next(), Some(0));
        assert_eq!(naturals.next(), Some(1));
        assert_eq!(calls.get(), 2);
        let rest: Vec<_> = naturals.take(3).collect();
        assert_eq!(rest, vec![2, 3, 4]);
    }

    #[test]
    fn forward_range_is_single_pass() {
        let mut range = AnyRange::new(vec!['a', 'b']);
        assert_eq!(range.by_ref().count(), 2);
        assert_eq!(range.next(), None);
    }

    #[test]
    fn slice_clamps_bounds() {
        let range = AnyRandomRange::from_fn(6, |i| i);
        assert_eq!(range.slice(2..4).to_vec(), vec![2, 3]);
        assert_eq!(range.slice(4..).to_vec(), vec![4, 5]);
        assert_eq!(range.slice(..=1).to_vec(), vec![0, 1]);
        assert_eq!(range.slice(3..100).len(), 3);
        assert!(range.slice(10..).is_empty());
        assert_eq!(range.slice(1..5).slice(1..2).to_vec(), vec![2]);
    }

    #[test]
    fn filter_downgrades_explicitly() {
        let range = AnyRandomRange::from_fn(10, |i| i);
        let evens: Vec<_> = range.filter(|i| i % 2 == 0).collect();
        assert_eq!(evens, vec![0, 2, 4, 6, 8]);

        let forward: AnyRange<'_, usize> = range.clone().into();
        assert_eq!(forward.filter(|i| *i > 7).collect::<Vec<_>>(), vec![8, 9]);
        // the original is still random-access
        assert_eq!(range.len(), 10);
    }

    #[test]
    fn collects_into_random_access() {
        let range: AnyRandomRange<'_, String> = ["x", "y"].iter().map(|s| s.to_string()).collect();
        assert_eq!(range.get(1).as_deref(), Some("y"));
        assert_eq!(format!("{:?}", range), "AnyRandomRange { len: 2 }");
    }

    #[test]
    fn empty_forward_range() {
        assert_eq!(AnyRange::<u8>::empty().next(), None);
    }
}
