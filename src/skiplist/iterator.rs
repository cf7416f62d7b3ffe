use std::iter::FusedIterator;

use crate::skiplist::arena::Handle;
use crate::skiplist::SkipList;

/// In-order walk over the base level. Boundary nodes are skipped, so every
/// key is yielded exactly once.
pub struct Iter<'a, K, C, R> {
    list: &'a SkipList<K, C, R>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<'a, K, C, R> Iter<'a, K, C, R> {
    pub(crate) fn new(list: &'a SkipList<K, C, R>) -> Self {
        let (front, back) = match list.base_bounds() {
            Some((low, high)) => (list.arena[low].next, list.arena[high].prev),
            None => (None, None),
        };
        Iter {
            list,
            front,
            back,
            remaining: list.len(),
        }
    }
}

impl<'a, K, C, R> Iterator for Iter<'a, K, C, R> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        if self.remaining == 0 {
            return None;
        }
        let list = self.list;
        let node = &list.arena[self.front?];
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, C, R> DoubleEndedIterator for Iter<'a, K, C, R> {
    fn next_back(&mut self) -> Option<&'a K> {
        if self.remaining == 0 {
            return None;
        }
        let list = self.list;
        let node = &list.arena[self.back?];
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.key)
    }
}

impl<'a, K, C, R> ExactSizeIterator for Iter<'a, K, C, R> {}

impl<'a, K, C, R> FusedIterator for Iter<'a, K, C, R> {}

impl<'a, K, C, R> IntoIterator for &'a SkipList<K, C, R> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K, C, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
