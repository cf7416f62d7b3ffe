use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, IResult};
use crate::opt::Options;
use crate::skiplist::arena::{Arena, Handle, Node};
use crate::util::comparator::Comparator;

mod arena;
mod iterator;

pub use iterator::Iter;

/// What `remove` hands back: the key that was taken out and how many levels
/// its tower spanned, base level included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removed<K> {
    pub key: K,
    pub levels: usize,
}

/// Probabilistic ordered set of unique keys.
///
/// Every level is a doubly linked list closed by a low and a high boundary
/// node. Boundaries are not infinite sentinels: they carry copies of the
/// smallest and largest data keys. A key that falls on or outside a boundary
/// therefore becomes the new extreme, and the whole index is torn down and
/// re-threaded around the new bounds.
///
/// ```text
/// Level 2:  [5] ───────────────────► 15 ─────────► [20]
///            │                        │              │
/// Level 1:  [5] ──► 5 ──────────────► 15 ─────────► [20]
///            │      │                 │              │
/// Level 0:  [5] ──► 5 ──► 10 ───────► 15 ──► 20 ──► [20]
/// ```
///
/// Removing the current minimum or maximum leaves the boundaries stale until
/// the next insertion on or beyond a boundary resynchronizes them.
pub struct SkipList<K, C, R = StdRng> {
    arena: Arena<K>,
    /// Low boundary of the top level, `None` until the first insertion.
    head: Option<Handle>,
    /// High boundary of the top level.
    tail: Option<Handle>,
    /// Number of levels above the base level.
    height: usize,
    len: usize,
    cmp: C,
    rng: R,
    opts: Options,
}

impl<K, C> SkipList<K, C, StdRng> {
    /// Creates an empty list seeded from OS entropy, using default options.
    pub fn new(cmp: C) -> Self {
        SkipList::with_rng(cmp, StdRng::from_entropy())
    }
}

impl<K, C, R> SkipList<K, C, R> {
    pub fn with_rng(cmp: C, rng: R) -> Self {
        SkipList::build(cmp, rng, Options::default())
    }

    pub fn with_options(cmp: C, rng: R, opts: Options) -> IResult<Self> {
        opts.validate()?;
        Ok(SkipList::build(cmp, rng, opts))
    }

    fn build(cmp: C, rng: R, opts: Options) -> Self {
        SkipList {
            arena: Arena::with_capacity(16),
            head: None,
            tail: None,
            height: 0,
            len: 0,
            cmp,
            rng,
            opts,
        }
    }

    /// Returns the number of keys stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels above the base level. Never shrinks except through a
    /// rebuild.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn options(&self) -> &Options {
        &self.opts
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    pub fn low_boundary(&self) -> Option<&K> {
        self.head.map(|h| &self.arena[h].key)
    }

    pub fn high_boundary(&self) -> Option<&K> {
        self.tail.map(|h| &self.arena[h].key)
    }

    /// Returns memory usage of the node arena.
    #[inline]
    pub fn memory_usage(&self) -> usize {
        self.arena.memory_used()
    }

    pub fn iter(&self) -> Iter<'_, K, C, R> {
        Iter::new(self)
    }

    /// Data keys of one level, `0` being the base level. `None` if the level
    /// has not been built.
    pub fn level_keys(&self, level: usize) -> Option<Vec<&K>> {
        let low = self.level_head(level)?;
        let mut keys = Vec::new();
        let mut cursor = self.data_next(low);
        while let Some(node) = cursor {
            keys.push(&self.arena[node].key);
            cursor = self.data_next(node);
        }
        Some(keys)
    }

    /// The next node on the same level, unless it is the high boundary.
    #[inline]
    fn data_next(&self, node: Handle) -> Option<Handle> {
        let next = self.arena[node].next?;
        if self.arena[next].boundary {
            return None;
        }
        Some(next)
    }

    fn level_head(&self, level: usize) -> Option<Handle> {
        self.level_bounds(level).map(|(low, _)| low)
    }

    /// Low and high boundary of `level`, found by walking both boundary towers
    /// down from the top.
    fn level_bounds(&self, level: usize) -> Option<(Handle, Handle)> {
        if level > self.height {
            return None;
        }
        let (mut low, mut high) = (self.head?, self.tail?);
        for _ in level..self.height {
            low = self.arena[low].below.expect("low boundary tower shorter than height");
            high = self.arena[high].below.expect("high boundary tower shorter than height");
        }
        Some((low, high))
    }

    /// Low and high boundary of the base level.
    pub(crate) fn base_bounds(&self) -> Option<(Handle, Handle)> {
        self.level_bounds(0)
    }
}

impl<K, C: Comparator<K>, R> SkipList<K, C, R> {
    /// Returns the stored key equal to `key`.
    pub fn search(&self, key: &K) -> IResult<&K> {
        self.find(key)
            .map(|node| &self.arena[node].key)
            .ok_or(Error::NotFound)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Returns the greatest key that is less than or equal to `key`.
    pub fn floor(&self, key: &K) -> Option<&K> {
        let node = &self.arena[self.seek(key)?];
        if node.boundary {
            return None;
        }
        Some(&node.key)
    }

    /// Descends from the top low boundary, moving right while the next data
    /// key is <= `key`. Lands on the base node holding `key` if present,
    /// otherwise on its predecessor, which may be the base low boundary.
    fn seek(&self, key: &K) -> Option<Handle> {
        let mut cursor = self.head?;
        loop {
            while let Some(next) = self.data_next(cursor) {
                if self.cmp.compare(&self.arena[next].key, key) == Ordering::Greater {
                    break;
                }
                cursor = next;
            }
            match self.arena[cursor].below {
                Some(below) => cursor = below,
                None => return Some(cursor),
            }
        }
    }

    /// Same descent as `seek` but stops at the first node whose key equals
    /// `key`, on whatever level that happens.
    fn find(&self, key: &K) -> Option<Handle> {
        let mut cursor = self.head?;
        loop {
            while let Some(next) = self.data_next(cursor) {
                match self.cmp.compare(&self.arena[next].key, key) {
                    Ordering::Less => cursor = next,
                    Ordering::Equal => return Some(next),
                    Ordering::Greater => break,
                }
            }
            cursor = self.arena[cursor].below?;
        }
    }

    /// Removes `key`, unlinking its base node first and then every tower node
    /// above it. Levels left empty are kept.
    pub fn remove(&mut self, key: &K) -> IResult<Removed<K>> {
        let target = self.seek(key).ok_or(Error::NotFound)?;
        let node = &self.arena[target];
        if node.boundary || self.cmp.compare(&node.key, key) != Ordering::Equal {
            return Err(Error::NotFound);
        }

        self.unlink(target);
        let base = self.arena.free(target);
        let mut levels = 1;
        let mut cursor = base.above;
        while let Some(upper) = cursor {
            self.unlink(upper);
            cursor = self.arena.free(upper).above;
            levels += 1;
        }
        self.len -= 1;
        Ok(Removed {
            key: base.key,
            levels,
        })
    }

    fn unlink(&mut self, node: Handle) {
        let (prev, next) = {
            let n = &self.arena[node];
            (n.prev.expect("data node without predecessor"), n.next.expect("data node without successor"))
        };
        self.arena[prev].next = Some(next);
        self.arena[next].prev = Some(prev);
    }
}

impl<K, C, R> SkipList<K, C, R>
where
    K: Clone,
    C: Comparator<K>,
    R: Rng,
{
    /// Inserts `key`. Fails with `Error::Duplicate` without touching the list
    /// if an equal key is already stored.
    pub fn add(&mut self, key: K) -> IResult<()> {
        let (low, high) = match (self.head, self.tail) {
            (Some(low), Some(high)) => (low, high),
            _ => {
                // The first key only lives in the base level.
                self.reset(key.clone(), key.clone());
                let low = self.base_low();
                self.link_base(low, key);
                return Ok(());
            }
        };

        let pred = self.seek(&key).expect("non-empty list has a base level");
        let pred_node = &self.arena[pred];
        if !pred_node.boundary && self.cmp.compare(&pred_node.key, &key) == Ordering::Equal {
            return Err(Error::Duplicate);
        }

        if self.cmp.compare(&key, &self.arena[low].key) != Ordering::Greater {
            self.rebuild(key, Extreme::Min);
        } else if self.cmp.compare(&key, &self.arena[high].key) != Ordering::Less {
            self.rebuild(key, Extreme::Max);
        } else {
            self.insert_after(pred, key);
        }
        Ok(())
    }

    /// Drains every key, resets to a single level bounded by the new extremes
    /// and re-inserts the keys one by one. `key` must lie beyond every stored
    /// key on the side given by `extreme`.
    fn rebuild(&mut self, key: K, extreme: Extreme) {
        let mut keys = Vec::with_capacity(self.len + 1);
        keys.extend(self.iter().cloned());
        match extreme {
            Extreme::Min => keys.insert(0, key),
            Extreme::Max => keys.push(key),
        }
        debug!(
            "new {:?} key, rebuilding {} keys from height {}",
            extreme,
            keys.len(),
            self.height
        );

        let (low, high) = match (keys.first(), keys.last()) {
            (Some(low), Some(high)) => (low.clone(), high.clone()),
            _ => unreachable!("rebuild always carries the new key"),
        };
        self.reset(low, high);
        for key in keys {
            let pred = self.seek(&key).expect("reset leaves a base level");
            self.insert_after(pred, key);
        }
    }

    /// Drops every node and leaves a single empty level bounded by `low` and
    /// `high`.
    fn reset(&mut self, low: K, high: K) {
        self.arena.clear();
        self.len = 0;
        self.height = 0;
        let head = self.arena.alloc(Node::boundary(low));
        let tail = self.arena.alloc(Node::boundary(high));
        self.arena[head].next = Some(tail);
        self.arena[tail].prev = Some(head);
        self.head = Some(head);
        self.tail = Some(tail);
    }

    fn base_low(&self) -> Handle {
        self.level_head(0).expect("list has a base level")
    }

    /// Links `key` into the base level right after `pred`, then promotes it
    /// one level per heads until the first tails or the height cap.
    fn insert_after(&mut self, pred: Handle, key: K) {
        let node = self.link_base(pred, key);
        let mut pred = pred;
        let mut lower = node;
        let mut level = 0;
        while self.rng.gen_ratio(1, 2) {
            if level == self.opts.max_height {
                debug!("promotion capped at height {}", level);
                break;
            }
            level += 1;
            if level > self.height {
                self.grow();
            }
            // Closest node to the left that has a replica one level up. The
            // low boundary always has one below the top level.
            while self.arena[pred].above.is_none() {
                pred = self.arena[pred]
                    .prev
                    .expect("low boundary missing its upper replica");
            }
            pred = self.arena[pred].above.expect("checked above");

            let replica = self.arena[lower].key.clone();
            let upper = self.arena.alloc(Node::data(replica));
            self.link_after(pred, upper);
            self.arena[upper].below = Some(lower);
            self.arena[lower].above = Some(upper);
            lower = upper;
        }
    }

    /// Links a new data node holding `key` into the base level after `pred`.
    fn link_base(&mut self, pred: Handle, key: K) -> Handle {
        let node = self.arena.alloc(Node::data(key));
        self.link_after(pred, node);
        self.len += 1;
        node
    }

    /// Stacks a new empty level on top, bounded by the current boundary keys.
    fn grow(&mut self) {
        let (head, tail) = match (self.head, self.tail) {
            (Some(head), Some(tail)) => (head, tail),
            _ => unreachable!("grow on an empty list"),
        };
        let (low, high) = (self.arena[head].key.clone(), self.arena[tail].key.clone());
        let new_head = self.arena.alloc(Node::boundary(low));
        let new_tail = self.arena.alloc(Node::boundary(high));
        self.arena[new_head].next = Some(new_tail);
        self.arena[new_head].below = Some(head);
        self.arena[new_tail].prev = Some(new_head);
        self.arena[new_tail].below = Some(tail);
        self.arena[head].above = Some(new_head);
        self.arena[tail].above = Some(new_tail);
        self.head = Some(new_head);
        self.tail = Some(new_tail);
        self.height += 1;
        trace!("skiplist grew to height {}", self.height);
    }

    fn link_after(&mut self, pred: Handle, node: Handle) {
        let next = self.arena[pred]
            .next
            .expect("predecessor is never the high boundary");
        self.arena[node].prev = Some(pred);
        self.arena[node].next = Some(next);
        self.arena[next].prev = Some(node);
        self.arena[pred].next = Some(node);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extreme {
    Min,
    Max,
}

impl<K: Display, C, R> SkipList<K, C, R> {
    /// Renders every level from the top down for interactive inspection.
    /// The format is not stable.
    pub fn dump(&self) -> String {
        self.to_string()
    }
}

impl<K: Display, C, R> Display for SkipList<K, C, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "skiplist len={} height={} nodes={}",
            self.len,
            self.height,
            self.arena.live()
        )?;
        for level in (0..=self.height).rev() {
            let (low, high) = match self.level_bounds(level) {
                Some(bounds) => bounds,
                None => break,
            };
            write!(f, "Level {}: [{}]", level, self.arena[low].key)?;
            let mut cursor = self.data_next(low);
            let mut sep = " ";
            while let Some(node) = cursor {
                write!(f, "{}{}", sep, self.arena[node].key)?;
                sep = " : ";
                cursor = self.data_next(node);
            }
            writeln!(f, " [{}]", self.arena[high].key)?;
        }
        Ok(())
    }
}
