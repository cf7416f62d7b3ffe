use std::ops::{Index, IndexMut};

/// Stable reference to a node stored in an [`Arena`]. A handle stays valid
/// until the node is freed; indexing a freed handle panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(u32);

impl Handle {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
pub struct Node<K> {
    pub key: K,
    /// Low and high boundary nodes mirror the extreme data keys and are never
    /// reported as matches.
    pub boundary: bool,
    pub above: Option<Handle>,
    pub below: Option<Handle>,
    pub next: Option<Handle>,
    pub prev: Option<Handle>,
}

impl<K> Node<K> {
    pub fn data(key: K) -> Self {
        Node::new(key, false)
    }

    pub fn boundary(key: K) -> Self {
        Node::new(key, true)
    }

    fn new(key: K, boundary: bool) -> Self {
        Node {
            key,
            boundary,
            above: None,
            below: None,
            next: None,
            prev: None,
        }
    }
}

enum Slot<K> {
    Occupied(Node<K>),
    Vacant(Option<Handle>),
}

/// Growable node store. Freed slots are chained into a free list and reused
/// by later allocations, so handles stay small and memory is recycled.
pub struct Arena<K> {
    slots: Vec<Slot<K>>,
    free: Option<Handle>,
    live: usize,
}

impl<K> Arena<K> {
    pub fn with_capacity(capacity: usize) -> Arena<K> {
        Arena {
            slots: Vec::with_capacity(capacity),
            free: None,
            live: 0,
        }
    }

    pub fn alloc(&mut self, node: Node<K>) -> Handle {
        self.live += 1;
        if let Some(handle) = self.free {
            let slot = &mut self.slots[handle.index()];
            self.free = match slot {
                Slot::Vacant(next) => *next,
                Slot::Occupied(_) => panic!("free list points at a live node {:?}", handle),
            };
            *slot = Slot::Occupied(node);
            return handle;
        }
        assert!(self.slots.len() < u32::MAX as usize, "arena is full");
        let handle = Handle(self.slots.len() as u32);
        self.slots.push(Slot::Occupied(node));
        handle
    }

    /// Releases the slot and hands the node back to the caller. The node must
    /// already be unlinked from every neighbour.
    pub fn free(&mut self, handle: Handle) -> Node<K> {
        let slot = std::mem::replace(&mut self.slots[handle.index()], Slot::Vacant(self.free));
        match slot {
            Slot::Occupied(node) => {
                self.free = Some(handle);
                self.live -= 1;
                node
            }
            Slot::Vacant(_) => panic!("double free of node {:?}", handle),
        }
    }

    /// Drops every node. Outstanding handles become dangling.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free = None;
        self.live = 0;
    }

    /// Number of nodes currently allocated.
    #[inline]
    pub fn live(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn memory_used(&self) -> usize {
        self.slots.capacity() * std::mem::size_of::<Slot<K>>()
    }

    #[cfg(test)]
    pub fn get(&self, handle: Handle) -> Option<&Node<K>> {
        match self.slots.get(handle.index()) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }
}

impl<K> Index<Handle> for Arena<K> {
    type Output = Node<K>;

    fn index(&self, handle: Handle) -> &Node<K> {
        match self.slots.get(handle.index()) {
            Some(Slot::Occupied(node)) => node,
            _ => panic!("dangling node handle {:?}", handle),
        }
    }
}

impl<K> IndexMut<Handle> for Arena<K> {
    fn index_mut(&mut self, handle: Handle) -> &mut Node<K> {
        match self.slots.get_mut(handle.index()) {
            Some(Slot::Occupied(node)) => node,
            _ => panic!("dangling node handle {:?}", handle),
        }
    }
}
