//! Intrusive doubly-linked lists over an index space.
//!
//! An [`IndexList`] stores nothing but a header index and a length. The
//! links themselves live in a caller-owned slice of [`Node`]s, one per slot,
//! so moving a slot between lists never allocates. Nil is `None`.
//!
//! ```text
//! nodes:  [0]      [1]      [2]      [3]
//! free:   head=2   2 -> 0 -> nil
//! in_use: head=3   3 -> 1 -> nil
//! ```

use crate::error::PoolError;

/// Per-slot list membership record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Node {
    pub(crate) used: bool,
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
    /// Bumped on every recycle; handles carry the value they were issued with
    pub(crate) generation: u32,
}

impl Node {
    const UNLINKED: Self = Self {
        used: false,
        prev: None,
        next: None,
        generation: 0,
    };

    /// Build `capacity` free nodes chained in ascending order.
    pub(crate) fn chain(capacity: usize) -> Box<[Node]> {
        (0..capacity)
            .map(|i| Node {
                prev: i.checked_sub(1),
                next: Some(i + 1).filter(|&n| n < capacity),
                ..Self::UNLINKED
            })
            .collect()
    }

    fn unlink(&mut self) {
        self.prev = None;
        self.next = None;
    }
}

/// Header of one list threaded through a [`Node`] slice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct IndexList {
    head: Option<usize>,
    len: usize,
}

impl IndexList {
    /// An empty list.
    pub(crate) const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// A list that adopts nodes already chained from `head`.
    pub(crate) const fn adopt(head: Option<usize>, len: usize) -> Self {
        Self { head, len }
    }

    pub(crate) fn head(&self) -> Option<usize> {
        self.head
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Remove and return the header node, or `None` if the list is empty.
    pub(crate) fn pop_head(&mut self, nodes: &mut [Node]) -> Option<usize> {
        let head = self.head?;
        let next = nodes[head].next;
        if let Some(next) = next {
            nodes[next].prev = None;
        }
        self.head = next;
        self.len -= 1;
        nodes[head].unlink();
        Some(head)
    }

    /// Insert `index` as the new header.
    pub(crate) fn push_head(&mut self, nodes: &mut [Node], index: usize) {
        let old = self.head;
        nodes[index].prev = None;
        nodes[index].next = old;
        if let Some(old) = old {
            nodes[old].prev = Some(index);
        }
        self.head = Some(index);
        self.len += 1;
    }

    /// Splice `index` out of this list, wherever it sits.
    ///
    /// The caller must know `index` is a member. A nil `prev` on a node
    /// that is not the header means the links are corrupt.
    pub(crate) fn remove(&mut self, nodes: &mut [Node], index: usize) -> Result<(), PoolError> {
        if self.head.is_none() {
            return Err(PoolError::corruption(index, "removed from an empty list"));
        }
        let Some(&Node { prev, next, .. }) = nodes.get(index) else {
            return Err(PoolError::corruption(index, "index past the end of the node table"));
        };
        match prev {
            None => {
                if self.head != Some(index) {
                    return Err(PoolError::corruption(
                        index,
                        "node has no predecessor but is not the list head",
                    ));
                }
                if let Some(next) = next {
                    nodes[next].prev = None;
                }
                self.head = next;
            }
            Some(prev) => {
                if Some(prev) == next {
                    return Err(PoolError::corruption(
                        index,
                        "predecessor and successor are the same node",
                    ));
                }
                nodes[prev].next = next;
                if let Some(next) = next {
                    nodes[next].prev = Some(prev);
                }
            }
        }
        self.len -= 1;
        nodes[index].unlink();
        Ok(())
    }

    /// Walk the list from its header.
    ///
    /// The walk stops after `nodes.len()` steps even if the links cycle.
    pub(crate) fn iter<'a>(&self, nodes: &'a [Node]) -> Iter<'a> {
        Iter {
            nodes,
            cursor: self.head,
            remaining: nodes.len(),
        }
    }
}

/// Forward iterator over list members
pub(crate) struct Iter<'a> {
    nodes: &'a [Node],
    cursor: Option<usize>,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.cursor?;
        self.remaining -= 1;
        self.cursor = self.nodes.get(current).and_then(|node| node.next);
        Some(current)
    }
}
