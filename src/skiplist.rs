//! Skip List Module
//!
//! Ordered sequence structure holding (score, value) entries sorted by
//! `(score, value)`.
//!
//! ## Responsibilities
//! - Keep entries sorted by score, breaking ties by value bytes
//! - O(log n) expected insert, remove, rank and threshold lookup
//! - O(1) front/back access and forward/backward stepping
//!
//! ## Data Structure Choice
//! Nodes live in an arena `Vec` and reference each other by index, with
//! one forward link per level plus a rank span, and a single backward
//! link at the base level. Removed slots are recycled through a free
//! list, so node handles are only valid until the entry is removed.

use bytes::Bytes;
use ordered_float::OrderedFloat;

/// Hard cap on node height.
pub const MAX_LEVEL: usize = 32;

/// Promotion threshold: a node reaches level k+1 with probability 1/4,
/// tested against the low 16 bits of the generator output.
const PROMOTE_THRESHOLD: u32 = 0xFFFF / 4;

/// Handle to a live node in the list.
///
/// Handles are invalidated by `remove`; the slot may be reused by a
/// later insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

/// Forward link at one level: target node and the number of base-level
/// steps the link covers.
#[derive(Debug)]
struct Link {
    forward: Option<usize>,
    span: usize,
}

#[derive(Debug)]
struct Node {
    score: f64,
    value: Bytes,
    backward: Option<usize>,
    links: Vec<Link>,
}

/// Skip list of (score, value) entries ordered by `(score, value)`.
///
/// The list tolerates duplicate scores (ordering them by value bytes);
/// callers that need score uniqueness must enforce it upstream.
#[derive(Debug)]
pub struct SkipList {
    /// Node arena; slot 0 is the head sentinel.
    arena: Vec<Node>,
    /// Recycled arena slots.
    free: Vec<usize>,
    /// Last node at the base level, if any.
    tail: Option<usize>,
    /// Highest level currently in use (>= 1).
    level: usize,
    /// Number of live entries.
    length: usize,
    rng: LevelGenerator,
}

impl SkipList {
    const HEAD: usize = 0;

    /// Create an empty list.
    pub fn new() -> Self {
        let head = Node {
            score: f64::NEG_INFINITY,
            value: Bytes::new(),
            backward: None,
            links: (0..MAX_LEVEL)
                .map(|_| Link {
                    forward: None,
                    span: 0,
                })
                .collect(),
        };
        Self {
            arena: vec![head],
            free: Vec::new(),
            tail: None,
            level: 1,
            length: 0,
            rng: LevelGenerator::new(),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether the list holds no entries.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Lowest-ordered entry, O(1).
    pub fn front(&self) -> Option<NodeId> {
        self.arena[Self::HEAD].links[0].forward.map(NodeId)
    }

    /// Highest-ordered entry, O(1).
    pub fn back(&self) -> Option<NodeId> {
        self.tail.map(NodeId)
    }

    /// Next entry in ascending order, O(1).
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id.0].links[0].forward.map(NodeId)
    }

    /// Previous entry in ascending order, O(1).
    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id.0].backward.map(NodeId)
    }

    /// Score stored at a node.
    pub fn score(&self, id: NodeId) -> f64 {
        self.arena[id.0].score
    }

    /// Value stored at a node.
    pub fn value(&self, id: NodeId) -> &Bytes {
        &self.arena[id.0].value
    }

    /// Replace the value at a node without relinking.
    ///
    /// Only valid while the node's position is unaffected: with unique
    /// scores the sort key is the score alone, so an equal-score value
    /// swap keeps the list ordered.
    pub fn set_value(&mut self, id: NodeId, value: Bytes) {
        self.arena[id.0].value = value;
    }

    /// Insert an entry at its `(score, value)` position.
    ///
    /// O(log n) expected. Returns a handle to the new node.
    pub fn insert(&mut self, score: f64, value: Bytes) -> NodeId {
        let mut update = [Self::HEAD; MAX_LEVEL];
        let mut rank = [0usize; MAX_LEVEL];

        // Walk down from the top level, recording the rightmost node
        // preceding the insertion point and its rank at each level.
        let mut x = Self::HEAD;
        for i in (0..self.level).rev() {
            rank[i] = if i == self.level - 1 { 0 } else { rank[i + 1] };
            while let Some(next) = self.arena[x].links[i].forward {
                if self.precedes(next, score, &value) {
                    rank[i] += self.arena[x].links[i].span;
                    x = next;
                } else {
                    break;
                }
            }
            update[i] = x;
        }

        let level = self.rng.random_level();
        if level > self.level {
            for i in self.level..level {
                rank[i] = 0;
                update[i] = Self::HEAD;
                self.arena[Self::HEAD].links[i].span = self.length;
            }
            self.level = level;
        }

        let node = self.alloc(score, value, level);
        for i in 0..level {
            let upd = update[i];
            let upd_forward = self.arena[upd].links[i].forward;
            let upd_span = self.arena[upd].links[i].span;
            let stepped = rank[0] - rank[i];

            let link = &mut self.arena[node].links[i];
            link.forward = upd_forward;
            link.span = upd_span - stepped;

            let link = &mut self.arena[upd].links[i];
            link.forward = Some(node);
            link.span = stepped + 1;
        }

        // Untouched higher levels now skip over one more entry.
        for i in level..self.level {
            self.arena[update[i]].links[i].span += 1;
        }

        self.arena[node].backward = if update[0] == Self::HEAD {
            None
        } else {
            Some(update[0])
        };
        if let Some(next) = self.arena[node].links[0].forward {
            self.arena[next].backward = Some(node);
        } else {
            self.tail = Some(node);
        }

        self.length += 1;
        NodeId(node)
    }

    /// Remove the entry matching both score and value.
    ///
    /// O(log n) expected. Returns whether a matching entry existed.
    pub fn remove(&mut self, score: f64, value: &[u8]) -> bool {
        let mut update = [Self::HEAD; MAX_LEVEL];

        let mut x = Self::HEAD;
        for i in (0..self.level).rev() {
            while let Some(next) = self.arena[x].links[i].forward {
                if self.precedes(next, score, value) {
                    x = next;
                } else {
                    break;
                }
            }
            update[i] = x;
        }

        match self.arena[x].links[0].forward {
            Some(target)
                if self.arena[target].score == score
                    && self.arena[target].value.as_ref() == value =>
            {
                self.unlink(target, &update);
                true
            }
            _ => false,
        }
    }

    /// Smallest entry with score >= the given score, O(log n).
    pub fn first_at_least(&self, score: f64) -> Option<NodeId> {
        let mut x = Self::HEAD;
        for i in (0..self.level).rev() {
            while let Some(next) = self.arena[x].links[i].forward {
                if OrderedFloat(self.arena[next].score) < OrderedFloat(score) {
                    x = next;
                } else {
                    break;
                }
            }
        }
        self.arena[x].links[0].forward.map(NodeId)
    }

    /// 1-based rank the given score occupies, or would occupy if
    /// inserted: one more than the number of entries with a smaller
    /// score. O(log n).
    pub fn rank_at_least(&self, score: f64) -> usize {
        let mut rank = 0usize;
        let mut x = Self::HEAD;
        for i in (0..self.level).rev() {
            while let Some(next) = self.arena[x].links[i].forward {
                if OrderedFloat(self.arena[next].score) < OrderedFloat(score) {
                    rank += self.arena[x].links[i].span;
                    x = next;
                } else {
                    break;
                }
            }
        }
        rank + 1
    }

    /// Entry at the given 1-based rank from the low end, O(log n).
    pub fn get_by_rank(&self, rank: usize) -> Option<NodeId> {
        if rank == 0 || rank > self.length {
            return None;
        }
        let mut traversed = 0usize;
        let mut x = Self::HEAD;
        for i in (0..self.level).rev() {
            while let Some(next) = self.arena[x].links[i].forward {
                if traversed + self.arena[x].links[i].span <= rank {
                    traversed += self.arena[x].links[i].span;
                    x = next;
                } else {
                    break;
                }
            }
            if traversed == rank {
                return Some(NodeId(x));
            }
        }
        None
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Whether the node at `idx` orders strictly before `(score, value)`.
    fn precedes(&self, idx: usize, score: f64, value: &[u8]) -> bool {
        let node = &self.arena[idx];
        match OrderedFloat(node.score).cmp(&OrderedFloat(score)) {
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Equal => node.value.as_ref() < value,
            std::cmp::Ordering::Greater => false,
        }
    }

    fn alloc(&mut self, score: f64, value: Bytes, level: usize) -> usize {
        if let Some(idx) = self.free.pop() {
            let node = &mut self.arena[idx];
            node.score = score;
            node.value = value;
            node.backward = None;
            node.links.clear();
            node.links.resize_with(level, || Link {
                forward: None,
                span: 0,
            });
            idx
        } else {
            self.arena.push(Node {
                score,
                value,
                backward: None,
                links: (0..level)
                    .map(|_| Link {
                        forward: None,
                        span: 0,
                    })
                    .collect(),
            });
            self.arena.len() - 1
        }
    }

    fn unlink(&mut self, target: usize, update: &[usize; MAX_LEVEL]) {
        for i in 0..self.level {
            let upd = update[i];
            if self.arena[upd].links[i].forward == Some(target) {
                let target_span = self.arena[target].links[i].span;
                let target_forward = self.arena[target].links[i].forward;
                let link = &mut self.arena[upd].links[i];
                link.span += target_span;
                link.span -= 1;
                link.forward = target_forward;
            } else {
                self.arena[upd].links[i].span -= 1;
            }
        }

        if let Some(next) = self.arena[target].links[0].forward {
            self.arena[next].backward = self.arena[target].backward;
        } else {
            self.tail = self.arena[target].backward;
        }

        while self.level > 1 && self.arena[Self::HEAD].links[self.level - 1].forward.is_none() {
            self.level -= 1;
        }
        self.length -= 1;

        // Drop the payload now; the slot is recycled later.
        self.arena[target].value = Bytes::new();
        self.free.push(target);
    }
}

impl Default for SkipList {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic xorshift generator for node heights.
///
/// The structure only needs level choices that are independent of the
/// key distribution; a seeded xorshift keeps the list reproducible
/// across runs without pulling in an RNG dependency.
#[derive(Debug)]
struct LevelGenerator {
    state: u64,
}

impl LevelGenerator {
    fn new() -> Self {
        Self {
            state: 0x9E37_79B9_7F4A_7C15,
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        (x >> 32) as u32
    }

    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while level < MAX_LEVEL && (self.next_u32() & 0xFFFF) < PROMOTE_THRESHOLD {
            level += 1;
        }
        level
    }
}
