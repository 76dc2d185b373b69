//! Union-find forest over runs
//!
//! Runs are the leaves of the forest and live in their rows. Interior nodes
//! are compositions, kept in an arena and addressed by [`CompositionId`].
//! A composition is alive while at least one run or composition names it as
//! parent; its `ref_count` is that number of children, and a slot whose count
//! drops to zero goes back on the free list.
//!
//! Merging follows aptitude: a bare run has aptitude 0 and a composition has
//! aptitude equal to its reference count. The root with the larger aptitude
//! absorbs the other, and on a tie the first argument of [`Forest::unite`]
//! absorbs the second. Two bare runs get a fresh composition as common root.
//!
//! Path compression reparents each node on the walked path straight to the
//! root, which moves a reference from the old parent to the root and may
//! free the old parent.

use crate::metadata::RunMetadata;
use crate::run::Run;
use std::borrow::Cow;

/// Handle of a composition in the forest arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositionId(u32);

impl CompositionId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// The root a run resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Root {
    /// The run itself; it has never been merged
    Run,
    /// A composition at the top of the run's tree
    Composition(CompositionId),
}

#[derive(Debug, Clone)]
struct Composition<M> {
    parent: Option<CompositionId>,
    id: u32,
    /// Number of children; 0 marks a free slot
    ref_count: u32,
    metadata: M,
}

/// Arena of compositions joining runs into components.
#[derive(Debug, Clone)]
pub struct Forest<M> {
    slots: Vec<Composition<M>>,
    free: Vec<u32>,
    live: usize,
}

impl<M: RunMetadata> Default for Forest<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RunMetadata> Forest<M> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Number of compositions currently alive.
    pub fn live_compositions(&self) -> usize {
        self.live
    }

    /// Resolve the root of `run`, compressing the path to it.
    ///
    /// Calling this again without an intervening [`unite`](Self::unite)
    /// returns the same root.
    pub fn find_root(&mut self, run: &mut Run) -> Root {
        let Some(parent) = run.parent else {
            return Root::Run;
        };
        let root = self.find_composition_root(parent);
        if root != parent {
            self.slots[root.index()].ref_count += 1;
            run.parent = Some(root);
            self.release(parent);
        }
        Root::Composition(root)
    }

    /// Merge the components of two runs.
    ///
    /// Does nothing if they already share a root.
    pub fn unite(&mut self, a: &mut Run, b: &mut Run) {
        let root_a = self.find_root(a);
        let root_b = self.find_root(b);
        match (root_a, root_b) {
            (Root::Run, Root::Run) => {
                let mut metadata = M::from_run(a.extent());
                metadata.accumulate(&M::from_run(b.extent()));
                let composition = self.alloc(metadata);
                a.parent = Some(composition);
                b.parent = Some(composition);
            }
            (Root::Run, Root::Composition(c)) => self.absorb_run(c, a),
            (Root::Composition(c), Root::Run) => self.absorb_run(c, b),
            (Root::Composition(ca), Root::Composition(cb)) => {
                if ca == cb {
                    return;
                }
                if self.aptitude(root_a) >= self.aptitude(root_b) {
                    self.attach(cb, ca);
                } else {
                    self.attach(ca, cb);
                }
            }
        }
    }

    /// Merge weight of a root.
    pub fn aptitude(&self, root: Root) -> u32 {
        match root {
            Root::Run => 0,
            Root::Composition(c) => self.slots[c.index()].ref_count,
        }
    }

    /// Accumulated metadata of the component of `run`.
    pub fn metadata(&mut self, run: &mut Run) -> Cow<'_, M> {
        match self.find_root(run) {
            Root::Run => Cow::Owned(M::from_run(run.extent())),
            Root::Composition(c) => Cow::Borrowed(&self.slots[c.index()].metadata),
        }
    }

    /// Label of the component of `run`, if one was assigned.
    pub fn id(&mut self, run: &mut Run) -> Option<u32> {
        let id = match self.find_root(run) {
            Root::Run => run.id,
            Root::Composition(c) => self.slots[c.index()].id,
        };
        (id != 0).then_some(id)
    }

    /// Give the component of `run` a label.
    ///
    /// Takes the next value of `counter` the first time and returns
    /// `(id, true)`; later calls for any run of the component return the
    /// stored `(id, false)`.
    pub fn assign_id(&mut self, run: &mut Run, counter: &mut u32) -> (u32, bool) {
        let slot = match self.find_root(run) {
            Root::Run => &mut run.id,
            Root::Composition(c) => &mut self.slots[c.index()].id,
        };
        if *slot != 0 {
            return (*slot, false);
        }
        *counter += 1;
        *slot = *counter;
        (*slot, true)
    }

    /// Detach `run` from the forest before its row slot is reused.
    pub fn release_run(&mut self, run: &mut Run) {
        if let Some(parent) = run.parent.take() {
            self.release(parent);
        }
        run.id = 0;
    }

    fn alloc(&mut self, metadata: M) -> CompositionId {
        let composition = Composition {
            parent: None,
            id: 0,
            ref_count: 2,
            metadata,
        };
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                self.slots[index as usize] = composition;
                CompositionId(index)
            }
            None => {
                debug_assert!(self.slots.len() < u32::MAX as usize);
                self.slots.push(composition);
                CompositionId((self.slots.len() - 1) as u32)
            }
        }
    }

    fn find_composition_root(&mut self, start: CompositionId) -> CompositionId {
        let mut root = start;
        while let Some(parent) = self.slots[root.index()].parent {
            root = parent;
        }

        let mut node = start;
        while let Some(parent) = self.slots[node.index()].parent {
            if parent == root {
                break;
            }
            self.slots[node.index()].parent = Some(root);
            self.slots[root.index()].ref_count += 1;
            if self.release(parent) {
                // The rest of the path lost its references with `parent`
                break;
            }
            node = parent;
        }
        root
    }

    /// Drop one reference to `composition`. Returns true if it was freed.
    fn release(&mut self, composition: CompositionId) -> bool {
        let mut current = composition;
        loop {
            let slot = &mut self.slots[current.index()];
            debug_assert!(slot.ref_count > 0, "release of free composition");
            slot.ref_count -= 1;
            if slot.ref_count > 0 {
                return current != composition;
            }
            let parent = slot.parent.take();
            slot.id = 0;
            self.free.push(current.0);
            self.live -= 1;
            match parent {
                Some(p) => current = p,
                None => return true,
            }
        }
    }

    fn absorb_run(&mut self, composition: CompositionId, run: &mut Run) {
        debug_assert!(run.parent.is_none());
        let slot = &mut self.slots[composition.index()];
        slot.ref_count += 1;
        slot.metadata.accumulate(&M::from_run(run.extent()));
        run.parent = Some(composition);
    }

    fn attach(&mut self, child: CompositionId, parent: CompositionId) {
        let (child_slot, parent_slot) = pair_mut(&mut self.slots, child.index(), parent.index());
        debug_assert!(child_slot.parent.is_none() && parent_slot.parent.is_none());
        child_slot.parent = Some(parent);
        parent_slot.ref_count += 1;
        parent_slot.metadata.accumulate(&child_slot.metadata);
    }
}

/// Mutable references to two distinct elements of a slice.
pub(crate) fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (head, tail) = items.split_at_mut(b);
        (&mut head[a], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(a);
        (&mut tail[0], &mut head[b])
    }
}
