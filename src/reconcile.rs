//! Hit-target reconciliation: keeping a pool of caller-owned interactive
//! records in step with a flow across frames.
//!
//! Records are matched to interactive nodes by position in layout order, not
//! by node identity. A flow whose interactive nodes keep their order keeps
//! every record (and its [`HitTargetId`]) from frame to frame.

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::rc::Rc;

use slotmap::{new_key_type, SecondaryMap, SlotMap};

use crate::flow::{walk_flow, CachedFlow, FlowView};
use crate::geometry::Region;
use crate::node::Node;

new_key_type! {
    /// Stable identifier of a pooled hit-target record.
    pub struct HitTargetId;
}

// ---------------------------------------------------------------------------
// HitTarget
// ---------------------------------------------------------------------------

/// A caller-owned object that routes pointer input for one node.
///
/// The engine only ever writes position and visibility.
pub trait HitTarget {
    fn set_bounds(&mut self, bounds: Region);
    fn set_visible(&mut self, visible: bool);
}

/// Minimal [`HitTarget`]: just the rectangle and a visibility flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitRegion {
    pub bounds: Region,
    pub visible: bool,
}

impl HitTarget for HitRegion {
    fn set_bounds(&mut self, bounds: Region) {
        self.bounds = bounds;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

// ---------------------------------------------------------------------------
// ReconcileReport
// ---------------------------------------------------------------------------

/// What a reconcile pass did to the pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Records assigned to a node this pass.
    pub used: usize,
    /// Records created through the factory.
    pub created: usize,
    /// Surplus records handed to the destroy callback.
    pub destroyed: usize,
    /// Assigned records whose node has no visible slice.
    pub hidden: usize,
}

// ---------------------------------------------------------------------------
// HitTargetPool
// ---------------------------------------------------------------------------

/// Pool of hit-target records, ordered by assignment position.
pub struct HitTargetPool<T> {
    targets: SlotMap<HitTargetId, T>,
    order: Vec<HitTargetId>,
    owners: SecondaryMap<HitTargetId, Rc<Node>>,
}

impl<T> Default for HitTargetPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HitTargetPool<T> {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self { targets: SlotMap::with_key(), order: Vec::new(), owners: SecondaryMap::new() }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: HitTargetId) -> Option<&T> {
        self.targets.get(id)
    }

    pub fn get_mut(&mut self, id: HitTargetId) -> Option<&mut T> {
        self.targets.get_mut(id)
    }

    /// Record ids in assignment order.
    pub fn ids(&self) -> &[HitTargetId] {
        &self.order
    }

    /// Records in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (HitTargetId, &T)> {
        self.order.iter().filter_map(|id| self.targets.get(*id).map(|t| (*id, t)))
    }

    /// The node a record was assigned to by the last reconcile.
    pub fn node(&self, id: HitTargetId) -> Option<&Rc<Node>> {
        self.owners.get(id)
    }

    /// Destroy every record.
    pub fn clear(&mut self, mut destroy: impl FnMut(HitTargetId, T)) {
        for id in self.order.drain(..) {
            if let Some(target) = self.targets.remove(id) {
                destroy(id, target);
            }
        }
        self.owners.clear();
    }
}

impl<T: HitTarget> HitTargetPool<T> {
    /// Assign one record to every interactive node of `flow`, in layout order.
    ///
    /// A node is interactive when it (or, for its slices, the innermost
    /// enclosing group) has a pointer handler, and has neither
    /// `suppress_hit_target` nor an external hit target. A record's bounds are
    /// the union of its node's visible slice rectangles under `view`. Nodes
    /// with nothing on screen keep their record, marked invisible. Records
    /// past the last interactive node are passed to `destroy`.
    pub fn reconcile<F, D>(
        &mut self,
        flow: &CachedFlow,
        view: &FlowView,
        mut factory: F,
        mut destroy: D,
    ) -> ReconcileReport
    where
        F: FnMut(HitTargetId) -> T,
        D: FnMut(HitTargetId, T),
    {
        let assignments = collect_interactive(flow, view);
        let mut report = ReconcileReport { used: assignments.len(), ..ReconcileReport::default() };

        for (index, (node, bounds)) in assignments.into_iter().enumerate() {
            let id = match self.order.get(index) {
                Some(id) => *id,
                None => {
                    let id = self.targets.insert_with_key(&mut factory);
                    self.order.push(id);
                    report.created += 1;
                    id
                }
            };
            if let Some(target) = self.targets.get_mut(id) {
                let visible = !bounds.is_empty();
                if visible {
                    target.set_bounds(bounds);
                } else {
                    report.hidden += 1;
                }
                target.set_visible(visible);
            }
            self.owners.insert(id, node);
        }

        let used = report.used;
        if self.order.len() > used {
            for id in self.order.drain(used..) {
                self.owners.remove(id);
                if let Some(target) = self.targets.remove(id) {
                    destroy(id, target);
                    report.destroyed += 1;
                }
            }
        }

        if report.created > 0 || report.destroyed > 0 {
            tracing::debug!(
                used = report.used,
                created = report.created,
                destroyed = report.destroyed,
                hidden = report.hidden,
                "hit-target pool resized"
            );
        }
        report
    }
}

/// Interactive nodes of `flow` in first-slice order, each with the union of
/// its visible slice rectangles.
fn collect_interactive(flow: &CachedFlow, view: &FlowView) -> Vec<(Rc<Node>, Region)> {
    let mut entries: Vec<(Rc<Node>, Region)> = Vec::new();
    let mut index_of: HashMap<*const Node, usize> = HashMap::new();

    walk_flow(flow, view, true, |placed| {
        let Some(node) = placed.slice.interactive_node() else {
            return ControlFlow::Continue(());
        };
        let attrs = node.attrs();
        if attrs.suppress_hit_target || attrs.external_hit_target.is_some() {
            return ControlFlow::Continue(());
        }
        let index = *index_of.entry(Rc::as_ptr(node)).or_insert_with(|| {
            entries.push((Rc::clone(node), Region::EMPTY));
            entries.len() - 1
        });
        let bounds = &mut entries[index].1;
        *bounds = bounds.union(placed.visible);
        ControlFlow::Continue(())
    });
    entries
}

// ===========================================================================
// Tests
// ===========================================================================
