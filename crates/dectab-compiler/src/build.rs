//! Memoized synthesis of the decision tree.
//!
//! At each frontier the builder tries candidate test values in a
//! heuristic order, recursing into the branch frontiers each candidate
//! induces, and keeps the candidate with the smallest worst-case depth.
//! Completed frontiers are memoized on the (values, inferences) pair so
//! structurally identical subproblems share one node.

use indexmap::IndexMap;

use crate::resolve::{
    close_unit_chains, frontier_without_name, frontier_without_value, minus,
    resolved_by_siblings, resolved_by_value, strip,
};
use crate::table::{InfId, Table, ValueId};

/// Handle to a [`Node`] in a [`Builder`] arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One decision-tree node. A node with a test branches on it: the hold
/// branch commits `infs_hold` and continues at `child_hold`, the
/// fall-through branch likewise. A node without a test is a leaf whose
/// `infs_hold` are the final conclusions to record.
#[derive(Debug)]
pub struct Node {
    pub test: Option<ValueId>,
    pub infs_hold: Vec<InfId>,
    pub infs_fall: Vec<InfId>,
    pub child_hold: Option<NodeId>,
    pub child_fall: Option<NodeId>,
    /// Length of the longest all-tests path below this node.
    pub depth: u32,
}

type FrontierKey = (Box<[ValueId]>, Box<[InfId]>);

/// Decision-tree builder: node arena plus the frontier memo store.
pub struct Builder<'a> {
    table: &'a Table,
    quick: bool,
    nodes: Vec<Node>,
    memo: IndexMap<FrontierKey, NodeId>,
}

impl<'a> Builder<'a> {
    pub fn new(table: &'a Table, quick: bool) -> Self {
        Self {
            table,
            quick,
            nodes: Vec::new(),
            memo: IndexMap::new(),
        }
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Worst-case number of tests performed by the tree under `root`.
    pub fn test_depth(&self, root: NodeId) -> u32 {
        let node = self.node(root);
        if node.test.is_some() { node.depth + 1 } else { 0 }
    }

    /// Build the best tree for a frontier, subject to `bound` on depth.
    pub fn build(&mut self, vals: &[ValueId], infs: &[InfId], bound: u32) -> NodeId {
        let key: FrontierKey = (vals.into(), infs.into());
        if let Some(&id) = self.memo.get(&key) {
            return id;
        }

        let mut candidates = vals.to_vec();
        candidates.sort_by(|&a, &b| self.candidate_cmp(a, b));

        let mut bound = bound;
        let mut best: Option<Node> = None;
        for &test in &candidates {
            let Some(node) = self.try_candidate(vals, infs, test, bound) else {
                continue;
            };
            if node.depth > bound {
                continue;
            }
            if best.as_ref().is_none_or(|b| node.depth < b.depth) {
                bound = node.depth;
                let done = self.quick || node.depth == 0;
                best = Some(node);
                if done {
                    break;
                }
            }
        }

        let node = best.unwrap_or_else(|| Node {
            test: None,
            infs_hold: infs.to_vec(),
            infs_fall: Vec::new(),
            child_hold: None,
            child_fall: None,
            depth: 0,
        });
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        self.memo.insert(key, id);
        id
    }

    /// Construct the node testing `test` at this frontier, or `None`
    /// when the candidate is infeasible.
    fn try_candidate(
        &mut self,
        vals: &[ValueId],
        infs: &[InfId],
        test: ValueId,
        bound: u32,
    ) -> Option<Node> {
        let table = self.table;

        let mut infs_hold = resolved_by_value(table, vals, infs, test);
        let mut infs_fall = resolved_by_siblings(table, vals, infs, test);
        if !infs_hold.is_empty() {
            close_unit_chains(table, &mut infs_hold, infs);
        }
        if !infs_fall.is_empty() {
            close_unit_chains(table, &mut infs_fall, infs);
        }

        // Hold branch continues with what no sibling's outcome covers;
        // fall branch with what this value's outcome does not cover.
        let mut remain_hold: Option<Vec<InfId>> = None;
        for &sibling in &table.name(table.value(test).name).values {
            if sibling == test {
                continue;
            }
            let base = remain_hold.as_deref().unwrap_or(infs);
            remain_hold = Some(minus(table, base, table.reach(sibling)));
        }
        let mut remain_hold = remain_hold.expect("every name carries at least two values");
        let mut remain_fall = minus(table, infs, table.reach(test));

        if !remain_hold.is_empty() && !infs_hold.is_empty() {
            remain_hold = strip(table, &remain_hold, &infs_hold);
        }
        if !remain_fall.is_empty() && !infs_fall.is_empty() {
            remain_fall = strip(table, &remain_fall, &infs_fall);
        }

        let frontier_hold = (!remain_hold.is_empty())
            .then(|| frontier_without_name(table, vals, test, &remain_hold));
        let frontier_fall = (!remain_fall.is_empty())
            .then(|| frontier_without_value(table, vals, test, &remain_fall));

        // A continuation that needs work but has nothing left to test
        // cannot be completed on this branch.
        if frontier_hold.as_ref().is_some_and(|f| f.is_empty())
            || frontier_fall.as_ref().is_some_and(|f| f.is_empty())
        {
            return None;
        }

        let child_hold = frontier_hold.map(|f| self.build(&f, &remain_hold, bound));
        let child_fall = frontier_fall.map(|f| self.build(&f, &remain_fall, bound));

        let depth = match (child_hold, child_fall) {
            (None, None) => 0,
            (Some(h), Some(f)) if self.tests(h) && self.tests(f) => {
                1 + self.node(h).depth.max(self.node(f).depth)
            }
            (Some(h), None) if self.tests(h) => 1 + self.node(h).depth,
            (None, Some(f)) if self.tests(f) => 1 + self.node(f).depth,
            // A child that dead-ends in a leaf leaves its branch's
            // inferences unresolved.
            _ => return None,
        };

        Some(Node {
            test: Some(test),
            infs_hold,
            infs_fall,
            child_hold,
            child_fall,
            depth,
        })
    }

    #[inline]
    fn tests(&self, id: NodeId) -> bool {
        self.node(id).test.is_some()
    }

    /// Candidate preference: primary balance (smallest difference
    /// between the candidate's reachable-inference count and its
    /// siblings' sum), secondary delay (largest smaller side).
    fn candidate_cmp(&self, a: ValueId, b: ValueId) -> std::cmp::Ordering {
        let (own_a, sib_a) = self.weights(a);
        let (own_b, sib_b) = self.weights(b);
        let balance_a = own_a.abs_diff(sib_a);
        let balance_b = own_b.abs_diff(sib_b);
        balance_a
            .cmp(&balance_b)
            .then_with(|| own_b.min(sib_b).cmp(&own_a.min(sib_a)))
    }

    fn weights(&self, v: ValueId) -> (usize, usize) {
        let table = self.table;
        let own = table.reach(v).len();
        let siblings = table
            .name(table.value(v).name)
            .values
            .iter()
            .filter(|&&s| s != v)
            .map(|&s| table.reach(s).len())
            .sum();
        (own, siblings)
    }
}
