//! The resolution algebra the tree builder reasons with.
//!
//! A recursion frontier is a pair of sorted sets: the values still free
//! to be tested and the inferences not yet resolved. The operations
//! here answer, for a candidate test value, which inferences each
//! branch outcome settles and which values each branch still needs.

use std::cmp::Ordering;

use crate::table::{InfId, Table, ValueId};

/// Inferences in `infs` settled by `val` testing true: the inferences
/// reachable from `val` whose every other condition is neither still
/// testable nor held up by an inference that still depends on a
/// testable value.
pub fn resolved_by_value(
    table: &Table,
    vals: &[ValueId],
    infs: &[InfId],
    val: ValueId,
) -> Vec<InfId> {
    let reach = table.reach(val);
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < infs.len() && j < reach.len() {
        match table.inf_cmp(infs[i], reach[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                if conditions_settled(table, vals, infs, infs[i], val) {
                    out.push(infs[i]);
                }
                i += 1;
                j += 1;
            }
        }
    }
    out
}

fn conditions_settled(
    table: &Table,
    vals: &[ValueId],
    infs: &[InfId],
    inf: InfId,
    val: ValueId,
) -> bool {
    table.inference(inf).conditions.iter().all(|&w| {
        w == val
            || (!table.values_contain(vals, w) && !support_pending(table, vals, infs, w))
    })
}

/// Whether some inference concluding `w` still depends on a testable
/// value, i.e. `w` cannot be taken as settled yet.
fn support_pending(table: &Table, vals: &[ValueId], infs: &[InfId], w: ValueId) -> bool {
    infs.iter().any(|&m| {
        let m = table.inference(m);
        m.conclusion == w && m.conditions.iter().any(|&c| table.values_contain(vals, c))
    })
}

/// Inferences settled when `val` tests false: the fold of
/// [`resolved_by_value`] over every other still-testable value of the
/// same name, each step feeding the previous result in as the
/// remaining inferences. Empty when `val` has no testable sibling.
pub fn resolved_by_siblings(
    table: &Table,
    vals: &[ValueId],
    infs: &[InfId],
    val: ValueId,
) -> Vec<InfId> {
    let mut acc: Option<Vec<InfId>> = None;
    for &sibling in &table.name(table.value(val).name).values {
        if sibling == val || !table.values_contain(vals, sibling) {
            continue;
        }
        let base = acc.as_deref().unwrap_or(infs);
        acc = Some(resolved_by_value(table, vals, base, sibling));
    }
    acc.unwrap_or_default()
}

/// Single-dependency transitive closure: starting from `start`, pull in
/// every inference of `infs` whose only condition is already implied,
/// chaining through the conclusions so pulled in.
pub fn unit_chain_closure(table: &Table, start: ValueId, infs: &[InfId], acc: &mut Vec<InfId>) {
    let mut frontier = vec![start];
    while let Some(v) = frontier.pop() {
        for &i in infs {
            let inf = table.inference(i);
            if inf.conditions.len() == 1 && inf.conditions[0] == v && table.add_inf(acc, i) {
                frontier.push(inf.conclusion);
            }
        }
    }
}

/// Inflate a resolved set with every unit chain its conclusions imply.
pub fn close_unit_chains(table: &Table, set: &mut Vec<InfId>, infs: &[InfId]) {
    let mut i = 0;
    while i < set.len() {
        let conclusion = table.inference(set[i]).conclusion;
        unit_chain_closure(table, conclusion, infs, set);
        i += 1;
    }
}

/// Frontier for the branch where `val` held: drop every value of
/// `val`'s name, keep only values some remaining inference still
/// conditions on.
pub fn frontier_without_name(
    table: &Table,
    vals: &[ValueId],
    val: ValueId,
    infs: &[InfId],
) -> Vec<ValueId> {
    let name = table.value(val).name;
    vals.iter()
        .copied()
        .filter(|&v| table.value(v).name != name && referenced(table, infs, v))
        .collect()
}

/// Frontier for the branch where `val` did not hold: drop `val` but
/// keep its siblings, keep only referenced values; if exactly one
/// sibling survives its value is already determined, so drop the name
/// entirely.
pub fn frontier_without_value(
    table: &Table,
    vals: &[ValueId],
    val: ValueId,
    infs: &[InfId],
) -> Vec<ValueId> {
    let name = table.value(val).name;
    let mut out = Vec::new();
    let mut same_name = 0;
    for &v in vals {
        if v == val || !referenced(table, infs, v) {
            continue;
        }
        out.push(v);
        if table.value(v).name == name {
            same_name += 1;
        }
    }
    if same_name == 1 {
        out.retain(|&v| table.value(v).name != name);
    }
    out
}

fn referenced(table: &Table, infs: &[InfId], v: ValueId) -> bool {
    infs.iter()
        .any(|&i| table.values_contain(&table.inference(i).conditions, v))
}

/// Ordered set difference on (conclusion, conditions) sorted slices.
pub fn minus(table: &Table, a: &[InfId], b: &[InfId]) -> Vec<InfId> {
    let mut out = Vec::with_capacity(a.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match table.inf_cmp(a[i], b[j]) {
            Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out
}

/// Remove from `a` every inference whose conclusion is already
/// concluded in `b`, or that conditions on a (different) value whose
/// name some conclusion of `b` determines. Keeps a branch from
/// re-deriving what its prefix already committed.
pub fn strip(table: &Table, a: &[InfId], b: &[InfId]) -> Vec<InfId> {
    a.iter()
        .copied()
        .filter(|&i| {
            let inf = table.inference(i);
            if table.concludes_value(b, inf.conclusion) {
                return false;
            }
            !inf.conditions.iter().any(|&w| {
                b.iter().any(|&k| {
                    let concluded = table.inference(k).conclusion;
                    w != concluded && table.value(w).name == table.value(concluded).name
                })
            })
        })
        .collect()
}
