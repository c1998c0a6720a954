//! The interned object graph built from decision-table rows.
//!
//! Names, values, and inferences are uniquely interned: equal contents
//! produce the same id, so id equality is value equality. Collections
//! are kept sorted under content ordering and membership is by binary
//! search. Children refer back to parents with plain ids; the `Table`
//! registries own everything.

use std::cmp::Ordering;

use dectab_core::ordered::{contains_sorted, insert_sorted, seq_cmp};
use dectab_core::{Interner, Symbol};

/// Handle to a [`Name`] in a [`Table`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NameId(u32);

/// Handle to a [`Value`] in a [`Table`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ValueId(u32);

/// Handle to an [`Inference`] in a [`Table`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct InfId(u32);

/// Handle to a loaded source file path.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SourceId(u32);

/// A named quantity. Owns the sorted list of distinct values observed
/// under it.
#[derive(Debug)]
pub struct Name {
    pub sym: Symbol,
    pub values: Vec<ValueId>,
}

/// A (name, value-symbol) pair.
///
/// `reach` is the set of inferences transitively reachable from this
/// value; it is populated once, for independent values only, by the
/// independence analysis.
#[derive(Debug)]
pub struct Value {
    pub name: NameId,
    pub sym: Symbol,
    reach: Option<Vec<InfId>>,
}

/// One decision-table row: a conclusion value holding whenever every
/// condition value holds. Conditions are sorted and never share a name.
#[derive(Debug)]
pub struct Inference {
    pub conclusion: ValueId,
    pub conditions: Vec<ValueId>,
    pub source: SourceId,
    pub row: u64,
}

/// The compilation context: interner plus the name/value/inference
/// registries. Everything downstream of the loader reads through it.
#[derive(Default)]
pub struct Table {
    pub interner: Interner,
    names: Vec<Name>,
    values: Vec<Value>,
    infs: Vec<Inference>,
    /// Name registry in content order.
    names_sorted: Vec<NameId>,
    /// Inference registry ordered by (conclusion, conditions).
    infs_sorted: Vec<InfId>,
    sources: Vec<String>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn name(&self, id: NameId) -> &Name {
        &self.names[id.0 as usize]
    }

    #[inline]
    pub fn value(&self, id: ValueId) -> &Value {
        &self.values[id.0 as usize]
    }

    #[inline]
    pub fn inference(&self, id: InfId) -> &Inference {
        &self.infs[id.0 as usize]
    }

    /// All names in content order.
    #[inline]
    pub fn names(&self) -> &[NameId] {
        &self.names_sorted
    }

    /// All inferences ordered by (conclusion, conditions).
    #[inline]
    pub fn inferences(&self) -> &[InfId] {
        &self.infs_sorted
    }

    #[inline]
    pub fn name_count(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn inference_count(&self) -> usize {
        self.infs.len()
    }

    pub fn add_source(&mut self, path: &str) -> SourceId {
        self.sources.push(path.to_owned());
        SourceId(self.sources.len() as u32 - 1)
    }

    #[inline]
    pub fn source_path(&self, id: SourceId) -> &str {
        &self.sources[id.0 as usize]
    }

    // ----- content ordering -------------------------------------------------

    #[inline]
    pub fn name_cmp(&self, a: NameId, b: NameId) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        self.interner.cmp(self.name(a).sym, self.name(b).sym)
    }

    /// (name, then value symbol).
    #[inline]
    pub fn value_cmp(&self, a: ValueId, b: ValueId) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        let (va, vb) = (self.value(a), self.value(b));
        self.name_cmp(va.name, vb.name)
            .then_with(|| self.interner.cmp(va.sym, vb.sym))
    }

    /// (conclusion, then conditions lexicographically).
    #[inline]
    pub fn inf_cmp(&self, a: InfId, b: InfId) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        let (ia, ib) = (self.inference(a), self.inference(b));
        self.value_cmp(ia.conclusion, ib.conclusion)
            .then_with(|| self.value_seq_cmp(&ia.conditions, &ib.conditions))
    }

    #[inline]
    pub fn value_seq_cmp(&self, a: &[ValueId], b: &[ValueId]) -> Ordering {
        seq_cmp(a, b, |&x, &y| self.value_cmp(x, y))
    }

    // ----- interning --------------------------------------------------------

    /// Intern a name by its symbol, returning the canonical id.
    pub fn intern_name(&mut self, sym: Symbol) -> NameId {
        let pos = self
            .names_sorted
            .binary_search_by(|&n| self.interner.cmp(self.names[n.0 as usize].sym, sym));
        match pos {
            Ok(i) => self.names_sorted[i],
            Err(i) => {
                let id = NameId(self.names.len() as u32);
                self.names.push(Name {
                    sym,
                    values: Vec::new(),
                });
                self.names_sorted.insert(i, id);
                id
            }
        }
    }

    /// Intern a value under `name`, returning the canonical id. A new
    /// value is also entered into its name's sorted value list.
    pub fn intern_value(&mut self, name: NameId, sym: Symbol) -> ValueId {
        let pos = self.names[name.0 as usize].values.binary_search_by(|&v| {
            self.interner.cmp(self.values[v.0 as usize].sym, sym)
        });
        match pos {
            Ok(i) => self.name(name).values[i],
            Err(i) => {
                let id = ValueId(self.values.len() as u32);
                self.values.push(Value {
                    name,
                    sym,
                    reach: None,
                });
                self.names[name.0 as usize].values.insert(i, id);
                id
            }
        }
    }

    /// Intern an inference. `Err(existing)` reports a duplicate: an
    /// inference with the same conclusion and conditions was already
    /// loaded (from a possibly different source row).
    pub fn intern_inference(&mut self, inf: Inference) -> Result<InfId, InfId> {
        let pos = self.infs_sorted.binary_search_by(|&i| {
            let e = &self.infs[i.0 as usize];
            self.value_cmp(e.conclusion, inf.conclusion)
                .then_with(|| self.value_seq_cmp(&e.conditions, &inf.conditions))
        });
        match pos {
            Ok(i) => Err(self.infs_sorted[i]),
            Err(i) => {
                let id = InfId(self.infs.len() as u32);
                self.infs.push(inf);
                self.infs_sorted.insert(i, id);
                Ok(id)
            }
        }
    }

    // ----- reachable inferences ---------------------------------------------

    /// Whether any inference concludes `v`. The registry is ordered by
    /// conclusion first, so a conclusion-only probe is safe.
    pub fn is_concluded(&self, v: ValueId) -> bool {
        self.infs_sorted
            .binary_search_by(|&i| self.value_cmp(self.inference(i).conclusion, v))
            .is_ok()
    }

    /// Conclusion-only membership probe on any (conclusion, conditions)
    /// ordered inference slice.
    pub fn concludes_value(&self, set: &[InfId], v: ValueId) -> bool {
        set.binary_search_by(|&i| self.value_cmp(self.inference(i).conclusion, v))
            .is_ok()
    }

    /// Record the reachable-inference set of an independent value.
    /// Written exactly once by the independence analysis.
    pub fn set_reach(&mut self, v: ValueId, reach: Vec<InfId>) {
        debug_assert!(self.values[v.0 as usize].reach.is_none());
        self.values[v.0 as usize].reach = Some(reach);
    }

    /// Whether the reachable set of `v` has been populated.
    #[inline]
    pub fn has_reach(&self, v: ValueId) -> bool {
        self.value(v).reach.is_some()
    }

    /// The reachable-inference set of an independent value.
    ///
    /// # Panics
    /// Panics if the independence analysis has not populated `v`.
    #[inline]
    pub fn reach(&self, v: ValueId) -> &[InfId] {
        self.value(v)
            .reach
            .as_deref()
            .expect("reachable set populated by independence analysis")
    }

    // ----- frontier-set helpers ---------------------------------------------

    /// Insert into a value set kept in content order.
    pub fn add_value(&self, set: &mut Vec<ValueId>, v: ValueId) -> bool {
        insert_sorted(set, v, |&a, &b| self.value_cmp(a, b))
    }

    /// Insert into an inference set kept in (conclusion, conditions) order.
    pub fn add_inf(&self, set: &mut Vec<InfId>, i: InfId) -> bool {
        insert_sorted(set, i, |&a, &b| self.inf_cmp(a, b))
    }

    pub fn values_contain(&self, set: &[ValueId], v: ValueId) -> bool {
        contains_sorted(set, &v, |&a, &b| self.value_cmp(a, b))
    }
}
