//! Consistency check and listing emission.
//!
//! The check walks every branch bucket for two conclusions that bind
//! the same name to different values - the table is unresolvable and
//! nothing is emitted. Emission then linearizes the tree into the
//! line-oriented listing: `I`/`O` interface lines, the `D` depth
//! header, `T`/`R`/`L`/`J` opcodes, and the terminal `L,0`. Branch
//! tails are shared: a tail whose (node, conclusion values) pair was
//! already written is replaced by a jump to its label.

use thiserror::Error;

use crate::build::{Builder, NodeId};
use crate::table::{InfId, Table, ValueId};

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("listing write fail: {0}")]
    Csv(#[from] csv::Error),
}

/// Two inferences concluding different values of one name in the same
/// branch bucket.
#[derive(Debug, Error)]
#[error(
    "unresolvable \"{name}\": \"{first_value}\" @{first_path}:{first_row} vs \"{second_value}\" @{second_path}:{second_row}"
)]
pub struct Unresolvable {
    pub name: String,
    pub first_value: String,
    pub first_path: String,
    pub first_row: u64,
    pub second_value: String,
    pub second_path: String,
    pub second_row: u64,
}

/// Verify that no branch bucket commits conflicting conclusions.
pub fn check(table: &Table, builder: &Builder, root: NodeId) -> Result<(), Vec<Unresolvable>> {
    let mut errors = Vec::new();
    check_node(table, builder, root, &mut errors);
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn check_node(table: &Table, builder: &Builder, id: NodeId, errors: &mut Vec<Unresolvable>) {
    let node = builder.node(id);
    check_bucket(table, &node.infs_hold, errors);
    check_bucket(table, &node.infs_fall, errors);
    if let Some(child) = node.child_hold {
        check_node(table, builder, child, errors);
    }
    if let Some(child) = node.child_fall {
        check_node(table, builder, child, errors);
    }
}

fn check_bucket(table: &Table, infs: &[InfId], errors: &mut Vec<Unresolvable>) {
    for (i, &a) in infs.iter().enumerate() {
        for &b in &infs[i + 1..] {
            let (ia, ib) = (table.inference(a), table.inference(b));
            let (va, vb) = (table.value(ia.conclusion), table.value(ib.conclusion));
            if va.name == vb.name && ia.conclusion != ib.conclusion {
                errors.push(Unresolvable {
                    name: table.interner.display(table.name(va.name).sym).into_owned(),
                    first_value: table.interner.display(va.sym).into_owned(),
                    first_path: table.source_path(ia.source).to_owned(),
                    first_row: ia.row,
                    second_value: table.interner.display(vb.sym).into_owned(),
                    second_path: table.source_path(ib.source).to_owned(),
                    second_row: ib.row,
                });
            }
        }
    }
}

/// Emit the complete listing for a checked tree.
pub fn emit(
    table: &Table,
    builder: &Builder,
    root: NodeId,
    independents: &[ValueId],
) -> Result<Vec<u8>, EmitError> {
    let mut emitter = Emitter {
        table,
        builder,
        writer: csv::WriterBuilder::new().from_writer(Vec::new()),
        branches: Vec::new(),
        labels: vec![0; builder.node_count()],
        next_label: 1,
    };

    for &v in independents {
        emitter.value_record(b"I", v)?;
    }
    let infs = table.inferences();
    for (i, &inf) in infs.iter().enumerate() {
        // Distinct conclusions only; the registry orders by conclusion.
        let conclusion = table.inference(inf).conclusion;
        if i > 0 && table.inference(infs[i - 1]).conclusion == conclusion {
            continue;
        }
        emitter.value_record(b"O", conclusion)?;
    }
    let depth = builder.test_depth(root) + 1;
    emitter.record(&[b"D", depth.to_string().as_bytes()])?;

    emitter.node(root)?;
    emitter.record(&[b"L", b"0"])?;

    emitter
        .writer
        .into_inner()
        .map_err(|e| EmitError::Csv(e.into_error().into()))
}

/// A branch tail already written, keyed by its continuation node and
/// the conclusion values it records.
struct Branch {
    infs: Vec<InfId>,
    node: Option<NodeId>,
    label: u32,
}

struct Emitter<'a> {
    table: &'a Table,
    builder: &'a Builder<'a>,
    writer: csv::Writer<Vec<u8>>,
    branches: Vec<Branch>,
    /// Per-node label, set on first visit; 0 means unvisited.
    labels: Vec<u32>,
    next_label: u32,
}

impl<'a> Emitter<'a> {
    fn record(&mut self, fields: &[&[u8]]) -> Result<(), EmitError> {
        self.writer.write_record(fields)?;
        Ok(())
    }

    fn value_record(&mut self, op: &[u8], v: ValueId) -> Result<(), EmitError> {
        let table = self.table;
        let value = table.value(v);
        let name = table.interner.resolve(table.name(value.name).sym);
        let sym = table.interner.resolve(value.sym);
        self.writer.write_record([op, name, sym])?;
        Ok(())
    }

    fn node(&mut self, id: NodeId) -> Result<(), EmitError> {
        if self.labels[id.index()] != 0 {
            let label = self.labels[id.index()].to_string();
            return self.record(&[b"J", label.as_bytes()]);
        }
        let builder = self.builder;
        let node = builder.node(id);

        let Some(test) = node.test else {
            self.labels[id.index()] = self.next_label;
            return self.conclusions(&node.infs_hold);
        };

        let (label, dup) = self.branch_label(&node.infs_hold, node.child_hold);
        self.labels[id.index()] = label;

        let table = self.table;
        let value = table.value(test);
        let name = table.interner.resolve(table.name(value.name).sym);
        let sym = table.interner.resolve(value.sym);
        let label_text = label.to_string();
        self.writer
            .write_record([b"T".as_slice(), name, sym, label_text.as_bytes()])?;

        self.branch(&node.infs_fall, node.child_fall)?;
        if !dup {
            self.record(&[b"L", label_text.as_bytes()])?;
            self.branch_content(&node.infs_hold, node.child_hold)?;
        }
        Ok(())
    }

    fn branch(&mut self, infs: &[InfId], node: Option<NodeId>) -> Result<(), EmitError> {
        let (label, dup) = self.branch_label(infs, node);
        let label_text = label.to_string();
        if dup {
            self.record(&[b"J", label_text.as_bytes()])
        } else {
            self.record(&[b"L", label_text.as_bytes()])?;
            self.branch_content(infs, node)
        }
    }

    fn branch_content(&mut self, infs: &[InfId], node: Option<NodeId>) -> Result<(), EmitError> {
        self.conclusions(infs)?;
        match node {
            Some(id) => self.node(id),
            None => self.record(&[b"J", b"0"]),
        }
    }

    fn conclusions(&mut self, infs: &[InfId]) -> Result<(), EmitError> {
        for &inf in infs {
            self.value_record(b"R", self.table.inference(inf).conclusion)?;
        }
        Ok(())
    }

    /// Find or reserve the label for a branch tail. `true` means the
    /// tail was already written and the caller jumps instead.
    fn branch_label(&mut self, infs: &[InfId], node: Option<NodeId>) -> (u32, bool) {
        for branch in &self.branches {
            if branch.node == node && self.same_conclusions(&branch.infs, infs) {
                return (branch.label, true);
            }
        }
        let label = self.next_label;
        self.next_label += 1;
        self.branches.push(Branch {
            infs: infs.to_vec(),
            node,
            label,
        });
        (label, false)
    }

    /// Tails are interchangeable when they record the same conclusion
    /// values in the same order.
    fn same_conclusions(&self, a: &[InfId], b: &[InfId]) -> bool {
        a.len() == b.len()
            && a.iter().zip(b).all(|(&x, &y)| {
                self.table.inference(x).conclusion == self.table.inference(y).conclusion
            })
    }
}
