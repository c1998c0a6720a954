//! Shared fixtures and helpers for compiler tests.

use crate::load::Loader;
use crate::table::{InfId, Table, ValueId};
use crate::{Error, Program, compile};

/// Load one CSV fixture into a fresh table, panicking on load errors.
pub fn table_from(text: &str) -> Table {
    let mut table = Table::new();
    let mut loader = Loader::new();
    loader
        .load(&mut table, "test.csv", text.as_bytes())
        .expect("fixture loads");
    table
}

/// Table plus its independent values, analysis already run.
pub fn analyzed(text: &str) -> (Table, Vec<ValueId>) {
    let mut table = table_from(text);
    let independents =
        crate::analyze::independent_values(&mut table).expect("fixture has independent values");
    (table, independents)
}

pub fn compile_str(text: &str, quick: bool) -> Result<Program, Error> {
    let mut table = table_from(text);
    compile(&mut table, quick)
}

/// Compile (non-quick) and return the listing as text.
pub fn listing(text: &str) -> String {
    let program = compile_str(text, false).expect("fixture compiles");
    String::from_utf8(program.listing).expect("listing is utf-8")
}

/// Look up an interned value by name and value text.
pub fn value_id(table: &Table, name: &str, value: &str) -> ValueId {
    let &name_id = table
        .names()
        .iter()
        .find(|&&n| table.interner.resolve(table.name(n).sym) == name.as_bytes())
        .expect("name exists");
    *table
        .name(name_id)
        .values
        .iter()
        .find(|&&v| table.interner.resolve(table.value(v).sym) == value.as_bytes())
        .expect("value exists")
}

/// All inferences concluding the given (name, value), in registry order.
pub fn infs_concluding(table: &Table, name: &str, value: &str) -> Vec<InfId> {
    let conclusion = value_id(table, name, value);
    table
        .inferences()
        .iter()
        .copied()
        .filter(|&i| table.inference(i).conclusion == conclusion)
        .collect()
}

/// The traffic-light table used by several tests: three independent
/// names (canStop, isClose, signal) deciding accel, brake, and proceed.
pub const TRAFFIC: &str = "\
@proceed,signal,canStop
yes,green,
no,red,
no,yellow,yes
yes,yellow,no
@brake,signal,canStop
yes,red,
yes,yellow,yes
no,green,
no,yellow,no
@accel,signal,isClose
yes,green,no
no,green,yes
no,red,
no,yellow,
";

/// Replay an emitted listing against an assignment of independent
/// values, returning the recorded conclusions in sorted order.
pub fn replay(listing: &str, env: &[(&str, &str)]) -> Vec<(String, String)> {
    enum Op {
        Test(String, String, u32),
        Record(String, String),
        Label(u32),
        Jump(u32),
    }

    let mut ops = Vec::new();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(listing.as_bytes());
    for record in reader.records() {
        let record = record.expect("listing parses as csv");
        let field = |i: usize| record.get(i).expect("operand present").to_owned();
        let label = |i: usize| field(i).parse::<u32>().expect("numeric label");
        match record.get(0).expect("opcode present") {
            "I" | "O" | "D" => {}
            "T" => ops.push(Op::Test(field(1), field(2), label(3))),
            "R" => ops.push(Op::Record(field(1), field(2))),
            "L" => ops.push(Op::Label(label(1))),
            "J" => ops.push(Op::Jump(label(1))),
            other => panic!("unknown opcode {other}"),
        }
    }

    let mut label_at = std::collections::HashMap::new();
    for (pc, op) in ops.iter().enumerate() {
        if let Op::Label(l) = op {
            assert!(
                label_at.insert(*l, pc).is_none(),
                "label {l} defined twice"
            );
        }
    }

    let mut conclusions = Vec::new();
    let mut pc = 0;
    while pc < ops.len() {
        match &ops[pc] {
            Op::Test(name, value, target) => {
                let held = env
                    .iter()
                    .any(|&(n, v)| n == name.as_str() && v == value.as_str());
                pc = if held { label_at[target] } else { pc + 1 };
            }
            Op::Record(name, value) => {
                conclusions.push((name.clone(), value.clone()));
                pc += 1;
            }
            Op::Label(0) => break,
            Op::Label(_) => pc += 1,
            Op::Jump(0) => break,
            Op::Jump(target) => pc = label_at[target],
        }
    }

    conclusions.sort();
    conclusions.dedup();
    conclusions
}
