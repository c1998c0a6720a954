//! Pre-build validation and independence analysis.
//!
//! An independent value is one that is never the conclusion of any
//! inference; the evaluating caller supplies it as an input. For every
//! independent value the analysis records the set of inferences
//! transitively reachable from it: the inferences conditioned on it,
//! plus (iteratively) the inferences conditioned on their conclusions.

use thiserror::Error;

use crate::table::{InfId, Table, ValueId};

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("{name} has fewer than two values")]
    FewValues { name: String },

    #[error("{path} row {row} has no conditions")]
    NoConditions { path: String, row: u64 },

    #[error("no independent values")]
    NoIndependentValues,

    #[error("independent name {name} has dependent value {value}")]
    DependentValue { name: String, value: String },
}

/// Structural checks that must hold before any analysis: every name
/// carries at least two distinct values, every inference at least one
/// condition. All violations are reported together.
pub fn validate(table: &Table) -> Result<(), Vec<AnalyzeError>> {
    let mut errors = Vec::new();
    for &n in table.names() {
        if table.name(n).values.len() < 2 {
            errors.push(AnalyzeError::FewValues {
                name: table.interner.display(table.name(n).sym).into_owned(),
            });
        }
    }
    for &i in table.inferences() {
        let inf = table.inference(i);
        if inf.conditions.is_empty() {
            errors.push(AnalyzeError::NoConditions {
                path: table.source_path(inf.source).to_owned(),
                row: inf.row,
            });
        }
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Find every independent value, populate its reachable-inference set,
/// and return the independent values in content order.
pub fn independent_values(table: &mut Table) -> Result<Vec<ValueId>, Vec<AnalyzeError>> {
    let mut inds: Vec<ValueId> = Vec::new();
    for &n in table.names() {
        for &v in &table.name(n).values {
            if !table.is_concluded(v) {
                table.add_value(&mut inds, v);
            }
        }
    }
    if inds.is_empty() {
        return Err(vec![AnalyzeError::NoIndependentValues]);
    }

    let reaches: Vec<_> = inds.iter().map(|&v| reachable(table, v)).collect();
    for (&v, reach) in inds.iter().zip(reaches) {
        table.set_reach(v, reach);
    }
    Ok(inds)
}

/// Every value of an independent name must itself be independent;
/// a dependent value there means the name is both supplied and
/// concluded, which the tree cannot test consistently.
pub fn check_independent_names(table: &Table, inds: &[ValueId]) -> Result<(), Vec<AnalyzeError>> {
    let mut errors = Vec::new();
    for &v in inds {
        let name = table.value(v).name;
        for &sibling in &table.name(name).values {
            if !table.has_reach(sibling) {
                errors.push(AnalyzeError::DependentValue {
                    name: table.interner.display(table.name(name).sym).into_owned(),
                    value: table
                        .interner
                        .display(table.value(sibling).sym)
                        .into_owned(),
                });
            }
        }
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Transitive closure of inferences reachable from `start`, by
/// worklist over newly reached conclusions.
fn reachable(table: &Table, start: ValueId) -> Vec<InfId> {
    let mut reach = Vec::new();
    let mut frontier = vec![start];
    while let Some(v) = frontier.pop() {
        for &i in table.inferences() {
            let inf = table.inference(i);
            if table.values_contain(&inf.conditions, v) && table.add_inf(&mut reach, i) {
                frontier.push(inf.conclusion);
            }
        }
    }
    reach
}
