//! dectab compiler: decision tables in, branch-minimal pseudocode out.
//!
//! This crate provides the compilation pipeline:
//! - `table` - the interned object graph (names, values, inferences)
//! - `load` - CSV row loader
//! - `analyze` - independence analysis and validation
//! - `resolve` - resolution algebra over recursion frontiers
//! - `build` - memoized decision-tree synthesis
//! - `emit` - consistency check and listing emission

pub mod analyze;
pub mod build;
pub mod emit;
pub mod load;
pub mod resolve;
pub mod table;

#[cfg(test)]
pub mod test_utils;

#[cfg(test)]
mod build_tests;

pub use analyze::AnalyzeError;
pub use build::Builder;
pub use emit::{EmitError, Unresolvable};
pub use load::{LoadError, Loader};
pub use table::Table;

/// Errors from the post-load pipeline. Loader errors surface separately
/// through [`Loader::load`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("analysis failed with {} errors", .0.len())]
    Analyze(Vec<AnalyzeError>),

    #[error("table is unresolvable at {} conclusions", .0.len())]
    Unresolvable(Vec<Unresolvable>),

    #[error(transparent)]
    Emit(#[from] EmitError),
}

/// A successfully compiled program.
#[derive(Debug)]
pub struct Program {
    /// The complete listing, CSV-encoded line by line.
    pub listing: Vec<u8>,
    /// How many independent values the caller must supply.
    pub independents: usize,
}

/// Run the post-load pipeline over a loaded table: validate, analyze
/// independence, build the tree, check it, and emit the listing.
pub fn compile(table: &mut Table, quick: bool) -> Result<Program, Error> {
    analyze::validate(table).map_err(Error::Analyze)?;
    let independents = analyze::independent_values(table).map_err(Error::Analyze)?;
    analyze::check_independent_names(table, &independents).map_err(Error::Analyze)?;

    let mut builder = Builder::new(table, quick);
    let root = builder.build(&independents, table.inferences(), independents.len() as u32);

    emit::check(table, &builder, root).map_err(Error::Unresolvable)?;
    let listing = emit::emit(table, &builder, root, &independents)?;
    Ok(Program {
        listing,
        independents: independents.len(),
    })
}
