//! Command-line definition and parsed parameters.

use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

pub fn build_cli() -> Command {
    Command::new("dectab")
        .about("Compile decision tables into branch-minimal pseudocode")
        .arg(
            Arg::new("quick")
                .short('q')
                .long("quick")
                .action(ArgAction::SetTrue)
                .help("Accept the first feasible test at each node instead of searching"),
        )
        .arg(
            Arg::new("files")
                .value_name("FILE")
                .num_args(1..)
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Decision-table CSV files, loaded in order"),
        )
}

pub struct Params {
    pub quick: bool,
    pub files: Vec<PathBuf>,
}

impl Params {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            quick: matches.get_flag("quick"),
            files: matches
                .get_many::<PathBuf>("files")
                .into_iter()
                .flatten()
                .cloned()
                .collect(),
        }
    }
}
