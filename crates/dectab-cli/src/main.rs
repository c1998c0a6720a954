mod cli;

#[cfg(test)]
mod cli_tests;

use std::io::Write;

use dectab_compiler::{Error, Loader, Table, compile};

const PROG: &str = "dectab";

fn main() {
    let matches = cli::build_cli().get_matches();
    let params = cli::Params::from_matches(&matches);

    let mut table = Table::new();
    let mut loader = Loader::new();
    for path in &params.files {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                eprintln!("{PROG}: can't open {}: {e}", path.display());
                std::process::exit(1);
            }
        };
        if let Err(e) = loader.load(&mut table, &path.to_string_lossy(), &data) {
            eprintln!("{PROG}: {e}");
            std::process::exit(1);
        }
    }

    eprintln!("{PROG}: Names: {}", table.name_count());
    eprintln!("{PROG}: Inferences: {}", table.inference_count());

    let program = match compile(&mut table, params.quick) {
        Ok(program) => program,
        Err(Error::Analyze(errors)) => {
            for e in errors {
                eprintln!("{PROG}: {e}");
            }
            std::process::exit(1);
        }
        Err(Error::Unresolvable(errors)) => {
            for e in errors {
                eprintln!("{PROG}: {e}");
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{PROG}: {e}");
            std::process::exit(1);
        }
    };

    eprintln!("{PROG}: Independent values: {}", program.independents);
    if let Err(e) = std::io::stdout().write_all(&program.listing) {
        eprintln!("{PROG}: write fail: {e}");
        std::process::exit(1);
    }
}
