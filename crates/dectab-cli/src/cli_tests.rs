use std::path::PathBuf;

use crate::cli::{Params, build_cli};

#[test]
fn parses_files_in_order() {
    let matches = build_cli()
        .try_get_matches_from(["dectab", "one.csv", "two.csv"])
        .expect("valid invocation");
    let params = Params::from_matches(&matches);

    assert!(!params.quick);
    assert_eq!(
        params.files,
        vec![PathBuf::from("one.csv"), PathBuf::from("two.csv")]
    );
}

#[test]
fn parses_quick_flag() {
    let matches = build_cli()
        .try_get_matches_from(["dectab", "-q", "table.csv"])
        .expect("valid invocation");
    let params = Params::from_matches(&matches);

    assert!(params.quick);
    assert_eq!(params.files, vec![PathBuf::from("table.csv")]);
}

#[test]
fn requires_at_least_one_file() {
    build_cli()
        .try_get_matches_from(["dectab"])
        .expect_err("no files given");

    build_cli()
        .try_get_matches_from(["dectab", "-q"])
        .expect_err("flag without files");
}
