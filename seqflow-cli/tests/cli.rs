use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use rstest::rstest;
use std::io::Write;
use tempfile::NamedTempFile;

fn input(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(text.as_bytes()).expect("write input");
    file
}

const FRUIT: &str = "banana\napple\n  cherry  \nbanana\nblueberry\n";

#[test]
fn prints_lines_unchanged_by_default() {
    let file = input(FRUIT);
    let mut cmd = cargo_bin_cmd!("seqflow");
    cmd.arg(file.path());

    cmd.assert().success().stdout(FRUIT);
}

#[rstest]
#[case(&["--grep", "^b", "--distinct"], "banana\nblueberry\n")]
#[case(&["--exclude", "an", "--trim"], "apple\ncherry\nblueberry\n")]
#[case(&["--trim", "--sort"], "apple\nbanana\nbanana\nblueberry\ncherry\n")]
#[case(&["--trim", "--sort", "--reverse", "--take", "2"], "cherry\nblueberry\n")]
#[case(&["--skip", "1", "--drop-right", "2"], "apple\n  cherry  \n")]
#[case(&["--distinct", "--count"], "4\n")]
#[case(&["--trim", "--upper", "--take", "3"], "BANANA\nAPPLE\nCHERRY\n")]
fn applies_stages(#[case] args: &[&str], #[case] expected: &str) {
    let file = input(FRUIT);
    let mut cmd = cargo_bin_cmd!("seqflow");
    cmd.arg(file.path()).args(args);

    cmd.assert().success().stdout(expected.to_string());
}

#[test]
fn parallel_upper_keeps_order() {
    let file = input("d\nc\nb\na\n");
    let mut config = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config");
    writeln!(config, "[executor]\nthread = 2").expect("write config");

    let mut cmd = cargo_bin_cmd!("seqflow");
    cmd.arg(file.path())
        .arg("--upper")
        .arg("--parallel")
        .arg("--config")
        .arg(config.path());

    cmd.assert().success().stdout("D\nC\nB\nA\n");
}

#[test]
fn chunks_use_configured_separator() {
    let file = input("1\n2\n3\n4\n5\n");
    let mut config = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp config");
    writeln!(config, "[output]\nformat = \"text\"\nchunk_separator = \",\"").expect("write config");

    let mut cmd = cargo_bin_cmd!("seqflow");
    cmd.arg(file.path())
        .arg("--chunk")
        .arg("2")
        .arg("--config")
        .arg(config.path());

    cmd.assert().success().stdout("1,2\n3,4\n5\n");
}

#[test]
fn json_output() {
    let file = input("a\nb\nc\n");
    let mut cmd = cargo_bin_cmd!("seqflow");
    cmd.arg(file.path()).args(["--chunk", "2", "--format", "json"]);

    let output = cmd.assert().success().get_output().stdout.clone();
    let parsed: Vec<Vec<String>> =
        serde_json::from_slice(&output).expect("stdout to be a json array");
    assert_eq!(parsed, vec![vec!["a", "b"], vec!["c"]]);
}

#[test]
fn missing_file_fails() {
    let mut cmd = cargo_bin_cmd!("seqflow");
    cmd.arg("/no/such/input.txt");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("file not found: /no/such/input.txt"));
}

#[test]
fn zero_chunk_is_rejected() {
    let file = input("a\n");
    let mut cmd = cargo_bin_cmd!("seqflow");
    cmd.arg(file.path()).args(["--chunk", "0"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid argument"));
}

#[test]
fn bad_regex_is_reported() {
    let file = input("a\n");
    let mut cmd = cargo_bin_cmd!("seqflow");
    cmd.arg(file.path()).args(["--grep", "("]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --grep pattern"));
}

#[test]
fn huge_drop_right_drops_everything() {
    let file = input("a\nb\nc\n");
    let mut cmd = cargo_bin_cmd!("seqflow");
    cmd.arg(file.path()).args(["--drop-right", "1099511627776"]);

    cmd.assert().success().stdout("");
}

#[test]
fn project_config_in_working_directory_is_picked_up() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("seqflow.toml"), "[output]\nformat = \"json\"\n")
        .expect("write project config");
    let file = input("a\nb\n");

    let mut cmd = cargo_bin_cmd!("seqflow");
    cmd.current_dir(dir.path()).arg(file.path());

    let output = cmd.assert().success().get_output().stdout.clone();
    let parsed: Vec<String> = serde_json::from_slice(&output).expect("stdout to be a json array");
    assert_eq!(parsed, vec!["a", "b"]);

    // --format still wins over the project file
    let mut cmd = cargo_bin_cmd!("seqflow");
    cmd.current_dir(dir.path()).arg(file.path()).args(["--format", "text"]);
    cmd.assert().success().stdout("a\nb\n");
}
