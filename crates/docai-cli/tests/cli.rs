use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const CONTRACT: &str = "<head>Agreement</head>
<list kind=\".\">
1. Scope
2. Fees
2.1. Monthly
</list>
<dict sep=\":\">
Party: Acme
</dict>
";

#[test]
fn parse_prints_canonical_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.txt");
    fs::write(&path, "<head>Title</head>\nBody").unwrap();

    let mut cmd = cargo_bin_cmd!("docai");
    cmd.arg("parse").arg(path.as_os_str());

    cmd.assert()
        .success()
        .stdout(r#"{"kind":"block","head":"Title","body":["Body"]}"#.to_owned() + "\n");
}

#[test]
fn parse_reads_stdin() {
    let mut cmd = cargo_bin_cmd!("docai");
    cmd.arg("parse").arg("-").write_stdin("");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#"{"kind":"block"}"#));
}

#[test]
fn parse_pretty_indents_output() {
    let mut cmd = cargo_bin_cmd!("docai");
    cmd.args(["parse", "--pretty", "-"]).write_stdin(CONTRACT);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\n  \"head\": \"Agreement\""));
}

#[test]
fn parse_rejects_invalid_utf8() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("binary.txt");
    fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

    let mut cmd = cargo_bin_cmd!("docai");
    cmd.arg("parse").arg(path.as_os_str());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not valid UTF-8"));
}

#[test]
fn parse_missing_file_fails() {
    let mut cmd = cargo_bin_cmd!("docai");
    cmd.args(["parse", "does-not-exist.txt"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn max_depth_flag_flattens_nested_blocks() {
    let mut cmd = cargo_bin_cmd!("docai");
    cmd.args(["--max-depth", "0", "parse", "-"])
        .write_stdin("<block>\ninner\n</block>");

    cmd.assert()
        .success()
        .stdout(r#"{"kind":"block","body":["inner"]}"#.to_owned() + "\n")
        .stderr(predicate::str::contains("flattened"));
}

#[test]
fn max_depth_reads_environment() {
    let mut cmd = cargo_bin_cmd!("docai");
    cmd.env("DOCAI_MAX_DEPTH", "0")
        .args(["parse", "-"])
        .write_stdin("<block>\ninner\n</block>");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""body":["inner"]"#));
}

#[test]
fn validate_clean_document_succeeds() {
    let mut cmd = cargo_bin_cmd!("docai");
    cmd.args(["validate", "-"]).write_stdin(CONTRACT);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Valid"));
}

#[test]
fn validate_reports_unclosed_tag() {
    let mut cmd = cargo_bin_cmd!("docai");
    cmd.args(["validate", "-"]).write_stdin("<block>\ntext");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unclosed <block>"));
}

#[test]
fn validate_json_output() {
    let mut cmd = cargo_bin_cmd!("docai");
    cmd.args(["validate", "--json", "-"])
        .write_stdin("<list>\npreamble\n1. First\n</list>");

    let output = cmd.assert().failure().get_output().stdout.clone();
    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(report["valid"], false);
    assert_eq!(report["errors"][0]["kind"], "DroppedContent");
    assert_eq!(report["errors"][0]["recoverable"], false);
}

#[test]
fn stats_counts_nodes() {
    let mut cmd = cargo_bin_cmd!("docai");
    cmd.args(["stats", "--json", "-"]).write_stdin(CONTRACT);

    let output = cmd.assert().success().get_output().stdout.clone();
    let stats: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(stats["lists"], 2);
    assert_eq!(stats["items"], 3);
    assert_eq!(stats["dicts"], 1);
    assert_eq!(stats["entries"], 1);
    assert_eq!(stats["diagnostics"], 0);
}

#[test]
fn stats_text_report() {
    let mut cmd = cargo_bin_cmd!("docai");
    cmd.args(["stats", "-"]).write_stdin(CONTRACT);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Head:         Agreement"))
        .stdout(predicate::str::contains("List items:   3"));
}

#[test]
fn normalize_reorders_into_canonical_form() {
    let mut cmd = cargo_bin_cmd!("docai");
    cmd.args(["normalize", "-"])
        .write_stdin(r#"{ "body": ["x"], "head": "H", "kind": "block" }"#);

    cmd.assert()
        .success()
        .stdout(r#"{"kind":"block","head":"H","body":["x"]}"#.to_owned() + "\n");
}

#[test]
fn normalize_rejects_unknown_kind() {
    let mut cmd = cargo_bin_cmd!("docai");
    cmd.args(["normalize", "-"])
        .write_stdin(r#"{"kind":"table"}"#);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not a valid document"));
}

#[test]
fn normalize_accepts_deeply_nested_parse_output() {
    let input = format!("{}deep", "<block>\n".repeat(128));

    let mut parse = cargo_bin_cmd!("docai");
    parse.args(["parse", "-"]).write_stdin(input);
    let output = parse.assert().success().get_output().stdout.clone();

    let mut normalize = cargo_bin_cmd!("docai");
    normalize.args(["normalize", "-"]).write_stdin(output.clone());

    normalize.assert().success().stdout(output);
}
