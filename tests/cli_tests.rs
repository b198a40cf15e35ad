use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::process::Command;

fn calc() -> Command {
    Command::cargo_bin("can-calc-bit-timing").unwrap()
}

#[rstest]
#[case(&["-h"], 0, "Usage:", "stdout")]
#[case(&["-l"], 0, "sja1000", "stdout")]
#[case(&["-l"], 0, "mcp251x", "stdout")]
#[case(&["--alg"], 0, "v5.19", "stdout")]
#[case(&["-c", "8000000", "-b", "500000", "sja1000"], 0, "Bit timing parameters", "stdout")]
#[case(&["-c", "8000000", "-b", "500000", "sja1000"], 0, "SampP", "stdout")]
#[case(&["-c", "8000000", "-b", "500000", "-s", "875", "sja1000"], 0, "87.5%", "stdout")]
#[case(&["--alg", "v4.8", "-c", "8000000", "-b", "500000", "sja1000"], 0, "500000", "stdout")]
#[case(&["--alg", "default", "-c", "8000000", "-b", "500000", "sja1000"], 0, "500000", "stdout")]
#[case(&["-v", "-c", "8000000", "-b", "500000", "sja1000"], 0, "500000", "stdout")]
#[case(&["--alg", "v9.9", "sja1000"], 1, "unknown CAN calc bit timing algorithm", "stderr")]
#[case(&["no-such-controller"], 1, "unknown CAN controller", "stderr")]
#[case(&["-s", "50", "sja1000"], 2, "sample point", "stderr")]
#[case(&["-c", "8000000", "-b", "1000", "sja1000"], 0, "bitrate not possible", "stdout")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let assert = calc().args(args).assert().code(exit_code);

    match stream {
        "stdout" => assert.stdout(predicate::str::contains(needle)),
        _ => assert.stderr(predicate::str::contains(needle)),
    };
}

#[test]
fn sja1000_500k_line() {
    calc()
        .args(["-q", "-c", "8000000", "-b", "500000", "sja1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "  500000    125   6    7    2   1   1   500000   0.0%  87.5%  87.5%   0.0%   0x00 0x1c",
        ))
        .stdout(predicate::str::contains("Bit timing parameters").not());
}

#[test]
fn fd_controller_prints_data_phase() {
    calc()
        .args(["-c", "40000000", "-b", "1000000", "-d", "2000000", "mcan-v3.1+"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1000000"))
        .stdout(predicate::str::contains("2000000"));
}

#[test]
fn manual_segments_are_decoded() {
    calc()
        .args([
            "-q",
            "-c",
            "40000000",
            "--tq",
            "25",
            "--prop-seg",
            "1",
            "--phase-seg1",
            "31",
            "--phase-seg2",
            "8",
            "mcan-v3.1+",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("975609"))
        .stdout(predicate::str::contains("80.4%"));
}

#[test]
fn unknown_controller_lists_alternatives() {
    calc()
        .arg("no-such-controller")
        .assert()
        .failure()
        .stderr(predicate::str::contains("try one of these"))
        .stderr(predicate::str::contains("sja1000"));
}
