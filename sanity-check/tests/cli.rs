use assert_cmd::Command;

fn sanity() -> Command {
    Command::cargo_bin("sanity-check").unwrap()
}

#[test]
fn suggest_prints_both_candidates() {
    let out = sanity()
        .args(["suggest", "1.0", "--rate", "44100", "--chunk", "1024"])
        .assert()
        .success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("0.75"), "{stdout}");
    assert!(stdout.contains("1.49"), "{stdout}");
}

#[test]
fn generate_then_roundtrip() {
    let tmp = tempfile::tempdir().unwrap();
    let tone = tmp.path().join("tone.wav");
    sanity()
        .arg("generate")
        .arg(&tone)
        .args(["--freq", "64", "--seconds", "1", "--rate", "1024", "--chunk", "256"])
        .assert()
        .success();
    let out = sanity()
        .arg("roundtrip")
        .arg(&tone)
        .args(["--strategy", "fast", "--output-dir"])
        .arg(tmp.path())
        .assert()
        .success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("max sample difference: 0"), "{stdout}");
    assert!(tmp.path().join("reconstructed.wav").exists());
}

#[test]
fn fast_strategy_rejects_non_power_of_two() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("short.wav");
    wavedft::wav::write_pcm16(&path, &[1, 2, 3, 4, 5, 6], 8000, 1).unwrap();
    sanity()
        .arg("analyze")
        .arg(&path)
        .args(["--strategy", "fast", "--svg-output"])
        .arg(tmp.path().join("s.svg"))
        .assert()
        .failure();
}
