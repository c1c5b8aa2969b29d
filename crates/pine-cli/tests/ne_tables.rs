//! End-to-end tests of `pine ne`.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

fn run_ne(input: &Path, prefix: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pine"))
        .arg("ne")
        .arg("--input")
        .arg(input)
        .arg("--out-prefix")
        .arg(prefix)
        .args(extra)
        .output()
        .expect("run pine ne")
}

fn write_windows_csv(path: &Path) {
    let mut f = File::create(path).expect("create fixture");
    writeln!(f, "species,chr_type,pi_value,div_value").unwrap();
    for i in 0..40 {
        let jitter = (i % 7) as f64 * 1e-5;
        writeln!(f, "Human,Autosome,{},{}", 0.0010 + jitter, 0.0120 + jitter).unwrap();
        writeln!(f, "Human,X,{},{}", 0.0007 + jitter, 0.0115 + jitter).unwrap();
        writeln!(f, "Bonobo,Autosome,{},{}", 0.0014 + jitter, 0.0121 + jitter).unwrap();
        writeln!(f, "Bonobo,X,{},{}", 0.0012 + jitter, 0.0118 + jitter).unwrap();
    }
}

#[test]
fn writes_both_tables() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("windows.csv");
    write_windows_csv(&input);
    let prefix = dir.path().join("ne");

    let output = run_ne(&input, &prefix, &["--focus", "X"]);
    assert!(output.status.success(), "stderr: {:?}", output.stderr);

    let ratio = std::fs::read_to_string(dir.path().join("ne_ratio_se.csv")).unwrap();
    let mut lines = ratio.lines();
    assert_eq!(
        lines.next().unwrap(),
        "species,chr_type,ne_ratio,se_delta,se_block"
    );
    // Species sorted: Bonobo row first, then Human; one focus chr_type each.
    let bonobo: Vec<&str> = lines.next().unwrap().split(',').collect();
    let human: Vec<&str> = lines.next().unwrap().split(',').collect();
    assert!(lines.next().is_none());
    assert_eq!(&bonobo[..2], &["Bonobo", "X"]);
    assert_eq!(&human[..2], &["Human", "X"]);
    // X diversity is below autosomal diversity for both, so both ratios < 1.
    assert!(bonobo[2].parse::<f64>().unwrap() < 1.0);
    assert!(human[2].parse::<f64>().unwrap() < 1.0);

    let ranksum = std::fs::read_to_string(dir.path().join("ne_ranksum.csv")).unwrap();
    let mut lines = ranksum.lines();
    assert_eq!(
        lines.next().unwrap(),
        "chr_type,species1,species2,n1,n2,statistic,p_value"
    );
    let test: Vec<&str> = lines.next().unwrap().split(',').collect();
    assert!(lines.next().is_none());
    assert_eq!(&test[..5], &["X", "Bonobo", "Human", "40", "40"]);
    let p: f64 = test[6].parse().unwrap();
    assert!((0.0..=1.0).contains(&p));
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("ne");
    let output = run_ne(Path::new("/no/such/windows.csv"), &prefix, &[]);
    assert!(!output.status.success());
}

#[test]
fn missing_required_column_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.csv");
    let mut f = File::create(&input).unwrap();
    writeln!(f, "species,chr_type,pi_value").unwrap();
    writeln!(f, "Human,X,0.001").unwrap();

    let prefix = dir.path().join("ne");
    let output = run_ne(&input, &prefix, &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("div_value"));
}
