use std::{
    env,
    path::Path,
    process::{Command, Output},
};

use anyhow::Result;
use personbench_benchmark::driver::BROKEN_TRIAL_EXIT_CODE;
use tempfile::{NamedTempFile, tempdir};

fn run_with_root(root: &Path) -> Result<Output> {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_personbench"));
    for (key, _) in env::vars().filter(|(key, _)| key.starts_with("PERSONBENCH_")) {
        cmd.env_remove(key);
    }
    let output = cmd
        .env("PERSONBENCH_DB_ROOT", root)
        .env("PERSONBENCH_WARMUP", "0")
        .env("PERSONBENCH_ITERATIONS", "2")
        .output()?;
    Ok(output)
}

fn has_timing(output: &Output) -> bool {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .any(|line| line.starts_with("avg"))
}

#[test]
fn reports_timings_for_a_usable_store() -> Result<()> {
    let dir = tempdir()?;
    let output = run_with_root(&dir.path().join("root"))?;

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(has_timing(&output));
    Ok(())
}

#[test]
fn exits_without_timings_when_store_cannot_be_created() -> Result<()> {
    let blocker = NamedTempFile::new()?;
    let output = run_with_root(&blocker.path().join("root"))?;

    assert_eq!(output.status.code(), Some(BROKEN_TRIAL_EXIT_CODE));
    assert!(!has_timing(&output));
    assert!(blocker.path().is_file());
    Ok(())
}
