use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::error::Error;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn strand() -> Result<Command, Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("strand")?;
    cmd.env("STRAND_TRACE", "0");
    Ok(cmd)
}

#[test]
fn converts_string_to_int() -> Result<(), Box<dyn Error>> {
    strand()?
        .args(["convert", "42", "--to", "int"])
        .assert()
        .success()
        .stdout("42\n");
    Ok(())
}

#[test]
fn converts_string_to_point() -> Result<(), Box<dyn Error>> {
    strand()?
        .args(["convert", "10, 20", "--to", "point"])
        .assert()
        .success()
        .stdout("10,20\n");
    Ok(())
}

#[test]
fn reports_non_numeric_conversion() -> Result<(), Box<dyn Error>> {
    strand()?
        .args(["convert", "abc", "--to", "double"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a number"));
    Ok(())
}

#[test]
fn config_number_format_applies() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let config_path = dir.path().join("strand.toml");
    fs::write(
        &config_path,
        r#"
            [number_format]
            trailing = 2
        "#,
    )?;

    strand()?
        .args(["--config", config_path.to_str().unwrap(), "convert", "3.14159", "--to", "string"])
        .assert()
        .success()
        .stdout("3.14159\n");

    strand()?
        .args(["--config", config_path.to_str().unwrap(), "convert", "3.14159", "--to", "double"])
        .assert()
        .success()
        .stdout("3.14\n");
    Ok(())
}

#[test]
fn rejects_missing_config() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let missing = dir.path().join("absent.toml");
    strand()?
        .args(["--config", missing.to_str().unwrap(), "handlers"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read configuration file"));
    Ok(())
}

#[test]
fn calls_clamp_number() -> Result<(), Box<dyn Error>> {
    strand()?
        .args(["call", "clampNumber", "15", "0", "10"])
        .assert()
        .success()
        .stdout("10\n");
    Ok(())
}

#[test]
fn call_prints_written_back_arguments() -> Result<(), Box<dyn Error>> {
    strand()?
        .args(["call", "divMod", "-7", "2", "null", "null"])
        .assert()
        .success()
        .stdout(predicate::str::contains("arg 3 = -4").and(predicate::str::contains("arg 4 = 1")));
    Ok(())
}

#[test]
fn call_failure_replays_native_frames() -> Result<(), Box<dyn Error>> {
    strand()?
        .args(["call", "explode", "kaboom"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("failing: explode: kaboom")
                .and(predicate::str::contains("at detonate (3:9)"))
                .and(predicate::str::contains("at explode (20:1)")),
        );
    Ok(())
}

#[test]
fn call_unknown_handler_fails() -> Result<(), Box<dyn Error>> {
    strand()?
        .args(["call", "noSuchThing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no extension handler named 'noSuchThing'"));
    Ok(())
}

#[test]
fn prop_sets_and_reads_widget_properties() -> Result<(), Box<dyn Error>> {
    strand()?
        .args(["prop", "--set", "width=250", "--set", "textAlign=center", "width", "textAlign", "margins"])
        .assert()
        .success()
        .stdout("width: 250\ntextAlign: center\nmargins: 2 2 2 2\n");
    Ok(())
}

#[test]
fn prop_rejects_read_only_property() -> Result<(), Box<dyn Error>> {
    strand()?
        .args(["prop", "--set", "id=9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("read-only"));
    Ok(())
}

#[test]
fn lists_handlers_with_modules() -> Result<(), Box<dyn Error>> {
    strand()?
        .arg("handlers")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("clampNumber(")
                .and(predicate::str::contains("[math]"))
                .and(predicate::str::contains("offsetVector("))
                .and(predicate::str::contains("[failing]")),
        );
    Ok(())
}
