use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;

#[test]
fn test_cli_help_lists_options() {
    let mut cmd = Command::new(cargo_bin!("payment-service"));
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--listen"))
        .stdout(predicate::str::contains("--log-level"));
}

#[test]
fn test_cli_rejects_invalid_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "database:").unwrap();
    writeln!(file, "  connection_pool_size: 0").unwrap();

    let mut cmd = Command::new(cargo_bin!("payment-service"));
    cmd.arg("--config").arg(file.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("connection_pool_size must be greater than 0"));
}

#[test]
fn test_cli_rejects_unparseable_listen_address() {
    let mut cmd = Command::new(cargo_bin!("payment-service"));
    cmd.arg("--config")
        .arg("tests/fixtures/payment-service.yaml")
        .arg("--listen")
        .arg("not-an-address");

    cmd.assert().failure();
}
