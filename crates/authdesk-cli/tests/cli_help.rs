use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("authdesk")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("signup"))
        .stdout(predicate::str::contains("profile"))
        .stdout(predicate::str::contains("logout"))
        .stdout(predicate::str::contains("open"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_profile_help_shows_subcommands() {
    cargo_bin_cmd!("authdesk")
        .args(["profile", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("edit"));
}

#[test]
fn test_profile_edit_help_lists_fields() {
    cargo_bin_cmd!("authdesk")
        .args(["profile", "edit", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--name"))
        .stdout(predicate::str::contains("--dob"))
        .stdout(predicate::str::contains("--contact"));
}

#[test]
fn test_login_requires_email() {
    cargo_bin_cmd!("authdesk")
        .arg("login")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--email"));
}
