use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn wizard(data: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("budget-wizard").expect("bin");
    cmd.env("BUDGET_WIZARD_DATA_DIR", data.path())
        .env_remove("RUST_LOG");
    cmd
}

fn init_with_session(name: &str) -> TempDir {
    let data = TempDir::new().expect("tempdir");
    wizard(&data).arg("init").assert().success();
    wizard(&data)
        .args(["session", "new", name])
        .assert()
        .success();
    data
}

#[test]
fn init_creates_data_dir() {
    let data = TempDir::new().expect("tempdir");
    wizard(&data)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));

    assert!(data.path().join("catalog.json").exists());
    assert!(data.path().join("config.json").exists());
}

#[test]
fn catalog_list_shows_it_services() {
    let data = TempDir::new().expect("tempdir");
    wizard(&data).arg("init").assert().success();
    wizard(&data)
        .args(["catalog", "list", "-d", "IT"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Microsoft 365 E3"));
}

#[test]
fn session_new_and_list() {
    let data = init_with_session("demo");
    wizard(&data)
        .args(["session", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("demo"));

    wizard(&data)
        .args(["session", "new", "demo"])
        .assert()
        .failure();
}

#[test]
fn missing_session_fails() {
    let data = TempDir::new().expect("tempdir");
    wizard(&data).arg("init").assert().success();
    wizard(&data)
        .args(["budget", "summary", "nope"])
        .assert()
        .failure();
}

#[test]
fn company_set_rejects_unknown_company() {
    let data = init_with_session("demo");
    wizard(&data)
        .args([
            "company", "set", "demo", "--company", "APC", "--department", "IT", "--contact",
            "Sara Ahmed", "--email", "sara@apc.example",
        ])
        .assert()
        .success();

    wizard(&data)
        .args([
            "company", "set", "demo", "--company", "Nowhere Ltd", "--department", "IT",
            "--contact", "Sara Ahmed", "--email", "sara@apc.example",
        ])
        .assert()
        .failure();
}

#[test]
fn license_request_below_contract_floor() {
    let data = init_with_session("demo");
    wizard(&data)
        .args(["service", "select", "demo", "IT", "Microsoft 365 E3", "-q", "100"])
        .assert()
        .failure();

    wizard(&data)
        .args(["config", "--license-policy", "clamp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("clamp"));
    wizard(&data)
        .args(["service", "select", "demo", "IT", "Microsoft 365 E3", "-q", "100"])
        .assert()
        .success();
}

#[test]
fn export_json_and_csv() {
    let data = init_with_session("demo");
    wizard(&data)
        .args(["service", "select", "demo", "IT", "Microsoft 365 E3", "-q", "170"])
        .assert()
        .success();

    wizard(&data)
        .args(["export", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"schema_version\""))
        .stdout(predicate::str::contains("\"session_name\": \"demo\""));

    wizard(&data)
        .args(["export", "demo", "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Department,Section,Item,Quantity,Amount",
        ))
        .stdout(predicate::str::contains("Microsoft 365 E3"));

    let out = data.path().join("demo.yaml");
    wizard(&data)
        .args(["export", "demo", "-f", "yaml", "-o"])
        .arg(&out)
        .assert()
        .success();
    let yaml = std::fs::read_to_string(&out).expect("yaml export");
    assert!(yaml.starts_with("# Budget Wizard Session Export"));
}

#[test]
fn audit_records_session_commands() {
    let data = init_with_session("demo");
    wizard(&data)
        .args(["support", "select", "demo", "HR", "Basic"])
        .assert()
        .success();

    wizard(&data)
        .args(["audit", "-s", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("@demo"))
        .stdout(predicate::str::contains("CREATE"));
}
