use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use uuid::Uuid;

fn unique_workspace(prefix: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{prefix}-{}", Uuid::now_v7()));
    std::fs::create_dir_all(&path).expect("workspace should be creatable");
    path
}

/// Config pointing every device at one shared SQLite "remote".
fn write_shared_config(root: &Path) -> PathBuf {
    let config = root.join("carona.toml");
    let shared = root.join("shared.sqlite");
    std::fs::write(
        &config,
        format!(
            "debounce_ms = 50\nfare_cents = 600\n\n[remote]\nkind = \"sqlite\"\npath = \"{}\"\n",
            shared.display()
        ),
    )
    .expect("config should be writable");
    config
}

fn run_carona(config: &Path, db_path: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_carona"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config)
        .arg("--db")
        .arg(db_path)
        .args(args)
        .output()
        .expect("carona command should run")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "expected success but failed.\nstdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn assert_failure(output: &Output) {
    assert!(
        !output.status.success(),
        "expected failure but command succeeded.\nstdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn parse_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be json")
}

#[test]
fn add_toggle_and_report_round_trip() {
    let root = unique_workspace("carona-cli-report");
    let config = write_shared_config(&root);
    let db = root.join("phone/cache.sqlite");

    let added = run_carona(
        &config,
        &db,
        &["add", "--date", "2024-06-03", "--type", "ida", "Bruno", "Ana"],
    );
    assert_success(&added);
    assert!(stdout(&added).contains("added Segunda-feira (03/06) - Ida (2 participant(s))"));

    let toggled = run_carona(
        &config,
        &db,
        &["toggle", "--date", "2024-06-03", "--type", "Ida", "Ana"],
    );
    assert_success(&toggled);
    assert!(stdout(&toggled).contains("Ana is now paid"));

    let report = run_carona(&config, &db, &["report"]);
    assert_success(&report);
    let text = stdout(&report);
    assert!(text.contains("🚗 Relatório de Caronas - Semana Atual"));
    assert!(text.contains("💰 Total pago: R$ 6,00 (1 pagamento(s))"));
    assert!(text.contains("📅 Segunda-feira (03/06) - Ida"));
    assert!(text.contains("  Ana: ✅ PAGO"));
    assert!(text.contains("  Bruno: ❌ PENDENTE"));

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn second_device_reads_changes_from_the_shared_remote() {
    let root = unique_workspace("carona-cli-devices");
    let config = write_shared_config(&root);
    let phone = root.join("phone/cache.sqlite");
    let laptop = root.join("laptop/cache.sqlite");

    assert_success(&run_carona(
        &config,
        &phone,
        &["week", "new", "--start", "03/06/2024"],
    ));
    assert_success(&run_carona(
        &config,
        &phone,
        &["add", "-d", "2024-06-04", "-t", "ambos", "--time", "7:15", "Carla"],
    ));

    let shown = run_carona(&config, &laptop, &["show", "--json"]);
    assert_success(&shown);
    let doc = parse_json(&shown);
    assert_eq!(doc["currentWeekName"], "Semana 03/06/2024 - 07/06/2024");
    let trips = doc["active_trips"].as_array().expect("trips should be an array");
    assert_eq!(trips.len(), 2);
    assert_eq!(trips[0]["time"], "07:15");
    assert_eq!(trips[0]["participants"][0]["name"], "Carla");

    let status = run_carona(&config, &laptop, &["status", "--json"]);
    assert_success(&status);
    let status = parse_json(&status);
    assert_eq!(status["loaded_from"], "remote");
    assert_eq!(status["connectivity"], "online");

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn week_commands_archive_select_and_list() {
    let root = unique_workspace("carona-cli-weeks");
    let config = write_shared_config(&root);
    let db = root.join("cache.sqlite");

    assert_success(&run_carona(&config, &db, &["week", "new", "-s", "2024-06-03"]));
    assert_success(&run_carona(
        &config,
        &db,
        &["add", "-d", "2024-06-03", "-t", "volta", "Ana"],
    ));
    let next = run_carona(&config, &db, &["week", "new", "-s", "2024-06-10"]);
    assert_success(&next);
    assert!(stdout(&next).contains("archived Semana 03/06/2024 - 07/06/2024"));

    let listed = run_carona(&config, &db, &["week", "ls", "--json"]);
    assert_success(&listed);
    let weeks = parse_json(&listed);
    assert_eq!(weeks[0]["name"], "Semana 10/06/2024 - 14/06/2024");
    assert_eq!(weeks[0]["current"], true);
    assert_eq!(weeks[1]["trips"], 1);

    assert_success(&run_carona(
        &config,
        &db,
        &["week", "select", "Semana 03/06/2024 - 07/06/2024"],
    ));
    let names = run_carona(&config, &db, &["names"]);
    assert_success(&names);
    assert_eq!(stdout(&names).trim(), "Ana");

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn destructive_commands_require_confirmation() {
    let root = unique_workspace("carona-cli-confirm");
    let config = write_shared_config(&root);
    let db = root.join("cache.sqlite");

    let reset = run_carona(&config, &db, &["reset"]);
    assert_failure(&reset);
    assert!(stderr(&reset).contains("re-run with --yes"));

    let delete = run_carona(&config, &db, &["week", "delete", "Semana Atual"]);
    assert_failure(&delete);

    assert_success(&run_carona(&config, &db, &["reset", "--yes"]));

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn export_then_import_restores_the_document() {
    let root = unique_workspace("carona-cli-backup");
    let config = write_shared_config(&root);
    let db = root.join("cache.sqlite");
    let backups = root.join("backups");

    assert_success(&run_carona(
        &config,
        &db,
        &["add", "-d", "2024-06-05", "-t", "ida", "Davi"],
    ));
    let exported = run_carona(
        &config,
        &db,
        &["export", "--dir", backups.to_str().expect("utf8 path")],
    );
    assert_success(&exported);
    let file = std::fs::read_dir(&backups)
        .expect("backup dir should exist")
        .next()
        .expect("one backup should exist")
        .expect("entry should be readable")
        .path();
    let file_name = file
        .file_name()
        .and_then(|name| name.to_str())
        .expect("utf8 file name");
    assert!(file_name.starts_with("carona-backup-"));
    assert!(file_name.ends_with(".json"));

    assert_success(&run_carona(
        &config,
        &db,
        &["drop-trip", "-d", "2024-06-05", "-t", "ida"],
    ));
    let imported = run_carona(
        &config,
        &db,
        &["import", file.to_str().expect("utf8 path"), "--yes"],
    );
    assert_success(&imported);
    assert!(stdout(&imported).contains("1 trip(s)"));

    let names = run_carona(&config, &db, &["names"]);
    assert_eq!(stdout(&names).trim(), "Davi");

    let not_object = root.join("list.json");
    std::fs::write(&not_object, "[]").expect("file should be writable");
    let rejected = run_carona(
        &config,
        &db,
        &["import", not_object.to_str().expect("utf8 path"), "--yes"],
    );
    assert_failure(&rejected);
    assert!(stderr(&rejected).contains("malformed backup"));

    let _ = std::fs::remove_dir_all(root);
}

#[test]
fn validation_failures_exit_non_zero() {
    let root = unique_workspace("carona-cli-errors");
    let config = write_shared_config(&root);
    let db = root.join("cache.sqlite");

    let no_names = run_carona(&config, &db, &["add", "-t", "ida"]);
    assert_failure(&no_names);
    assert!(stderr(&no_names).contains("error: select or type at least one participant"));

    let no_start = run_carona(&config, &db, &["week", "new"]);
    assert_failure(&no_start);
    assert!(stderr(&no_start).contains("a start date is required"));

    let missing = run_carona(
        &config,
        &db,
        &["toggle", "-d", "2024-06-03", "-t", "ida", "Ana"],
    );
    assert_failure(&missing);
    assert!(stderr(&missing).contains("no Ida trip"));

    let bad_config = root.join("bad.toml");
    std::fs::write(&bad_config, "debounce_ms = 0\n").expect("config should be writable");
    let rejected = run_carona(&bad_config, &db, &["show"]);
    assert_failure(&rejected);
    assert!(stderr(&rejected).contains("invalid config"));

    let _ = std::fs::remove_dir_all(root);
}
