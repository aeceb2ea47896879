use std::fs;

use predicates::prelude::*;
use tempfile::TempDir;

fn cmd(temp: &TempDir) -> assert_cmd::Command {
    let mut c = assert_cmd::Command::cargo_bin("calnotes").unwrap();
    c.env("CALNOTES_DATA_DIR", temp.path()).env("NO_COLOR", "1");
    c
}

fn add_note(temp: &TempDir, args: &[&str]) -> String {
    let output = cmd(temp)
        .args(["add"])
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8_lossy(&output)
        .lines()
        .find_map(|line| line.strip_prefix("Note created with ID: "))
        .expect("add output should contain the new id")
        .trim()
        .to_string()
}

#[test]
fn add_and_list_and_view() {
    let temp = TempDir::new().unwrap();
    let id = add_note(
        &temp,
        &[
            "-T",
            "Süt al",
            "-c",
            "market listesi",
            "-C",
            "alışveriş",
            "-t",
            "ev,acil",
            "--date",
            "2024-03-10",
        ],
    );

    let list_out = cmd(&temp)
        .args(["list"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let list_str = String::from_utf8_lossy(&list_out);
    assert!(list_str.contains("Süt al"));
    assert!(list_str.contains("alışveriş"));
    assert!(list_str.contains("#ev #acil"));
    assert!(list_str.contains("Found 1 note"));

    cmd(&temp)
        .args(["view", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("market listesi"));

    cmd(&temp)
        .args(["view", &id, "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"category\": \"alışveriş\""))
        .stdout(predicate::str::contains("\"date\": \"2024-03-10\""));
}

#[test]
fn add_rejects_unknown_category() {
    let temp = TempDir::new().unwrap();
    cmd(&temp)
        .args(["add", "-T", "x", "-c", "y", "-C", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid format"));

    cmd(&temp)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No notes found"));
}

#[test]
fn view_missing_note_fails() {
    let temp = TempDir::new().unwrap();
    cmd(&temp)
        .args(["view", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Note not found: 42"));
}

#[test]
fn edit_updates_title_and_clears_time() {
    let temp = TempDir::new().unwrap();
    let id = add_note(&temp, &["-T", "Toplantı", "-c", "gündem", "--time", "09:30"]);

    cmd(&temp)
        .args(["view", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Time: 09:30"));

    cmd(&temp)
        .args(["edit", &id, "-T", "Yeni başlık", "--clear-time"])
        .assert()
        .success()
        .stdout(predicate::str::contains("updated successfully"));

    let view_out = cmd(&temp)
        .args(["view", &id])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let view_str = String::from_utf8_lossy(&view_out);
    assert!(view_str.contains("Yeni başlık"));
    assert!(!view_str.contains("Time: 09:30"));
    // Content was not part of the patch and must survive.
    assert!(view_str.contains("gündem"));
}

#[test]
fn edit_rejects_conflicting_time_flags() {
    let temp = TempDir::new().unwrap();
    let id = add_note(&temp, &["-T", "a", "-c", "b", "--time", "08:00"]);
    cmd(&temp)
        .args(["edit", &id, "--time", "09:00", "--clear-time"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--clear-time"));
}

#[test]
fn pinned_notes_list_first() {
    let temp = TempDir::new().unwrap();
    let first = add_note(&temp, &["-T", "Eski not", "-c", "birinci"]);
    add_note(&temp, &["-T", "Yeni not", "-c", "ikinci"]);

    // Newest first by default.
    let list_out = cmd(&temp)
        .args(["list"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let list_str = String::from_utf8_lossy(&list_out).to_string();
    assert!(list_str.find("Yeni not").unwrap() < list_str.find("Eski not").unwrap());

    cmd(&temp)
        .args(["pin", &first])
        .assert()
        .success()
        .stdout(predicate::str::contains("pinned"));

    let pinned_out = cmd(&temp)
        .args(["list"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let pinned_str = String::from_utf8_lossy(&pinned_out).to_string();
    assert!(pinned_str.find("Eski not").unwrap() < pinned_str.find("Yeni not").unwrap());
}

#[test]
fn search_matches_content_and_tags() {
    let temp = TempDir::new().unwrap();
    add_note(&temp, &["-T", "Fatura", "-c", "elektrik faturası", "-t", "ev"]);
    add_note(&temp, &["-T", "Kitap", "-c", "roman önerisi"]);

    cmd(&temp)
        .args(["list", "-s", "elektrik"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fatura"))
        .stdout(predicate::str::contains("Found 1 note"));

    cmd(&temp)
        .args(["list", "-s", "ev"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fatura"))
        .stdout(predicate::str::contains("Found 1 note"));
}

#[test]
fn today_filter_matches_fresh_note() {
    let temp = TempDir::new().unwrap();
    // No --date, so the note lands on today.
    add_note(&temp, &["-T", "Bugünün işi", "-c", "hemen"]);
    add_note(&temp, &["-T", "Geçmiş iş", "-c", "eski", "--date", "2020-01-01"]);

    cmd(&temp)
        .args(["list", "-f", "today"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bugünün işi"))
        .stdout(predicate::str::contains("Found 1 note"));
}

#[test]
fn delete_prompt_cancel_and_force() {
    let temp = TempDir::new().unwrap();
    let id = add_note(&temp, &["-T", "Silinecek", "-c", "içerik"]);

    cmd(&temp)
        .args(["delete", &id])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deletion cancelled."));

    cmd(&temp).args(["view", &id]).assert().success();

    cmd(&temp)
        .args(["delete", &id, "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("permanently deleted"));

    cmd(&temp).args(["view", &id]).assert().failure();
}

#[test]
fn export_import_round_trip() {
    let temp = TempDir::new().unwrap();
    let first = add_note(&temp, &["-T", "Bir", "-c", "ilk not"]);
    let second = add_note(&temp, &["-T", "İki", "-c", "ikinci not"]);

    let export_path = temp.path().join("backup.json");
    cmd(&temp)
        .args(["export", "-o", export_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 notes"));

    cmd(&temp).args(["delete", &first, "--force"]).assert().success();
    cmd(&temp).args(["delete", &second, "--force"]).assert().success();
    cmd(&temp)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No notes found"));

    cmd(&temp)
        .args(["import", export_path.to_str().unwrap(), "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 notes"));

    cmd(&temp)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bir"))
        .stdout(predicate::str::contains("İki"));
}

#[test]
fn import_prompt_cancel_keeps_notes() {
    let temp = TempDir::new().unwrap();
    add_note(&temp, &["-T", "Kalan", "-c", "yerinde"]);

    let export_path = temp.path().join("other.json");
    fs::write(&export_path, "[]").unwrap();

    cmd(&temp)
        .args(["import", export_path.to_str().unwrap()])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Import cancelled."));

    cmd(&temp)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Kalan"));
}

#[test]
fn import_rejects_malformed_payload() {
    let temp = TempDir::new().unwrap();
    add_note(&temp, &["-T", "Korunan", "-c", "dokunma"]);

    let bad_path = temp.path().join("bad.json");
    fs::write(&bad_path, "{\"this\": \"is not a note list\"}").unwrap();

    cmd(&temp)
        .args(["import", bad_path.to_str().unwrap(), "--force"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Import failed"));

    cmd(&temp)
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Korunan"));
}

#[test]
fn calendar_grid_and_day_selection() {
    let temp = TempDir::new().unwrap();
    add_note(&temp, &["-T", "Randevu", "-c", "diş hekimi", "--date", "2024-03-15"]);
    add_note(&temp, &["-T", "Alışveriş", "-c", "pazar", "--date", "2024-03-15"]);

    cmd(&temp)
        .args(["calendar", "-m", "2024-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mart 2024"))
        .stdout(predicate::str::contains("Pzt  Sal"));

    cmd(&temp)
        .args(["calendar", "-m", "2024-03", "-s", "15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 notes on 2024-03-15"))
        .stdout(predicate::str::contains("Randevu"))
        .stdout(predicate::str::contains("Alışveriş"));

    cmd(&temp)
        .args(["calendar", "-m", "2024-02", "-s", "31"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid format"));
}

#[test]
fn stats_counts_by_category() {
    let temp = TempDir::new().unwrap();
    add_note(&temp, &["-T", "Bir", "-c", "not", "-C", "kişisel"]);
    add_note(&temp, &["-T", "İki", "-c", "not", "-C", "alışveriş"]);
    add_note(&temp, &["-T", "Üç", "-c", "not", "-C", "alışveriş"]);

    let out = cmd(&temp)
        .args(["stats"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let out_str = String::from_utf8_lossy(&out);
    assert!(out_str.contains("Total notes: 3"));
    assert!(out_str.contains("kişisel"));
    assert!(out_str.contains("alışveriş"));
    // Categories with no notes stay out of the breakdown.
    assert!(!out_str.contains("hatırlatma"));
}

#[test]
fn dark_mode_toggle_persists() {
    let temp = TempDir::new().unwrap();
    cmd(&temp)
        .args(["dark-mode"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dark mode on"));

    cmd(&temp)
        .args(["dark-mode"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dark mode off"));

    let settings = fs::read_to_string(temp.path().join("settings.json")).unwrap();
    assert!(settings.contains("\"dark_mode\": false"));
}

#[test]
fn list_json_outputs_full_notes() {
    let temp = TempDir::new().unwrap();
    add_note(&temp, &["-T", "Json not", "-c", "gövde", "-p", "high"]);

    cmd(&temp)
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"Json not\""))
        .stdout(predicate::str::contains("\"priority\": \"high\""));
}
