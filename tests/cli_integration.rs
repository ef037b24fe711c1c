// CLI integration tests for search, fields and error exit codes.
use std::path::Path;
use std::process::Command;

use serde_json::Value;

fn cmd(data_dir: &Path) -> Command {
    let exe = env!("CARGO_BIN_EXE_recsearch");
    let mut command = Command::new(exe);
    command.args(["--data-dir", data_dir.to_str().unwrap()]);
    command.env_remove("RUST_LOG");
    command
}

fn parse_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("valid json")
}

fn write_fixture(dir: &Path) {
    std::fs::write(
        dir.join("users.json"),
        r#"[{"_id": 71, "name": "Prince Hinton", "active": false, "tags": ["Davenport"]},
            {"_id": 72, "name": "Ada", "active": true}]"#,
    )
    .expect("users");
    std::fs::write(
        dir.join("tickets.json"),
        r#"[{"_id": "t-1", "tags": ["Ohio", "Texas"]}, {"_id": "t-2", "tags": ["Ohio"]}]"#,
    )
    .expect("tickets");
    std::fs::write(dir.join("organizations.json"), r#"[{"_id": 101, "name": "Enthaze"}]"#)
        .expect("orgs");
}

#[test]
fn search_emits_json_envelope() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(temp.path());

    let out = cmd(temp.path())
        .args(["search", "users", "_id", "71"])
        .output()
        .expect("search");
    assert!(out.status.success());
    let json = parse_json(&out.stdout);
    assert_eq!(json["collection"], "users");
    assert_eq!(json["field"], "_id");
    assert_eq!(json["value"], 71);
    assert_eq!(json["count"], 1);
    assert_eq!(json["results"][0]["name"], "Prince Hinton");
}

#[test]
fn search_list_field_and_first() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(temp.path());

    let all = cmd(temp.path())
        .args(["search", "tickets", "tags", "Ohio"])
        .output()
        .expect("search");
    assert!(all.status.success());
    assert_eq!(parse_json(&all.stdout)["count"], 2);

    let first = cmd(temp.path())
        .args(["search", "tickets", "tags", "Ohio", "--first"])
        .output()
        .expect("search");
    let json = parse_json(&first.stdout);
    assert_eq!(json["count"], 1);
    assert_eq!(json["results"][0]["_id"], "t-1");
}

#[test]
fn string_flag_disables_coercion() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(temp.path());

    let out = cmd(temp.path())
        .args(["search", "users", "_id", "71", "--string"])
        .output()
        .expect("search");
    assert!(out.status.success());
    let json = parse_json(&out.stdout);
    assert_eq!(json["value"], "71");
    assert_eq!(json["count"], 0);
}

#[test]
fn fields_lists_one_or_all_collections() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(temp.path());

    let one = cmd(temp.path())
        .args(["fields", "organizations"])
        .output()
        .expect("fields");
    assert!(one.status.success());
    let json = parse_json(&one.stdout);
    assert_eq!(json["collection"], "organizations");
    assert_eq!(json["fields"], serde_json::json!(["_id", "name"]));

    let all = cmd(temp.path()).args(["fields"]).output().expect("fields");
    let json = parse_json(&all.stdout);
    let names = json["collections"]
        .as_array()
        .expect("collections")
        .iter()
        .map(|entry| entry["collection"].as_str().unwrap().to_string())
        .collect::<Vec<_>>();
    assert_eq!(names, ["users", "tickets", "organizations"]);
}

#[test]
fn unknown_field_exit_code_and_error_json() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(temp.path());

    let out = cmd(temp.path())
        .args(["search", "users", "nickname", "x"])
        .output()
        .expect("search");
    assert_eq!(out.status.code().unwrap(), 7);
    let err = parse_json(&out.stderr);
    assert_eq!(err["error"]["kind"], "FieldNotFound");
    assert_eq!(err["error"]["collection"], "users");
    assert!(err["error"]["hint"].as_str().unwrap().contains("recsearch fields users"));
}

#[test]
fn missing_dataset_exit_code() {
    let temp = tempfile::tempdir().expect("tempdir");

    let out = cmd(temp.path())
        .args(["search", "users", "_id", "1"])
        .output()
        .expect("search");
    assert_eq!(out.status.code().unwrap(), 5);
    let err = parse_json(&out.stderr);
    assert_eq!(err["error"]["kind"], "DataFormat");
}

#[test]
fn invalid_element_exit_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(temp.path());
    let bad = temp.path().join("bad-users.json");
    std::fs::write(&bad, r#"[{"_id": 1}, 2]"#).expect("bad");

    let out = cmd(temp.path())
        .args(["--users", bad.to_str().unwrap(), "search", "users", "_id", "1"])
        .output()
        .expect("search");
    assert_eq!(out.status.code().unwrap(), 6);
    let err = parse_json(&out.stderr);
    assert_eq!(err["error"]["index"], 1);
}

#[test]
fn shell_reads_menu_from_stdin() {
    use std::io::Write;
    use std::process::Stdio;

    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(temp.path());

    let mut child = cmd(temp.path())
        .args(["shell"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"\n1\n3\nname\nEnthaze\nquit\n")
        .expect("write");
    let out = child.wait_with_output().expect("wait");
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("1 record found."));
}

#[test]
fn usage_exit_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let out = cmd(temp.path())
        .args(["search", "pets", "_id", "1"])
        .output()
        .expect("search");
    assert_eq!(out.status.code().unwrap(), 2);
}

#[test]
fn usage_error_hint_lists_collections() {
    let temp = tempfile::tempdir().expect("tempdir");
    let out = cmd(temp.path())
        .args(["search", "pets", "_id", "1"])
        .output()
        .expect("search");
    let err = parse_json(&out.stderr);
    assert_eq!(err["error"]["kind"], "Usage");
    assert_eq!(
        err["error"]["hint"],
        "Expected one of: users, tickets, organizations."
    );
}

#[test]
fn data_dir_from_environment() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(temp.path());

    let out = Command::new(env!("CARGO_BIN_EXE_recsearch"))
        .env_remove("RUST_LOG")
        .env("RECSEARCH_DATA_DIR", temp.path())
        .args(["search", "users", "_id", "72"])
        .output()
        .expect("search");
    assert!(out.status.success());
    let value = parse_json(&out.stdout);
    assert_eq!(value["count"], 1);
    assert_eq!(value["results"][0]["name"], "Ada");
}

#[test]
fn shipped_data_answers_queries_in_key_order() {
    let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let out = cmd(&data)
        .args(["search", "organizations", "domain_names", "dadabase.com"])
        .output()
        .expect("search");
    assert!(out.status.success());
    let value = parse_json(&out.stdout);
    assert_eq!(value["count"], 1);
    let org = value["results"][0].as_object().expect("object");
    assert_eq!(org["name"], "Nutralab");
    let keys = org.keys().take(3).map(String::as_str).collect::<Vec<_>>();
    assert_eq!(keys, ["_id", "url", "external_id"]);
}
