use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[allow(deprecated)]
fn cli(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sigma-archive").expect("binary");
    cmd.current_dir(workdir).env_remove("SIGMA_ARCHIVE_CONFIG");
    cmd
}

fn run_json(workdir: &Path, args: &[&str]) -> Value {
    let output = cli(workdir).args(args).output().expect("command run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

fn setup_archive() -> tempfile::TempDir {
    let temp = tempdir().unwrap();
    let data = temp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(
        data.join("101.json"),
        r#"{"id":101,"title":"FTP daemon overflow","author":"alice","date":"03/03/2009","cves":["CVE-2009-0101"],"category":"remote","content":"overflow payload"}"#,
    )
    .unwrap();
    fs::write(
        data.join("102.json"),
        r#"{"id":102,"title":"Blog SQL injection","author":"bob","date":"19/07/2012","cve_id":"CVE-2012-0102","category":"webapps","platform":"php"}"#,
    )
    .unwrap();
    fs::write(
        data.join("103.json"),
        r#"{"title":"Guestbook XSS","author":"bob","date":"01/01/2012","category":"webapps"}"#,
    )
    .unwrap();
    fs::write(data.join("bad.json"), "not json at all").unwrap();
    temp
}

fn aggregate(root: &Path) -> Value {
    run_json(
        root,
        &["aggregate", "--data-dir", "data", "--output-dir", "out", "--json"],
    )
}

#[test]
fn aggregate_reports_processed_and_skipped_files() {
    let temp = setup_archive();
    let root = temp.path();

    let report = aggregate(root);
    assert_eq!(report["files_found"], 4);
    assert_eq!(report["processed"], 3);
    assert_eq!(report["failures"][0]["file"], "bad.json");
    assert_eq!(report["categories"], 2);
    assert!(root.join("out/exploits.json").is_file());
    assert!(root.join("out/stats.json").is_file());
}

#[test]
fn aggregate_text_summary() {
    let temp = setup_archive();
    cli(temp.path())
        .args(["aggregate", "--data-dir", "data", "--output-dir", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Data aggregation complete!"))
        .stdout(predicate::str::contains("- Total exploits: 3"))
        .stdout(predicate::str::contains("- Skipped: 1 of 4 files"));
}

#[test]
fn search_filters_sorts_and_pages() {
    let temp = setup_archive();
    let root = temp.path();
    aggregate(root);

    let page = run_json(
        root,
        &[
            "search",
            "--data-dir",
            "out",
            "--category",
            "webapps",
            "--sort",
            "title",
            "--order",
            "asc",
            "--json",
        ],
    );
    assert_eq!(page["total_items"], 2);
    assert_eq!(page["current_page"], 1);
    assert_eq!(page["data"][0]["title"], "Blog SQL injection");
    assert_eq!(page["data"][1]["id"], 103);

    let by_text = run_json(root, &["search", "cve-2009", "--data-dir", "out", "--json"]);
    assert_eq!(by_text["total_items"], 1);
    assert_eq!(by_text["data"][0]["id"], 101);

    let second = run_json(
        root,
        &["search", "--data-dir", "out", "--page", "2", "--page-size", "2", "--json"],
    );
    assert_eq!(second["total_pages"], 2);
    assert_eq!(second["has_prev"], true);
    assert_eq!(second["data"].as_array().map(Vec::len), Some(1));
    // default order is id descending, so the oldest id lands on page two
    assert_eq!(second["data"][0]["id"], 101);
}

#[test]
fn search_text_output_shows_filtered_totals() {
    let temp = setup_archive();
    let root = temp.path();
    aggregate(root);

    cli(root)
        .args(["search", "--data-dir", "out", "--year", "2012"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Guestbook XSS"))
        .stdout(predicate::str::contains("Showing 2 of 3 exploits"));
}

#[test]
fn rejects_unknown_sort_key() {
    let temp = setup_archive();
    cli(temp.path())
        .args(["search", "--sort", "score"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown sort key"));
}

#[test]
fn show_prints_record_or_fails_for_missing_id() {
    let temp = setup_archive();
    let root = temp.path();
    aggregate(root);

    let record = run_json(root, &["show", "102", "--data-dir", "out", "--json"]);
    assert_eq!(record["platform"], "php");
    assert_eq!(record["cve_id"], "CVE-2012-0102");

    cli(root)
        .args(["show", "101", "--data-dir", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exploit #101"))
        .stdout(predicate::str::contains("overflow payload"));

    cli(root)
        .args(["show", "999", "--data-dir", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No exploit with id 999"));
}

#[test]
fn stats_summarizes_facets() {
    let temp = setup_archive();
    let root = temp.path();
    aggregate(root);

    let stats = run_json(root, &["stats", "--data-dir", "out", "--json"]);
    assert_eq!(stats["total_exploits"], 3);
    assert_eq!(stats["years"], serde_json::json!([2009, 2012]));
    assert_eq!(stats["author_counts"]["bob"], 2);

    cli(root)
        .args(["stats", "--data-dir", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total exploits: 3"))
        .stdout(predicate::str::contains("Years:          2009 - 2012"));
}

#[test]
fn config_file_supplies_directories() {
    let temp = setup_archive();
    let root = temp.path();
    fs::write(
        root.join("sigma-archive.toml"),
        "[aggregate]\ndata_dir = \"data\"\noutput_dir = \"site\"\n\n[browse]\npage_size = 1\n",
    )
    .unwrap();

    let report = run_json(root, &["aggregate", "--json"]);
    assert_eq!(report["processed"], 3);
    assert!(root.join("site/exploits.json").is_file());

    let page = run_json(root, &["search", "--json"]);
    assert_eq!(page["total_pages"], 3);
    assert_eq!(page["data"][0]["id"], 103);
}

#[test]
fn missing_archive_is_reported() {
    let temp = tempdir().unwrap();
    cli(temp.path())
        .args(["stats", "--data-dir", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("stats.json"));
}

#[test]
fn schema_describes_outputs() {
    let temp = tempdir().unwrap();
    let schema = run_json(temp.path(), &["schema"]);
    assert!(schema["record"]["properties"]["cves"].is_object());
    assert!(schema["stats"]["properties"]["year_counts"].is_object());
}
