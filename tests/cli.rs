use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn helpdocs(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("helpdocs").unwrap();
    cmd.arg("--path").arg(root).env_remove("HELPDOCS_PROJECT");
    cmd
}

fn setup_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();

    fs::write(
        root.join("helpdocs.toml"),
        r#"source_dir = "helpfiles"
output_dir = "site/reference/sharpmush-help"
mapping_path = "scripts/doc-mappings.json"
"#,
    )
    .unwrap();

    let help = root.join("helpfiles");
    fs::create_dir_all(&help).unwrap();
    fs::write(
        help.join("pennflag.md"),
        "# Flags\n\n## Flag Overview\n\nFlags are set with [help @set].\n",
    )
    .unwrap();
    fs::write(
        help.join("penntop.md"),
        "# Top-Level Topics\n\nRead [help Flag Overview|see flags] or [FOOBAR EVENT].\n\n```\n[help @set]\n```\n",
    )
    .unwrap();
    fs::write(help.join("README.txt"), "not a helpfile").unwrap();

    tmp
}

#[test]
fn index_writes_lookup_artifact() {
    let tmp = setup_project();

    helpdocs(tmp.path())
        .arg("index")
        .assert()
        .success()
        .stdout(predicate::str::contains("Indexed 3 headers"));

    let json = fs::read_to_string(tmp.path().join("scripts/doc-mappings.json")).unwrap();
    let artifact: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(artifact["mappings"]["FLAG OVERVIEW"], "pennflag");
    assert_eq!(artifact["_metadata"]["totalMappings"], 3);
    assert_eq!(artifact["index"]["penntop"][0]["original"], "Top-Level Topics");
    assert_eq!(artifact["index"]["penntop"][0]["normalized"], "TOP-LEVEL TOPICS");
}

#[test]
fn build_converts_with_links_and_frontmatter() {
    let tmp = setup_project();

    helpdocs(tmp.path()).arg("build").assert().success();

    let page =
        fs::read_to_string(tmp.path().join("site/reference/sharpmush-help/penntop.md")).unwrap();

    assert!(page.starts_with(
        "---\ntitle: \"Top-Level Topics\"\ndescription: \"SharpMUSH documentation for Top-Level Topics\"\n---\n\n"
    ));
    assert!(page.contains("## Top-Level Topics"));
    assert!(page.contains("[see flags](/reference/sharpmush-help/pennflag/#flag-overview)"));
    assert!(page.contains("[FOOBAR EVENT](/reference/sharpmush-help/pennevents/#foobar-event)"));
    assert!(page.contains("```\n[help @set]\n```"));
    assert!(!tmp
        .path()
        .join("site/reference/sharpmush-help/README.txt")
        .exists());
}

#[test]
fn convert_without_artifact_uses_fallback() {
    let tmp = setup_project();

    helpdocs(tmp.path())
        .arg("convert")
        .assert()
        .success()
        .stderr(predicate::str::contains("fallback"));

    let page =
        fs::read_to_string(tmp.path().join("site/reference/sharpmush-help/pennflag.md")).unwrap();
    assert!(page.contains("[@set](/reference/sharpmush-help/penncmd/#set)"));
}

#[test]
fn convert_check_detects_stale_pages() {
    let tmp = setup_project();

    helpdocs(tmp.path())
        .args(["convert", "--check"])
        .assert()
        .failure();

    helpdocs(tmp.path()).arg("build").assert().success();

    helpdocs(tmp.path())
        .args(["convert", "--check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"));
}

#[test]
fn missing_source_directory_fails() {
    let tmp = TempDir::new().unwrap();

    helpdocs(tmp.path())
        .arg("index")
        .assert()
        .failure()
        .stderr(predicate::str::contains("source directory not found"));

    helpdocs(tmp.path())
        .arg("convert")
        .assert()
        .failure()
        .stderr(predicate::str::contains("source directory not found"));

    assert!(!tmp.path().join("scripts").exists());
    assert!(!tmp.path().join("src").exists());
}

#[test]
fn empty_source_directory_warns_and_succeeds() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("helpdocs.toml"), "source_dir = \"helpfiles\"\n").unwrap();
    fs::create_dir(tmp.path().join("helpfiles")).unwrap();

    helpdocs(tmp.path())
        .arg("index")
        .assert()
        .success()
        .stderr(predicate::str::contains("No markdown files found"));

    assert!(!tmp.path().join("scripts/doc-mappings.json").exists());
}

#[test]
fn resolve_prints_json() {
    let tmp = setup_project();
    helpdocs(tmp.path()).arg("index").assert().success();

    let output = helpdocs(tmp.path())
        .args(["-o", "json", "resolve", "Flag Overview", "nearby()"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let resolved: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(resolved[0]["document"], "pennflag");
    assert_eq!(resolved[0]["source"]["kind"], "mapping");
    assert_eq!(resolved[1]["link"], "/reference/sharpmush-help/pennfunc/#nearby");
    assert_eq!(resolved[1]["source"]["rule"], "function");
}

#[test]
fn convert_check_json_is_a_single_document() {
    let tmp = setup_project();

    let output = helpdocs(tmp.path())
        .args(["-o", "json", "convert", "--check"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["changed"][0], "pennflag.md");
    assert_eq!(report["diffs"][0]["file"], "pennflag.md");
    assert!(report["diffs"][0]["diff"]
        .as_str()
        .unwrap()
        .starts_with("--- a/pennflag.md"));
}

#[test]
fn convert_check_text_prints_diffs() {
    let tmp = setup_project();

    helpdocs(tmp.path())
        .args(["convert", "--check"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("--- a/pennflag.md"))
        .stdout(predicate::str::contains("+## Flags"));
}

#[test]
fn build_json_is_a_single_document() {
    let tmp = setup_project();

    let output = helpdocs(tmp.path())
        .args(["-o", "json", "build"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["index"]["totalMappings"], 3);
    assert_eq!(report["convert"]["converted"][0], "pennflag.md");
    assert_eq!(report["convert"]["converted"][1], "penntop.md");
}
