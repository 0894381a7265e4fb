use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use viewconf_testing::TestWorld;
use viewconf_testing::assertions::assert_json_len;

#[test]
fn test_import_then_list_models() {
    let world = TestWorld::new();
    let catalog = world.write_sample_catalog().expect("write catalog");

    let mut cmd = cargo_bin_cmd!("viewconf");
    world
        .configure_command(&mut cmd)
        .arg("catalog")
        .arg("import")
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Imported 3 models (27 fields, 1 buttons, 4 views)",
        ));

    let result = world.run_json(&["catalog", "models"]).unwrap();
    assert!(result.success(), "stderr: {}", result.stderr());
    let json = result.json().unwrap();
    assert_json_len(&json, "/models", 3).unwrap();

    // Sorted by name
    let names: Vec<&str> = json["models"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["ir.attachment", "ir.model.field", "res.user"]);
    assert_eq!(json["models"][2]["buttons"], 1);
}

#[test]
fn test_reimport_is_idempotent() {
    let world = TestWorld::new();
    let catalog = world.write_sample_catalog().unwrap();
    let path = catalog.to_string_lossy().to_string();

    for _ in 0..2 {
        let result = world.run(&["catalog", "import", &path]).unwrap();
        assert!(result.success(), "stderr: {}", result.stderr());
    }

    let json = world
        .run_json(&["catalog", "views", "ir.attachment"])
        .unwrap()
        .json()
        .unwrap();
    assert_json_len(&json, "/views", 2).unwrap();
    assert_eq!(json["views"][0]["type"], "tree");
    assert_eq!(json["views"][0]["name"], "attachment_view_tree");
}

#[test]
fn test_missing_catalog_file() {
    let world = TestWorld::new();

    let mut cmd = cargo_bin_cmd!("viewconf");
    world
        .configure_command(&mut cmd)
        .args(["catalog", "import", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: Failed to read catalog"));
}

#[test]
fn test_views_of_unknown_model() {
    let world = TestWorld::new().with_sample_catalog().unwrap();

    let result = world.run(&["catalog", "views", "ir.unknown"]).unwrap();
    assert!(!result.success());
    assert!(result.stderr().contains("Unknown model 'ir.unknown'"));
}
