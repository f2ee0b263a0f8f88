use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use kiln_config::Config;
use kiln_pipeline::{CleanOutcome, Orchestrator, PipelineError, Stage};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(root, "src/public/styles/style.styl", "body { color: #ff0000; }\n");
    write(
        root,
        "src/public/styles/nav.styl",
        ".nav {\n  & a { color: blue; }\n}\n",
    );
    write(
        root,
        "src/public/javascript/app.js",
        "function greet(name) {\n  var message = 'hello ' + name;\n  console.log(message);\n}\ngreet('kiln');\n",
    );
    write(
        root,
        "src/public/javascript/util.js",
        "window.util = function (a, b) {\n  return a + b;\n};\n",
    );
    write(root, "index.html", "<!doctype html><title>kiln</title>\n");
    temp
}

fn orchestrator(root: &Path) -> Orchestrator {
    Orchestrator::new(Arc::new(Config::with_root(root))).unwrap()
}

/// Every file under `dir`, relative to it, sorted.
fn tree(dir: &Path) -> Vec<PathBuf> {
    fn walk(base: &Path, dir: &Path, out: &mut Vec<PathBuf>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(base, &path, out);
            } else {
                out.push(path.strip_prefix(base).unwrap().to_path_buf());
            }
        }
    }
    let mut out = Vec::new();
    if dir.exists() {
        walk(dir, dir, &mut out);
    }
    out.sort();
    out
}

#[tokio::test]
async fn development_build_writes_one_output_per_input() {
    let temp = project();
    let report = orchestrator(temp.path())
        .run_target("build-development")
        .await
        .unwrap();

    assert_eq!(report.file_count(), 5);
    assert_eq!(
        tree(&temp.path().join("dist")),
        vec![
            PathBuf::from("css/nav.css"),
            PathBuf::from("css/style.css"),
            PathBuf::from("index.html"),
            PathBuf::from("javascript/app.js"),
            PathBuf::from("javascript/util.js"),
        ]
    );

    // development scripts are copied verbatim
    let app = fs::read_to_string(temp.path().join("dist/javascript/app.js")).unwrap();
    assert!(app.contains("var message = 'hello ' + name;"));
}

#[tokio::test]
async fn development_styles_are_compiled_but_not_minified() {
    let temp = project();
    orchestrator(temp.path())
        .run_target("build-css-development")
        .await
        .unwrap();

    let css = fs::read_to_string(temp.path().join("dist/css/style.css")).unwrap();
    assert!(css.contains("color"));
    assert!(css.contains('\n'));
    assert!(!temp.path().join("dist/css/style.styl").exists());

    let nav = fs::read_to_string(temp.path().join("dist/css/nav.css")).unwrap();
    assert!(nav.contains(".nav a"));
}

#[tokio::test]
async fn production_build_writes_single_minified_bundles() {
    let temp = project();
    orchestrator(temp.path()).run_target("build").await.unwrap();

    assert_eq!(
        tree(&temp.path().join("dist")),
        vec![
            PathBuf::from("css/weel.css"),
            PathBuf::from("index.html"),
            PathBuf::from("javascript/weel.js"),
        ]
    );

    let css = fs::read_to_string(temp.path().join("dist/css/weel.css")).unwrap();
    assert!(css.contains("body{color:"));
    assert!(css.contains(".nav a{color:"));
    assert!(!css.contains("  "));

    let js = fs::read_to_string(temp.path().join("dist/javascript/weel.js")).unwrap();
    assert!(js.contains("greet"));
    assert!(js.contains("window.util"));
    assert!(!js.contains("var message = 'hello ' + name;"));
}

#[tokio::test]
async fn bundle_names_follow_configuration() {
    let temp = project();
    let mut config = Config::with_root(temp.path());
    config.paths.style_bundle = "site.css".to_string();
    config.paths.script_bundle = "site.js".to_string();
    let orchestrator = Orchestrator::new(Arc::new(config)).unwrap();

    orchestrator.run_target("build").await.unwrap();

    assert!(temp.path().join("dist/css/site.css").exists());
    assert!(temp.path().join("dist/javascript/site.js").exists());
    assert!(!temp.path().join("dist/css/weel.css").exists());
}

#[tokio::test]
async fn clean_then_build_leaves_exactly_the_target_outputs() {
    let temp = project();
    write(temp.path(), "dist/stale/old.txt", "stale");
    let orchestrator = orchestrator(temp.path());

    let outcome = orchestrator.clean().await;
    assert_eq!(outcome, CleanOutcome::Removed(temp.path().join("dist")));

    orchestrator.run_target("build-index").await.unwrap();
    assert_eq!(
        tree(&temp.path().join("dist")),
        vec![PathBuf::from("index.html")]
    );
}

#[tokio::test]
async fn clean_without_distribution_directory_reports_missing() {
    let temp = TempDir::new().unwrap();
    let outcome = orchestrator(temp.path()).clean().await;
    assert_eq!(outcome, CleanOutcome::Missing(temp.path().join("dist")));
}

#[tokio::test]
async fn malformed_script_fails_build_and_keeps_previous_output() {
    let temp = project();
    let orchestrator = orchestrator(temp.path());
    orchestrator
        .run_target("build-javascript-production")
        .await
        .unwrap();
    let before = fs::read(temp.path().join("dist/javascript/weel.js")).unwrap();

    write(temp.path(), "src/public/javascript/broken.js", "function ( {\n");
    let err = orchestrator.run_target("build").await.unwrap_err();

    match err {
        PipelineError::TargetFailed { target, failures } => {
            assert_eq!(target, "build");
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].stage.as_str(), "script-prod");
            assert!(matches!(
                *failures[0].error,
                PipelineError::Transform { operation: "minify-script", .. }
            ));
        }
        other => panic!("expected TargetFailed, got {other:?}"),
    }

    assert_eq!(
        tree(&temp.path().join("dist/javascript")),
        vec![PathBuf::from("weel.js")]
    );
    assert_eq!(
        fs::read(temp.path().join("dist/javascript/weel.js")).unwrap(),
        before
    );
    // sibling stages are not rolled back
    assert!(temp.path().join("dist/css/weel.css").exists());
}

#[tokio::test]
async fn partials_are_copied_when_configured() {
    let temp = project();
    write(temp.path(), "src/partials/header.html", "<header></header>");
    write(temp.path(), "src/partials/blog/post.html", "<article></article>");
    let mut config = Config::with_root(temp.path());
    config.paths.partials = Some("src/partials/**/*".to_string());
    let orchestrator = Orchestrator::new(Arc::new(config)).unwrap();

    orchestrator.run_target("build-partials").await.unwrap();

    assert_eq!(
        tree(&temp.path().join("dist/partials")),
        vec![
            PathBuf::from("blog/post.html"),
            PathBuf::from("header.html")
        ]
    );
}

#[test]
fn target_with_unknown_stage_cannot_be_defined() {
    let temp = TempDir::new().unwrap();
    let mut orchestrator = orchestrator(temp.path());
    orchestrator
        .define_stage(Stage::new("readme-copy", "").unwrap().input("README.md"))
        .unwrap();

    let err = orchestrator
        .define_target("docs", ["readme-copy", "docs-render"])
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::UnknownStage { ref target, ref stage }
            if target == "docs" && stage.as_str() == "docs-render"
    ));
    assert!(orchestrator.target("docs").is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_rebuilds_of_one_target_all_succeed() {
    let temp = project();
    let root = temp.path();
    write(
        root,
        "src/public/styles/style.styl",
        &"body { color: #ff0000; }\n".repeat(20_000),
    );
    let orchestrator = Arc::new(orchestrator(root));

    for _ in 0..5 {
        let runs: Vec<_> = (0..4)
            .map(|_| {
                let orchestrator = Arc::clone(&orchestrator);
                tokio::spawn(async move { orchestrator.run_target("build-css-development").await })
            })
            .collect();
        for run in runs {
            run.await.unwrap().unwrap();
        }
    }

    assert_eq!(
        tree(&root.join("dist")),
        vec![PathBuf::from("css/nav.css"), PathBuf::from("css/style.css")]
    );
}
