//! Integration tests for scene files: parsing, authoring, solving and the CLI

use std::process::Command;

use constraint_kit::{Priority, Rect, Scene, SceneError};

const TOLERANCE: f64 = 0.001;

fn assert_frame(actual: Option<Rect>, expected: Rect) {
    let actual = actual.expect("view should be in the solved scene");
    assert!(
        actual.approx_eq(&expected, TOLERANCE),
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

#[test]
fn test_profile_card_scene() {
    let source = include_str!("scene-fixtures/profile-card.toml");
    let scene = Scene::from_str(source).expect("profile card should parse");
    assert!(scene.batch);
    assert_eq!(scene.views.len(), 5);

    let solved = scene.solve().expect("profile card should solve");
    assert!(solved.conflicts.is_empty(), "{:?}", solved.conflicts);

    let names: Vec<&str> = solved.frames.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["screen", "card", "avatar", "title", "button"]);

    assert_frame(solved.frame("screen"), Rect::new(0.0, 0.0, 375.0, 667.0));
    assert_frame(solved.frame("card"), Rect::new(0.0, 20.0, 375.0, 613.0));
    assert_frame(solved.frame("avatar"), Rect::new(16.0, 36.0, 48.0, 48.0));
    assert_frame(solved.frame("title"), Rect::new(76.0, 49.0, 120.0, 22.0));
    assert_frame(solved.frame("button"), Rect::new(16.0, 573.0, 343.0, 44.0));
}

#[test]
fn test_scene_overrides_reach_constraints() {
    let scene = Scene::from_str(include_str!("scene-fixtures/profile-card.toml")).unwrap();
    let solved = scene.solve().unwrap();

    let button_height: Vec<_> = solved
        .constraints
        .iter()
        .filter(|c| c.identifier.as_deref() == Some("button-height"))
        .collect();
    assert_eq!(button_height.len(), 1);
    assert_eq!(button_height[0].priority, Priority::NEAR_REQUIRED);
}

#[test]
fn test_legacy_toolbar_scene() {
    let scene = Scene::from_str(include_str!("scene-fixtures/legacy-toolbar.toml")).unwrap();
    assert!(!scene.layout.safe_area_available);

    let solved = scene.solve().unwrap();
    assert!(solved.conflicts.is_empty(), "{:?}", solved.conflicts);
    assert_frame(solved.frame("toolbar"), Rect::new(0.0, 20.0, 320.0, 44.0));
    // Leading sits on the right in right-to-left layouts
    assert_frame(solved.frame("back"), Rect::new(280.0, 26.0, 32.0, 32.0));

    let guide = solved
        .constraints
        .first()
        .map(|c| c.to_string())
        .unwrap_or_default();
    assert_eq!(guide, "v1.top == v0.topGuide.top + 20");
}

#[test]
fn test_unknown_view_suggests_names() {
    let source = r#"
        [[view]]
        name = "screen"
        frame = [0, 0, 100, 100]

        [[view]]
        name = "card"
        parent = "scren"
    "#;

    let err = Scene::from_str(source).unwrap().solve().unwrap_err();
    assert!(matches!(err, SceneError::UnknownView { .. }));
    assert_eq!(
        err.to_string(),
        "unknown view 'scren' (did you mean screen?)"
    );
}

#[test]
fn test_unknown_op_is_a_parse_error() {
    let source = r#"
        [[constraint]]
        op = "pin-everything"
        view = "card"
    "#;

    let err = Scene::from_str(source).unwrap_err();
    assert!(matches!(err, SceneError::Toml(_)));
}

#[test]
fn test_cli_prints_frames() {
    let output = Command::new(env!("CARGO_BIN_EXE_constraint-kit"))
        .arg("tests/scene-fixtures/legacy-toolbar.toml")
        .output()
        .expect("failed to run constraint-kit");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "window x=0 y=0 w=320 h=480");
    assert!(lines[1].starts_with("toolbar "));
    assert!(lines[2].starts_with("back "));
}

#[test]
fn test_cli_prints_constraints_when_asked() {
    let output = Command::new(env!("CARGO_BIN_EXE_constraint-kit"))
        .args(["--constraints", "tests/scene-fixtures/legacy-toolbar.toml"])
        .output()
        .expect("failed to run constraint-kit");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("v1.top == v0.topGuide.top + 20"));
    assert!(stdout.contains("v2.width == 32"));
}

#[test]
fn test_cli_reports_missing_file() {
    let output = Command::new(env!("CARGO_BIN_EXE_constraint-kit"))
        .arg("tests/scene-fixtures/does-not-exist.toml")
        .output()
        .expect("failed to run constraint-kit");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Error: failed to read scene file"));
}
