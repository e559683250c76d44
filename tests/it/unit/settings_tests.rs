//! Unit tests for editor settings loading.

use crate::helpers::TestDiagramBuilder;
use mathgrid::{BlockKind, DiagramError, EditorSettings, Point};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_try_load_partial_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{ "gridSize": 40.0, "connectorHitRadius": 10.0 }"#).unwrap();

    let settings = EditorSettings::try_load_from(&path).unwrap();
    assert_eq!(settings.grid_size, 40.0);
    assert_eq!(settings.connector_hit_radius, 10.0);
    assert_eq!(settings.canvas_width, 1200.0);
}

#[test]
fn test_invalid_values_fall_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{ "gridSize": -5.0 }"#).unwrap();

    assert!(matches!(
        EditorSettings::try_load_from(&path),
        Err(DiagramError::MalformedDocument(_))
    ));
    assert_eq!(EditorSettings::load_from(&path), EditorSettings::default());
}

#[test]
fn test_unparseable_file_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, "not json").unwrap();

    assert_eq!(EditorSettings::load_from(&path), EditorSettings::default());
}

#[test]
fn test_graph_uses_configured_grid() {
    let settings = EditorSettings {
        grid_size: 40.0,
        ..Default::default()
    };
    let (graph, ids) = TestDiagramBuilder::new()
        .with_settings(settings)
        .with_block(BlockKind::Addition, (2, 1))
        .build_with_ids();

    let block = graph.block(ids[0]).unwrap();
    assert_eq!(block.position, Point::new(80.0, 40.0));
    assert_eq!(block.size, (40.0, 40.0));
    assert_eq!(block.output().position, Point::new(120.0, 60.0));
    assert_eq!(block.inputs()[1].position, Point::new(80.0, 68.0));
}
