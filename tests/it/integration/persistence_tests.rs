//! Persistence Integration Tests
//!
//! Save to disk, load back, and swap into a live controller.

use crate::helpers::{TestDiagramBuilder, assert_consistent, assert_counts, occupancy};
use mathgrid::document::{load_from_path, save_to_path};
use mathgrid::{DiagramDocument, GestureOutcome, InteractionController, Point};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_file_round_trip_is_isomorphic() {
    let (mut graph, ids) = TestDiagramBuilder::new().with_sum_squared().build_with_ids();
    graph.set_expression(ids[2], "a + b").unwrap();
    graph.set_label_position(ids[3], Point::new(512.5, 33.0)).unwrap();
    graph.set_block_color(ids[0], "#123456").unwrap();
    let wire = graph.connections()[1].id;
    graph.set_connection_vertical_x(wire, 42.0).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("diagram.json");
    save_to_path(&graph, &path).unwrap();
    let loaded = load_from_path(&path).unwrap();

    assert_counts(&loaded, 4, 3);
    assert_eq!(DiagramDocument::from_graph(&loaded), DiagramDocument::from_graph(&graph));
    assert_eq!(loaded.connections()[1].vertical_x, 42.0);
    assert_eq!(loaded.blocks()[3].label_anchor(), Point::new(512.5, 33.0));
    assert_eq!(loaded.blocks()[0].color, "#123456");
    for (original, restored) in graph.blocks().iter().zip(loaded.blocks()) {
        assert_eq!(occupancy(&graph, original.id), occupancy(&loaded, restored.id));
    }
    assert_consistent(&loaded);
}

#[test]
fn test_save_overwrites_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("diagram.json");
    fs::write(&path, "stale").unwrap();

    let graph = TestDiagramBuilder::new().with_sum_squared().build();
    save_to_path(&graph, &path).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"blockCounter\": 5"));
    // only the target file remains; the temp file was renamed over it
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_failed_load_leaves_controller_untouched() {
    let (mut controller, _) = TestDiagramBuilder::new().with_sum_squared().build_controller();
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(
        &path,
        r#"{ "blocks": [], "connections": [
            { "sourceBlockIndex": 0, "targetBlockIndex": 1, "inputIndex": 0, "verticalX": 1.0 }
        ], "blockCounter": 1 }"#,
    )
    .unwrap();

    assert!(load_from_path(&path).is_err());
    assert_counts(controller.graph(), 4, 3);

    let replacement = TestDiagramBuilder::new().build();
    let previous = controller.replace_graph(replacement);
    assert_counts(&previous, 4, 3);
    assert!(!controller.graph().has_content());
}

#[test]
fn test_loaded_graph_is_editable() {
    let graph = TestDiagramBuilder::new().with_sum_squared().build();
    let dir = tempdir().unwrap();
    let path = dir.path().join("diagram.json");
    save_to_path(&graph, &path).unwrap();

    let mut controller = InteractionController::new(load_from_path(&path).unwrap());
    // the square's output is free after load
    let outcome = controller.pointer_down(Point::new(420.0, 90.0));
    assert!(matches!(outcome, GestureOutcome::ConnectionArmed(_)));

    controller.begin_palette_drag(mathgrid::BlockKind::Equals, Point::new(0.0, 0.0));
    let GestureOutcome::Placed(id) = controller.pointer_up(Point::new(610.0, 70.0)) else {
        panic!("expected a placement");
    };
    // numbering continues after the loaded blocks
    assert_eq!(controller.graph().block(id).unwrap().number, 5);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = load_from_path(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, mathgrid::DiagramError::Io(_)));
    assert!(!err.is_malformed());
}
