//! Graph mutation tests: occupancy, cascade, numbering, moves.

use crate::helpers::{TestDiagramBuilder, assert_consistent, assert_counts, cell, empty_graph, occupancy};
use mathgrid::{BlockKind, DiagramError, Point};

#[test]
fn test_connect_then_disconnect_frees_both_ends() {
    let mut graph = empty_graph();
    let addition = graph.place_block(BlockKind::Addition, cell(0, 0));
    let given = graph.place_block(BlockKind::Given, cell(2, 0));

    let conn = graph.connect(given, addition, 0).unwrap();
    assert!(graph.block(addition).unwrap().inputs()[0].occupied);
    assert!(graph.block(given).unwrap().output().occupied);
    assert_consistent(&graph);

    graph.disconnect(conn).unwrap();
    assert!(!graph.block(addition).unwrap().inputs()[0].occupied);
    assert!(!graph.block(given).unwrap().output().occupied);
    assert_counts(&graph, 2, 0);
    assert_consistent(&graph);
}

#[test]
fn test_self_connect_is_rejected_without_mutation() {
    let mut graph = empty_graph();
    let addition = graph.place_block(BlockKind::Addition, cell(0, 0));

    let err = graph.connect(addition, addition, 1).unwrap_err();
    assert!(matches!(err, DiagramError::SelfLoop(_)));
    assert_counts(&graph, 1, 0);
    assert_eq!(occupancy(&graph, addition), vec![false, false, false]);
}

#[test]
fn test_double_occupancy_keeps_existing_edge() {
    let (mut graph, ids) = TestDiagramBuilder::new()
        .with_block(BlockKind::Given, (0, 0))
        .with_block(BlockKind::Given, (0, 2))
        .with_block(BlockKind::SquareRoot, (3, 1))
        .with_wire(0, 2, 0)
        .build_with_ids();

    let err = graph.connect(ids[1], ids[2], 0).unwrap_err();
    assert!(matches!(err, DiagramError::ConnectorOccupied { block, .. } if block == ids[2]));

    let existing = &graph.connections()[0];
    assert_eq!((existing.source, existing.target), (ids[0], ids[2]));
    assert_eq!(occupancy(&graph, ids[1]), vec![false]);
    assert_consistent(&graph);
}

#[test]
fn test_cascade_removes_exactly_touching_connections() {
    let (mut graph, ids) = TestDiagramBuilder::new().with_sum_squared().build_with_ids();
    assert_counts(&graph, 4, 3);

    let removal = graph.remove_block(ids[3]).unwrap();
    assert_eq!(removal.connections.len(), 1);
    assert_counts(&graph, 3, 2);
    // only the far side of the removed wire is released
    assert_eq!(occupancy(&graph, ids[2]), vec![false, true, true]);
    assert_eq!(occupancy(&graph, ids[0]), vec![true]);
    assert_consistent(&graph);

    let removal = graph.remove_block(ids[2]).unwrap();
    assert_eq!(removal.connections.len(), 2);
    assert_counts(&graph, 2, 0);
    assert_eq!(occupancy(&graph, ids[0]), vec![false]);
    assert_eq!(occupancy(&graph, ids[1]), vec![false]);
    assert_consistent(&graph);
}

#[test]
fn test_move_preserves_topology() {
    let (mut graph, ids) = TestDiagramBuilder::new().with_sum_squared().build_with_ids();
    let before: Vec<_> = graph
        .connections()
        .iter()
        .map(|c| (c.id, c.source, c.target, c.input_slot, c.vertical_x))
        .collect();
    let occupancy_before = occupancy(&graph, ids[2]);

    graph.move_block(ids[2], Point::new(250.0, 200.0)).unwrap();

    let after: Vec<_> = graph
        .connections()
        .iter()
        .map(|c| (c.id, c.source, c.target, c.input_slot, c.vertical_x))
        .collect();
    assert_eq!(before, after);
    assert_eq!(occupancy(&graph, ids[2]), occupancy_before);
    assert_eq!(graph.block(ids[2]).unwrap().position, Point::new(240.0, 180.0));
    // addition's output now starts the wire into the square
    assert_eq!(graph.connections()[2].start(), Point::new(300.0, 210.0));
    assert_consistent(&graph);
}

#[test]
fn test_remove_missing_block_is_invalid_reference() {
    let (mut graph, ids) = TestDiagramBuilder::new()
        .with_block(BlockKind::Given, (0, 0))
        .build_with_ids();
    graph.remove_block(ids[0]).unwrap();

    assert!(matches!(
        graph.remove_block(ids[0]),
        Err(DiagramError::InvalidReference(_))
    ));
    assert!(matches!(
        graph.move_block(ids[0], cell(1, 1)),
        Err(DiagramError::InvalidReference(_))
    ));
}

#[test]
fn test_numbering_is_monotonic_until_clear() {
    let mut graph = empty_graph();
    let first = graph.place_block(BlockKind::Equals, cell(0, 0));
    let second = graph.place_block(BlockKind::Equals, cell(1, 0));
    graph.remove_block(second).unwrap();
    let third = graph.place_block(BlockKind::Equals, cell(1, 0));

    assert_eq!(graph.block(first).unwrap().number, 1);
    assert_eq!(graph.block(third).unwrap().number, 3);

    graph.clear();
    assert_counts(&graph, 0, 0);
    assert!(!graph.has_content());
    let again = graph.place_block(BlockKind::Equals, cell(0, 0));
    assert_eq!(graph.block(again).unwrap().number, 1);
}

#[test]
fn test_vertical_x_is_unconstrained() {
    let (mut graph, _) = TestDiagramBuilder::new().with_sum_squared().build_with_ids();
    let conn = graph.connections()[0].id;

    graph.set_connection_vertical_x(conn, -500.0).unwrap();
    let path = graph.connection(conn).unwrap().path();
    assert_eq!(path.points[1], Point::new(-500.0, 30.0));
    assert_eq!(path.points[2], Point::new(-500.0, 72.0));
}

#[test]
fn test_connections_of_block() {
    let (graph, ids) = TestDiagramBuilder::new().with_sum_squared().build_with_ids();
    assert_eq!(graph.connections_of(ids[2]).count(), 3);
    assert_eq!(graph.connections_of(ids[0]).count(), 1);
    assert_eq!(graph.block_index(ids[3]), Some(3));
}
