//! Hit testing tests: connectors, blocks and connection segments.

use crate::helpers::{TestDiagramBuilder, cell, center, empty_graph};
use mathgrid::graph::ConnectionHit;
use mathgrid::{BlockKind, ConnectorRef, Point};

#[test]
fn test_connector_hit_radius_is_wider_than_visual() {
    let (graph, ids) = TestDiagramBuilder::new()
        .with_block(BlockKind::Given, (0, 0))
        .build_with_ids();

    // output at (60, 30); 7.07 away is inside the 8px hit radius
    assert_eq!(
        graph.hit_test_connector(Point::new(65.0, 35.0)),
        Some((ids[0], ConnectorRef::Output))
    );
    // 8.49 away is outside
    assert_eq!(graph.hit_test_connector(Point::new(66.0, 36.0)), None);
}

#[test]
fn test_connector_hit_follows_insertion_order() {
    // a given's output and a square's input can sit on the same point
    let mut graph = empty_graph();
    let given = graph.place_block(BlockKind::Given, cell(0, 0));
    graph.place_block(BlockKind::Square, cell(1, 0));
    assert_eq!(
        graph.hit_test_connector(Point::new(60.0, 30.0)),
        Some((given, ConnectorRef::Output))
    );

    let mut graph = empty_graph();
    let square_first = graph.place_block(BlockKind::Square, cell(1, 0));
    graph.place_block(BlockKind::Given, cell(0, 0));
    assert_eq!(
        graph.hit_test_connector(Point::new(60.0, 30.0)),
        Some((square_first, ConnectorRef::Input(0)))
    );
}

#[test]
fn test_dual_input_slots() {
    let (graph, ids) = TestDiagramBuilder::new()
        .with_block(BlockKind::Division, (2, 2))
        .build_with_ids();

    assert_eq!(
        graph.hit_test_connector(Point::new(121.0, 132.0)),
        Some((ids[0], ConnectorRef::Input(0)))
    );
    assert_eq!(
        graph.hit_test_connector(Point::new(119.0, 168.0)),
        Some((ids[0], ConnectorRef::Input(1)))
    );
}

#[test]
fn test_block_hit_is_edge_inclusive() {
    let (graph, ids) = TestDiagramBuilder::new()
        .with_block(BlockKind::Multiplication, (1, 1))
        .build_with_ids();

    assert_eq!(graph.hit_test_block(center(1, 1)), Some(ids[0]));
    assert_eq!(graph.hit_test_block(Point::new(60.0, 60.0)), Some(ids[0]));
    assert_eq!(graph.hit_test_block(Point::new(120.0, 120.0)), Some(ids[0]));
    assert_eq!(graph.hit_test_block(Point::new(121.0, 90.0)), None);
}

#[test]
fn test_block_hit_prefers_latest() {
    let mut graph = empty_graph();
    graph.place_block(BlockKind::Given, cell(2, 2));
    let top = graph.place_block(BlockKind::Equals, cell(2, 2));

    assert_eq!(graph.hit_test_block(center(2, 2)), Some(top));
}

#[test]
fn test_segment_hits_are_bounded_by_endpoints() {
    let (graph, _) = TestDiagramBuilder::new().with_sum_squared().build_with_ids();
    // first wire: (60, 30) -> (120, 30) -> (120, 72) -> (180, 72)
    let first = graph.connections()[0].id;

    assert_eq!(
        graph.hit_test_connection_segment(Point::new(126.0, 50.0)),
        Some(ConnectionHit {
            connection: first,
            on_vertical_segment: true,
        })
    );
    assert_eq!(
        graph.hit_test_connection_segment(Point::new(90.0, 36.0)),
        Some(ConnectionHit {
            connection: first,
            on_vertical_segment: false,
        })
    );
    // past the end of the vertical span
    assert_eq!(graph.hit_test_connection_segment(Point::new(120.0, 20.0)), None);
    // left of the source stub
    assert_eq!(graph.hit_test_connection_segment(Point::new(50.0, 30.0)), None);
}

#[test]
fn test_vertical_hit_beats_earlier_horizontal_stub() {
    let (mut graph, _) = TestDiagramBuilder::new()
        .with_block(BlockKind::Given, (0, 1))
        .with_block(BlockKind::Square, (4, 1))
        .with_block(BlockKind::Given, (0, 0))
        .with_block(BlockKind::Square, (4, 2))
        .with_wire(0, 1, 0)
        .with_wire(2, 3, 0)
        .build_with_ids();
    let flat = graph.connections()[0].id;
    let bent = graph.connections()[1].id;
    // flat wire runs along y = 90; bent wire drops from y = 30 to y = 150 at x = 150
    graph.set_connection_vertical_x(flat, 200.0).unwrap();

    let hit = graph.hit_test_connection_segment(Point::new(150.0, 92.0)).unwrap();
    assert_eq!(hit.connection, bent);
    assert!(hit.on_vertical_segment);

    let hit = graph.hit_test_connection_segment(Point::new(100.0, 92.0)).unwrap();
    assert_eq!(hit.connection, flat);
    assert!(!hit.on_vertical_segment);
}
