//! Layer-level planning scenarios.

use toolpath_core::point::point2;
use toolpath_core::{
    default_label_order, LabeledOpenPaths, Loop, PathLabel, PathRole, PlannerConfig, Point2,
    Polyline, Segment2,
};
use toolpath_planner::{BoundarySet, LayerPlanner, OutlineTree};

fn square(center: (f64, f64), side: f64) -> Loop {
    let h = side / 2.0;
    Loop::new(vec![
        point2(center.0 - h, center.1 - h),
        point2(center.0 + h, center.1 - h),
        point2(center.0 + h, center.1 + h),
        point2(center.0 - h, center.1 + h),
    ])
}

/// A U shape opening upward: two vertical legs joined at the bottom.
fn u_shape() -> Loop {
    Loop::new(vec![
        point2(0.0, 0.0),
        point2(30.0, 0.0),
        point2(30.0, 30.0),
        point2(20.0, 30.0),
        point2(20.0, 10.0),
        point2(10.0, 10.0),
        point2(10.0, 30.0),
        point2(0.0, 30.0),
    ])
}

/// No segment of any emitted path may cross an outline boundary.
fn assert_no_path_crosses(result: &LabeledOpenPaths, outlines: &[Loop]) {
    for (path, label) in result {
        for seg in path.segments() {
            for outline in outlines {
                for wall in outline.segments() {
                    assert!(
                        !seg.crosses(&wall, 1e-6),
                        "path labeled {label:?} crosses an outline at {:?}",
                        seg
                    );
                }
            }
        }
    }
}

#[test]
fn nested_outline_insertion_builds_expected_tree() {
    // Outline A contains outline B; insertion in either order produces
    // root -> A -> B.
    let a = square((0.0, 0.0), 20.0);
    let b = square((0.0, 0.0), 4.0);

    let mut forward = OutlineTree::root();
    forward.insert(OutlineTree::outline_node(a.clone())).unwrap();
    forward.insert(OutlineTree::outline_node(b.clone())).unwrap();

    let mut reverse = OutlineTree::root();
    reverse.insert(OutlineTree::outline_node(b)).unwrap();
    reverse.insert(OutlineTree::outline_node(a)).unwrap();

    for tree in [&forward, &reverse] {
        assert_eq!(tree.children().len(), 1);
        let outer = &tree.children()[0];
        assert!(outer.contains_point(&point2(9.0, 9.0)));
        assert_eq!(outer.children().len(), 1);
        let inner = &outer.children()[0];
        assert!(inner.contains_point(&point2(1.0, 1.0)));
        assert!(inner.children().is_empty());
    }
    assert_eq!(forward.repr(), reverse.repr());
}

#[test]
fn travel_minimization_picks_near_island_first() {
    let mut planner = LayerPlanner::new(PlannerConfig::default().with_home_position(-5.0, 0.0));

    for center in [(0.0, 0.0), (100.0, 0.0)] {
        planner.add_boundary_loop(square(center, 10.0)).unwrap();
        planner
            .add_loop(square(center, 8.0), PathLabel::inset(0, 10))
            .unwrap();
        planner
            .add_loop(square(center, 6.4), PathLabel::inset(1, 9))
            .unwrap();
    }

    let mut result = Vec::new();
    planner.optimize(&mut result);

    assert_eq!(result.len(), 4);
    // Both paths of the (0,0) island come before any of the (100,0) one.
    for (i, (path, _)) in result.iter().enumerate() {
        let x = path.first().unwrap().x;
        if i < 2 {
            assert!(x < 50.0, "path {i} should belong to the near island");
        } else {
            assert!(x > 50.0, "path {i} should belong to the far island");
        }
    }
}

#[test]
fn boundary_respect_splits_paths_across_concave_wall() {
    // Two infill runs, one per leg of the U. A direct connection between
    // them would cross the concave wall, so they must stay separate.
    let label = PathLabel::new(PathRole::Infill, 5);
    let left_leg = Polyline::new(vec![point2(5.0, 25.0), point2(5.0, 15.0)]);
    let right_leg = Polyline::new(vec![point2(25.0, 25.0), point2(25.0, 15.0)]);

    let mut planner = LayerPlanner::new(PlannerConfig::default());
    planner.add_boundary_loop(u_shape()).unwrap();
    planner.add_path(left_leg.clone(), label);
    planner.add_path(right_leg.clone(), label);

    let mut result = Vec::new();
    planner.optimize(&mut result);

    assert_eq!(result.len(), 2, "legs must not chain across the wall");
    assert_no_path_crosses(&result, &[u_shape()]);

    // The same two runs with no boundary in play chain into one path.
    let mut planner = LayerPlanner::new(PlannerConfig::default());
    planner.add_path(left_leg, label);
    planner.add_path(right_leg, label);
    let mut merged = Vec::new();
    planner.optimize(&mut merged);
    assert_eq!(merged.len(), 1);
}

#[test]
fn sibling_insets_in_u_shape_respect_walls() {
    // One inset shell per leg of the U, as sibling nodes of the same
    // outline. Their emitted paths stay inside the outline and never
    // cross it.
    let mut planner = LayerPlanner::new(PlannerConfig::default());
    planner.add_boundary_loop(u_shape()).unwrap();
    planner
        .add_loop(
            Loop::new(vec![
                point2(2.0, 12.0),
                point2(8.0, 12.0),
                point2(8.0, 28.0),
                point2(2.0, 28.0),
            ]),
            PathLabel::inset(0, 10),
        )
        .unwrap();
    planner
        .add_loop(
            Loop::new(vec![
                point2(22.0, 12.0),
                point2(28.0, 12.0),
                point2(28.0, 28.0),
                point2(22.0, 28.0),
            ]),
            PathLabel::inset(0, 10),
        )
        .unwrap();

    let mut result = Vec::new();
    planner.optimize(&mut result);

    assert_eq!(result.len(), 2);
    assert_no_path_crosses(&result, &[u_shape()]);
}

#[test]
fn optimize_is_deterministic() {
    let build = || {
        let mut planner = LayerPlanner::new(PlannerConfig::default().with_home_position(1.0, 2.0));
        planner.add_boundary_loop(square((0.0, 0.0), 30.0)).unwrap();
        planner.add_boundary_loop(square((8.0, 8.0), 6.0)).unwrap();
        planner
            .add_loop(square((0.0, 0.0), 28.0), PathLabel::inset(0, 10))
            .unwrap();
        planner.add_path(
            Polyline::new(vec![point2(-10.0, -10.0), point2(-10.0, 0.0)]),
            PathLabel::new(PathRole::Infill, 5),
        );
        planner.add_path(
            Polyline::new(vec![point2(0.0, -12.0), point2(5.0, -12.0)]),
            PathLabel::new(PathRole::Infill, 5),
        );
        planner.add_path(
            Polyline::new(vec![point2(8.0, 8.0), point2(9.0, 9.0)]),
            PathLabel::new(PathRole::Support, 1),
        );
        planner
    };

    let mut first = Vec::new();
    build().optimize(&mut first);
    let mut second = Vec::new();
    build().optimize(&mut second);

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn optimize_drains_the_planner() {
    let mut planner = LayerPlanner::new(PlannerConfig::default());
    planner.add_boundary_loop(square((0.0, 0.0), 10.0)).unwrap();
    planner
        .add_loop(square((0.0, 0.0), 8.0), PathLabel::inset(0, 10))
        .unwrap();

    let mut result = Vec::new();
    planner.optimize(&mut result);
    assert_eq!(result.len(), 1);

    let mut again = Vec::new();
    planner.optimize(&mut again);
    assert!(again.is_empty(), "a second optimize finds nothing left");
}

#[test]
fn labels_are_preserved_through_emission() {
    let mut planner = LayerPlanner::new(PlannerConfig::default());
    planner.add_boundary_loop(square((0.0, 0.0), 20.0)).unwrap();
    planner
        .add_loop(square((0.0, 0.0), 18.0), PathLabel::inset(0, 20))
        .unwrap();
    planner.add_path(
        Polyline::new(vec![point2(-3.0, 0.0), point2(3.0, 0.0)]),
        PathLabel::new(PathRole::Infill, 5),
    );
    planner.add_path(
        Polyline::new(vec![point2(-3.0, -2.0), point2(3.0, -2.0)]),
        PathLabel::new(PathRole::Bridge, 8),
    );

    let mut result = Vec::new();
    planner.optimize(&mut result);

    let labels: Vec<PathLabel> = result.iter().map(|(_, l)| *l).collect();
    assert_eq!(
        labels,
        vec![
            PathLabel::inset(0, 20),
            PathLabel::new(PathRole::Bridge, 8),
            PathLabel::new(PathRole::Infill, 5),
        ]
    );
}

#[test]
fn custom_label_order_inverts_emission() {
    // A comparator that prefers LOW priorities flips the default order.
    let low_first = |a: &PathLabel, b: &PathLabel| a.priority.cmp(&b.priority);

    let mut planner = LayerPlanner::new(PlannerConfig::default());
    planner.add_boundary_loop(square((0.0, 0.0), 20.0)).unwrap();
    planner
        .add_loop(square((0.0, 0.0), 18.0), PathLabel::inset(0, 20))
        .unwrap();
    planner.add_path(
        Polyline::new(vec![point2(-3.0, 0.0), point2(3.0, 0.0)]),
        PathLabel::new(PathRole::Infill, 5),
    );

    let mut result = Vec::new();
    planner.optimize_with(&mut result, &low_first);

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].1.role, PathRole::Infill);
    assert!(result[1].1.is_inset());
}

#[test]
fn end_to_end_with_inset_engine() {
    // Outline -> inset engine shells -> planner, the way a slicer wires
    // the two subsystems together.
    let outline = square((0.0, 0.0), 20.0);
    let mut planner = LayerPlanner::new(PlannerConfig::default().with_home_position(-15.0, 0.0));
    planner.add_boundary_loop(outline.clone()).unwrap();

    let mut segments = outline.to_segments();
    for depth in 0..3u32 {
        segments = toolpath_inset::inset(&segments, 0.4, 0.01).unwrap();
        let shell = Loop::from_segments(&segments, 1e-6).unwrap();
        planner
            .add_loop(shell, PathLabel::inset(depth, 20 - depth as i32))
            .unwrap();
    }

    let mut result = Vec::new();
    planner.optimize(&mut result);

    assert_eq!(result.len(), 3);
    // Outside-in by the label priorities chosen above.
    for (i, (path, label)) in result.iter().enumerate() {
        assert_eq!(*label, PathLabel::inset(i as u32, 20 - i as i32));
        for p in path.points() {
            assert!(outline.contains(p));
        }
    }
    assert_no_path_crosses(&result, &[outline]);
}

#[test]
fn graph_optimize_updates_entry_point_across_subwalks() {
    // Direct SpatialGraph use: the entry point always lands on the last
    // emitted endpoint, even when boundaries split the emission.
    let mut graph = toolpath_planner::SpatialGraph::new();
    let label = PathLabel::default();
    graph.insert_path(
        Polyline::new(vec![point2(0.0, 0.0), point2(4.0, 0.0)]),
        label,
    );
    graph.insert_path(
        Polyline::new(vec![point2(6.0, 0.0), point2(10.0, 0.0)]),
        label,
    );

    let mut wall = BoundarySet::default();
    wall.insert_segment(Segment2::new(point2(5.0, -1.0), point2(5.0, 1.0)));

    let mut result = Vec::new();
    let mut entry: Point2 = point2(-1.0, 0.0);
    graph.optimize(&mut result, &mut entry, &wall, &default_label_order);

    assert_eq!(result.len(), 2);
    assert_eq!(entry, point2(10.0, 0.0));
    assert!(graph.is_empty());
}
