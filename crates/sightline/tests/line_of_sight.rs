use sightline::blocking::{
    AlphaMask, DoorState, SenseLevel, TileBlocker, TileFlags, TokenBlocker, WallBlocker,
    WallDirection,
};
use sightline::bounding_volume::Aabb2;
use sightline::math::{Point2, Point3};
use sightline::query::{QueryOptions, SenseType, VisionTriangle};
use sightline::scene::{Obstacle, ObstacleId, SceneIndex};
use sightline::shape::Polygon3d;

fn wall(a: [f64; 2], b: [f64; 2]) -> WallBlocker {
    WallBlocker::new(Point2::from(a), Point2::from(b))
}

#[test]
fn walls_with_an_elevation_band_can_be_looked_over() {
    let low_wall = wall([5.0, -2.0], [5.0, 2.0]).with_elevation(0.0, 3.0);
    let index = SceneIndex::from_source(&vec![Obstacle::new(ObstacleId(1), low_wall)]).unwrap();
    let opts = QueryOptions::default();

    assert!(!index.has_line_of_sight(&Point3::new(0.0, 0.0, 1.0), &Point3::new(10.0, 0.0, 1.0), &opts));
    assert!(index.has_line_of_sight(&Point3::new(0.0, 0.0, 6.0), &Point3::new(10.0, 0.0, 6.0), &opts));
    // Looking down over the wall at a point behind it.
    assert!(index.has_line_of_sight(&Point3::new(0.0, 0.0, 10.0), &Point3::new(10.0, 0.0, 0.0), &opts));
}

#[test]
fn wall_rules_depend_on_the_sense_and_the_viewer() {
    let obstacles = vec![
        Obstacle::new(
            ObstacleId(1),
            wall([5.0, -2.0], [5.0, 2.0])
                .with_sense(SenseType::Sight, SenseLevel::None)
                .with_sense(SenseType::Sound, SenseLevel::Limited),
        ),
        Obstacle::new(
            ObstacleId(2),
            wall([5.0, 8.0], [5.0, 12.0]).with_door(DoorState::Open),
        ),
        Obstacle::new(
            ObstacleId(3),
            wall([5.0, 18.0], [5.0, 22.0]).with_direction(WallDirection::Left),
        ),
        Obstacle::new(
            ObstacleId(4),
            wall([5.0, 28.0], [5.0, 32.0]).with_sense(SenseType::Sight, SenseLevel::Proximity(3.0)),
        ),
    ];
    let index = SceneIndex::from_source(&obstacles).unwrap();
    let sight = QueryOptions::default();
    let sound = QueryOptions::default().with_source_type(SenseType::Sound);
    let los = |y: f64, from_x: f64, opts: &QueryOptions| {
        index.has_line_of_sight(
            &Point3::new(from_x, y, 0.0),
            &Point3::new(10.0 - from_x, y, 0.0),
            opts,
        )
    };

    // A window: transparent to sight, limited for sound.
    assert!(los(0.0, 0.0, &sight));
    assert!(los(0.0, 0.0, &sound));
    assert!(!los(0.0, 0.0, &sound.clone().with_limited_walls_block(true)));
    assert!(!los(0.0, 0.0, &QueryOptions::default().with_source_type(SenseType::Move)));

    // An open door.
    assert!(los(10.0, 0.0, &sight));

    // A one-way wall only blocks viewers on its left, i.e. x < 5 for a wall going up.
    assert!(!los(20.0, 0.0, &sight));
    assert!(los(20.0, 10.0, &sight));

    // A proximity wall lets close viewers through.
    assert!(!los(30.0, 0.0, &sight));
    assert!(los(30.0, 4.0, &sight));
}

#[test]
fn translucent_tiles_only_block_where_opaque() {
    let mask = AlphaMask::new(2, 1, vec![0, 255]).unwrap();
    let rect = Aabb2::new(Point2::new(0.0, 0.0), Point2::new(2.0, 2.0));
    let tile = TileBlocker::new(rect, 5.0).with_alpha(mask);
    let glass_tile = TileBlocker::new(rect.translated(&[10.0, 0.0].into()), 5.0)
        .with_flags(TileFlags::ignoring(SenseType::Sight));
    let index = SceneIndex::from_source(&vec![
        Obstacle::new(ObstacleId(1), tile),
        Obstacle::new(ObstacleId(2), glass_tile),
    ])
    .unwrap();
    let sight = QueryOptions::default();
    let vertical = |x: f64, y: f64, opts: &QueryOptions| {
        index.has_line_of_sight(&Point3::new(x, y, 10.0), &Point3::new(x, y, 0.0), opts)
    };

    assert!(vertical(0.5, 1.0, &sight));
    assert!(!vertical(1.5, 1.0, &sight));
    assert!(vertical(1.5, 1.0, &sight.clone().with_alpha_threshold(1.1)));
    assert!(vertical(5.0, 1.0, &sight));

    assert!(vertical(11.0, 1.0, &sight));
    assert!(!vertical(11.0, 1.0, &QueryOptions::default().with_source_type(SenseType::Sound)));

    let (id, toi) = index
        .first_obstruction(&Point3::new(1.5, 1.0, 10.0), &Point3::new(1.5, 1.0, 0.0), &sight)
        .unwrap();
    assert_eq!(id, ObstacleId(1));
    assert!((toi - 0.5).abs() < 1.0e-9);
}

#[test]
fn triangulated_roofs_block_from_below() {
    let roof = Polygon3d::from_polygon2d(
        &[
            Point2::new(0.0, 0.0),
            Point2::new(6.0, 0.0),
            Point2::new(6.0, 6.0),
            Point2::new(3.0, 3.0),
            Point2::new(0.0, 6.0),
        ],
        4.0,
    );
    let obstacles: Vec<_> = roof
        .to_triangle_blockers()
        .into_iter()
        .enumerate()
        .map(|(i, triangle)| Obstacle::new(ObstacleId(i as u64), triangle))
        .collect();
    assert_eq!(obstacles.len(), 3);

    let index = SceneIndex::from_source(&obstacles).unwrap();
    let opts = QueryOptions::default();
    let up = |x: f64, y: f64| index.has_line_of_sight(&Point3::new(x, y, 0.0), &Point3::new(x, y, 8.0), &opts);

    assert!(!up(2.0, 1.0));
    assert!(!up(5.0, 3.5));
    // Inside the notch.
    assert!(up(3.0, 5.0));
    assert!(up(8.0, 1.0));
}

#[test]
fn tokens_are_coarse_and_can_be_excluded() {
    let viewer_token = TokenBlocker::new(Point2::new(0.0, 0.0), 1.0, 1.0, 0.0, 2.0);
    let other_token = TokenBlocker::new(Point2::new(5.0, 0.0), 1.0, 1.0, 0.0, 2.0);
    let index = SceneIndex::from_source(&vec![
        Obstacle::new(ObstacleId(1), viewer_token),
        Obstacle::new(ObstacleId(2), other_token),
    ])
    .unwrap();
    let viewer = Point3::new(0.0, 0.0, 1.0);
    let target = Point3::new(10.0, 0.0, 1.0);

    let opts = QueryOptions::default().excluding([ObstacleId(1)]);
    assert_eq!(
        index.first_obstruction(&viewer, &target, &opts).map(|hit| hit.0),
        Some(ObstacleId(2))
    );
    assert!(index.has_line_of_sight(&viewer, &target, &opts.clone().excluding([ObstacleId(2)])));
    assert!(!index.has_plan_view_line_of_sight(&viewer.xy(), &target.xy(), &opts));
}

#[test]
fn vision_triangle_prunes_obstacles_outside_the_cone() {
    let obstacles = vec![
        Obstacle::new(ObstacleId(1), wall([5.0, -1.0], [5.0, 1.0])),
        Obstacle::new(ObstacleId(2), wall([-5.0, -1.0], [-5.0, 1.0])),
        Obstacle::new(ObstacleId(3), wall([5.0, 20.0], [6.0, 20.0])),
        Obstacle::new(
            ObstacleId(4),
            TokenBlocker::new(Point2::new(7.0, 0.0), 1.0, 1.0, 30.0, 32.0),
        ),
    ];
    let index = SceneIndex::from_source(&obstacles).unwrap();
    let target = Aabb2::new(Point2::new(9.0, -1.0), Point2::new(11.0, 1.0));
    let triangle = VisionTriangle::from_viewer_and_target(Point2::origin(), &target, 0.0, 2.0);

    let mut candidates = index.vision_candidates(&triangle);
    candidates.sort();
    assert_eq!(candidates, vec![ObstacleId(1)]);
}
