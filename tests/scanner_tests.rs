//! Scanner integration tests: category scans, result ordering, flood fill,
//! and the walk handoff.

mod common;

use common::{object, FakeMover, FakeSink, GridWorld};
use gridspeak::core::channel::{NarrationChannel, DEFAULT_CHARS_PER_SECOND};
use gridspeak::core::engine::NarrationEngineBuilder;
use gridspeak::core::sanitize::Sanitizer;
use gridspeak::core::scanner::NearbyScanner;
use gridspeak::schema::geometry::Point;
use gridspeak::schema::world::{Hostility, ObjectKind, WorldQuery};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn engine() -> gridspeak::core::engine::NarrationEngine<FakeSink> {
    NarrationEngineBuilder::new().build(FakeSink::default()).unwrap()
}

#[test]
fn nearest_hostile_comes_first_with_bearing_and_distance() {
    let mut world = GridWorld::new(12, 12);
    world.player_pos = Point::new(5, 5);
    world.add_creature(10, "bear", Point::new(9, 9), Hostility::Hostile); // d4
    world.add_creature(11, "wolf", Point::new(8, 2), Hostility::Hostile); // d3

    let mut engine = engine();
    engine.scan_cycle_result(1, &world);
    assert_eq!(engine.sink().spoken, vec!["wolf, northeast, 3"]);

    engine.scan_cycle_result(1, &world);
    assert_eq!(engine.sink().spoken[1], "bear, southeast, 4");

    // wraps back around
    engine.scan_cycle_result(1, &world);
    assert_eq!(engine.sink().spoken[2], "wolf, northeast, 3");
}

#[test]
fn due_south_bearing() {
    let mut world = GridWorld::new(12, 12);
    world.player_pos = Point::new(2, 2);
    world.add_creature(10, "ghoul", Point::new(2, 7), Hostility::Hostile);

    let mut engine = engine();
    engine.scan_cycle_result(1, &world);
    assert_eq!(engine.sink().spoken, vec!["ghoul, south, 5"]);
}

#[test]
fn result_at_distance_zero_says_here() {
    let mut world = GridWorld::new(12, 12);
    world.player_pos = Point::new(4, 4);
    world.add_object(Point::new(4, 4), object(10, "lantern", ObjectKind::Item));

    let mut engine = engine();
    // Hostile -> Creature -> Item
    engine.scan_cycle_category(1, &world);
    engine.scan_cycle_category(1, &world);
    engine.scan_cycle_result(1, &world);
    assert_eq!(engine.sink().spoken[2], "lantern, here");
}

#[test]
fn category_cycle_announces_counts_or_none_found() {
    let mut world = GridWorld::new(12, 12);
    world.add_creature(10, "wolf", Point::new(3, 0), Hostility::Hostile);
    world.add_creature(11, "deer", Point::new(4, 0), Hostility::Neutral);

    let mut engine = engine();
    engine.scan_cycle_category(1, &world); // -> Creature
    engine.scan_cycle_category(1, &world); // -> Item
    assert_eq!(engine.sink().spoken, vec!["2 creatures", "no items found"]);
}

#[test]
fn cycling_with_no_results_speaks_none_found() {
    let world = GridWorld::new(8, 8);
    let mut engine = engine();
    engine.scan_cycle_result(1, &world);
    assert_eq!(engine.sink().spoken, vec!["no hostiles found"]);
}

#[test]
fn creatures_require_visibility_items_only_exploration() {
    let mut world = GridWorld::new(12, 12);
    let shadow = Point::new(6, 6);
    world.hidden.insert(shadow);
    world.add_creature(10, "lurker", shadow, Hostility::Hostile);
    world.add_object(shadow, object(11, "coin", ObjectKind::Item));

    let mut engine = engine();
    engine.scan_cycle_result(1, &world);
    assert_eq!(engine.sink().spoken[0], "no hostiles found");

    // Hostile -> Creature -> Item: the coin is in an explored cell
    engine.scan_cycle_category(1, &world);
    engine.scan_cycle_category(1, &world);
    assert_eq!(engine.sink().spoken[2], "1 item");
}

#[test]
fn equidistant_results_keep_discovery_order() {
    let mut world = GridWorld::new(12, 12);
    world.player_pos = Point::new(5, 5);
    // both at Chebyshev distance 2, discovered row-major: helmet first
    world.add_object(Point::new(4, 3), object(10, "helmet", ObjectKind::Item));
    world.add_object(Point::new(7, 4), object(11, "boots", ObjectKind::Item));

    let mut engine = engine();
    engine.scan_cycle_category(1, &world); // Creature
    engine.scan_cycle_category(1, &world); // Item
    engine.scan_cycle_result(1, &world);
    engine.scan_cycle_result(1, &world);
    assert_eq!(engine.sink().spoken[2], "helmet, northwest, 2");
    assert_eq!(engine.sink().spoken[3], "boots, northeast, 2");
}

#[test]
fn unexplored_flood_fill_finds_one_component_on_an_open_map() {
    let world = GridWorld::unexplored_map(10, 10);
    let mut engine = engine();
    engine.scan_cycle_category(-1, &world); // Hostile -> Unexplored
    assert_eq!(engine.sink().spoken, vec!["1 unexplored area"]);

    engine.scan_cycle_result(1, &world);
    // the player stands inside the region, so its nearest cell is "here"
    assert_eq!(
        engine.sink().spoken[1],
        "unexplored area, 100 cells, here"
    );
}

#[test]
fn rock_wall_splits_unexplored_regions() {
    let mut world = GridWorld::unexplored_map(10, 10);
    for y in 0..10 {
        world.rock.insert(Point::new(4, y));
    }
    let mut engine = engine();
    engine.scan_cycle_category(-1, &world);
    assert_eq!(engine.sink().spoken, vec!["2 unexplored areas"]);
}

#[test]
fn diagonal_gaps_connect_eight_ways() {
    // rock on (1,0) and (0,1) leaves (0,0) touching (1,1) only diagonally
    let mut world = GridWorld::unexplored_map(3, 3);
    world.rock.insert(Point::new(1, 0));
    world.rock.insert(Point::new(0, 1));

    let mut engine = engine();
    engine.scan_cycle_category(-1, &world);
    assert_eq!(engine.sink().spoken, vec!["1 unexplored area"]);
}

#[test]
fn randomized_flood_fill_accounts_for_every_open_cell() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut world = GridWorld::unexplored_map(30, 30);
    let mut open_cells = 0usize;
    for y in 0..30 {
        for x in 0..30 {
            if rng.gen_bool(0.35) {
                world.rock.insert(Point::new(x, y));
            } else {
                open_cells += 1;
            }
        }
    }

    let mut scanner = NearbyScanner::new();
    // Hostile -> Unexplored via a backwards cycle, without announcements
    let mut channel = NarrationChannel::new(Sanitizer::default(), DEFAULT_CHARS_PER_SECOND);
    let mut sink = FakeSink::default();
    scanner.cycle_category(-1, &world, &mut channel, &mut sink, 0.0);

    let mut labeled_cells = 0usize;
    for entry in scanner.results() {
        assert!(world.in_bounds(entry.pos), "anchor out of bounds");
        assert!(!world.rock.contains(&entry.pos), "anchor inside rock");
        let count: usize = entry
            .label
            .split_whitespace()
            .find_map(|w| w.parse().ok())
            .expect("label carries a cell count");
        labeled_cells += count;
    }
    assert_eq!(labeled_cells, open_cells);
}

#[test]
fn walk_hands_off_the_anchor_coordinate() {
    let mut world = GridWorld::new(12, 12);
    world.add_creature(10, "wolf", Point::new(6, 2), Hostility::Hostile);

    let mut engine = engine();
    let mut mover = FakeMover::default();
    engine.scan_cycle_result(1, &world);
    engine.scan_walk(&world, &mut mover);
    assert_eq!(mover.walked, vec![Point::new(6, 2)]);
}

#[test]
fn walk_with_no_selection_is_a_spoken_error() {
    let world = GridWorld::new(12, 12);
    let mut engine = engine();
    let mut mover = FakeMover::default();
    engine.scan_walk(&world, &mut mover);
    assert!(mover.walked.is_empty());
    assert_eq!(engine.sink().spoken, vec!["nothing selected"]);
}

#[test]
fn walk_to_a_removed_object_degrades_to_a_spoken_error() {
    let mut world = GridWorld::new(12, 12);
    let wolf = world.add_creature(10, "wolf", Point::new(6, 2), Hostility::Hostile);

    let mut engine = engine();
    let mut mover = FakeMover::default();
    engine.scan_cycle_result(1, &world);
    world.remove_object(wolf);
    engine.scan_walk(&world, &mut mover);

    assert!(mover.walked.is_empty());
    assert_eq!(
        engine.sink().spoken[1],
        "object no longer available"
    );
}

#[test]
fn reannounce_tracks_a_moved_object() {
    let mut world = GridWorld::new(12, 12);
    world.player_pos = Point::new(5, 5);
    let wolf = world.add_creature(10, "wolf", Point::new(8, 2), Hostility::Hostile);

    let mut engine = engine();
    engine.scan_cycle_result(1, &world);
    assert_eq!(engine.sink().spoken[0], "wolf, northeast, 3");

    // the wolf moves; bearing and distance follow it
    world.remove_object(wolf);
    world.add_creature(10, "wolf", Point::new(5, 6), Hostility::Hostile);
    engine.scan_reannounce(&world);
    assert_eq!(engine.sink().spoken[1], "wolf, south, 1");
}

#[test]
fn reannounce_with_no_selection() {
    let world = GridWorld::new(12, 12);
    let mut engine = engine();
    engine.scan_reannounce(&world);
    assert_eq!(engine.sink().spoken, vec!["nothing selected"]);
}
