use std::time::Duration;

use nuclear_synthesis_core::{
    Byproduct, CellCoord, Command, Direction, Event, Nuclide, Particle, Phase,
};
use nuclear_synthesis_world::{apply, query, World};

fn drain(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, command, &mut events);
    events
}

fn spawn_at(world: &mut World, row: u32, column: u32, nuclide: Nuclide) {
    let events = drain(
        world,
        Command::SpawnTile {
            cell: CellCoord::new(row, column),
            nuclide,
        },
    );
    assert!(
        events
            .iter()
            .any(|event| matches!(event, Event::TileSpawned { .. })),
        "spawn at ({row},{column}) must be accepted"
    );
}

fn settle(world: &mut World) -> Vec<Event> {
    let mut collected = Vec::new();
    for _ in 0..240 {
        let events = drain(
            world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
        );
        let done = events
            .iter()
            .any(|event| matches!(event, Event::BoardSettled { .. }));
        collected.extend(events);
        if done {
            return collected;
        }
    }
    panic!("animation never settled");
}

fn occupied_cells(world: &World) -> Vec<(u32, u32, Nuclide)> {
    let mut cells: Vec<_> = query::tile_view(world)
        .iter()
        .map(|snapshot| (snapshot.cell.row(), snapshot.cell.column(), snapshot.nuclide))
        .collect();
    cells.sort();
    cells
}

#[test]
fn adjacent_protium_pair_fuses_on_slide_left() {
    let mut world = World::new();
    spawn_at(&mut world, 0, 0, Nuclide::PROTIUM);
    spawn_at(&mut world, 0, 1, Nuclide::PROTIUM);

    let events = drain(
        &mut world,
        Command::Slide {
            direction: Direction::Left,
        },
    );
    assert!(events.contains(&Event::SlideStarted {
        direction: Direction::Left,
        moves: 1,
        merges: 1,
    }));
    assert!(events.contains(&Event::PhaseChanged {
        phase: Phase::Animating,
    }));

    let settled = settle(&mut world);
    let fused = settled
        .iter()
        .find_map(|event| match event {
            Event::TilesFused {
                cell,
                nuclide,
                byproducts,
                ..
            } => Some((*cell, *nuclide, byproducts.clone())),
            _ => None,
        })
        .expect("fusion fires on arrival");
    assert_eq!(fused.0, CellCoord::new(0, 0));
    assert_eq!(fused.1, Nuclide::DEUTERIUM);
    assert_eq!(
        fused.2,
        vec![
            Byproduct::Particle(Particle::Positron),
            Byproduct::Particle(Particle::Neutrino),
        ]
    );

    assert_eq!(occupied_cells(&world), vec![(0, 0, Nuclide::DEUTERIUM)]);
    assert_eq!(query::phase(&world), Phase::AwaitingInput);
    assert_eq!(query::empty_cells(&world).len(), 15);
}

#[test]
fn gapped_tiles_compact_before_fusing() {
    let mut world = World::new();
    spawn_at(&mut world, 0, 0, Nuclide::PROTIUM);
    spawn_at(&mut world, 0, 2, Nuclide::PROTIUM);
    spawn_at(&mut world, 0, 3, Nuclide::DEUTERIUM);

    let events = drain(
        &mut world,
        Command::Slide {
            direction: Direction::Left,
        },
    );
    assert!(events.contains(&Event::SlideStarted {
        direction: Direction::Left,
        moves: 2,
        merges: 1,
    }));

    let _ = settle(&mut world);
    // The fresh product must not chain into the trailing deuterium this slide.
    assert_eq!(
        occupied_cells(&world),
        vec![(0, 0, Nuclide::DEUTERIUM), (0, 1, Nuclide::DEUTERIUM)]
    );
}

#[test]
fn each_tile_fuses_at_most_once_per_slide() {
    let mut world = World::new();
    spawn_at(&mut world, 0, 0, Nuclide::PROTIUM);
    spawn_at(&mut world, 0, 1, Nuclide::PROTIUM);
    spawn_at(&mut world, 0, 2, Nuclide::PROTIUM);

    let events = drain(
        &mut world,
        Command::Slide {
            direction: Direction::Left,
        },
    );
    let merges = events
        .iter()
        .find_map(|event| match event {
            Event::SlideStarted { merges, .. } => Some(*merges),
            _ => None,
        })
        .expect("slide schedules motion");
    assert_eq!(merges, 1);

    let _ = settle(&mut world);
    assert_eq!(
        occupied_cells(&world),
        vec![(0, 0, Nuclide::DEUTERIUM), (0, 1, Nuclide::PROTIUM)]
    );
}

#[test]
fn slide_without_motion_is_ignored() {
    let mut world = World::new();
    spawn_at(&mut world, 1, 0, Nuclide::PROTIUM);
    let before = occupied_cells(&world);

    let events = drain(
        &mut world,
        Command::Slide {
            direction: Direction::Left,
        },
    );
    assert_eq!(
        events,
        vec![Event::SlideIgnored {
            direction: Direction::Left,
        }]
    );
    assert_eq!(query::phase(&world), Phase::AwaitingInput);
    assert_eq!(occupied_cells(&world), before);
}

#[test]
fn slides_are_ignored_while_animating() {
    let mut world = World::new();
    spawn_at(&mut world, 0, 0, Nuclide::PROTIUM);
    spawn_at(&mut world, 0, 1, Nuclide::PROTIUM);
    let _ = drain(
        &mut world,
        Command::Slide {
            direction: Direction::Left,
        },
    );
    assert_eq!(query::phase(&world), Phase::Animating);

    let events = drain(
        &mut world,
        Command::Slide {
            direction: Direction::Right,
        },
    );
    assert_eq!(
        events,
        vec![Event::SlideIgnored {
            direction: Direction::Right,
        }]
    );

    let _ = settle(&mut world);
    assert_eq!(occupied_cells(&world), vec![(0, 0, Nuclide::DEUTERIUM)]);
}

#[test]
fn every_direction_compacts_toward_its_edge() {
    let cases = [
        (Direction::Up, (2, 1), (3, 1), (0, 1)),
        (Direction::Right, (1, 0), (1, 2), (1, 3)),
        (Direction::Down, (0, 2), (2, 2), (3, 2)),
    ];

    for (direction, first, second, merged_at) in cases {
        let mut world = World::new();
        spawn_at(&mut world, first.0, first.1, Nuclide::PROTIUM);
        spawn_at(&mut world, second.0, second.1, Nuclide::PROTIUM);

        let events = drain(&mut world, Command::Slide { direction });
        assert!(
            events
                .iter()
                .any(|event| matches!(event, Event::SlideStarted { .. })),
            "{direction:?} slide must schedule motion"
        );

        let _ = settle(&mut world);
        assert_eq!(
            occupied_cells(&world),
            vec![(merged_at.0, merged_at.1, Nuclide::DEUTERIUM)],
            "{direction:?} merge lands on the leading edge"
        );
    }
}

#[test]
fn non_reactive_tiles_block_without_fusing() {
    let mut world = World::new();
    spawn_at(&mut world, 0, 0, Nuclide::new(2, 4));
    spawn_at(&mut world, 0, 3, Nuclide::PROTIUM);

    let events = drain(
        &mut world,
        Command::Slide {
            direction: Direction::Left,
        },
    );
    assert!(events.contains(&Event::SlideStarted {
        direction: Direction::Left,
        moves: 1,
        merges: 0,
    }));

    let _ = settle(&mut world);
    assert_eq!(
        occupied_cells(&world),
        vec![(0, 0, Nuclide::new(2, 4)), (0, 1, Nuclide::PROTIUM)]
    );
}
