use ridgeline_core::{
    AspectRatio, Branching, BranchingSchedule, Command, Depth, Event, FieldParameters,
    MountainCount, Rgba, SilhouetteId, Speed,
};
use ridgeline_landscape::{self as landscape, query, Landscape, LandscapeSettings};
use ridgeline_system_palette::{Palette, PaletteAssigner};

fn parameters(count: u32, branching: u32, depth: u32) -> FieldParameters {
    FieldParameters::new(
        MountainCount::new(count).expect("non-zero count"),
        Branching::new(branching).expect("non-zero branching"),
        Depth::new(depth),
        BranchingSchedule::Constant,
    )
}

fn settings(count: u32, speed: f64) -> LandscapeSettings {
    LandscapeSettings {
        parameters: parameters(count, 2, 2),
        speed: Speed::new(speed).expect("valid speed"),
        palette: Palette::new(vec![
            Rgba::from_hex("#BF6550FF").expect("valid color"),
            Rgba::from_hex("#698C58FF").expect("valid color"),
        ])
        .expect("non-empty palette"),
        assigner: PaletteAssigner::default(),
        field_seed: 0x5eed,
    }
}

fn run(landscape: &mut Landscape, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    landscape::apply(landscape, command, &mut events);
    events
}

fn ids(landscape: &Landscape) -> Vec<SilhouetteId> {
    query::silhouettes(landscape)
        .map(|silhouette| silhouette.id())
        .collect()
}

#[test]
fn rebuild_generates_configured_count() {
    let mut landscape = Landscape::new(settings(6, 0.1));
    let events = run(&mut landscape, Command::Rebuild);

    assert_eq!(
        events,
        vec![Event::FieldRebuilt {
            count: MountainCount::new(6).expect("non-zero count"),
        }]
    );
    assert_eq!(query::silhouette_count(&landscape), 6);
    for silhouette in query::silhouettes(&landscape) {
        // (2 + 1)^2 + 1 points per ridge on a square viewport.
        assert_eq!(silhouette.ridge_unit_points().len(), 10);
    }
}

#[test]
fn recycling_keeps_length_and_rotates_silhouettes() {
    let mut landscape = Landscape::new(settings(4, 0.25));
    let _ = run(&mut landscape, Command::Rebuild);
    let before = ids(&landscape);

    let mut recycled = None;
    for _ in 0..4 {
        for event in run(&mut landscape, Command::Tick) {
            if let Event::SilhouetteRecycled { inserted, removed } = event {
                assert!(recycled.is_none(), "only one wrap expected");
                recycled = Some((inserted, removed));
            }
        }
    }

    let (inserted, removed) = recycled.expect("fourth tick wraps the clock");
    let after = ids(&landscape);
    assert_eq!(after.len(), before.len());
    assert_eq!(after[0], inserted);
    assert_eq!(removed, before[3]);
    assert!(!after.contains(&removed));
    assert_eq!(&after[1..], &before[..3]);
}

#[test]
fn rebuild_resets_clock_without_wrapping() {
    let mut landscape = Landscape::new(settings(3, 0.3));
    let _ = run(&mut landscape, Command::Rebuild);
    let _ = run(&mut landscape, Command::Tick);
    let _ = run(&mut landscape, Command::Tick);
    assert!(query::progress(&landscape) > 0.5);

    let events = run(&mut landscape, Command::Rebuild);
    assert_eq!(query::progress(&landscape), 0.0);
    assert!(!events.contains(&Event::ClockWrapped));
    assert!(events
        .iter()
        .all(|event| !matches!(event, Event::SilhouetteRecycled { .. })));
}

#[test]
fn configure_rebuilds_only_when_parameters_change() {
    let mut landscape = Landscape::new(settings(3, 0.1));
    let _ = run(&mut landscape, Command::Rebuild);
    let original = ids(&landscape);

    let same = query::parameters(&landscape);
    assert!(run(&mut landscape, Command::Configure { parameters: same }).is_empty());
    assert_eq!(ids(&landscape), original);

    let events = run(
        &mut landscape,
        Command::Configure {
            parameters: parameters(5, 1, 3),
        },
    );
    assert_eq!(
        events,
        vec![Event::FieldRebuilt {
            count: MountainCount::new(5).expect("non-zero count"),
        }]
    );
    assert_eq!(query::silhouette_count(&landscape), 5);
    assert!(ids(&landscape).iter().all(|id| !original.contains(id)));
    for silhouette in query::silhouettes(&landscape) {
        assert_eq!(silhouette.ridge_unit_points().len(), 9);
    }
}

#[test]
fn set_speed_changes_increment_without_rebuilding() {
    let mut landscape = Landscape::new(settings(2, 0.1));
    let _ = run(&mut landscape, Command::Rebuild);
    let original = ids(&landscape);

    let speed = Speed::new(0.4).expect("valid speed");
    assert_eq!(
        run(&mut landscape, Command::SetSpeed { speed }),
        vec![Event::SpeedChanged { speed }]
    );
    let events = run(&mut landscape, Command::Tick);

    assert_eq!(events, vec![Event::ProgressAdvanced { progress: 0.4 }]);
    assert_eq!(query::speed(&landscape), speed);
    assert_eq!(ids(&landscape), original);
}

#[test]
fn wide_viewport_widens_later_generations() {
    let mut landscape = Landscape::new(settings(2, 0.1));
    let _ = run(
        &mut landscape,
        Command::ResizeViewport {
            aspect_ratio: AspectRatio::from_size(1600.0, 800.0),
        },
    );
    let _ = run(&mut landscape, Command::Rebuild);

    for silhouette in query::silhouettes(&landscape) {
        assert_eq!(silhouette.branching().get(), 4);
        // (4 + 1)^2 + 1 points.
        assert_eq!(silhouette.ridge_unit_points().len(), 26);
    }
}

#[test]
fn render_pairs_follow_field_order_and_progress() {
    let mut landscape = Landscape::new(settings(4, 0.5));
    let _ = run(&mut landscape, Command::Rebuild);
    let _ = run(&mut landscape, Command::Tick);

    let pairs = query::render_pairs(&landscape);
    let nearness: Vec<f64> = pairs.iter().map(|pair| pair.nearness()).collect();
    assert_eq!(nearness, vec![0.125, 0.375, 0.625, 0.875]);

    let pair_ids: Vec<SilhouetteId> = pairs.iter().map(|pair| pair.silhouette().id()).collect();
    assert_eq!(pair_ids, ids(&landscape));
}

#[test]
fn revision_advances_with_every_change() {
    let mut landscape = Landscape::new(settings(2, 0.1));
    let mut last = query::revision(&landscape);

    for command in [Command::Rebuild, Command::Tick, Command::Tick] {
        let _ = run(&mut landscape, command);
        let revision = query::revision(&landscape);
        assert!(revision > last);
        last = revision;
    }
}

#[test]
fn silhouette_colors_come_from_the_palette() {
    let mut landscape = Landscape::new(settings(8, 0.1));
    let _ = run(&mut landscape, Command::Rebuild);
    let assigner = PaletteAssigner::default();
    let palette = query::palette(&landscape).clone();

    for silhouette in query::silhouettes(&landscape) {
        assert_eq!(silhouette.color(), assigner.color_for(silhouette.seed(), &palette));
    }
}
