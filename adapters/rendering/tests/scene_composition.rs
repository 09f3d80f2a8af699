use ridgeline_config::{LandscapeConfig, ValidatedConfig};
use ridgeline_core::Command;
use ridgeline_landscape::{self as landscape, query, Landscape, LandscapeSettings};
use ridgeline_rendering::{
    compose_scene, render_svg, Background, PathSegment, RenderMode, Viewport,
};
use ridgeline_system_palette::PaletteAssigner;

fn validated() -> ValidatedConfig {
    LandscapeConfig {
        number_of_mountains: 4,
        max_points_per_depth: 2,
        depth: 2,
        speed: 0.25,
        rounded: false,
        ..LandscapeConfig::default()
    }
    .validate()
    .expect("valid configuration")
}

fn landscape_for(config: &ValidatedConfig, viewport: Viewport) -> Landscape {
    let mut landscape = Landscape::new(LandscapeSettings {
        parameters: config.parameters,
        speed: config.speed,
        palette: config.style.palette.clone(),
        assigner: PaletteAssigner::default(),
        field_seed: 77,
    });
    let mut events = Vec::new();
    landscape::apply(
        &mut landscape,
        Command::ResizeViewport {
            aspect_ratio: viewport.aspect_ratio(),
        },
        &mut events,
    );
    landscape::apply(&mut landscape, Command::Rebuild, &mut events);
    landscape::apply(&mut landscape, Command::Tick, &mut events);
    landscape
}

#[test]
fn scene_mirrors_render_pairs() {
    let config = validated();
    let viewport = Viewport::new(300.0, 150.0).expect("valid viewport");
    let landscape = landscape_for(&config, viewport);

    let scene = compose_scene(&landscape, &config.style, viewport, RenderMode::Interactive);
    let pairs = query::render_pairs(&landscape);

    assert_eq!(scene.mountains.len(), pairs.len());
    assert_eq!(scene.progress, 0.25);
    for (mountain, pair) in scene.mountains.iter().zip(&pairs) {
        assert_eq!(mountain.id, pair.silhouette().id());
        assert_eq!(mountain.nearness, pair.nearness() as f32);

        // Widened to 4 interior points per step on a 2:1 viewport: 5^2 + 1 ridge points,
        // traced with straight lines, then closed along the bottom edge.
        let segments = mountain.outline.segments();
        assert_eq!(segments.len(), 26 + 3);
        assert_eq!(segments.last(), Some(&PathSegment::Close));
        match segments[0] {
            PathSegment::MoveTo(start) => assert_eq!(start.x, 0.0),
            other => panic!("outline must start with a move, found {other:?}"),
        }
    }

    let scales: Vec<f32> = scene.mountains.iter().map(|m| m.transform.scale).collect();
    assert!(scales.windows(2).all(|pair| pair[0] < pair[1]), "nearer mountains grow");
}

#[test]
fn export_scene_uses_video_background_and_palette_tints() {
    let config = validated();
    let viewport = Viewport::new(300.0, 150.0).expect("valid viewport");
    let landscape = landscape_for(&config, viewport);

    let scene = compose_scene(&landscape, &config.style, viewport, RenderMode::Export);

    assert_eq!(
        scene.background,
        Background::Solid(config.style.background_color_for_video)
    );
    for (mountain, silhouette) in scene.mountains.iter().zip(query::silhouettes(&landscape)) {
        assert_eq!(mountain.tint, silhouette.color().with_alpha(mountain.nearness));
    }

    let svg = render_svg(&scene);
    assert_eq!(svg.matches("<g ").count(), 4);
}

#[test]
fn empty_field_composes_background_only() {
    let config = validated();
    let viewport = Viewport::new(64.0, 64.0).expect("valid viewport");
    let landscape = Landscape::new(LandscapeSettings {
        parameters: config.parameters,
        speed: config.speed,
        palette: config.style.palette.clone(),
        assigner: PaletteAssigner::default(),
        field_seed: 1,
    });

    let scene = compose_scene(&landscape, &config.style, viewport, RenderMode::Interactive);
    assert!(scene.mountains.is_empty());
    assert!(render_svg(&scene).contains("<rect "));
}
