use ridgeline_core::Rgba;

use crate::{Background, OutlinePath, PathSegment, Scene};

const SKY_ID: &str = "sky";

/// Serialises a scene as a standalone SVG document.
///
/// Each silhouette is drawn as a group carrying its parallax transform: the
/// sky fill clipped to the outline, then the tint over it.
#[must_use]
pub fn render_svg(scene: &Scene) -> String {
    let width = scene.viewport.width();
    let height = scene.viewport.height();
    let sky = sky_fill(&scene.background);

    let mut document = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n"
    );

    if let Background::Gradient(stops) = &scene.background {
        document.push_str(&format!(
            "<defs><linearGradient id=\"{SKY_ID}\" gradientUnits=\"userSpaceOnUse\" x1=\"0\" y1=\"0\" x2=\"0\" y2=\"{height}\">"
        ));
        for stop in stops {
            let (color, opacity) = split_color(stop.color);
            document.push_str(&format!(
                "<stop offset=\"{}\" stop-color=\"{color}\" stop-opacity=\"{opacity}\"/>",
                stop.offset
            ));
        }
        document.push_str("</linearGradient></defs>\n");
    }

    document.push_str(&format!(
        "<rect width=\"{width}\" height=\"{height}\" {sky}/>\n"
    ));

    for mountain in &scene.mountains {
        if mountain.outline.is_empty() {
            continue;
        }
        let scale = mountain.transform.scale;
        let translation = mountain.transform.translation();
        let data = path_data(&mountain.outline);
        let (tint, opacity) = split_color(mountain.tint);

        document.push_str(&format!(
            "<g data-id=\"{}\" transform=\"matrix({scale} 0 0 {scale} {:.3} {:.3})\">",
            mountain.id.get(),
            translation.x,
            translation.y
        ));
        document.push_str(&format!("<path d=\"{data}\" {sky}/>"));
        document.push_str(&format!(
            "<path d=\"{data}\" fill=\"{tint}\" fill-opacity=\"{opacity}\"/>"
        ));
        document.push_str("</g>\n");
    }

    document.push_str("</svg>\n");
    document
}

fn sky_fill(background: &Background) -> String {
    match background {
        Background::Gradient(_) => format!("fill=\"url(#{SKY_ID})\""),
        Background::Solid(color) => {
            let (color, opacity) = split_color(*color);
            format!("fill=\"{color}\" fill-opacity=\"{opacity}\"")
        }
    }
}

fn path_data(outline: &OutlinePath) -> String {
    let commands: Vec<String> = outline
        .segments()
        .iter()
        .map(|segment| match segment {
            PathSegment::MoveTo(point) => format!("M{:.2} {:.2}", point.x, point.y),
            PathSegment::LineTo(point) => format!("L{:.2} {:.2}", point.x, point.y),
            PathSegment::QuadTo { control, to } => format!(
                "Q{:.2} {:.2} {:.2} {:.2}",
                control.x, control.y, to.x, to.y
            ),
            PathSegment::Close => "Z".to_owned(),
        })
        .collect();
    commands.join(" ")
}

/// Splits a color into an SVG `#RRGGBB` string and an opacity.
fn split_color(color: Rgba) -> (String, f32) {
    let mut hex = color.to_hex();
    hex.truncate(7);
    (hex, color.alpha.clamp(0.0, 1.0))
}
