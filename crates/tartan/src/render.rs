//! Preview image export.
//!
//! A design is drawn as two full repeats on each axis so the pattern's
//! seams are visible. The drawing is built as an SVG string (rows first,
//! then columns on top) and rasterised with resvg.

use image::RgbaImage;
use tiny_skia::Pixmap;

use crate::design::Design;
use crate::error::{Result, TartanError};
use crate::geometry::{Line, Rect};
use crate::loom::GUIDE_COUNT;
use crate::palette::{Colour, ColourSource};
use crate::thread::{Axis, weave_tiles};

/// Repeats drawn along each axis.
pub const PREVIEW_REPEATS: usize = 2;

#[derive(Debug, Clone, Copy)]
pub struct SvgOptions {
    /// Draw guide lines over each repeat
    pub guides: bool,
    /// Tile outline colour
    pub border_colour: Colour,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            guides: false,
            border_colour: Colour::BLACK,
        }
    }
}

/// Pixel size of the preview for a design.
pub fn preview_size(design: &Design) -> (u32, u32) {
    let size = design.thread_size;
    let width = (design.columns.len() * PREVIEW_REPEATS) as f64 * size;
    let height = (design.rows.len() * PREVIEW_REPEATS) as f64 * size;
    (width.ceil() as u32, height.ceil() as u32)
}

/// Build the preview SVG for a design.
pub fn design_svg(design: &Design, options: &SvgOptions) -> String {
    let palette = design.palette();
    let size = design.thread_size;
    let row_count = design.rows.len() * PREVIEW_REPEATS;
    let column_count = design.columns.len() * PREVIEW_REPEATS;
    let (width, height) = preview_size(design);

    let stroke = if design.border_thickness > 0.0 {
        format!(
            r#" stroke="{}" stroke-width="{}""#,
            options.border_colour.to_hex(),
            design.border_thickness
        )
    } else {
        String::new()
    };

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<rect width="100%" height="100%" fill="white"/>
"#,
        width, height, width, height
    ));

    let axes = [
        (Axis::Row, &design.rows, row_count, column_count),
        (Axis::Column, &design.columns, column_count, row_count),
    ];
    for (axis, pattern, count, span) in axes {
        svg.push_str(&format!("<g class=\"{}s\"{}>\n", axis.name(), stroke));
        for position in 0..count {
            let fill = palette.colour_at(pattern[position % pattern.len()]);
            for tile in weave_tiles(axis, position, size, span) {
                push_rect(&mut svg, &tile, fill);
            }
        }
        svg.push_str("</g>\n");
    }

    if options.guides {
        svg.push_str(&format!(
            r#"<g stroke="{}" stroke-width="1" fill="none">"#,
            design.guide_colour.to_hex()
        ));
        svg.push('\n');
        for line in guide_lines(design) {
            svg.push_str(&format!(
                "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"/>\n",
                line.x1, line.y1, line.x2, line.y2
            ));
        }
        svg.push_str("</g>\n");
    }

    svg.push_str("</svg>\n");
    svg
}

fn push_rect(svg: &mut String, tile: &Rect, fill: Colour) {
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/>\n",
        tile.x,
        tile.y,
        tile.width,
        tile.height,
        fill.to_hex()
    ));
}

/// Guide lines for every repeat in the preview.
fn guide_lines(design: &Design) -> Vec<Line> {
    let size = design.thread_size;
    let repeat_width = design.columns.len() as f64 * size;
    let repeat_height = design.rows.len() as f64 * size;
    let full_width = repeat_width * PREVIEW_REPEATS as f64;
    let full_height = repeat_height * PREVIEW_REPEATS as f64;
    let bands = (GUIDE_COUNT + 1) as f64;

    let mut lines = Vec::new();
    for repeat in 0..PREVIEW_REPEATS {
        let x0 = repeat as f64 * repeat_width;
        let y0 = repeat as f64 * repeat_height;
        for i in 1..=GUIDE_COUNT {
            let x = x0 + repeat_width * i as f64 / bands;
            lines.push(Line::new(x, 0.0, x, full_height));
            let y = y0 + repeat_height * i as f64 / bands;
            lines.push(Line::new(0.0, y, full_width, y));
        }
    }
    lines
}

/// Rasterise an SVG document at `scale`.
pub fn render_png(svg: &str, scale: f32) -> Result<RgbaImage> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|e| TartanError::render(format!("SVG parse failed: {}", e)))?;

    let size = tree.size();
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
        TartanError::render(format!("could not allocate {}x{} pixmap", width, height))
    })?;
    pixmap.fill(tiny_skia::Color::WHITE);

    let transform = tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    RgbaImage::from_raw(width, height, pixmap.take())
        .ok_or_else(|| TartanError::render("pixmap size does not match image"))
}

/// Render a design's preview straight to an image.
pub fn design_image(design: &Design, options: &SvgOptions) -> Result<RgbaImage> {
    render_png(&design_svg(design, options), 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_design() -> Design {
        let mut design = Design {
            rows: vec![0; 20],
            columns: vec![0; 20],
            thread_size: 4.0,
            border_thickness: 0.0,
            duplicate: false,
            ..Design::default()
        };
        design.rows[0] = 3;
        design.columns[2] = 5;
        design
    }

    #[test]
    fn svg_has_two_repeats() {
        let design = small_design();
        assert_eq!(preview_size(&design), (160, 160));
        let svg = design_svg(&design, &SvgOptions::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="160""#));
        // Row 0 and its second repeat at row 20 are red.
        assert!(svg.contains(r##"y="0.00" width="8.00" height="4.00" fill="#ff0000""##));
        assert!(svg.contains(r##"y="80.00" width="8.00" height="4.00" fill="#ff0000""##));
        assert!(!svg.contains("<line"));
    }

    #[test]
    fn rows_precede_columns() {
        let svg = design_svg(&small_design(), &SvgOptions::default());
        let rows = svg.find("class=\"rows\"").unwrap();
        let columns = svg.find("class=\"columns\"").unwrap();
        assert!(rows < columns);
    }

    #[test]
    fn guides_are_optional() {
        let options = SvgOptions {
            guides: true,
            ..SvgOptions::default()
        };
        let svg = design_svg(&small_design(), &options);
        assert_eq!(svg.matches("<line").count(), GUIDE_COUNT * 2 * PREVIEW_REPEATS);
    }

    #[test]
    fn border_stroke_follows_thickness() {
        let mut design = small_design();
        assert!(!design_svg(&design, &SvgOptions::default()).contains("stroke-width"));
        design.border_thickness = 2.0;
        assert!(design_svg(&design, &SvgOptions::default()).contains(r#"stroke-width="2""#));
    }

    #[test]
    fn png_matches_weave() {
        let design = small_design();
        let image = design_image(&design, &SvgOptions::default()).unwrap();
        assert_eq!(image.dimensions(), (160, 160));

        // (row 0, column 0): row on top, red.
        assert_eq!(image.get_pixel(2, 2).0, [0xff, 0, 0, 0xff]);
        // (row 0, column 2): column on top, blue.
        assert_eq!(image.get_pixel(2 * 4 + 2, 2).0, [0, 0, 0xff, 0xff]);
        // (row 1, column 1): white row.
        assert_eq!(image.get_pixel(6, 6).0, [0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn bad_svg_is_a_render_error() {
        assert!(matches!(
            render_png("<not svg", 1.0),
            Err(TartanError::Render { .. })
        ));
    }
}
