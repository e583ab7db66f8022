//! SVG icon to Android VectorDrawable conversion.
//!
//! The SVG is parsed and normalized by `usvg`: shapes become paths, `<use>`
//! references and CSS styles are resolved, and `<defs>`, `<clipPath>` and
//! `<mask>` content never reaches the render tree. Group transforms are
//! flattened into the path data, so the drawable only needs one group to
//! translate the viewBox origin (Material Symbols use `0 -960 960 960`).

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use log::{debug, warn};
use tiny_skia::{PathSegment, Transform};
use usvg::TreeParsing;

use crate::error::{Error, Result};

pub const DEFAULT_FILL: &str = "#5f6368";
pub const DEFAULT_SIZE_DP: u32 = 24;

/// Origin and size of the SVG viewBox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

/// Outline of a stroked path.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgStroke {
    pub color: String,
    pub width: f32,
    pub alpha: f32,
}

/// A visible path in viewBox coordinates.
///
/// `fill` is `None` for paths painted with the SVG default black, which take the
/// drawable fill colour instead. `painted` is false for outline-only paths.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgPath {
    pub data: String,
    pub painted: bool,
    pub fill: Option<String>,
    pub fill_alpha: f32,
    pub even_odd: bool,
    pub stroke: Option<SvgStroke>,
}

/// The drawable content of an SVG document.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgIcon {
    pub view_box: ViewBox,
    pub paths: Vec<SvgPath>,
}

pub(crate) fn is_hex_color(value: &str) -> bool {
    let digits = value.strip_prefix('#').unwrap_or("");
    matches!(digits.len(), 3 | 4 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

fn hex(color: usvg::Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

fn format_number(value: f32) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{}", rounded)
    }
}

fn path_data(path: &tiny_skia::Path) -> String {
    let mut data = String::new();
    let mut push = |command: char, points: &[tiny_skia::Point]| {
        data.push(command);
        let coords: Vec<String> = points
            .iter()
            .map(|p| format!("{} {}", format_number(p.x), format_number(p.y)))
            .collect();
        data.push_str(&coords.join(" "));
    };
    for segment in path.segments() {
        match segment {
            PathSegment::MoveTo(p) => push('M', &[p]),
            PathSegment::LineTo(p) => push('L', &[p]),
            PathSegment::QuadTo(p1, p2) => push('Q', &[p1, p2]),
            PathSegment::CubicTo(p1, p2, p3) => push('C', &[p1, p2, p3]),
            PathSegment::Close => push('Z', &[]),
        }
    }
    data
}

/// Scale a stroke width by the square root of the transform determinant.
fn scaled_width(width: f32, transform: Transform) -> f32 {
    let det = transform.sx * transform.sy - transform.kx * transform.ky;
    if det == 0.0 {
        width
    } else {
        width * det.abs().sqrt()
    }
}

fn convert_path(path: &usvg::Path, transform: Transform, opacity: f32) -> Option<SvgPath> {
    if path.visibility != usvg::Visibility::Visible {
        debug!("Skipping hidden path '{}'", path.id);
        return None;
    }

    let mut converted = SvgPath {
        data: String::new(),
        painted: false,
        fill: None,
        fill_alpha: opacity,
        even_odd: false,
        stroke: None,
    };

    if let Some(fill) = &path.fill {
        converted.painted = true;
        converted.fill_alpha = opacity * fill.opacity.get();
        converted.even_odd = fill.rule == usvg::FillRule::EvenOdd;
        match &fill.paint {
            usvg::Paint::Color(color) if (color.red, color.green, color.blue) == (0, 0, 0) => {}
            usvg::Paint::Color(color) => converted.fill = Some(hex(*color)),
            _ => warn!("Gradient or pattern fill of path '{}' replaced by a solid colour", path.id),
        }
    }

    if let Some(stroke) = &path.stroke {
        match &stroke.paint {
            usvg::Paint::Color(color) => {
                converted.stroke = Some(SvgStroke {
                    color: hex(*color),
                    width: scaled_width(stroke.width.get(), transform),
                    alpha: opacity * stroke.opacity.get(),
                });
            }
            _ => warn!("Gradient or pattern stroke of path '{}' dropped", path.id),
        }
    }

    if !converted.painted && converted.stroke.is_none() {
        debug!("Skipping path '{}' without fill or stroke", path.id);
        return None;
    }

    let data = if transform.is_identity() {
        path.data.as_ref().clone()
    } else {
        path.data.as_ref().clone().transform(transform)?
    };
    converted.data = path_data(&data);
    Some(converted)
}

fn collect_paths(
    node: &usvg::Node,
    transform: Transform,
    opacity: f32,
    paths: &mut Vec<SvgPath>,
) {
    for child in node.children() {
        match &*child.borrow() {
            usvg::NodeKind::Group(group) => {
                if group.clip_path.is_some() || group.mask.is_some() {
                    warn!("Clip path or mask of group '{}' ignored", group.id);
                }
                collect_paths(
                    &child,
                    transform.pre_concat(group.transform),
                    opacity * group.opacity.get(),
                    paths,
                );
            }
            usvg::NodeKind::Path(path) => paths.extend(convert_path(path, transform, opacity)),
            _ => warn!("Skipping an image or text element; convert text to paths first"),
        }
    }
}

/// Parses an SVG document into the paths a VectorDrawable can draw.
///
/// # Errors
/// * `Error::SvgError` if the document is not valid SVG or draws nothing
pub fn parse_svg(content: &str) -> Result<SvgIcon> {
    let tree = usvg::Tree::from_str(content, &usvg::Options::default())
        .map_err(|e| Error::SvgError(e.to_string()))?;

    let rect = tree.view_box.rect;
    let view_box = ViewBox {
        min_x: rect.x(),
        min_y: rect.y(),
        width: rect.width(),
        height: rect.height(),
    };

    let mut paths = Vec::new();
    collect_paths(&tree.root, Transform::default(), 1.0, &mut paths);
    if paths.is_empty() {
        return Err(Error::SvgError("no visible path found".to_string()));
    }
    debug!("Parsed {} path(s) with viewBox {:?}", paths.len(), view_box);
    Ok(SvgIcon { view_box, paths })
}

fn write_path(xml: &mut String, indent: &str, path: &SvgPath, fill: &str) {
    let mut attributes = vec![("pathData", path.data.clone())];
    if path.painted {
        attributes.push(("fillColor", path.fill.clone().unwrap_or_else(|| fill.to_string())));
        if path.fill_alpha < 1.0 {
            attributes.push(("fillAlpha", format_number(path.fill_alpha)));
        }
        if path.even_odd {
            attributes.push(("fillType", "evenOdd".to_string()));
        }
    }
    if let Some(stroke) = &path.stroke {
        attributes.push(("strokeColor", stroke.color.clone()));
        attributes.push(("strokeWidth", format_number(stroke.width)));
        if stroke.alpha < 1.0 {
            attributes.push(("strokeAlpha", format_number(stroke.alpha)));
        }
    }

    let _ = writeln!(xml, "{indent}  <path");
    let last = attributes.len() - 1;
    for (i, (name, value)) in attributes.iter().enumerate() {
        let end = if i == last { "/>" } else { "" };
        let _ = writeln!(xml, r#"{indent}      android:{name}="{value}"{end}"#);
    }
}

/// Renders the VectorDrawable XML of an icon.
///
/// # Arguments
/// * `icon` - Parsed SVG
/// * `size_dp` - Width and height of the drawable in dp
/// * `fill` - Colour of paths painted with the SVG default black
pub fn to_vector_drawable(icon: &SvgIcon, size_dp: u32, fill: &str) -> String {
    let vb = icon.view_box;
    let translated = vb.min_x != 0.0 || vb.min_y != 0.0;
    let indent = if translated { "    " } else { "" };

    let mut xml = String::new();
    let _ = writeln!(xml, r#"<vector xmlns:android="http://schemas.android.com/apk/res/android""#);
    let _ = writeln!(xml, r#"    android:width="{}dp""#, size_dp);
    let _ = writeln!(xml, r#"    android:height="{}dp""#, size_dp);
    let _ = writeln!(xml, r#"    android:viewportWidth="{}""#, format_number(vb.width));
    let _ = writeln!(xml, r#"    android:viewportHeight="{}">"#, format_number(vb.height));
    if translated {
        let _ = writeln!(xml, r#"  <group"#);
        let _ = writeln!(xml, r#"      android:translateX="{}""#, format_number(-vb.min_x));
        let _ = writeln!(xml, r#"      android:translateY="{}">"#, format_number(-vb.min_y));
    }
    for path in &icon.paths {
        write_path(&mut xml, indent, path, fill);
    }
    if translated {
        let _ = writeln!(xml, "  </group>");
    }
    xml.push_str("</vector>\n");
    xml
}

/// Reads and converts the SVG file `input` without writing anything.
///
/// # Errors
/// * `Error::ValidationError` if `fill` is not a hex colour
/// * `Error::SvgError` if the file cannot be converted
pub fn convert(input: &Path, size_dp: u32, fill: &str) -> Result<String> {
    if !is_hex_color(fill) {
        return Err(Error::ValidationError(format!("'{}' is not a hex colour", fill)));
    }
    let content = fs::read_to_string(input)?;
    let icon = parse_svg(&content)?;
    Ok(to_vector_drawable(&icon, size_dp, fill))
}

/// Converts the SVG file `input` into a VectorDrawable written to `output`.
pub fn convert_file(input: &Path, output: &Path, size_dp: u32, fill: &str) -> Result<()> {
    let xml = convert(input, size_dp, fill)?;
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, xml)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATERIAL_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" height="24" viewBox="0 -960 960 960" width="24"><path d="M480-80q-83 0-156-31.5Z"/></svg>"#;

    fn svg(body: &str) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="0 0 24 24">{body}</svg>"#
        )
    }

    #[test]
    fn test_parse_material_icon() {
        let icon = parse_svg(MATERIAL_ICON).unwrap();
        assert_eq!(
            icon.view_box,
            ViewBox { min_x: 0.0, min_y: -960.0, width: 960.0, height: 960.0 }
        );
        assert_eq!(icon.paths.len(), 1);
        assert!(icon.paths[0].data.starts_with("M480 -80"));
        assert!(icon.paths[0].data.ends_with('Z'));
        assert!(icon.paths[0].painted);
        assert_eq!(icon.paths[0].fill, None);
    }

    #[test]
    fn test_translated_drawable() {
        let icon = parse_svg(MATERIAL_ICON).unwrap();
        let xml = to_vector_drawable(&icon, 24, DEFAULT_FILL);
        assert!(xml.contains(r#"android:viewportWidth="960""#));
        assert!(xml.contains(r#"android:viewportHeight="960">"#));
        assert!(xml.contains(r#"android:translateY="960">"#));
        assert!(xml.contains(r#"android:translateX="0""#));
        assert!(xml.contains(r#"android:pathData="M480 -80"#));
        assert!(xml.contains(r##"android:fillColor="#5f6368"/>"##));
        assert!(xml.ends_with("</vector>\n"));
    }

    #[test]
    fn test_unfilled_bounding_box_is_skipped() {
        let icon = parse_svg(&svg(
            r#"<path d="M0 0h24v24H0z" fill="none"/><path d="M12 2L2 22h20z"/>"#,
        ))
        .unwrap();
        assert_eq!(icon.paths.len(), 1);
        assert!(icon.paths[0].data.starts_with("M12 2L2 22L22 22"));

        let xml = to_vector_drawable(&icon, 48, "#000000");
        assert!(!xml.contains("<group"));
        assert!(!xml.contains(r#"pathData="M0 0"#));
        assert!(xml.contains(r#"android:width="48dp""#));
    }

    #[test]
    fn test_shapes_and_group_transform() {
        let icon = parse_svg(&svg(
            r#"<g transform="translate(4,4)"><rect width="2" height="2"/></g><circle cx="12" cy="12" r="3"/>"#,
        ))
        .unwrap();
        assert_eq!(icon.paths.len(), 2);
        assert!(icon.paths[0].data.starts_with("M4 4"));
        assert!(icon.paths[0].data.contains("L6 6"));
        assert!(icon.paths[1].data.starts_with('M'));
        assert_eq!(icon.paths[1].fill, None);
    }

    #[test]
    fn test_clip_path_geometry_is_not_drawn() {
        let icon = parse_svg(&svg(
            r#"<defs><clipPath id="c"><path d="M0 0h1v1z"/></clipPath></defs><path d="M5 5h2v2z" clip-path="url(#c)"/>"#,
        ))
        .unwrap();
        assert_eq!(icon.paths.len(), 1);
        assert!(icon.paths[0].data.starts_with("M5 5"));
    }

    #[test]
    fn test_use_and_style_classes() {
        let icon = parse_svg(&svg(
            r##"<style>.accent { fill: #ff0000; fill-rule: evenodd; fill-opacity: 0.5 }</style><defs><path id="p" d="M1 1h4v4z"/></defs><use xlink:href="#p" class="accent"/>"##,
        ))
        .unwrap();
        assert_eq!(icon.paths.len(), 1);
        let xml = to_vector_drawable(&icon, 24, DEFAULT_FILL);
        assert!(xml.contains(r#"android:pathData="M1 1L5 1"#));
        assert!(xml.contains(r##"android:fillColor="#ff0000""##));
        assert!(xml.contains(r#"android:fillAlpha="0.5""#));
        assert!(xml.contains(r#"android:fillType="evenOdd"/>"#));
    }

    #[test]
    fn test_stroke_only_path() {
        let icon = parse_svg(&svg(
            r##"<g transform="scale(2)"><path d="M0 0L10 10" fill="none" stroke="#00ff00" stroke-width="1.5"/></g>"##,
        ))
        .unwrap();
        let xml = to_vector_drawable(&icon, 24, DEFAULT_FILL);
        assert!(!xml.contains("fillColor"));
        assert!(xml.contains(r#"android:pathData="M0 0L20 20""#));
        assert!(xml.contains(r##"android:strokeColor="#00ff00""##));
        assert!(xml.contains(r#"android:strokeWidth="3"/>"#));
    }

    #[test]
    fn test_invalid_documents() {
        assert!(parse_svg(&svg("")).is_err());
        assert!(parse_svg(&svg(r#"<path d="M0 0h2v2z" fill="none"/>"#)).is_err());
        assert!(parse_svg("<html/>").is_err());
    }

    #[test]
    fn test_convert_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let input = temp_dir.path().join("icon.svg");
        let output = temp_dir.path().join("drawable/ic_launcher_foreground.xml");
        fs::write(&input, MATERIAL_ICON).unwrap();

        convert_file(&input, &output, DEFAULT_SIZE_DP, DEFAULT_FILL).unwrap();
        assert!(fs::read_to_string(&output).unwrap().starts_with("<vector"));
        assert!(convert_file(&input, &output, 24, "grey").is_err());
    }
}
