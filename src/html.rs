//! The printable HTML companion page: the map followed by a numbered list
//! of the waypoints of every GPX file.

use std::path::Path;

use crate::sources::gpx::GpxData;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "tiff", "tif"];

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders the page for the map image at `image_path`, printed with
/// `margin_mm` page margins.
///
/// The image is only embedded if its extension names an image format.
/// Files without waypoints are left out.
pub fn waypoints_html(gpx: &[GpxData], image_path: &Path, margin_mm: u32) -> String {
    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut out = format!(
        r#"<!doctype html>
<html>
    <head>
        <meta http-equiv="Content-type" content="text/html; charset=utf-8">
        <title>{title}</title>
        <style>
            @page {{
                size: auto;
                margin: {m}mm {m}mm {m}mm {m}mm;
            }}
            img.map {{max-width: 100%}}
            div.map {{page-break-after: always}}
        </style>
    </head>
    <body>
"#,
        title = escape(&stem),
        m = margin_mm,
    );

    let is_image = image_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false);

    if is_image {
        let name = image_path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        out.push_str(&format!(
            "\t<div class=\"map\"><img src=\"{}\" class=\"map\" alt=\"{}\"/></div>\n",
            escape(&name),
            escape(&stem)
        ));
    }

    for data in gpx.iter().filter(|d| !d.waypoints.is_empty()) {
        out.push_str(&format!(
            "\t<h1>{}</h1>\n\t<div class=\"waypoints\"><ol>\n",
            escape(data.title.as_deref().unwrap_or(""))
        ));

        for waypoint in &data.waypoints {
            let item = match (&waypoint.name, &waypoint.description) {
                (Some(name), Some(desc)) => {
                    format!("{}<br>\n\t\t    {}", escape(name), escape(desc))
                }
                (Some(text), None) | (None, Some(text)) => escape(text),
                (None, None) => "&nbsp;".to_owned(),
            };
            out.push_str(&format!("\t\t<li>{}</li>\n", item));
        }

        out.push_str("\t</ol></div>\n");
    }

    out.push_str("</body>\n</html>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::GeoPoint;
    use crate::sources::gpx::Waypoint;

    fn waypoint(name: Option<&str>, desc: Option<&str>) -> Waypoint {
        Waypoint {
            point: GeoPoint::new(36.0, -112.0).unwrap(),
            name: name.map(str::to_owned),
            description: desc.map(str::to_owned),
        }
    }

    #[test]
    fn lists_waypoints() {
        let gpx = vec![
            GpxData {
                title: Some("Day 1".to_owned()),
                tracks: vec![],
                waypoints: vec![
                    waypoint(Some("Page"), Some("Lake Powell")),
                    waypoint(None, Some("Viewpoint")),
                    waypoint(None, None),
                ],
            },
            GpxData::default(),
        ];

        let html = waypoints_html(&gpx, Path::new("out/mapfile-wikimedia.jpg"), 5);

        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("<title>mapfile-wikimedia</title>"));
        assert!(html.contains("margin: 5mm 5mm 5mm 5mm;"));
        assert!(html.contains("<img src=\"mapfile-wikimedia.jpg\""));
        assert!(html.contains("<h1>Day 1</h1>"));
        assert!(html.contains("<li>Page<br>\n\t\t    Lake Powell</li>"));
        assert!(html.contains("<li>Viewpoint</li>"));
        assert!(html.contains("<li>&nbsp;</li>"));
        assert_eq!(html.matches("<ol>").count(), 1);
        assert!(html.ends_with("</body>\n</html>"));
    }

    #[test]
    fn body_layout() {
        let gpx = vec![GpxData {
            title: Some("Day 2".to_owned()),
            tracks: vec![],
            waypoints: vec![waypoint(Some("Moab"), None)],
        }];

        let html = waypoints_html(&gpx, Path::new("map.png"), 5);
        let body = &html[html.find("<body>").unwrap()..];

        assert_eq!(
            body,
            "<body>\n\
             \t<div class=\"map\"><img src=\"map.png\" class=\"map\" alt=\"map\"/></div>\n\
             \t<h1>Day 2</h1>\n\
             \t<div class=\"waypoints\"><ol>\n\
             \t\t<li>Moab</li>\n\
             \t</ol></div>\n\
             </body>\n</html>"
        );
    }

    #[test]
    fn no_image_for_other_extensions() {
        let html = waypoints_html(&[], Path::new("map.pdf"), 5);
        assert!(!html.contains("<img"));
    }

    #[test]
    fn escapes_text() {
        let gpx = vec![GpxData {
            title: Some("Fish & Chips".to_owned()),
            tracks: vec![],
            waypoints: vec![waypoint(Some("<b>Bar</b>"), None)],
        }];

        let html = waypoints_html(&gpx, Path::new("map.png"), 0);
        assert!(html.contains("<h1>Fish &amp; Chips</h1>"));
        assert!(html.contains("<li>&lt;b&gt;Bar&lt;/b&gt;</li>"));
    }
}
