//! Cities and towns from the Overpass API.

use std::collections::HashMap;

use crate::bounding_box::BoundingBox;
use crate::error::Result;
use crate::labels::PlaceRecord;
use crate::sources::parse_point;
use crate::tile_range::TileRange;

pub const OVERPASS_URI: &str = "http://overpass-api.de/api/interpreter";

/// Overpass QL for all city and town nodes inside `extent`.
pub fn query(extent: &BoundingBox) -> String {
    let bbox = format!(
        "{},{},{},{}",
        extent.south, extent.west, extent.north, extent.east
    );
    format!(
        "(node[\"place\"=\"city\"]({bbox});node[\"place\"=\"town\"]({bbox}););out body;",
        bbox = bbox
    )
}

/// Name of the cached response for `range`.
pub fn cache_file_name(range: &TileRange) -> String {
    format!(
        "{}-{}-{}-{}-{}.osm",
        range.zoom, range.south_west.x, range.south_west.y, range.north_east.x, range.north_east.y
    )
}

/// Extracts all named nodes from an OSM XML document.
pub fn parse(xml: &str) -> Result<Vec<PlaceRecord>> {
    let doc = roxmltree::Document::parse(xml)?;

    let places = doc
        .descendants()
        .filter(|n| n.tag_name().name() == "node")
        .filter_map(|node| {
            let point = parse_point(node.attribute("lat"), node.attribute("lon"))?;

            let mut tags: HashMap<&str, &str> = node
                .children()
                .filter(|c| c.tag_name().name() == "tag")
                .filter_map(|tag| Some((tag.attribute("k")?, tag.attribute("v").unwrap_or(""))))
                .collect();

            let name = tags.remove("name")?;

            Some(PlaceRecord {
                name: name.to_owned(),
                point,
                population: tags.get("population").map(|v| (*v).to_owned()),
                place: tags.get("place").map(|v| (*v).to_owned()),
                capital: tags.contains_key("capital"),
            })
        })
        .collect();

    Ok(places)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="Overpass API">
  <note>The data included in this document is from www.openstreetmap.org.</note>
  <node id="1" lat="35.1983" lon="-111.6513">
    <tag k="name" v="Flagstaff"/>
    <tag k="place" v="city"/>
    <tag k="population" v="65,870 (2010)"/>
  </node>
  <node id="2" lat="33.4484" lon="-112.0740">
    <tag k="capital" v="4"/>
    <tag k="name" v="Phoenix"/>
    <tag k="place" v="city"/>
  </node>
  <node id="3" lat="36.9147" lon="-111.4558">
    <tag k="name" v="Page"/>
    <tag k="place" v="town"/>
  </node>
  <node id="4" lat="36.0" lon="-110.0">
    <tag k="place" v="town"/>
  </node>
  <node id="5" lon="-110.0">
    <tag k="name" v="Nowhere"/>
  </node>
</osm>"#;

    #[test]
    fn parses_named_nodes() {
        let places = parse(RESPONSE).unwrap();
        let names: Vec<&str> = places.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Flagstaff", "Phoenix", "Page"]);

        assert_eq!(places[0].population.as_deref(), Some("65,870 (2010)"));
        assert_eq!(places[0].place.as_deref(), Some("city"));
        assert!(!places[0].capital);
        assert!(places[1].capital);
        assert_eq!(places[2].population, None);
        assert!((places[2].point.lat - 36.9147).abs() < 1e-9);
    }

    #[test]
    fn rejects_broken_xml() {
        assert!(parse("<osm><node></osm>").is_err());
    }

    #[test]
    fn query_uses_south_west_north_east() {
        let extent = BoundingBox::new(34.5, -112.5, 41.0, -104.0).unwrap();
        assert_eq!(
            query(&extent),
            "(node[\"place\"=\"city\"](34.5,-112.5,41,-104);node[\"place\"=\"town\"](34.5,-112.5,41,-104););out body;"
        );
    }

    #[test]
    fn cache_name() {
        let bbox = BoundingBox::new(34.85, -112.23, 40.67, -104.58).unwrap();
        assert_eq!(cache_file_name(&bbox.tile_range(6)), "6-12-25-13-24.osm");
    }
}
