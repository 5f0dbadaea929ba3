use std::{fmt::Write as _, fs, path::Path};

use serde_json::json;

use crate::{Error, Result, Tour, node::ProjectedNode, options::OutputFormat};

/// Renders a solved tour over the nodes it was computed from.
///
/// Geometry outputs use `x = lon`, `y = lat` axis order and list the stops in
/// visiting order, origin included at both ends.
pub fn render(format: OutputFormat, nodes: &[ProjectedNode], tour: &Tour) -> Result<String> {
    let stops = resolve(nodes, tour)?;
    match format {
        OutputFormat::Text => Ok(text(&stops, tour)),
        OutputFormat::Wkt => Ok(wkt(&stops)),
        OutputFormat::GeoJson => Ok(serde_json::to_string_pretty(&geojson(&stops, tour))?),
    }
}

/// Writes the rendered route to `path`, or stdout when `path` is `None`.
pub fn write_route(
    path: Option<&Path>,
    format: OutputFormat,
    nodes: &[ProjectedNode],
    tour: &Tour,
) -> Result<()> {
    let rendered = render(format, nodes, tour)?;
    match path {
        Some(path) => {
            fs::write(path, rendered.as_bytes()).map_err(|e| {
                Error::other(format!("failed to write route to {}: {e}", path.display()))
            })?;
            log::info!("output: format={format} path={}", path.display());
        }
        None => println!("{}", rendered.trim_end()),
    }
    Ok(())
}

fn resolve<'a>(nodes: &'a [ProjectedNode], tour: &Tour) -> Result<Vec<&'a ProjectedNode>> {
    if let Some(&bad) = tour.order.iter().find(|&&idx| idx >= nodes.len()) {
        return Err(Error::invalid_data(format!(
            "tour index {bad} is out of range for {} nodes",
            nodes.len()
        )));
    }
    Ok(tour.stops(nodes))
}

fn text(stops: &[&ProjectedNode], tour: &Tour) -> String {
    let mut out = format!("# length={}\n", ryu::Buffer::new().format(tour.length));
    for (&idx, node) in tour.order.iter().zip(stops) {
        // String formatting cannot fail.
        let _ = writeln!(out, "{idx},{node}");
    }
    out
}

fn wkt(stops: &[&ProjectedNode]) -> String {
    let mut x = ryu::Buffer::new();
    let mut y = ryu::Buffer::new();
    let coords = stops
        .iter()
        .map(|n| format!("{} {}", x.format(n.coord.lon), y.format(n.coord.lat)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("LINESTRING ({coords})")
}

fn geojson(stops: &[&ProjectedNode], tour: &Tour) -> serde_json::Value {
    let coordinates: Vec<[f64; 2]> = stops.iter().map(|n| [n.coord.lon, n.coord.lat]).collect();
    let ids: Vec<&str> = stops.iter().map(|n| n.id.as_str()).collect();
    json!({
        "type": "Feature",
        "geometry": {
            "type": "LineString",
            "coordinates": coordinates,
        },
        "properties": {
            "length": tour.length,
            "order": tour.order,
            "ids": ids,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::{render, write_route};
    use crate::{
        Error, Tour,
        node::{Coord, ProjectedNode},
        options::OutputFormat,
    };

    fn nodes() -> Vec<ProjectedNode> {
        vec![
            ProjectedNode::new("depot", Coord::new(4.5, -74.0)),
            ProjectedNode::new("a", Coord::new(4.75, -74.0)),
            ProjectedNode::new("b", Coord::new(4.5, -73.5)),
        ]
    }

    #[test]
    fn wkt_lists_lon_lat_pairs_in_visiting_order() {
        let tour = Tour::new(vec![0, 2, 1, 0], 1.0);
        let wkt = render(OutputFormat::Wkt, &nodes(), &tour).expect("render");
        assert_eq!(
            wkt,
            "LINESTRING (-74.0 4.5, -73.5 4.5, -74.0 4.75, -74.0 4.5)"
        );
    }

    #[test]
    fn geojson_is_a_linestring_feature_with_properties() {
        let tour = Tour::new(vec![0, 1, 2, 0], 1.25);
        let rendered = render(OutputFormat::GeoJson, &nodes(), &tour).expect("render");
        let value: serde_json::Value = serde_json::from_str(&rendered).expect("valid json");

        assert_eq!(value["type"], "Feature");
        assert_eq!(value["geometry"]["type"], "LineString");
        let coords = value["geometry"]["coordinates"].as_array().expect("array");
        assert_eq!(coords.len(), 4);
        assert_eq!(coords[1], serde_json::json!([-74.0, 4.75]));
        assert_eq!(coords[0], coords[3]);
        assert_eq!(value["properties"]["length"], 1.25);
        assert_eq!(value["properties"]["order"], serde_json::json!([0, 1, 2, 0]));
        assert_eq!(value["properties"]["ids"][2], "b");
    }

    #[test]
    fn text_has_length_header_and_one_row_per_stop() {
        let tour = Tour::new(vec![0, 1, 0], 0.5);
        let text = render(OutputFormat::Text, &nodes(), &tour).expect("render");
        assert_eq!(text, "# length=0.5\n0,depot,4.5,-74.0\n1,a,4.75,-74.0\n0,depot,4.5,-74.0\n");
    }

    #[test]
    fn origin_only_tour_renders_a_degenerate_line() {
        let tour = Tour::new(vec![0, 0], 0.0);
        let wkt = render(OutputFormat::Wkt, &nodes()[..1], &tour).expect("render");
        assert_eq!(wkt, "LINESTRING (-74.0 4.5, -74.0 4.5)");
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let tour = Tour::new(vec![0, 5, 0], 0.0);
        let err = render(OutputFormat::Wkt, &nodes(), &tour).expect_err("bad index");
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn write_route_creates_the_output_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("route.wkt");
        let tour = Tour::new(vec![0, 1, 2, 0], 1.0);
        write_route(Some(&path), OutputFormat::Wkt, &nodes(), &tour).expect("write");
        let written = std::fs::read_to_string(&path).expect("read back");
        assert!(written.starts_with("LINESTRING ("));
    }
}
