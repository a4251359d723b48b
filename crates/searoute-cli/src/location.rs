//! Waypoints given on the command line: a port name/code or `lon,lat`.

use searoute_lib::{Coordinate, NetworkStore, Result};

/// A resolved command-line waypoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// What to call the waypoint in output.
    pub label: String,
    pub coordinate: Coordinate,
    /// Port code when the waypoint named a port.
    pub port_code: Option<String>,
}

/// Parse `lon,lat` (whitespace around either number is allowed).
pub fn parse_coordinate(input: &str) -> Option<Coordinate> {
    let (lon, lat) = input.split_once(',')?;
    let lon = lon.trim().parse::<f64>().ok()?;
    let lat = lat.trim().parse::<f64>().ok()?;
    Some(Coordinate::new(lon, lat))
}

/// Resolve each input as a coordinate or, failing that, a port name.
///
/// The port network is only loaded when an input is not a coordinate.
pub fn resolve_locations(store: &NetworkStore, inputs: &[String]) -> Result<Vec<Location>> {
    inputs
        .iter()
        .map(|input| {
            if let Some(coordinate) = parse_coordinate(input) {
                return Ok(Location {
                    label: coordinate.to_string(),
                    coordinate,
                    port_code: None,
                });
            }
            let resolver = store.port_resolver()?;
            let port = resolver.resolve(input)?;
            Ok(Location {
                label: port.name.clone(),
                coordinate: port.coordinate,
                port_code: Some(port.code.clone()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lon_lat_pairs() {
        assert_eq!(
            parse_coordinate("21.1,55.7"),
            Some(Coordinate::new(21.1, 55.7))
        );
        assert_eq!(
            parse_coordinate(" -118.28 , 33.71 "),
            Some(Coordinate::new(-118.28, 33.71))
        );
        assert_eq!(parse_coordinate("Rotterdam"), None);
        assert_eq!(parse_coordinate("1,2,3"), None);
    }

    #[test]
    fn resolves_ports_and_coordinates() {
        let store = NetworkStore::bundled();
        let inputs = vec!["rotterdam".to_string(), "121.5,31.2".to_string()];
        let locations = resolve_locations(&store, &inputs).unwrap();
        assert_eq!(locations[0].label, "Rotterdam");
        assert_eq!(locations[0].port_code.as_deref(), Some("NLRTM"));
        assert_eq!(locations[1].coordinate, Coordinate::new(121.5, 31.2));
        assert_eq!(locations[1].port_code, None);
    }

    #[test]
    fn coordinates_only_skip_the_port_network() {
        let store = NetworkStore::bundled();
        let inputs = vec!["4.4,51.9".to_string(), "121.5,31.2".to_string()];
        resolve_locations(&store, &inputs).unwrap();
        assert_eq!(store.build_count(), 0);
    }
}
