use searoute_lib::{Coordinate, Error, NetworkStore};

#[test]
fn resolves_bundled_ports_by_name_and_code() {
    let store = NetworkStore::bundled();
    let resolver = store.port_resolver().expect("port network builds");

    let klaipeda = resolver.resolve("klaipeda").unwrap();
    assert_eq!(klaipeda.code, "LTKLJ");
    assert_eq!(klaipeda.coordinate, Coordinate::new(21.126023, 55.703557));

    assert_eq!(resolver.resolve("  los ANGELES").unwrap().code, "USLAX");
    assert_eq!(resolver.resolve("cnsha").unwrap().name, "Shanghai");
    let hong_kong = resolver.resolve("Hong Kong").unwrap();
    assert_eq!(hong_kong.country.as_deref(), Some("HK"));
}

#[test]
fn typo_suggests_the_intended_port() {
    let store = NetworkStore::bundled();
    let resolver = store.port_resolver().unwrap();

    let err = resolver.resolve("Rotterdm").unwrap_err();
    let Error::PortNotFound { suggestions, .. } = &err else {
        panic!("unexpected error: {err:?}");
    };
    assert_eq!(suggestions.first().map(String::as_str), Some("Rotterdam"));
    assert!(suggestions.len() <= 3);
    assert!(err.to_string().contains("Did you mean"));
}

#[test]
fn unrelated_name_has_no_suggestions() {
    let store = NetworkStore::bundled();
    let resolver = store.port_resolver().unwrap();
    assert!(resolver.fuzzy_matches("Qxqxqxqx", 3).is_empty());
}

#[test]
fn search_matches_substrings() {
    let store = NetworkStore::bundled();
    let resolver = store.port_resolver().unwrap();

    let names = |query: &str| -> Vec<String> {
        let found = resolver.search(query);
        found.iter().map(|p| p.name.clone()).collect()
    };
    assert_eq!(names("port"), ["Port Klang", "Port Said"]);
    assert_eq!(names("new y"), ["New York"]);

    assert_eq!(resolver.search("").len(), resolver.len());
}

#[test]
fn nearest_port_to_offshore_positions() {
    let store = NetworkStore::bundled();
    let resolver = store.port_resolver().unwrap();
    let cases = [
        (Coordinate::new(4.3, 51.9), "NLRTM"),
        (Coordinate::new(121.8, 31.1), "CNSHA"),
        (Coordinate::new(-118.2, 33.6), "USLAX"),
        (Coordinate::new(21.0, 55.6), "LTKLJ"),
    ];
    for (position, code) in cases {
        let (port, _) = resolver.nearest(&position).unwrap();
        assert_eq!(port.code, code, "{position}");
    }
}
