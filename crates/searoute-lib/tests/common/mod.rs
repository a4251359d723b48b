#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use searoute_lib::Coordinate;

pub const KLAIPEDA: Coordinate = Coordinate::new(21.126023, 55.703557);
pub const LOS_ANGELES: Coordinate = Coordinate::new(-118.283333, 33.716667);
pub const ROTTERDAM: Coordinate = Coordinate::new(4.47917, 51.9225);
pub const HAMBURG: Coordinate = Coordinate::new(9.97, 53.55);
pub const SHANGHAI: Coordinate = Coordinate::new(121.473701, 31.230416);
pub const SINGAPORE: Coordinate = Coordinate::new(103.85, 1.29);
pub const FREMANTLE: Coordinate = Coordinate::new(115.74, -32.05);
pub const ISTANBUL: Coordinate = Coordinate::new(28.98, 41.01);
pub const JEBEL_ALI: Coordinate = Coordinate::new(55.03, 25.01);
pub const NEW_YORK: Coordinate = Coordinate::new(-74.04, 40.67);
pub const ODESA: Coordinate = Coordinate::new(30.73, 46.49);

/// Directory holding the bundled network CSV files.
pub fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Copy the bundled network files into `target`.
pub fn copy_bundled_data(target: &Path) {
    for entry in fs::read_dir(data_dir()).expect("read data dir") {
        let entry = entry.expect("dir entry");
        fs::copy(entry.path(), target.join(entry.file_name())).expect("copy data file");
    }
}
