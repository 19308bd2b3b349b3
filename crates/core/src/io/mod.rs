//! I/O adapters for the command-line pipeline
//!
//! The engine itself works on in-memory records; these adapters read
//! polygon and skeleton layers from GeoJSON and write the width table as
//! CSV and the clipped probes as GeoJSON.

pub mod geojson;
pub mod table;

pub use geojson::{
    parse_feature_collection, read_centerlines, read_feature_collection, read_polygons,
    write_centerlines, write_probes, CenterlineFeature,
};
pub use table::{write_table, write_table_file, TableRow};
