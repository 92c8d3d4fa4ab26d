//! IO utilities for loading labelled feature files.

pub mod terrain_csv;

pub use terrain_csv::{
    read_terrain_csv, read_terrain_csv_with_config, read_terrain_csv_with_encoder, CsvReaderConfig,
    LoadedData,
};
