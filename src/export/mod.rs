mod exporter;

pub use exporter::export_roster;
