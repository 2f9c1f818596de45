//! Output artifacts: the CSV time series and the PNG chart.

pub mod csv;
pub mod plot;

pub use csv::write_csv_file;
pub use plot::render_plot;
