pub mod aggregate;
pub mod exec;
pub mod output;

pub use aggregate::{aggregate, aggregate_repository, fold_event};
pub use exec::{collect_organization, collect_repository, exec};
pub use output::{write_csv, write_report, write_table, DisplayMode, OutputFormat, ReportOptions};
