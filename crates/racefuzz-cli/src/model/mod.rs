pub mod controller_model;
pub mod run_report;
