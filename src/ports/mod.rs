//! Port traits decoupling the domain from storage, config, and reporting.

pub mod config_port;
pub mod data_port;
pub mod report_port;
