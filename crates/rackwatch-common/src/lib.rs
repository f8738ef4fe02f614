//! ---
//! rw_section: "01-core-functionality"
//! rw_subsection: "module"
//! rw_type: "source"
//! rw_scope: "code"
//! rw_description: "Shared primitives and utilities for the Rackwatch binaries."
//! rw_version: "v0.1.0"
//! rw_owner: "tbd"
//! ---
//! Configuration loading and logging setup consumed across the workspace.

pub mod config;
pub mod logging;

pub use config::{
    validate_racks, AppConfig, LoadedAppConfig, LoggingConfig, SavingsConfig, SimulationConfig,
};
pub use logging::{init_tracing, LogFormat};
