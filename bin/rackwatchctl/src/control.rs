//! ---
//! rw_section: "05-networking-external-interfaces"
//! rw_subsection: "binary"
//! rw_type: "source"
//! rw_scope: "code"
//! rw_description: "Operator control commands. Acknowledged only, never actuated."
//! rw_version: "v0.1.0"
//! rw_owner: "tbd"
//! ---
use std::fmt;
use std::io::Write;

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use rackwatch_common::AppConfig;
use tracing::warn;

/// Operator control commands. None of them has a backing action.
#[derive(Debug, Subcommand)]
pub enum ControlCommand {
    /// Acknowledge a cooling increase for a rack.
    Cooling(ControlTarget),
    /// Acknowledge a workload balancing request for a rack.
    Balance(ControlTarget),
}

#[derive(Debug, Args)]
pub struct ControlTarget {
    /// Rack to act on; must be one of the configured racks.
    #[arg(long, value_name = "NAME")]
    pub rack: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ControlAction {
    IncreaseCooling,
    WorkloadBalancing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlAck {
    pub action: ControlAction,
    pub rack: String,
}

impl fmt::Display for ControlAck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            ControlAction::IncreaseCooling => write!(f, "Cooling increased for {}", self.rack),
            ControlAction::WorkloadBalancing => {
                write!(f, "Workload balancing initiated for {}", self.rack)
            }
        }
    }
}

impl ControlCommand {
    fn parts(&self) -> (ControlAction, &ControlTarget) {
        match self {
            ControlCommand::Cooling(target) => (ControlAction::IncreaseCooling, target),
            ControlCommand::Balance(target) => (ControlAction::WorkloadBalancing, target),
        }
    }
}

/// Validate the target rack and build the acknowledgement.
pub fn acknowledge(command: &ControlCommand, config: &AppConfig) -> Result<ControlAck> {
    let (action, target) = command.parts();
    if !config.racks.iter().any(|rack| rack == &target.rack) {
        return Err(anyhow!(
            "unknown rack '{}'; configured racks: {}",
            target.rack,
            config.racks.join(", ")
        ));
    }
    warn!(
        rack = %target.rack,
        action = action.as_ref(),
        "control command acknowledged; no actuation backend is wired"
    );
    Ok(ControlAck {
        action,
        rack: target.rack.clone(),
    })
}

pub fn run(command: &ControlCommand, config: &AppConfig, out: &mut impl Write) -> Result<()> {
    let ack = acknowledge(command, config)?;
    writeln!(out, "{ack}")?;
    Ok(())
}
