//! Monitor control over DDC/CI
//!
//! Shells out to `ddcutil setvcp`. VCP codes:
//! - 0x62 audio speaker volume
//! - 0x10 luminance
//! - 0x60 input source
//!
//! Outside dry runs the monitor is asked for its active input at start-up
//! (`getvcp 0x60 --terse`), and for its input list (`capabilities`) when the
//! configuration names none.

use std::fmt::Write;
use std::process::Command;

use heapless::Vec;
use tracing::{debug, info, warn};

use panel_core::config::{MonitorConfig, MonitorInput, MAX_INPUTS};
use panel_core::traits::{InputLabel, InputStep, Monitor, MonitorError};

const VCP_VOLUME: u8 = 0x62;
const VCP_BRIGHTNESS: u8 = 0x10;
const VCP_INPUT_SOURCE: u8 = 0x60;

/// `ddcutil` backed monitor
pub struct DdcutilMonitor {
    dry_run: bool,
    display: Option<u8>,
    inputs: Vec<MonitorInput, MAX_INPUTS>,
    current: usize,
}

impl DdcutilMonitor {
    pub fn new(config: &MonitorConfig) -> Self {
        let mut monitor = Self {
            dry_run: config.dry_run,
            display: config.display,
            inputs: config.inputs.clone(),
            current: 0,
        };
        if !monitor.dry_run {
            monitor.discover();
        }
        monitor
    }

    fn discover(&mut self) {
        if self.inputs.is_empty() {
            if let Some(text) = self.query(&["capabilities"]) {
                self.inputs = parse_capabilities(&text);
                info!("found {} monitor inputs", self.inputs.len());
            }
        }

        let active = self
            .query(&["getvcp", "0x60", "--terse"])
            .and_then(|text| parse_terse_value(&text));
        if let Some(value) = active {
            match input_index(&self.inputs, value) {
                Some(index) => {
                    debug!("active input {}", self.inputs[index].label);
                    self.current = index;
                }
                None => warn!("active input 0x{:02x} is not in the input list", value),
            }
        }
    }

    /// Run a read-only `ddcutil` command and capture its output
    fn query(&self, args: &[&str]) -> Option<String> {
        let mut command = Command::new("ddcutil");
        command.args(args);
        if let Some(display) = self.display {
            command.arg("--display").arg(display.to_string());
        }
        match command.output() {
            Ok(output) if output.status.success() => {
                Some(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(output) => {
                warn!("ddcutil {} exited with {}", args.join(" "), output.status);
                None
            }
            Err(e) => {
                warn!("cannot run ddcutil: {}", e);
                None
            }
        }
    }

    /// Index of the input selected last
    pub fn current_input(&self) -> usize {
        self.current
    }

    /// Arguments passed to `ddcutil` for one VCP write
    pub fn command_args(&self, code: u8, value: &str) -> std::vec::Vec<String> {
        let mut args = vec!["setvcp".to_string(), format!("0x{:02x}", code), value.to_string()];
        if let Some(display) = self.display {
            args.push("--display".to_string());
            args.push(display.to_string());
        }
        args
    }

    fn setvcp(&self, code: u8, value: &str) -> Result<(), MonitorError> {
        let args = self.command_args(code, value);
        if self.dry_run {
            info!("dry run: ddcutil {}", args.join(" "));
            return Ok(());
        }

        debug!("ddcutil {}", args.join(" "));
        let status = Command::new("ddcutil").args(&args).status().map_err(|e| {
            warn!("cannot run ddcutil: {}", e);
            MonitorError::CommandFailed
        })?;
        if status.success() {
            Ok(())
        } else {
            warn!("ddcutil exited with {}", status);
            Err(MonitorError::CommandFailed)
        }
    }
}

/// VCP value such as `0x0f`, `x0f` or `0f`
fn parse_hex(text: &str) -> Option<u8> {
    let digits = text.trim().trim_start_matches("0x").trim_start_matches('x');
    u8::from_str_radix(digits, 16).ok()
}

/// Value reported by `getvcp --terse`, e.g. `VCP 60 SNC x0f`
pub fn parse_terse_value(output: &str) -> Option<u8> {
    let mut fields = output.split_whitespace();
    if fields.next()? != "VCP" {
        return None;
    }
    parse_hex(fields.last()?)
}

/// Input sources listed under feature 60 of `ddcutil capabilities`
pub fn parse_capabilities(text: &str) -> Vec<MonitorInput, MAX_INPUTS> {
    let mut inputs = Vec::new();
    let mut lines = text
        .lines()
        .map(str::trim)
        .skip_while(|line| !line.starts_with("Feature: 60 "));
    lines.next();

    for line in lines {
        if line.starts_with("Feature:") {
            break;
        }
        let Some((code, label)) = line.split_once(": ") else {
            continue;
        };
        let Some(code) = parse_hex(code) else {
            continue;
        };
        let mut input = MonitorInput {
            id: heapless::String::new(),
            label: heapless::String::new(),
        };
        let _ = write!(input.id, "0x{:02x}", code);
        for c in label.trim().chars() {
            if input.label.push(c).is_err() {
                break;
            }
        }
        if inputs.push(input).is_err() {
            break;
        }
    }
    inputs
}

/// Position of the input whose id has VCP value `value`
fn input_index(inputs: &[MonitorInput], value: u8) -> Option<usize> {
    inputs.iter().position(|i| parse_hex(&i.id) == Some(value))
}

impl Monitor for DdcutilMonitor {
    fn set_volume(&mut self, percent: u8) -> Result<(), MonitorError> {
        self.setvcp(VCP_VOLUME, &percent.min(100).to_string())
    }

    fn set_brightness(&mut self, percent: u8) -> Result<(), MonitorError> {
        self.setvcp(VCP_BRIGHTNESS, &percent.min(100).to_string())
    }

    fn cycle_input(&mut self, step: InputStep) -> Result<InputLabel, MonitorError> {
        if self.inputs.is_empty() {
            return Err(MonitorError::NoInputs);
        }
        let next = step.apply(self.current, self.inputs.len());
        self.setvcp(VCP_INPUT_SOURCE, &self.inputs[next].id)?;
        self.current = next;
        Ok(self.inputs[next].label.clone())
    }
}
