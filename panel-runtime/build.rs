//! Build script for panel-runtime
//!
//! Validates the embedded panel.toml at compile time, so a broken default
//! configuration never makes it into the binary.

use std::fs;
use std::path::Path;

const KNOWN_SECTIONS: [&str; 5] = ["clock", "overlay", "supervisor", "monitor", "weather"];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    validate_config();
}

/// Validate panel.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=panel.toml");

    let config_path = Path::new("panel.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: panel.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The runtime embeds panel.toml as its default configuration.    ║\n\
            ║  Please create one in the panel-runtime directory.               ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read panel.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in panel.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_clock(&config, &mut errors);
    validate_monitor(&config, &mut errors);
    validate_weather(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid values in panel.toml                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=panel.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Only known top-level tables are allowed
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = config.as_table() else {
        return;
    };
    for (name, value) in table {
        if !KNOWN_SECTIONS.contains(&name.as_str()) {
            errors.push(format!("unknown section [{}]", name));
        } else if !value.is_table() {
            errors.push(format!("[{}] must be a table", name));
        }
    }
}

fn validate_clock(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(offset) = config
        .get("clock")
        .and_then(|c| c.get("utc_offset_minutes"))
        .and_then(|v| v.as_integer())
    {
        if !(-14 * 60..=14 * 60).contains(&offset) {
            errors.push("[clock] utc_offset_minutes must be -840..840".to_string());
        }
    }
}

fn validate_monitor(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(inputs) = config.get("monitor").and_then(|m| m.get("inputs")) else {
        return;
    };
    let Some(inputs) = inputs.as_array() else {
        errors.push("[monitor] inputs must be an array".to_string());
        return;
    };
    if inputs.len() > 8 {
        errors.push("[monitor] at most 8 inputs".to_string());
    }
    for (i, input) in inputs.iter().enumerate() {
        match input.get("label").and_then(|l| l.as_str()) {
            Some(label) if label.chars().count() <= 16 => {}
            Some(_) => errors.push(format!("[monitor] inputs[{}] label over 16 chars", i)),
            None => errors.push(format!("[monitor] inputs[{}] missing 'label'", i)),
        }
        if input.get("id").and_then(|v| v.as_str()).is_none() {
            errors.push(format!("[monitor] inputs[{}] missing 'id'", i));
        }
    }
}

fn validate_weather(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(weather) = config.get("weather") else {
        return;
    };
    if let Some(units) = weather.get("units").and_then(|u| u.as_str()) {
        if !["imperial", "metric"].contains(&units) {
            errors.push("[weather] units must be 'imperial' or 'metric'".to_string());
        }
    }
    for (key, limit) in [("latitude", 90.0), ("longitude", 180.0)] {
        match weather.get(key) {
            None => {}
            Some(toml::Value::Float(v)) if v.abs() <= limit => {}
            Some(toml::Value::Float(_)) => {
                errors.push(format!("[weather] {} must be within ±{}", key, limit))
            }
            Some(_) => errors.push(format!("[weather] {} must be a float, e.g. 40.0", key)),
        }
    }
}
