//! Build script for flipdot-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates flipdot.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate flipdot.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=flipdot.toml");

    let config_path = Path::new("flipdot.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: flipdot.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a flipdot.toml wall configuration.          ║\n\
            ║  Please create one in the flipdot-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read flipdot.toml                              ║\n\
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
                ║  ERROR: Invalid TOML syntax in flipdot.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_display(&config, &mut errors);
    validate_render(&config, &mut errors);
    validate_animation(&config, &mut errors);
    validate_clock(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid wall configuration in flipdot.toml               ║\n\
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

    println!("cargo:warning=flipdot.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The firmware parser rejects any other section
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = config.as_table() else {
        return;
    };
    for (name, value) in table {
        if !["display", "render", "animation", "clock"].contains(&name.as_str()) {
            errors.push(format!("Unknown section [{}]", name));
        } else if !value.is_table() {
            errors.push(format!("'{}' must be a [section]", name));
        }
    }
}

/// Integer `key` of `[section]`, if present, checked against `min..=max`
fn check_int(
    config: &toml::Value,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> Option<i64> {
    match config.get(section)?.get(key)? {
        toml::Value::Integer(value) if (min..=max).contains(value) => Some(*value),
        toml::Value::Integer(_) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
            None
        }
        _ => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
    }
}

fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    // 3-bit module address, one frame register per column, 7-bit data bytes
    check_int(config, "display", "modules", 1, 8, errors);
    check_int(config, "display", "module_columns", 1, 7, errors);
    check_int(config, "display", "rows", 1, 7, errors);
}

fn validate_render(config: &toml::Value, errors: &mut Vec<String>) {
    check_int(config, "render", "frame_interval_ms", 1, 10_000, errors);
    check_int(config, "render", "orientation", 0, 0x0F, errors);
    check_int(config, "render", "framerate", 0, 0x7F, errors);
}

fn validate_animation(config: &toml::Value, errors: &mut Vec<String>) {
    let max = u32::MAX as i64;
    check_int(config, "animation", "k_ms", 0, max, errors);
    let min_step = check_int(config, "animation", "min_step_ms", 1, max, errors);
    let max_step = check_int(config, "animation", "max_step_ms", 1, max, errors);
    check_int(config, "animation", "idle_poll_ms", 1, max, errors);
    check_int(config, "animation", "watchdog_ms", 0, max, errors);

    if let (Some(min_step), Some(max_step)) = (min_step, max_step) {
        if min_step > max_step {
            errors.push("[animation] min_step_ms must not exceed max_step_ms".to_string());
        }
    }
}

fn validate_clock(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(known) = config.get("clock").and_then(|c| c.get("known")) {
        if !known.is_bool() {
            errors.push("[clock] known must be true or false".to_string());
        }
    }
    check_int(config, "clock", "hour", 0, 23, errors);
    check_int(config, "clock", "minute", 0, 59, errors);
}
