//! Line parser for the embedded wall configuration
//!
//! Handles the small TOML subset `flipdot.toml` uses:
//! - `[section]` headers
//! - `key = value` pairs (integer, boolean)
//! - integers written in decimal, `0b` binary or `0x` hex
//! - comments (# ...)
//!
//! Unknown keys are skipped so an older firmware accepts a newer file.

use flipdot_core::config::DisplayConfig;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value could not be parsed for its key
    InvalidValue,
    /// Line is neither a header, a pair nor a comment
    InvalidLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Display,
    Render,
    Animation,
    Clock,
}

/// Parse `flipdot.toml` on top of the default configuration
///
/// Missing sections and keys keep their defaults. The result is not
/// validated; call [`DisplayConfig::validate`] before using it.
pub fn parse_config(input: &str) -> Result<DisplayConfig, ParseError> {
    let mut config = DisplayConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let header = header
                .split('#')
                .next()
                .unwrap_or("")
                .trim_end()
                .strip_suffix(']')
                .ok_or(ParseError::InvalidSection)?;
            section = parse_section_header(header)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        apply_value(&mut config, section, key, value)?;
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "display" => Ok(Section::Display),
        "render" => Ok(Section::Render),
        "animation" => Ok(Section::Animation),
        "clock" => Ok(Section::Clock),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Split `key = value`, dropping a trailing comment
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Register-style value: decimal, `0b1001` or `0x09`
fn parse_bits(value: &str) -> Result<u8, ParseError> {
    let value = strip_separators(value);
    let parsed = if let Some(bin) = value.strip_prefix("0b") {
        u8::from_str_radix(bin, 2)
    } else if let Some(hex) = value.strip_prefix("0x") {
        u8::from_str_radix(hex, 16)
    } else {
        value.parse()
    };
    parsed.map_err(|_| ParseError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Drop digit separators (`0b10_01`); overlong values fail to parse later
fn strip_separators(value: &str) -> heapless::String<16> {
    let mut out = heapless::String::new();
    for c in value.chars().filter(|&c| c != '_') {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

fn apply_value(
    config: &mut DisplayConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Display, "modules") => config.geometry.modules = parse_int(value)?,
        (Section::Display, "module_columns") => config.geometry.module_columns = parse_int(value)?,
        (Section::Display, "rows") => config.geometry.rows = parse_int(value)?,

        (Section::Render, "frame_interval_ms") => {
            config.render.frame_interval_ms = parse_int(value)?
        }
        (Section::Render, "orientation") => config.render.orientation_bits = parse_bits(value)?,
        (Section::Render, "framerate") => config.render.framerate = parse_int(value)?,

        (Section::Animation, "k_ms") => config.animation.k_ms = parse_int(value)?,
        (Section::Animation, "min_step_ms") => config.animation.min_step_ms = parse_int(value)?,
        (Section::Animation, "max_step_ms") => config.animation.max_step_ms = parse_int(value)?,
        (Section::Animation, "idle_poll_ms") => config.animation.idle_poll_ms = parse_int(value)?,
        (Section::Animation, "watchdog_ms") => config.animation.watchdog_ms = parse_int(value)?,

        (Section::Clock, "known") => config.clock.known = parse_bool(value)?,
        (Section::Clock, "hour") => config.clock.hour = parse_int(value)?,
        (Section::Clock, "minute") => config.clock.minute = parse_int(value)?,

        _ => {}
    }
    Ok(())
}
