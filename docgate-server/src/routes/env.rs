//! `/env`: what the process sees, as sorted `key: value` lines.

use crate::config::ServerConfig;
use crate::state::ServerState;
use axum::extract::State;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;

/// Dump process properties and environment variables as plain text
pub async fn env(State(state): State<Arc<ServerState>>) -> String {
    render_env(&system_properties(&state.config), &system_environment())
}

/// Process, platform and package facts plus the effective `docgate.*` configuration.
pub fn system_properties(config: &ServerConfig) -> BTreeMap<String, String> {
    let mut properties = BTreeMap::new();

    properties.insert("os.name".to_string(), std::env::consts::OS.to_string());
    properties.insert("os.arch".to_string(), std::env::consts::ARCH.to_string());
    properties.insert("os.family".to_string(), std::env::consts::FAMILY.to_string());
    properties.insert("process.id".to_string(), std::process::id().to_string());
    properties.insert("package.name".to_string(), env!("CARGO_PKG_NAME").to_string());
    properties.insert("package.version".to_string(), env!("CARGO_PKG_VERSION").to_string());

    if let Ok(dir) = std::env::current_dir() {
        properties.insert("process.cwd".to_string(), dir.display().to_string());
    }
    if let Ok(exe) = std::env::current_exe() {
        properties.insert("process.executable".to_string(), exe.display().to_string());
    }

    properties.extend(config.properties());

    properties
}

/// Environment variables of the process. Non-UTF-8 names and values are converted lossily.
pub fn system_environment() -> BTreeMap<String, String> {
    std::env::vars_os()
        .map(|(key, value)| (key.to_string_lossy().into_owned(), value.to_string_lossy().into_owned()))
        .collect()
}

pub fn render_env(properties: &BTreeMap<String, String>, environment: &BTreeMap<String, String>) -> String {
    let mut out = String::from("System Properties:\n");
    write_section(&mut out, properties);

    out.push_str("\nSystem Environment:\n");
    write_section(&mut out, environment);

    out
}

fn write_section(out: &mut String, entries: &BTreeMap<String, String>) {
    for (key, value) in entries {
        // Writing into a String cannot fail
        let _ = writeln!(out, "{key}: {value}");
    }
}
