//! Configs command handler.

use loadcheck_core::{DEFAULT_MSVC_VERSION, RunConfiguration, TargetOs};

use crate::presentation::print_separator;

/// Execute the configs command: print every known run configuration.
pub fn execute() {
    println!("{:<12} {:<8} {:<8} {:<8}", "Key", "OS", "Version", "Arch");
    print_separator(40);
    for config in RunConfiguration::all() {
        println!(
            "{:<12} {:<8} {:<8} {:<8}",
            config.key, config.os, config.os_version, config.bitness
        );
    }
    println!();
    println!(
        "Windows configurations accept --msvc-version 15, 16 or 17 (default {DEFAULT_MSVC_VERSION})."
    );
    if let Some(host) = TargetOs::host() {
        println!("This host is {host}; probes are always built and run for the host.");
    }
}
