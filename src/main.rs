// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::io::BufRead;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use flow_runtime_settings::{
    loader::{load_console_logging, load_from},
    readiness::check_readiness,
    settings::PasswordHash,
    state,
    telemetry::{init_logging, LogFormat},
    ConfigError, PortPolicy, ProcessEnv,
};
use tracing::{error, info};

/// Startup settings for the flow automation runtime.
#[derive(Parser)]
#[command(name = "flow-runtime-settings", version, about)]
struct Cli {
    /// Fail on an unusable PORT instead of falling back to the default.
    #[arg(
        long,
        global = true,
        env = "STRICT_PORT",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    strict_port: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the settings document for the runtime (default)
    Render,
    /// Check that directories exist and TLS material loads
    Check,
    /// Read a password from stdin and print its bcrypt hash
    HashPassword {
        /// bcrypt work factor
        #[arg(long, default_value_t = 8)]
        cost: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let console = match load_console_logging(&ProcessEnv) {
        Ok(console) => console,
        Err(e) => return fail(&e),
    };
    let format = match LogFormat::from_env(&ProcessEnv) {
        Ok(format) => format,
        Err(e) => return fail(&e),
    };
    if let Err(e) = init_logging(&console, format) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }

    let result = match cli.command.unwrap_or(Command::Render) {
        Command::Render => render(cli.strict_port),
        Command::Check => check(cli.strict_port),
        Command::HashPassword { cost } => hash_password(cost),
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "Settings command failed");
            fail(&e)
        }
    }
}

fn policy(strict: bool) -> PortPolicy {
    if strict {
        PortPolicy::Strict
    } else {
        PortPolicy::Lenient
    }
}

fn render(strict: bool) -> Result<ExitCode, ConfigError> {
    let settings = state::install(load_from(&ProcessEnv, policy(strict))?)?;
    info!(
        port = settings.listen_port,
        user_dir = %settings.user_dir.display(),
        tls = settings.tls_enabled(),
        "Rendering runtime settings"
    );
    println!("{}", settings.to_json_pretty()?);
    Ok(ExitCode::SUCCESS)
}

fn check(strict: bool) -> Result<ExitCode, ConfigError> {
    let settings = state::install(load_from(&ProcessEnv, policy(strict))?)?;
    let report = check_readiness(settings);
    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.is_ready() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn hash_password(cost: u32) -> Result<ExitCode, ConfigError> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|source| ConfigError::Io {
            path: "<stdin>".into(),
            source,
        })?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err(ConfigError::invalid("password", "", "password must not be empty"));
    }

    let hash = PasswordHash::generate(password, cost)?;
    println!("{}", hash.as_str());
    Ok(ExitCode::SUCCESS)
}

fn fail(e: &ConfigError) -> ExitCode {
    eprintln!("Error: {e}");
    ExitCode::FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test: STRICT_PORT is process-global.
    #[test]
    fn strict_port_accepts_boolish_values() {
        let cli =
            Cli::try_parse_from(["flow-runtime-settings", "--strict-port", "render"]).unwrap();
        assert!(cli.strict_port);

        let cases = [
            ("1", true),
            ("yes", true),
            ("on", true),
            ("0", false),
            ("off", false),
        ];
        for (value, expected) in cases {
            std::env::set_var("STRICT_PORT", value);
            let cli = Cli::try_parse_from(["flow-runtime-settings", "check"]).unwrap();
            assert_eq!(cli.strict_port, expected, "STRICT_PORT={value}");
        }
        std::env::remove_var("STRICT_PORT");

        let cli = Cli::try_parse_from(["flow-runtime-settings"]).unwrap();
        assert!(!cli.strict_port);
        assert!(cli.command.is_none());
    }
}
