use anyhow::Result;
use std::process::ExitCode;

mod cli;

use cli::Command;

fn main() -> ExitCode {
    let args = cli::parse_args();

    // Honor RUST_LOG when set, otherwise info (debug with --verbose)
    let default_filter = if args.verbose { "debug" } else { hostprep_core::DEFAULT_LOG_LEVEL };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(args.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            let code = e
                .downcast_ref::<hostprep_core::Error>()
                .map(hostprep_core::Error::exit_code)
                .unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::InstallDeps { dry_run, log_dir } => {
            let mut config = hostprep_core::InstallConfig {
                dry_run,
                ..Default::default()
            };
            if log_dir.is_some() {
                config.log_dir = log_dir;
            }

            let report = hostprep_core::install_host_dependencies(&config)?;
            if let Some(path) = &report.log_path {
                log::info!("Install log saved to {}", path.display());
            }
            println!("\nRun 'hostprep check-deps' to verify installation.");
            Ok(ExitCode::SUCCESS)
        }
        Command::CheckDeps { json } => {
            let report = hostprep_core::check_host_dependencies();
            if json {
                println!("{}", report.to_json()?);
            } else {
                report.print_table();
            }
            Ok(if report.is_ready() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Command::Run {
            project_dir,
            forwarded,
        } => {
            let config = hostprep_core::LaunchConfig::from_env(project_dir, forwarded)?;
            hostprep_core::launch(&config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
