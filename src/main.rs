//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `schoolloop` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Credential prompting (the password without echo)
//! - Printing the selected records
//!
//! All core functionality is implemented in the library crate.

use std::io::{self, Write};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{stdin, AsyncBufReadExt, BufReader, Lines, Stdin};

use schoolloop::config::Opt;
use schoolloop::export::{write_records, IgnoreBrokenPipe};
use schoolloop::initialization::init_logger_with;
use schoolloop::{Config, PortalError, Session};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load SCHOOLLOOP_* variables from .env, in the current directory first,
    // then next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    let mut input = BufReader::new(stdin()).lines();
    let username = match opt.username.clone() {
        Some(username) => username,
        None => prompt(&mut input, "Username").await?,
    };
    let password = match opt.password.clone() {
        Some(password) => password,
        None => prompt_password().await?,
    };

    let config = Config::from(&opt);
    let mut session = Session::new(&config).context("Failed to initialize portal session")?;

    match session.authenticate(&username, &password).await {
        Ok(()) => {}
        Err(e @ PortalError::AuthenticationFailure) => {
            eprintln!("schoolloop error: {}", e);
            process::exit(1);
        }
        Err(e) => return Err(e).context("Login request failed"),
    }

    if let Err(e) = print_selected(&mut session, &opt).await {
        eprintln!("schoolloop error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

/// Reads one line from stdin after printing `label` on stderr.
async fn prompt(input: &mut Lines<BufReader<Stdin>>, label: &str) -> Result<String> {
    eprint!("{}: ", label);
    io::stderr().flush().context("Failed to write prompt")?;
    let line = input
        .next_line()
        .await
        .context("Failed to read from stdin")?
        .with_context(|| format!("No {} given", label.to_lowercase()))?;
    Ok(line.trim().to_string())
}

/// Reads the password from the terminal without echoing it.
async fn prompt_password() -> Result<String> {
    tokio::task::spawn_blocking(|| rpassword::prompt_password("Password: "))
        .await
        .context("Password prompt task failed")?
        .context("Failed to read password")
}

/// Prints every record set selected on the command line, in flag order.
async fn print_selected(session: &mut Session, opt: &Opt) -> Result<()> {
    let mut out = IgnoreBrokenPipe::new(io::stdout());

    if opt.classes {
        let classes = session.class_list().await.context("Failed to read classes")?;
        write_records(&mut out, &classes, opt.format)?;
    }
    if opt.dropbox {
        let files = session
            .dropbox_files()
            .await
            .context("Failed to read dropbox files")?;
        write_records(&mut out, &files, opt.format)?;
    }
    if opt.calendar {
        let events = session
            .calendar(opt.month)
            .await
            .context("Failed to read calendar events")?;
        write_records(&mut out, &events, opt.format)?;
    }
    if opt.assignments {
        let assignments = session
            .assignment_list(None)
            .await
            .context("Failed to read assignments")?;
        write_records(&mut out, &assignments, opt.format)?;
    }
    Ok(())
}
