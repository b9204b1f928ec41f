//! `loanlink` entry point: loads settings, signs in and runs one command.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use loanlink::cli::{App, Cli};
use loanlink::config::ClientSettings;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // Flags are parsed by clap above; OrthoConfig only reads env and files.
    let mut settings = ClientSettings::load_from_iter([OsString::from("loanlink")])
        .map_err(|error| eyre!("load settings: {error}"))?;
    cli.global.apply_to(&mut settings);
    init_tracing(settings.json_logs);

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async {
        let mut app = App::connect(&settings).await?;
        let mut out = io::stdout().lock();
        app.run(cli.command, &mut out).await
    })
}

fn init_tracing(json: bool) {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}
