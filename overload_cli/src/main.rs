#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

mod cli;
mod commands;
mod error_fmt;
mod logging;
mod render;
mod session;

use clap::Parser;
use cli::{Cli, JSON_MODE};
use commands::{Output, config_dir, resolve};
use overload_config::Logging;

fn report(err: &eyre::Report) -> i32 {
    if JSON_MODE.get().copied().unwrap_or(false) {
        eprintln!("{}", error_fmt::format_error_json(err));
    } else {
        eprintln!("{}", error_fmt::humanize(err));
    }
    tracing::debug!(error = ?err, "command failed");
    error_fmt::exit_code_for_error(err)
}

fn print(cli: &Cli, output: Output) -> eyre::Result<()> {
    match output {
        Output::View(view) if cli.json => println!("{}", serde_json::to_string(&view)?),
        Output::View(view) => println!("{}", render::view_text(&view)),
        Output::Report { json, .. } if cli.json => println!("{json}"),
        Output::Report { text, .. } => println!("{text}"),
        Output::Streamed => {}
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    let _ = color_eyre::install();

    let cfg = overload_config::load_file(&cli.config);
    // log file paths are relative to the catalog, like plate CSVs
    let file_logging = cfg.as_ref().ok().map(|c| Logging {
        file: c
            .logging
            .file
            .as_deref()
            .map(|f| resolve(config_dir(&cli.config), f).to_string_lossy().into_owned()),
        level: c.logging.level.clone(),
        rotation: c.logging.rotation.clone(),
    });
    let guard = match logging::init(&cli.log_level, cli.json, file_logging.as_ref()) {
        Ok(g) => g,
        Err(e) => std::process::exit(report(&e)),
    };

    let code = match cfg
        .and_then(|cfg| commands::run(&cli, &cfg))
        .and_then(|out| print(&cli, out))
    {
        Ok(()) => 0,
        Err(e) => report(&e),
    };
    // flush the file sink before exiting
    drop(guard);
    std::process::exit(code);
}
