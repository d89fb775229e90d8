use std::io::{self, BufRead, Write};

use anyhow::{Context, anyhow};
use clap::Parser;
use hrms_lite::client::config;
use hrms_lite::client::prompt::ConsolePrompt;
use hrms_lite::client::shell::route::Route;
use hrms_lite::client::shell::{Flow, Shell, command};
use hrms_lite::client::{ClientConfig, HttpStore};
use hrms_lite::telemetry;
use tracing::info;

/// Console front end for the HRMS Lite API.
#[derive(Debug, Parser)]
#[command(name = "hrms-console", version, about)]
struct Args {
    /// API base URL; a bare host is reached over https
    #[arg(long, env = "HRMS_API_URL")]
    api_url: Option<String>,

    /// Page to open first: dashboard, employees or attendance
    #[arg(long, default_value = "dashboard")]
    route: String,

    /// Directory for the rolling log file
    #[arg(long, env = "HRMS_CONSOLE_LOG_DIR", default_value = "logs")]
    log_dir: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let _guard = telemetry::init(&args.log_dir, "hrms-console.log");

    let route = Route::resolve(&args.route).ok_or_else(|| anyhow!("Unknown page {:?}", args.route))?;
    let config = config::init(ClientConfig::from_env(args.api_url.as_deref())?)?;
    info!(base_url = %config.base_url, "Console starting...");

    let store = HttpStore::new(config)?;
    let mut shell = Shell::open(store, ConsolePrompt, config.roster_policy, route).await;

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        println!("{}\n", shell.render());
        print!("> ");
        io::stdout().flush().context("Failed to write to stdout")?;

        line.clear();
        if stdin.lock().read_line(&mut line).context("Failed to read stdin")? == 0 {
            break;
        }

        match command::parse(&line) {
            Ok(Some(cmd)) => {
                if shell.execute(cmd).await == Flow::Quit {
                    break;
                }
            }
            Ok(None) => {}
            // usage errors and `help` output, already rendered by clap
            Err(err) => print!("{err}"),
        }
    }

    info!("Console closed");
    Ok(())
}
