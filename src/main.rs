use clap::{Parser, Subcommand};
use cyber_zen::classify::ClassifierTables;
use cyber_zen::git::CommandGit;
use cyber_zen::imaging::Rate;
use cyber_zen::{compress, config, gcm, housekeeping, output, prompt, server};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("CYBER_ZEN_ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("CYBER_ZEN_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "cyber-zen")]
#[command(about = "Personal toolbox: git shortcut, image compressor, static file server")]
#[command(long_about = "\
Personal toolbox: git shortcut, image compressor, static file server

  gcm [message]      stage everything, commit (hooks skipped) and push.
                     Without a message one is drafted from `git status`
                     and shown for confirmation.
  compress --src P   downscale JPEG/PNG/GIF images by --rate (0.1-1.0) into
                     a timestamped copy; BMP/WebP are copied unchanged.
  server [DIR]       serve DIR over HTTP and log every request.

Configuration is read from ~/.cyber-zen/config.yaml or ./config.yaml.
Commit wording comes from the YAML tables in ./configs, <exe dir>/configs
or ~/.cyber-zen/configs.")]
#[command(version = version_string())]
struct Cli {
    /// Log diagnostics to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add, commit and push, drafting a message when none is given
    Gcm {
        /// Commit message (drafted from the working tree when omitted)
        message: Option<String>,
    },
    /// Downscale images into a timestamped copy
    Compress {
        /// Image file or directory to compress
        #[arg(long)]
        src: PathBuf,
        /// Destination (defaults to ./compressed_<timestamp>)
        #[arg(long)]
        dist: Option<PathBuf>,
        /// Scale factor between 0.1 and 1.0
        #[arg(long, default_value_t = 0.8)]
        rate: f64,
    },
    /// Serve a directory over HTTP
    Server {
        /// Directory to serve
        #[arg(default_value = "./")]
        directory: PathBuf,
        /// Port to listen on
        #[arg(short, long, default_value_t = server::DEFAULT_PORT)]
        port: u32,
    },
    /// Show install location, version and tool availability
    Status,
    /// Remove the installed binary
    Uninstall,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Gcm { message } => {
            let git = CommandGit::new(std::env::current_dir()?);
            let message = gcm::run(
                &git,
                message,
                || ClassifierTables::load(&config::locate_tables_dir()),
                |draft| {
                    output::print_draft(draft);
                    prompt::confirm_on_terminal("Use this commit message?")
                },
            )?;
            output::print_committed(&message);
        }
        Command::Compress { src, dist, rate } => {
            let rate = Rate::new(rate)?;
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_compress_event(&event) {
                        println!("{line}");
                    }
                }
            });
            let result = compress::compress(&src, dist.as_deref(), rate, Some(tx));
            printer
                .join()
                .map_err(|_| "compress output printer panicked")?;
            output::print_compress_summary(&result?);
        }
        Command::Server { directory, port } => {
            let config = server::prepare(&directory, port)?;
            output::print_server_banner(&config);
            server::run(config)?;
        }
        Command::Status => {
            let config = config::load_config()?;
            let report = housekeeping::status_report(&config, version_string());
            output::print_status(&report);
        }
        Command::Uninstall => {
            let outcome = housekeeping::uninstall()?;
            output::print_uninstall(&outcome);
        }
    }

    Ok(())
}
