use clap::{Parser, Subcommand};
use pollsite::{config, output, site, walk};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pollsite")]
#[command(about = "Polling static site generator for HTML pages with layouts")]
#[command(long_about = "\
Polling static site generator for HTML pages with layouts

Every .html/.htm page under the source directory is mirrored into the output
directory. If the page's directory has a _layout.html, the page is rendered
through it; otherwise it is copied as-is.

Source structure:

  site/
  ├── config.toml          # Schedule tuning (optional, never published)
  ├── _layout.html         # Layout for pages in this directory
  ├── index.html           # Page: header lines, then content
  ├── .draft.html          # Hidden: skipped
  ├── notes.txt            # Not a page: skipped
  └── blog/
      └── post.html        # No layout here: copied verbatim

Page format:

  TITLE = My Web Page
  AUTHOR = James Patterson

  <p>Everything after the header is $$CONTENT$$.</p>

Layout tokens: $$TITLE$$, $$AUTHOR$$, $$CONTENT$$, ... Unknown tokens are
left untouched.

Run 'pollsite gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Source directory
    #[arg(long, default_value = "site", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "public", global = true)]
    output: PathBuf,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single pass and exit
    Build,
    /// Generate, then keep the output fresh until the process is killed
    Watch,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Build => {
            println!("==> Building {} → {}", cli.source.display(), cli.output.display());
            let report = walk::walk(&cli.source, &cli.output)?;
            output::print_pass_report(&report, &cli.source, &cli.output);
        }
        Command::Watch => {
            let site_config = config::load_config(&cli.source)?;
            println!(
                "==> Watching {} → {}",
                cli.source.display(),
                cli.output.display()
            );
            let handle = site::generate_site_with(
                &cli.source,
                &cli.output,
                site_config.schedule,
                |err| tracing::error!(error = %err, "pass failed"),
            )?;
            handle.wait();
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the stderr log subscriber.
///
/// `POLLSITE_LOG` wins over `RUST_LOG`, which wins over the CLI flags.
fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else if quiet {
        LevelFilter::ERROR
    } else {
        LevelFilter::INFO
    };

    let filter = match std::env::var("POLLSITE_LOG")
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
    {
        Some(filter) => filter,
        None => EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
