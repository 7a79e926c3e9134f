use clap::{ArgAction, Parser, Subcommand};
use log::{debug, warn};
use project_gallery::fetch::HttpFetcher;
use project_gallery::gallery::{self, Assembler, SOURCE_ORDER};
use project_gallery::template::Template;
use project_gallery::{config, output};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "project-gallery")]
#[command(about = "Portfolio page built from GitHub, BoardGameGeek and Cults3D listings")]
#[command(long_about = "\
Portfolio page built from GitHub, BoardGameGeek and Cults3D listings

Each site's public listing page is fetched (usually through a local proxy),
turned into project cards, and shuffled into one gallery:

  GitHub         pinned repositories (forks skipped), local logo as image
  BoardGameGeek  collection rows; full-size image from each game's XML entry
  Cults3D        published models; CDN thumbnail shown until the upload loads

Sources run in that order. A source that cannot be fetched ends the run;
the page is still written with the cards gathered before it.

Run 'project-gallery gen-config' to generate a documented gallery.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (missing file means defaults)
    #[arg(long, default_value = "gallery.toml", global = true)]
    config: PathBuf,

    /// More log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch every source and write the gallery page
    Build {
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Fetch every source and print the extracted projects as JSON
    Scrape,
    /// Print a stock gallery.toml with all options documented
    GenConfig,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Build { output: output_dir } => {
            let config = config::load_config(&cli.config)?;
            debug!("config: {config:?}");
            let fetcher = HttpFetcher::new(&config.http.user_agent, config.http.timeout())?;

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_gallery_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let report = gallery::build(&config, &fetcher, &output_dir, Some(tx)).await?;
            printer.join().ok();

            output::print_report(&report);
            println!("==> Gallery written to {}", output_dir.join("index.html").display());
        }
        Command::Scrape => {
            let config = config::load_config(&cli.config)?;
            let fetcher = HttpFetcher::new(&config.http.user_agent, config.http.timeout())?;
            let template = Template::card();
            let locations = config.sources.locations();
            let assembler = Assembler::new(&fetcher, &template, &locations, &config.assets);

            let mut projects = Vec::new();
            for host in SOURCE_ORDER {
                match assembler.load(host).await {
                    Ok(found) => projects.extend(found),
                    Err(err) => {
                        warn!("{}: {err}; later sources not run", host.slug());
                        break;
                    }
                }
            }
            println!("{}", serde_json::to_string_pretty(&projects)?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Default level from `-v` count; `RUST_LOG` still wins when set.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
