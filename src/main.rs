use bmp_rank::{config, output, process, scan};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bmp-rank")]
#[command(about = "Analyze BMP images and rank them by brightness")]
#[command(long_about = "\
Analyze BMP images and rank them by brightness

Each file is decoded with a built-in scanline decoder (uncompressed 24-bit
and 32-bit images). For every file the report shows resolution, declared
file size, color depth, the number of distinct colors and the average
perceived brightness (0.299 R + 0.587 G + 0.114 B). Files that cannot be
analyzed are reported with the reason and left out of the ranking.

Inputs are analyzed in the order given; directories expand to the .bmp
files they contain, sorted by name. The position in that order is the
image number used in the ranking and in pixel dump names:

  pixel-dumps/
  ├── 001-sunset.pixels.txt      # Pixel at (x, y): R=.., G=.., B=..
  └── 002-night.pixels.txt

Settings are read from bmp-rank.toml in the current directory, or from the
file given with --config. Command-line flags override the file.

Run 'bmp-rank gen-config' to generate a documented bmp-rank.toml.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze BMP files and print the brightness ranking
    Analyze(AnalyzeArgs),
    /// Print a stock bmp-rank.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct AnalyzeArgs {
    /// BMP files or directories, in ranking order
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Config file (default: ./bmp-rank.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write pixel dumps into this directory
    #[arg(long)]
    dump_dir: Option<PathBuf>,

    /// Skip pixel dumps
    #[arg(long, conflicts_with = "dump_dir")]
    no_dump: bool,

    /// Also write the full batch result as JSON to this file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Maximum number of files analyzed in parallel
    #[arg(long, short = 'j')]
    jobs: Option<usize>,

    /// Descend into subdirectories of directory inputs
    #[arg(long, short = 'r')]
    recursive: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Analyze(args) => {
            let config = resolve_analyze_config(&args)?;
            init_thread_pool(&config.processing);

            let paths = scan::expand_inputs(&args.paths, &config.scan)?;
            log::debug!("analyzing {} files", paths.len());
            let options = process::ProcessOptions::from_config(&config);

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let outcome = process::analyze_batch(&paths, &options, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;

            println!();
            output::print_batch_outcome(&outcome);

            if let Some(json_path) = &args.json {
                let json = serde_json::to_string_pretty(&outcome)?;
                std::fs::write(json_path, json)?;
                println!("JSON written to {}", json_path.display());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config file, then apply command-line overrides on top.
fn resolve_analyze_config(
    args: &AnalyzeArgs,
) -> Result<config::AnalyzerConfig, config::ConfigError> {
    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => config::load_config_from_dir(Path::new("."))?,
    };
    if let Some(dir) = &args.dump_dir {
        config.dump.enabled = true;
        config.dump.dir = dir.clone();
    }
    if args.no_dump {
        config.dump.enabled = false;
    }
    if args.jobs.is_some() {
        config.processing.max_processes = args.jobs;
    }
    if args.recursive {
        config.scan.recursive = true;
    }
    config.validate()?;
    Ok(config)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. User can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
