use clap::Parser;
use photo_shrink::config::{self, Profile, ResizeConfig};
use photo_shrink::types::{PathProvider, RootPaths, RunSummary};
use photo_shrink::{output, process};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "photo-shrink")]
#[command(about = "Batch-resize a directory tree of photos into JPEG copies")]
#[command(long_about = "\
Batch-resize a directory tree of photos into JPEG copies

Every .jpg, .jpeg, .png, .gif and .bmp file under INPUT (any case, any depth)
is decoded, flattened to RGB, converted to sRGB when it carries an ICC
profile, shrunk so its longer edge fits --max-edge (never enlarged) and saved
as a .jpg at the same relative path under OUTPUT:

  photos/                      shrunk/
  ├── a/photo.png       →      ├── a/photo.jpg
  ├── b/IMG_0001.JPG    →      ├── b/IMG_0001.jpg
  └── notes.txt                └── (skipped)

Files that fail to decode or write are counted and reported; the rest of the
batch carries on. The last line is always

  Complete! Processed: <N>, Errors: <M>

Set RUST_LOG for fine-grained log filtering (e.g. RUST_LOG=photo_shrink=debug).")]
#[command(version)]
struct Cli {
    /// Input root directory
    input: PathBuf,

    /// Output root directory (created if missing)
    output: PathBuf,

    /// Deployment preset for max edge and quality
    #[arg(long, value_enum, default_value_t = Profile::Instagram)]
    profile: Profile,

    /// Longest output edge in pixels (overrides the profile)
    #[arg(long, value_name = "PX")]
    max_edge: Option<u32>,

    /// JPEG quality 1-100 (overrides the profile)
    #[arg(long)]
    quality: Option<u32>,

    /// Skip sRGB conversion and do not embed the source ICC profile
    #[arg(long)]
    no_color_profile: bool,

    /// Do not copy EXIF metadata to the output
    #[arg(long)]
    strip_exif: bool,

    /// Maximum parallel workers (clamped to the number of cores)
    #[arg(long, value_name = "N")]
    threads: Option<usize>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn resize_config(&self) -> ResizeConfig {
        let mut config = ResizeConfig::from_profile(self.profile);
        if let Some(max_edge) = self.max_edge {
            config.max_edge = max_edge;
        }
        if let Some(quality) = self.quality {
            config.quality = quality;
        }
        config.preserve_color_profile = !self.no_color_profile;
        config.preserve_exif = !self.strip_exif;
        config
    }
}

impl PathProvider for Cli {
    fn resolve(&self) -> Option<RootPaths> {
        if self.input.as_os_str().is_empty() || self.output.as_os_str().is_empty() {
            return None;
        }
        Some(RootPaths::new(&self.input, &self.output))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(summary) => {
            output::print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<RunSummary, Box<dyn std::error::Error>> {
    let roots = cli
        .resolve()
        .ok_or("both an input and an output directory are required")?;
    let resize_config = cli.resize_config();
    resize_config.validate()?;

    init_thread_pool(&config::ProcessingConfig {
        max_threads: cli.threads,
    });

    let (tx, rx) = std::sync::mpsc::channel();
    let input_root = roots.input.clone();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_process_event(&event, &input_root);
        }
    });
    let result = process::process(&roots, &resize_config, Some(tx));
    if printer.join().is_err() {
        log::warn!("progress printer exited abnormally");
    }

    Ok(result?)
}

/// Initialize `env_logger` on stderr.
///
/// `-v`/`-q` pick the level outright; otherwise `RUST_LOG` applies, falling
/// back to `warn`.
fn init_logging(verbose: u8, quiet: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    let level = match (quiet, verbose) {
        (true, _) => Some(log::LevelFilter::Error),
        (false, 0) => None,
        (false, 1) => Some(log::LevelFilter::Info),
        (false, _) => Some(log::LevelFilter::Debug),
    };
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    log::debug!("Using {threads} worker threads");
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
