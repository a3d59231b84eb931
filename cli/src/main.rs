use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use headlights_core::{MenuConfig, RecordKind};
use headlights_menu::output::{OutputFormat, ReportFormat, format_menus, format_report};
use headlights_menu::render::{render_debug_menu, sort_menus};
use headlights_menu::report::DebugLog;
use headlights_menu::{IntrospectionInput, build_menus};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "headlights")]
#[command(about = "Build editor bundle menus from captured introspection listings")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render menu commands from captured listings.
    Render(RenderArgs),
    /// Print the aggregated bundle table and the skipped lines.
    Inspect(InspectArgs),
    /// Print the default configuration as YAML.
    DefaultConfig,
}

#[derive(Debug, Args)]
struct InputArgs {
    /// Script listing (`:scriptnames` output).
    #[arg(long)]
    scriptnames: Option<PathBuf>,
    /// Command listing (`:verbose command` output).
    #[arg(long)]
    commands: Option<PathBuf>,
    /// Mapping listing (`:verbose map` output).
    #[arg(long)]
    mappings: Option<PathBuf>,
    /// Abbreviation listing (`:verbose abbreviate` output).
    #[arg(long)]
    abbreviations: Option<PathBuf>,
    /// Function listing (`:verbose function` output).
    #[arg(long)]
    functions: Option<PathBuf>,
    /// Highlight listing (`:verbose highlight` output).
    #[arg(long)]
    highlights: Option<PathBuf>,
    /// Directory holding `scriptnames.txt`, `commands.txt`, ... Explicit
    /// file options take precedence.
    #[arg(long)]
    input_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ConfigArgs {
    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Top-level menu label.
    #[arg(long)]
    root: Option<String>,
    /// Render the Files section of every bundle.
    #[arg(long, conflicts_with = "hide_files")]
    show_files: bool,
    /// Omit the Files section of every bundle.
    #[arg(long)]
    hide_files: bool,
    /// Show each script's load order in its Help section.
    #[arg(long)]
    show_load_order: bool,
    /// Group scripts of one plugin under a single menu.
    #[arg(long)]
    smart: bool,
    /// Create bundles for scripts missing from the script listing.
    #[arg(long)]
    lazy_bundles: bool,
    /// Maximum label length for file paths and abbreviations.
    #[arg(long)]
    truncate: Option<usize>,
}

#[derive(Debug, Args)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,
    #[command(flatten)]
    config: ConfigArgs,
    /// Write a debug log and add the debug menu.
    #[arg(long)]
    debug: bool,
    /// Seconds the host spent collecting the listings (recorded in the debug log).
    #[arg(long)]
    host_time: Option<f64>,
    /// Output format.
    #[arg(long, default_value = "lines")]
    format: OutputFormat,
    /// Write the output to a file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct InspectArgs {
    #[command(flatten)]
    input: InputArgs,
    #[command(flatten)]
    config: ConfigArgs,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: ReportFormat,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Render(args) => run_render(args),
        Command::Inspect(args) => run_inspect(args),
        Command::DefaultConfig => run_default_config(),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("HEADLIGHTS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_render(args: RenderArgs) -> Result<(), String> {
    let input = load_input(&args.input)?;
    let mut config = load_config(&args.config)?;
    if args.debug {
        config.debug_mode = true;
    }
    let host_elapsed = args
        .host_time
        .map(|secs| {
            Duration::try_from_secs_f64(secs)
                .map_err(|err| format!("--host-time must be a non-negative number: {err}"))
        })
        .transpose()?;

    let started = Instant::now();
    let (mut menus, errors, fatal) = match build_menus(&input, &config) {
        Ok(run) => (run.menus, run.errors, None),
        Err(err) => (Vec::new(), err.errors, Some(err.cause)),
    };
    let elapsed = started.elapsed();

    if !errors.is_empty() {
        warn!(count = errors.len(), "listing lines skipped");
    }

    if config.debug_mode {
        let mut lines: Vec<String> = fatal.iter().map(ToString::to_string).collect();
        lines.extend(errors.iter().map(ToString::to_string));
        let mut log = DebugLog::new(&input, &menus, lines, elapsed);
        if let Some(host) = host_elapsed {
            log = log.with_host_elapsed(host);
        }

        let log_path = write_debug_log(&log)?;
        eprintln!("Headlights debug log: {}", log_path.display());
        menus.extend(render_debug_menu(
            &config.menu_root,
            &log_path.to_string_lossy(),
            config.platform,
        ));
        sort_menus(&mut menus);
    }

    if !menus.is_empty() || fatal.is_none() {
        let raw = format_menus(&menus, &errors, &config.menu_root, args.format)?;
        write_output(args.output.as_deref(), &raw)?;
    }

    match fatal {
        Some(cause) => Err(cause.to_string()),
        None => Ok(()),
    }
}

fn run_inspect(args: InspectArgs) -> Result<(), String> {
    let input = load_input(&args.input)?;
    let config = load_config(&args.config)?;

    let run = build_menus(&input, &config).map_err(|err| {
        format!("{err} ({} listing line(s) skipped before failing)", err.errors.len())
    })?;
    let raw = format_report(&run.report(), args.format)?;
    println!("{raw}");
    Ok(())
}

fn run_default_config() -> Result<(), String> {
    let raw = serde_yaml::to_string(&MenuConfig::default())
        .map_err(|err| format!("YAML serialization failed: {err}"))?;
    print!("{raw}");
    Ok(())
}

fn read_listing(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|err| format!("Failed to read '{}': {err}", path.display()))
}

/// Collects the listings named on the command line, falling back to
/// `<kind>.txt` files in `--input-dir`.
fn load_input(args: &InputArgs) -> Result<IntrospectionInput, String> {
    let from_dir = |kind: RecordKind| {
        args.input_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.txt", kind.label())))
            .filter(|path| path.is_file())
    };

    let scriptnames = args
        .scriptnames
        .clone()
        .or_else(|| from_dir(RecordKind::Scripts))
        .ok_or_else(|| {
            "Specify the script listing with --scriptnames or --input-dir".to_string()
        })?;
    let mut input = IntrospectionInput::new(read_listing(&scriptnames)?);

    let explicit = [
        (RecordKind::Commands, &args.commands),
        (RecordKind::Mappings, &args.mappings),
        (RecordKind::Abbreviations, &args.abbreviations),
        (RecordKind::Functions, &args.functions),
        (RecordKind::Highlights, &args.highlights),
    ];
    for (kind, path) in explicit {
        if let Some(path) = path.clone().or_else(|| from_dir(kind)) {
            input = input.with_block(kind, read_listing(&path)?);
        }
    }
    Ok(input)
}

fn load_config(args: &ConfigArgs) -> Result<MenuConfig, String> {
    let mut config = match &args.config {
        Some(path) => MenuConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => MenuConfig::default(),
    };

    if let Some(root) = &args.root {
        config.menu_root = root.clone();
    }
    if args.show_files {
        config.show_files = true;
    }
    if args.hide_files {
        config.show_files = false;
    }
    if args.show_load_order {
        config.show_load_order = true;
    }
    if args.smart {
        config.smart_menus = true;
    }
    if args.lazy_bundles {
        config.lazy_bundles = true;
    }
    if let Some(limit) = args.truncate {
        config.truncation_limit = limit;
    }
    Ok(config)
}

/// Writes the log to a kept `headlights_*.log` temp file and returns its path.
fn write_debug_log(log: &DebugLog) -> Result<PathBuf, String> {
    let file = tempfile::Builder::new()
        .prefix("headlights_")
        .suffix(".log")
        .tempfile()
        .map_err(|err| format!("Failed to create debug log: {err}"))?;
    let (mut file, path) = file
        .keep()
        .map_err(|err| format!("Failed to keep debug log: {err}"))?;
    file.write_all(log.render().as_bytes())
        .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
    Ok(path)
}

fn write_output(path: Option<&Path>, raw: &str) -> Result<(), String> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|err| {
                        format!(
                            "Failed to create output directory '{}': {err}",
                            parent.display()
                        )
                    })?;
                }
            }
            fs::write(path, raw).map_err(|err| format!("Failed to write '{}': {err}", path.display()))
        }
        None => {
            print!("{raw}");
            Ok(())
        }
    }
}
