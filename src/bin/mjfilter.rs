//! mjfilter CLI - Tag math for a MathJax-style renderer

#[cfg(feature = "cli")]
use clap::{ArgAction, Parser, Subcommand};
#[cfg(feature = "cli")]
use mathjaxloader::{
    diagnostics::{check_delimiters, format_diagnostics},
    equation_nodes, filter_text, map_language_code,
    renderer::{RecordingRenderer, RendererCall, StaticLocaleProvider},
    scan, LoaderConfig, LoaderResult, MathJaxLoader,
};
#[cfg(feature = "cli")]
use serde_json::json;
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "mjfilter")]
#[command(version)]
#[command(about = "mjfilter - Tag math regions for a MathJax-style renderer", long_about = None)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input file path (reads from stdin if not provided)
    input_file: Option<String>,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Input was already filtered upstream; pass it through unchanged
    #[arg(long)]
    already_filtered: bool,

    /// Rewrite legacy TeX filter delimiters before scanning
    #[arg(long)]
    tex_compat: bool,

    /// Additional delimiter that marks text as math (repeatable)
    #[arg(long = "delimiter", value_name = "TEXT")]
    delimiters: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Filter text for the renderer (the default action)
    Filter {
        /// Input file path
        input: Option<String>,

        /// Output file path
        #[arg(short, long)]
        output: Option<String>,

        /// Input was already filtered upstream; pass it through unchanged
        #[arg(long)]
        already_filtered: bool,
    },

    /// Wrap math regions in marker spans without the outer equation span
    Scan {
        /// Input file path
        input: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve application locale codes to MathJax locales
    Lang {
        /// Locale codes to resolve
        #[arg(required = true)]
        codes: Vec<String>,

        /// Fallback locale (defaults to the configured one)
        #[arg(short, long)]
        default: Option<String>,
    },

    /// Report unterminated or ignored math delimiters
    Check {
        /// Input file to check
        input: Option<String>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// List equation nodes in filtered HTML
    Nodes {
        /// Input file path
        input: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Dry-run typesetting of filtered HTML against a recording renderer
    Typeset {
        /// Input file path
        input: Option<String>,

        /// Application locale to configure the renderer with
        #[arg(short, long, default_value = "en")]
        locale: String,

        /// Readiness check on which the simulated renderer becomes ready
        #[arg(long, default_value_t = 1)]
        ready_after: u32,
    },

    /// Show version and feature info
    Info,
}

#[cfg(feature = "cli")]
fn main() -> LoaderResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match cli.config {
        Some(ref path) => LoaderConfig::from_file(path)?,
        None => LoaderConfig::default(),
    };
    config.tex_compatibility |= cli.tex_compat;
    config.additional_delimiters.extend(cli.delimiters.iter().cloned());
    config.validate()?;

    // Handle subcommands first
    if let Some(cmd) = cli.command {
        return handle_subcommand(cmd, &config);
    }

    run_filter(
        cli.input_file.as_deref(),
        cli.output.as_deref(),
        cli.already_filtered,
        &config,
    )
}

#[cfg(feature = "cli")]
fn run_filter(
    input: Option<&str>,
    output: Option<&str>,
    already_filtered: bool,
    config: &LoaderConfig,
) -> LoaderResult<()> {
    let input = read_input(input)?;

    let mut options = config.filter_options();
    options.already_filtered = already_filtered;
    let filtered = filter_text(&input, &options);

    tracing::info!(wrapped = filtered.wrapped, "filtered input");

    match output {
        Some(path) => {
            let mut file = fs::File::create(path)?;
            write!(file, "{}", filtered.text)?;
            if filtered.wrapped {
                eprintln!("✓ Output written to: {}", path);
            } else {
                eprintln!("✓ Output written to: {} (no math found)", path);
            }
        }
        None => {
            println!("{}", filtered.text);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn handle_subcommand(cmd: Commands, config: &LoaderConfig) -> LoaderResult<()> {
    match cmd {
        Commands::Filter {
            input,
            output,
            already_filtered,
        } => {
            run_filter(input.as_deref(), output.as_deref(), already_filtered, config)?;
        }

        Commands::Scan { input, json } => {
            let content = read_input(input.as_deref())?;
            let scanned = scan(&content);

            if json {
                let value = json!({
                    "changed": scanned.changed,
                    "regions": scanned.regions,
                    "text": scanned.text,
                });
                println!("{}", to_json(&value)?);
            } else {
                println!("{}", scanned.text);
                eprintln!("{} region(s) wrapped", scanned.regions);
            }
        }

        Commands::Lang { codes, default } => {
            let default = default.unwrap_or_else(|| config.default_locale.clone());
            for code in codes {
                println!("{} -> {}", code, map_language_code(&code, &default));
            }
        }

        Commands::Check { input, no_color } => {
            let content = read_input(input.as_deref())?;
            let result = check_delimiters(&content);
            println!("{}", format_diagnostics(&result, !no_color));

            if result.has_errors() {
                std::process::exit(1);
            }
        }

        Commands::Nodes { input, json } => {
            let content = read_input(input.as_deref())?;
            let nodes = equation_nodes(&content);

            if json {
                let value: Vec<_> = nodes
                    .iter()
                    .map(|node| {
                        json!({
                            "start": node.range.start,
                            "end": node.range.end,
                            "content": node.inner_html(),
                        })
                    })
                    .collect();
                println!("{}", to_json(&value)?);
            } else {
                for node in &nodes {
                    println!("{}..{}\t{}", node.range.start, node.range.end, node.inner_html());
                }
                eprintln!("{} equation node(s)", nodes.len());
            }
        }

        Commands::Typeset {
            input,
            locale,
            ready_after,
        } => {
            let content = read_input(input.as_deref())?;
            let loader = MathJaxLoader::new(
                RecordingRenderer::ready_after(ready_after),
                config.clone(),
            );
            loader.configure(&StaticLocaleProvider::new(&locale, &config.default_locale));

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            let report = runtime.block_on(loader.typeset(&content));

            for call in loader.renderer().calls() {
                match call {
                    RendererCall::Configure { locale, .. } => println!("configure\t{}", locale),
                    RendererCall::SetLocale(locale) => println!("set_locale\t{}", locale),
                    RendererCall::Typeset(html) => println!("typeset\t{}", html),
                }
            }
            eprintln!(
                "{:?} after {} attempt(s): {} typeset, {} failed",
                report.readiness,
                report.readiness.attempts(),
                report.typeset,
                report.failed
            );
        }

        Commands::Info => {
            println!("mjfilter - Tag math regions for a MathJax-style renderer");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Delimiters:");
            println!("  \\( ... \\)   inline math");
            println!("  \\[ ... \\]   display math");
            println!("  $$ ... $$   display math");
            println!();
            println!("Configuration:");
            println!("  default locale:  {}", config.default_locale);
            println!("  tex compat:      {}", config.tex_compatibility);
            println!(
                "  poll schedule:   {} x {:?}",
                config.poll.max_attempts, config.poll.interval
            );
            if !config.additional_delimiters.is_empty() {
                println!("  extra delimiters: {}", config.additional_delimiters.join(" "));
            }
            println!();
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn read_input(path: Option<&str>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

#[cfg(feature = "cli")]
fn to_json<T: serde::Serialize>(value: &T) -> io::Result<String> {
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install mathjaxloader --features cli");
    eprintln!("  mjfilter [OPTIONS] [INPUT_FILE]");
}
