//! Command-line interface for seqflow
//! Streams the lines of a file through a fixed chain of pipeline stages and prints the result.
//!
//! Usage:
//!   seqflow `<path>` [--grep `<regex>`] [--exclude `<regex>`] [--trim] [--upper] [--parallel]
//!           [--distinct] [--sort] [--reverse] [--skip `<n>`] [--take `<n>`] [--drop-right `<n>`]
//!           [--chunk `<n>` | --count] [--format text|json] [--config `<file>`] [--log-level `<level>`]

mod stages;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use regex::Regex;
use seqflow::{ParallelExecutor, Pipeline};
use seqflow_config::{Loader, OutputFormat, SeqflowConfig, PROJECT_CONFIG_FILE};
use stages::{checked_lines, render, run, Stages};
use tracing::Level;

fn main() {
    let matches = Command::new("seqflow")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run the lines of a file through a lazy sequence pipeline")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the input file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("grep")
                .long("grep")
                .short('g')
                .help("Keep only lines matching this regex"),
        )
        .arg(
            Arg::new("exclude")
                .long("exclude")
                .short('x')
                .help("Drop lines matching this regex"),
        )
        .arg(flag("trim", "Strip surrounding whitespace from every line"))
        .arg(flag("upper", "Uppercase every line"))
        .arg(flag(
            "parallel",
            "Run per-line transforms on the worker pool from the [executor] config",
        ))
        .arg(flag("distinct", "Drop repeated lines, keeping the first"))
        .arg(flag("sort", "Sort lines"))
        .arg(flag("reverse", "Sort in descending order (with --sort)"))
        .arg(count_arg("skip", "Skip the first N lines"))
        .arg(count_arg("take", "Keep at most N lines"))
        .arg(count_arg("drop-right", "Drop the last N lines"))
        .arg(count_arg("chunk", "Group lines into chunks of N").conflicts_with("count"))
        .arg(flag("count", "Print the number of resulting lines"))
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format: text or json (default from config)")
                .value_parser(["text", "json"]),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults and ./seqflow.toml"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .help("Log verbosity written to stderr")
                .value_parser(["error", "warn", "info", "debug", "trace"])
                .default_value("warn"),
        )
        .get_matches();

    init_logging(&matches);

    let config = load_config(&matches);
    let stages = build_stages(&matches);
    let path = matches
        .get_one::<String>("path")
        .expect("path is a required argument");

    handle_run_command(path, &stages, &config, matches.get_flag("parallel"));
}

fn flag(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .action(ArgAction::SetTrue)
}

fn count_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("N")
        .help(help)
        .value_parser(value_parser!(usize))
}

fn init_logging(matches: &ArgMatches) {
    let level = match matches.get_one::<String>("log-level").map(String::as_str) {
        Some("error") => Level::ERROR,
        Some("info") => Level::INFO,
        Some("debug") => Level::DEBUG,
        Some("trace") => Level::TRACE,
        _ => Level::WARN,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(matches: &ArgMatches) -> SeqflowConfig {
    let mut loader = Loader::new().with_optional_file(PROJECT_CONFIG_FILE);
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(format) = matches.get_one::<String>("format") {
        loader = loader
            .set_override("output.format", format.as_str())
            .unwrap_or_else(|e| {
                eprintln!("Invalid format override: {}", e);
                std::process::exit(1);
            });
    }
    loader.build().unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    })
}

fn build_stages(matches: &ArgMatches) -> Stages {
    let pattern = |name: &str| {
        matches.get_one::<String>(name).map(|source| {
            Regex::new(source).unwrap_or_else(|e| {
                eprintln!("Invalid --{} pattern: {}", name, e);
                std::process::exit(1);
            })
        })
    };
    let count = |name: &str| matches.get_one::<usize>(name).copied();

    Stages {
        trim: matches.get_flag("trim"),
        grep: pattern("grep"),
        exclude: pattern("exclude"),
        upper: matches.get_flag("upper"),
        distinct: matches.get_flag("distinct"),
        sort: matches.get_flag("sort"),
        reverse: matches.get_flag("reverse"),
        skip: count("skip").unwrap_or(0),
        take: count("take"),
        drop_right: count("drop-right").unwrap_or(0),
        chunk: count("chunk"),
        count: matches.get_flag("count"),
    }
}

/// Handle the run command
fn handle_run_command(path: &str, stages: &Stages, config: &SeqflowConfig, parallel: bool) {
    let executor = parallel.then(|| {
        ParallelExecutor::from_config(&config.executor).unwrap_or_else(|e| {
            eprintln!("Executor error: {}", e);
            std::process::exit(1);
        })
    });

    let source = Pipeline::file(path).unwrap_or_else(|e| {
        eprintln!("Input error: {}", e);
        std::process::exit(1);
    });
    let (lines, failure) = checked_lines(source);

    let output = run(lines, stages, executor.as_ref()).unwrap_or_else(|e| {
        eprintln!("Pipeline error: {}", e);
        std::process::exit(1);
    });
    if let Some(e) = failure.borrow_mut().take() {
        eprintln!("Read error in {}: {}", path, e);
        std::process::exit(1);
    }

    let format = config.output.format;
    let formatted = render(&output, format, &config.output.chunk_separator).unwrap_or_else(|e| {
        eprintln!("Error formatting output: {}", e);
        std::process::exit(1);
    });
    if format == OutputFormat::Json {
        tracing::debug!(bytes = formatted.len(), "rendered json output");
    }

    print!("{}", formatted);
}
