// Rust Streaming Stats - Main executable
// Author: Gabriel Demetrios Lafis

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::process;

use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use log::{info, warn};

use rust_streaming_stats::{
    data::ColumnExtractor,
    monitor::{ResourceMonitor, SystemSampler},
    processing::{
        write_result, Emitter, ProcessingError, Reducer, Statistic, StatsProcessor, ValueFormat,
    },
    storage::persist_run_artifacts,
    utils::{init_logging, AppError, AppResult, Config},
};

fn build_cli() -> Command<'static> {
    Command::new("Rust Streaming Stats")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Gabriel Demetrios Lafis")
        .about("Mapper and reducer for single-column summary statistics")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file (.json, .yaml)")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Overrides the log level (off, error, warn, info, debug, trace)")
                .takes_value(true)
                .global(true),
        )
        .subcommand(
            Command::new("map")
                .about("Emit one keyed record per numeric input line")
                .arg(
                    Arg::new("key")
                        .short('k')
                        .long("key")
                        .value_name("KEY")
                        .help("Sets the record key")
                        .takes_value(true),
                )
                .arg(input_arg())
                .arg(
                    Arg::new("report-skipped")
                        .long("report-skipped")
                        .help("Prints the number of skipped lines to stderr"),
                ),
        )
        .subcommand(
            Command::new("reduce")
                .about("Compute one statistic over the records on the input")
                .arg(
                    Arg::new("function")
                        .value_name("FUNCTION")
                        .help("median, stddev, minmax, percentile or skewness")
                        .required(true)
                        .index(1),
                )
                .arg(input_arg())
                .arg(
                    Arg::new("precision")
                        .short('p')
                        .long("precision")
                        .value_name("DIGITS")
                        .help("Prints the result with a fixed number of decimals")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("monitor")
                        .short('m')
                        .long("monitor")
                        .help("Samples CPU and memory during the run"),
                )
                .arg(
                    Arg::new("logs-dir")
                        .long("logs-dir")
                        .value_name("DIR")
                        .help("Sets the directory for metrics artifacts")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("no-plot")
                        .long("no-plot")
                        .help("Skips the performance plot"),
                )
                .arg(
                    Arg::new("no-metrics")
                        .long("no-metrics")
                        .help("Skips the metrics document"),
                ),
        )
        .subcommand(
            Command::new("extract")
                .about("Extract a numeric CSV column as one value per line")
                .arg(input_arg().required(true))
                .arg(
                    Arg::new("column")
                        .long("column")
                        .value_name("NAME")
                        .help("Column to extract")
                        .takes_value(true)
                        .required(true),
                )
                .arg(
                    Arg::new("times")
                        .long("times")
                        .value_name("NAME")
                        .help("Multiplies each value by this column")
                        .takes_value(true),
                )
                .arg(
                    Arg::new("positive-only")
                        .long("positive-only")
                        .help("Keeps only values greater than zero"),
                )
                .arg(
                    Arg::new("exclude-prefix")
                        .long("exclude-prefix")
                        .value_name("COLUMN=PREFIX")
                        .help("Drops rows whose COLUMN starts with PREFIX")
                        .takes_value(true)
                        .multiple_occurrences(true),
                )
                .arg(
                    Arg::new("require")
                        .long("require")
                        .value_name("NAME")
                        .help("Drops rows where this column is empty")
                        .takes_value(true)
                        .multiple_occurrences(true),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Writes to a file instead of stdout")
                        .takes_value(true),
                ),
        )
}

fn input_arg() -> Arg<'static> {
    Arg::new("input")
        .short('i')
        .long("input")
        .value_name("FILE")
        .help("Reads from a file instead of stdin")
        .takes_value(true)
}

/// Value of a global option, whether given before or after the subcommand
fn global_value<'a>(matches: &'a ArgMatches, name: &str) -> Option<&'a str> {
    matches.value_of(name).or_else(|| {
        matches
            .subcommand()
            .and_then(|(_, sub)| sub.value_of(name))
    })
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<Config> {
    let mut config = match global_value(matches, "config") {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config file {}", path))?,
        None => Config::default(),
    };

    if let Some(level) = global_value(matches, "log-level") {
        config.logging.level = level.to_string();
    }

    Ok(config)
}

fn open_input(path: Option<&str>) -> AppResult<Box<dyn BufRead>> {
    match path {
        Some(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn run_map(config: &Config, matches: &ArgMatches) -> AppResult<()> {
    let key = matches.value_of("key").unwrap_or(&config.emitter.key);
    if key.is_empty() || key.contains(['\t', '\n']) {
        return Err(AppError::Config(format!("invalid record key {:?}", key)));
    }

    let input = open_input(matches.value_of("input"))?;
    let stdout = io::stdout();
    let output = BufWriter::new(stdout.lock());

    let summary = Emitter::new(key).run(input, output)?;

    if matches.is_present("report-skipped") {
        eprintln!("skipped={}", summary.skipped);
    }

    Ok(())
}

fn run_reduce(config: &Config, matches: &ArgMatches) -> AppResult<()> {
    // Selector problems must surface before any input is read
    let selector = matches.value_of("function").unwrap_or_default();
    let statistic = selector.parse::<Statistic>()?;

    let precision = match matches.value_of("precision") {
        Some(digits) => Some(digits.parse::<usize>().map_err(|_| {
            AppError::Config(format!("invalid precision '{}'", digits))
        })?),
        None => config.reducer.precision,
    };

    let processor = StatsProcessor::new(statistic)
        .with_percentile(config.reducer.percentile)?
        .with_format(ValueFormat::from_precision(precision));
    let reducer = Reducer::new(processor);

    let input = open_input(matches.value_of("input"))?;

    let monitoring = matches.is_present("monitor") || config.monitor.enabled;
    let mut monitor = if monitoring {
        match SystemSampler::new() {
            Ok(sampler) => Some(ResourceMonitor::new(sampler)),
            Err(err) => {
                warn!("Resource monitoring disabled: {}", err);
                None
            }
        }
    } else {
        None
    };

    if let Some(monitor) = monitor.as_mut() {
        monitor.start();
    }

    let outcome = reduce_to_stdout(&reducer, input, monitor.as_mut());

    if let Some(monitor) = monitor.as_mut() {
        let records = *outcome.as_ref().unwrap_or(&0);
        finalize_monitor(config, matches, monitor, reducer.statistic().name(), records);
    }

    outcome.map(|_| ()).map_err(AppError::from)
}

fn reduce_to_stdout(
    reducer: &Reducer,
    input: Box<dyn BufRead>,
    monitor: Option<&mut ResourceMonitor<SystemSampler>>,
) -> Result<usize, ProcessingError> {
    let values = reducer.ingest(input)?;

    if let Some(monitor) = monitor {
        monitor.sample();
    }

    let result = reducer.finish(&values)?;
    let stdout = io::stdout();
    write_result(&result, stdout.lock())?;

    Ok(values.len())
}

fn finalize_monitor(
    config: &Config,
    matches: &ArgMatches,
    monitor: &mut ResourceMonitor<SystemSampler>,
    function: &str,
    records: usize,
) {
    let summary = monitor.stop(records);
    info!(
        "Processed {} records in {:.3}s",
        summary.records_processed, summary.runtime_seconds
    );

    if config.monitor.report {
        let stderr = io::stderr();
        if let Err(err) = summary.write_report(stderr.lock()) {
            warn!("Could not write metrics report: {}", err);
        }
    }

    let logs_dir = matches.value_of("logs-dir").unwrap_or(&config.monitor.logs_dir);
    persist_run_artifacts(
        Path::new(logs_dir),
        function,
        monitor.metrics(),
        config.monitor.save_metrics && !matches.is_present("no-metrics"),
        config.monitor.save_plot && !matches.is_present("no-plot"),
    );
}

fn run_extract(matches: &ArgMatches) -> AppResult<()> {
    let column = matches.value_of("column").unwrap_or_default();
    let mut extractor = ColumnExtractor::new(column)
        .positive_only(matches.is_present("positive-only"));
    if let Some(times) = matches.value_of("times") {
        extractor = extractor.times(times);
    }
    for filter in matches.values_of("exclude-prefix").into_iter().flatten() {
        let (name, prefix) = filter.split_once('=').ok_or_else(|| {
            AppError::Config(format!("expected COLUMN=PREFIX, got '{}'", filter))
        })?;
        extractor = extractor.exclude_prefix(name, prefix);
    }
    for name in matches.values_of("require").into_iter().flatten() {
        extractor = extractor.require(name);
    }

    let input = matches.value_of("input").unwrap_or_default();
    let output: Box<dyn Write> = match matches.value_of("output") {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    let summary = extractor.extract_file(input, output)?;
    eprintln!(
        "rows={} written={} skipped={}",
        summary.rows, summary.written, summary.skipped
    );

    Ok(())
}

fn main() {
    let matches = build_cli().get_matches();

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(2);
        }
    };

    let stage = matches.subcommand_name().unwrap_or("stats");
    if let Err(err) = init_logging(stage, config.log_level_filter()) {
        eprintln!("Error initializing logger: {}", err);
    }

    let result = match matches.subcommand() {
        Some(("map", sub)) => run_map(&config, sub),
        Some(("reduce", sub)) => run_reduce(&config, sub),
        Some(("extract", sub)) => run_extract(sub),
        _ => Err(AppError::Config("no subcommand specified".to_string())),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        process::exit(err.exit_code());
    }
}
