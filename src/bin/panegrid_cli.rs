//! CLI tool for panegrid - renders a JSON row set as a paginated table
//!
//! Usage:
//!   panegrid_cli <rows.json>                        # HTML of page 1 to stdout
//!   panegrid_cli <rows.json> --config table.json    # Table options (columns, rowKey, ...)
//!   panegrid_cli <rows.json> --page 3 --size 20     # Navigate before rendering
//!   panegrid_cli <rows.json> -o table.html -v       # Write to file, debug logging

#![allow(clippy::exit)]

use std::env;
use std::fs;
use std::io::{self, Write};

use futures::executor::LocalPool;
use log::info;
use panegrid::{ColumnSpec, DataTable, GridError, MemorySource, PaginationConfig, TableOptions};
use serde_json::Value;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

struct Args {
    input: String,
    config: Option<String>,
    page: Option<u32>,
    size: Option<u32>,
    output: Option<String>,
    verbosity: u8,
}

fn usage() -> ! {
    eprintln!(
        "Usage: panegrid_cli <rows.json> [--config table.json] [--page N] [--size N] [-o out.html] [-v]"
    );
    std::process::exit(1);
}

fn parse_number(flag: &str, value: Option<String>) -> u32 {
    match value.as_deref().map(str::parse::<u32>) {
        Some(Ok(n)) => n,
        _ => {
            eprintln!("{flag} expects a positive number");
            usage();
        }
    }
}

fn parse_args() -> Args {
    let mut args = env::args().skip(1);
    let mut parsed = Args {
        input: String::new(),
        config: None,
        page: None,
        size: None,
        output: None,
        verbosity: 0,
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => parsed.config = Some(args.next().unwrap_or_else(|| usage())),
            "--page" | "-p" => parsed.page = Some(parse_number("--page", args.next())),
            "--size" | "-s" => parsed.size = Some(parse_number("--size", args.next())),
            "-o" => parsed.output = Some(args.next().unwrap_or_else(|| usage())),
            "-v" => parsed.verbosity += 1,
            "-vv" => parsed.verbosity += 2,
            "-h" | "--help" => usage(),
            _ if parsed.input.is_empty() && !arg.starts_with('-') => parsed.input = arg,
            _ => {
                eprintln!("Unexpected argument: {arg}");
                usage();
            }
        }
    }
    if parsed.input.is_empty() {
        usage();
    }
    parsed
}

/// Options used when no `--config` is given: one column per key of the
/// first row, keyed by `id` when present.
fn infer_options(rows: &[Value]) -> TableOptions {
    let keys: Vec<String> = rows
        .first()
        .and_then(Value::as_object)
        .map(|obj| obj.keys().cloned().collect())
        .unwrap_or_default();
    let row_key = if keys.iter().any(|k| k == "id") {
        "id".to_string()
    } else {
        keys.first().cloned().unwrap_or_else(|| "id".to_string())
    };
    TableOptions {
        row_key,
        columns: keys
            .into_iter()
            .map(|key| ColumnSpec {
                title: key.clone(),
                data_index: Some(key),
                ..ColumnSpec::default()
            })
            .collect(),
        pagination: Some(PaginationConfig::default()),
        ..TableOptions::default()
    }
}

fn run(args: &Args) -> Result<String, GridError> {
    let rows: Vec<Value> = serde_json::from_str(&fs::read_to_string(&args.input)?)?;
    let options = match &args.config {
        Some(path) => TableOptions::from_json(&fs::read_to_string(path)?)?,
        None => infer_options(&rows),
    };
    let config = options.into_config::<Value>()?;
    info!(
        "{} rows, {} top-level columns",
        rows.len(),
        config.columns.len()
    );

    let mut pool = LocalPool::new();
    let table = DataTable::new(config, MemorySource::new(rows), pool.spawner())?;
    table.mount();
    pool.run_until_stalled();

    if let Some(size) = args.size {
        let page = table.page();
        table.set_page_size(page, size);
        pool.run_until_stalled();
    }
    if let Some(page) = args.page {
        table.set_page(page);
        pool.run_until_stalled();
    }

    info!(
        "rendered page {} of size {} ({} total)",
        table.page(),
        table.page_size(),
        table.total()
    );
    Ok(table.render_html())
}

fn main() {
    let args = parse_args();

    let level = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    if let Err(e) = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("Logger unavailable: {e}");
    }

    let html = match run(&args) {
        Ok(html) => html,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &html) {
                eprintln!("Error writing {path}: {e}");
                std::process::exit(1);
            }
            eprintln!("Written: {path}");
        }
        None => {
            let mut stdout = io::stdout();
            if let Err(e) = stdout.write_all(html.as_bytes()).and_then(|()| writeln!(stdout)) {
                eprintln!("Error writing output: {e}");
                std::process::exit(1);
            }
        }
    }
}
