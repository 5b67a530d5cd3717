//! paritylight - terminal editor that highlights even and odd numbers

use std::env;
use std::path::PathBuf;
use std::process;

use tracing::info;

use paritylight::config::Config;
use paritylight::editor::EditorState;
use paritylight::error::Result;
use paritylight::logging;
use paritylight::terminal::Terminal;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut files = Vec::new();
    for arg in &args {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--version" | "-V" => {
                print_version();
                return Ok(());
            }
            opt if opt.starts_with('-') => {
                eprintln!("Unknown option: {}", opt);
                print_usage();
                process::exit(2);
            }
            _ => files.push(PathBuf::from(arg)),
        }
    }

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: {}; using defaults", e);
        Config::default()
    });
    logging::init(&config)?;
    info!(version = env!("CARGO_PKG_VERSION"), files = files.len(), "starting");

    // Initialize terminal
    let mut terminal = Terminal::new()?;
    let mut editor = EditorState::new(&config, terminal.rows());

    for path in &files {
        editor.open_file(path)?;
    }
    editor.activate_extensions()?;

    let result = editor.run(&mut terminal);
    editor.shutdown();
    info!("exiting");
    result
}

fn print_usage() {
    println!("paritylight {} - highlight even and odd numbers", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: paritylight [OPTIONS] [FILE...]");
    println!();
    println!("Options:");
    println!("  -h, --help     Show this help message");
    println!("  -V, --version  Show version information");
    println!();
    println!("Key bindings:");
    println!("  F5, C-c h      Toggle even/odd highlighting");
    println!("  M-x            Run a command by name");
    println!("  C-f, Right     Move forward one character");
    println!("  C-b, Left      Move backward one character");
    println!("  C-n, Down      Move to next line");
    println!("  C-p, Up        Move to previous line");
    println!("  C-a, Home      Move to beginning of line");
    println!("  C-e, End       Move to end of line");
    println!("  C-v, PageDown  Scroll down one page");
    println!("  M-v, PageUp    Scroll up one page");
    println!("  C-d, Delete    Delete character");
    println!("  C-k            Kill to end of line");
    println!("  C-x C-f        Find file");
    println!("  C-x C-s        Save buffer");
    println!("  C-x b          Switch to buffer");
    println!("  C-x n, C-x p   Next / previous buffer");
    println!("  C-x #          Toggle line numbers");
    println!("  C-l            Redraw screen");
    println!("  C-g            Abort current operation");
    println!("  C-x C-c        Quit");
    println!();
    println!("Config: ~/.paritylight.toml (line-numbers, log-file, log-level)");
    println!("Logging: set {} to a file path", logging::LOG_FILE_ENV);
}

fn print_version() {
    println!("paritylight {}", env!("CARGO_PKG_VERSION"));
}
