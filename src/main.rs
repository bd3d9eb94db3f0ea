//! Constraint Kit CLI
//!
//! Usage:
//!   constraint-kit [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --constraints  Also print every authored constraint
//!   -v, --verbose      Log layout activity to stderr
//!   -h, --help         Print help

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use constraint_kit::{Scene, SceneError};

#[derive(Parser)]
#[command(name = "constraint-kit")]
#[command(about = "Solve a TOML scene of views and layout relations into frames")]
struct Cli {
    /// Scene file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Also print every authored constraint
    #[arg(short, long)]
    constraints: bool,

    /// Log layout activity to stderr (RUST_LOG overrides the level)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("constraint_kit=debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }

    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let scene = match load_scene(&cli) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let solved = match scene.solve() {
        Ok(solved) => solved,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    for (name, frame) in &solved.frames {
        println!(
            "{} x={} y={} w={} h={}",
            name, frame.x, frame.y, frame.width, frame.height
        );
    }

    if cli.constraints {
        println!();
        for constraint in &solved.constraints {
            println!("{}", constraint);
        }
    }

    for conflict in &solved.conflicts {
        eprintln!("warning: {}", conflict);
    }
}

fn load_scene(cli: &Cli) -> Result<Scene, SceneError> {
    match &cli.input {
        Some(path) => Scene::from_file(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Scene::from_str(&buffer)
        }
    }
}

fn print_intro() {
    println!(
        r#"Constraint Kit - semantic layout constraints, solved

USAGE:
    constraint-kit [OPTIONS] [FILE]
    cat scene.toml | constraint-kit

OPTIONS:
    -c, --constraints  Print authored constraints after the frames
    -v, --verbose      Log layout activity to stderr
    -h, --help         Print help

QUICK START:
    [[view]]
    name = "root"
    frame = [0, 0, 320, 480]

    [[view]]
    name = "card"
    parent = "root"

    [[constraint]]
    op = "pin-to-superview-edges"
    view = "card"
    insets = {{ top = 16, left = 16, bottom = 16, right = 16 }}

Each view is printed as `name x=.. y=.. w=.. h=..`."#
    );
}
