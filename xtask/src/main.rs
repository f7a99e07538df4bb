use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Lint, test and smoke-run the voxcast ray-marcher"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// fmt, clippy, both renderer test modes, doc and a CLI smoke render
    Check,
    /// cargo fmt --check
    Fmt,
    /// Clippy with warnings denied
    Clippy,
    /// Workspace tests with the default (rayon) renderer
    Test,
    /// Renderer tests with auto-threads off, so the serial path is exercised
    TestSerial,
    /// Rustdoc for the workspace
    Doc,
    /// Release-mode frame benchmark
    Bench,
    /// Render the default scene as ASCII through voxcast-cli
    Smoke,
}

/// One cargo invocation and the name it is reported under.
#[derive(Debug, PartialEq)]
struct Step {
    label: &'static str,
    args: &'static [&'static str],
}

const FMT: Step = Step {
    label: "cargo fmt --check",
    args: &["fmt", "--all", "--", "--check"],
};
const CLIPPY: Step = Step {
    label: "clippy",
    args: &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
};
const TEST: Step = Step {
    label: "tests",
    args: &["test", "--workspace"],
};
const TEST_SERIAL: Step = Step {
    label: "serial renderer tests",
    args: &["test", "-p", "voxcast-render", "--no-default-features"],
};
const DOC: Step = Step {
    label: "rustdoc",
    args: &["doc", "--workspace", "--no-deps"],
};
const BENCH: Step = Step {
    label: "frame benchmark",
    args: &["bench", "-p", "voxcast-render", "--bench", "bench_frame"],
};
const SMOKE: Step = Step {
    label: "ASCII smoke render",
    args: &[
        "run", "-p", "voxcast-cli", "--release", "--", "render", "--ascii", "--columns", "60",
    ],
};

fn plan(command: Commands) -> Vec<Step> {
    match command {
        Commands::Check => vec![FMT, CLIPPY, TEST, TEST_SERIAL, DOC, SMOKE],
        Commands::Fmt => vec![FMT],
        Commands::Clippy => vec![CLIPPY],
        Commands::Test => vec![TEST],
        Commands::TestSerial => vec![TEST_SERIAL],
        Commands::Doc => vec![DOC],
        Commands::Bench => vec![BENCH],
        Commands::Smoke => vec![SMOKE],
    }
}

fn run(step: &Step) -> Result<()> {
    println!("==> {}", step.label);
    let status = Command::new("cargo").args(step.args).status()?;
    if !status.success() {
        anyhow::bail!("{} failed ({status})", step.label);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    for step in plan(cli.command) {
        run(&step)?;
    }
    Ok(())
}
