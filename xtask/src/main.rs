use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for tilestep")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy and the test suite
    Check,
    /// Run all tests
    Test,
    /// Run the movement resolver benchmark in release mode
    Bench,
    /// Probe the demo wall through the CLI: a box pushed 50 units into it
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            cargo(&["fmt", "--all", "--", "--check"], "fmt check")?;
            cargo(
                &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
                "clippy",
            )?;
            cargo(&["test", "--workspace"], "test")?;
        }
        Commands::Test => cargo(&["test", "--workspace"], "test")?,
        Commands::Bench => cargo(
            &["bench", "-p", "tilestep-kernel", "--bench", "bench_resolve"],
            "bench",
        )?,
        Commands::Demo => cargo(
            &["run", "-p", "tilestep-cli", "--", "probe", "--dx", "50"],
            "demo",
        )?,
    }

    Ok(())
}

fn cargo(args: &[&str], what: &str) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {what} failed");
    }
    Ok(())
}
