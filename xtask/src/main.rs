use clap::{Parser, Subcommand};
#[cfg(not(test))]
use xtask::*;

#[derive(Parser)]
#[command(author, version, about = "Development tasks for wavedft")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Build,
    Test,
    Clippy,
    Fmt,
    /// Run fmt, then clippy if formatting succeeded
    Analyze,
    Bench,
    Sanity {
        /// Path to input WAV file
        input: String,
        /// Directory for the reconstructed WAV and SVG chart
        #[arg(long, default_value = ".")]
        output_dir: String,
        /// direct, fast or parallel
        #[arg(long, default_value = "parallel")]
        strategy: String,
    },
}

#[cfg(not(test))]
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = detect_config();

    let status = match cli.command {
        Commands::Build => build_command(&cfg).status(),
        Commands::Test => test_command(&cfg).status(),
        Commands::Clippy => clippy_command().status(),
        Commands::Fmt => fmt_command().status(),
        Commands::Analyze => {
            let fmt = fmt_command().status()?;
            if !fmt.success() {
                Ok(fmt)
            } else {
                clippy_command().status()
            }
        }
        Commands::Bench => bench_command().status(),
        Commands::Sanity {
            input,
            output_dir,
            strategy,
        } => sanity_command(&input, &output_dir, &strategy).status(),
    }?;

    std::process::exit(status.code().unwrap_or(1));
}
