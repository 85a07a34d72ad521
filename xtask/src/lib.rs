use std::env;
use std::process::Command;

/// Cargo options derived from the host machine and `WAVEDFT_FEATURES`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub features: Vec<String>,
    pub no_default_features: bool,
}

impl BuildConfig {
    /// Join features into a single string suitable for passing to cargo.
    pub fn features_arg(&self) -> Option<String> {
        if self.features.is_empty() {
            None
        } else {
            Some(self.features.join(" "))
        }
    }

    fn apply(&self, cmd: &mut Command) {
        if self.no_default_features {
            cmd.arg("--no-default-features");
        }
        if let Some(f) = self.features_arg() {
            cmd.arg("--features").arg(f);
        }
    }
}

/// Detect build configuration from the current machine.
pub fn detect_config() -> BuildConfig {
    let extra = env::var("WAVEDFT_FEATURES").unwrap_or_default();
    compute_config(detect_nproc(), &extra)
}

fn detect_nproc() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Compute a [`BuildConfig`] from supplied inputs. This is separated for testing.
///
/// Single-core hosts build without the default `parallel` feature.
pub fn compute_config(nproc: usize, extra: &str) -> BuildConfig {
    let mut features = vec!["wav".to_string()];
    let no_default_features = nproc <= 1;
    if no_default_features {
        features.push("std".into());
    }
    for feat in extra.split_whitespace() {
        if !features.iter().any(|f| f == feat) {
            features.push(feat.to_string());
        }
    }
    BuildConfig {
        features,
        no_default_features,
    }
}

fn cargo(subcommand: &str) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.arg(subcommand);
    cmd
}

pub fn build_command(cfg: &BuildConfig) -> Command {
    let mut cmd = cargo("build");
    cfg.apply(&mut cmd);
    cmd
}

pub fn test_command(cfg: &BuildConfig) -> Command {
    let mut cmd = cargo("test");
    cfg.apply(&mut cmd);
    cmd
}

pub fn clippy_command() -> Command {
    let mut cmd = cargo("clippy");
    cmd.args(["--all-targets", "--all-features"]);
    cmd
}

pub fn fmt_command() -> Command {
    let mut cmd = cargo("fmt");
    cmd.arg("--all");
    cmd
}

pub fn bench_command() -> Command {
    let mut cmd = cargo("bench");
    cmd.args(["-p", "wavedft-bench"]);
    cmd
}

/// Round-trip `input` through the chosen strategy with the sanity-check driver.
pub fn sanity_command(input: &str, output_dir: &str, strategy: &str) -> Command {
    let mut cmd = cargo("run");
    cmd.args([
        "-r",
        "-p",
        "sanity-check",
        "--",
        "roundtrip",
        input,
        "--output-dir",
        output_dir,
        "--strategy",
        strategy,
    ]);
    cmd
}
