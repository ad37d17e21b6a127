use std::path::PathBuf;
use std::process::exit;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing::level_filters::LevelFilter;
use transcode_lib::{TranscodeOptions, transcode_vk_file};

/// Converts a snarkjs verifying key into a groth16-solana `VERIFYINGKEY` constant.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Verifying key JSON exported by the trusted setup
    input: PathBuf,

    /// Directory that receives verifying_key.rs
    #[arg(default_value = ".")]
    output_dir: PathBuf,

    /// Reproduce previously generated constants byte for byte (truncates oversized values)
    #[arg(long)]
    legacy: bool,

    /// off, error, warn, info, debug or trace
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,
}

fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let options = if cli.legacy {
        TranscodeOptions::legacy()
    } else {
        TranscodeOptions::default()
    }
    .with_log_level(cli.log_level);

    let output = transcode_vk_file(&cli.input, &cli.output_dir, options)
        .with_context(|| format!("could not transcode {}", cli.input.display()))?;
    info!(path = %output.display(), "done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_dir_defaults_to_cwd() {
        let cli = Cli::try_parse_from(["vk_to_rs", "verification_key.json"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("verification_key.json"));
        assert_eq!(cli.output_dir, PathBuf::from("."));
        assert!(!cli.legacy);
        assert_eq!(cli.log_level, LevelFilter::WARN);
    }

    #[test]
    fn input_is_required() {
        assert!(Cli::try_parse_from(["vk_to_rs"]).is_err());
    }

    #[test]
    fn unreadable_input_fails_with_its_path() {
        let input = std::env::temp_dir()
            .join(format!("vk_to_rs_{}_missing.json", std::process::id()));
        let cli = Cli {
            input: input.clone(),
            output_dir: std::env::temp_dir(),
            legacy: false,
            log_level: LevelFilter::OFF,
        };
        let message = format!("{:#}", run(cli).unwrap_err());
        assert!(message.contains(&input.display().to_string()));
    }

    #[test]
    fn flags_parse() {
        let args = ["vk_to_rs", "vk.json", "out", "--legacy", "--log-level", "debug"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.output_dir, PathBuf::from("out"));
        assert!(cli.legacy);
        assert_eq!(cli.log_level, LevelFilter::DEBUG);
    }
}
