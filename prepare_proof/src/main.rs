use std::fs;
use std::path::{Path, PathBuf};
use std::process::exit;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing::level_filters::LevelFilter;
use transcode_lib::{ProofArtifact, ProofLayout, ProofTranscoder, TranscodeOptions, TranscodedProof};

const RAW_PROOF_FILE: &str = "raw_proof.json";
const PREPARED_PROOF_FILE: &str = "prepared_proof.json";

/// Turns a snarkjs proof into the proof_a / proof_b / proof_c instruction arguments.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Proof JSON written by the prover
    input: PathBuf,

    /// Directory that receives raw_proof.json and prepared_proof.json
    #[arg(default_value = ".")]
    output_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = Layout::Direct)]
    layout: Layout,

    /// Truncate oversized values instead of failing
    #[arg(long)]
    legacy: bool,

    /// off, error, warn, info, debug or trace
    #[arg(long, default_value = "warn")]
    log_level: LevelFilter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Layout {
    /// Little-endian coordinates as instruction arguments
    Direct,
    /// Negated A, big-endian coordinates, for the alt_bn128 syscall
    Syscall,
}

impl From<Layout> for ProofLayout {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Direct => ProofLayout::Direct,
            Layout::Syscall => ProofLayout::Syscall,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct PreparedProof {
    proof_a: Vec<u8>,
    proof_b: Vec<u8>,
    proof_c: Vec<u8>,
    raw: Vec<u8>,
}

impl From<&TranscodedProof> for PreparedProof {
    fn from(proof: &TranscodedProof) -> Self {
        Self {
            proof_a: proof.proof_a.to_vec(),
            proof_b: proof.proof_b.to_vec(),
            proof_c: proof.proof_c.to_vec(),
            raw: proof.raw().to_vec(),
        }
    }
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

    let contents = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let proof = ProofArtifact::from_json_str(&contents)
        .with_context(|| format!("could not parse {}", cli.input.display()))?;
    let raw = proof.to_json();

    let transcoded = ProofTranscoder::new(options)
        .with_layout(cli.layout.into())
        .transcode(proof)?;

    write_json(&cli.output_dir.join(RAW_PROOF_FILE), &raw)?;
    write_json(&cli.output_dir.join(PREPARED_PROOF_FILE), &PreparedProof::from(&transcoded))?;
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("prepare_proof_{}_{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cli(input: &Path, output_dir: &Path, layout: Layout) -> Cli {
        Cli {
            input: input.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            layout,
            legacy: false,
            log_level: LevelFilter::OFF,
        }
    }

    #[test]
    fn writes_raw_and_prepared_proof() {
        let dir = scratch_dir("writes");
        let input = dir.join("proof.json");
        fs::write(
            &input,
            r#"{
                "pi_a": ["1", "2", "1"],
                "pi_b": [["3", "4"], ["5", "6"], ["1", "0"]],
                "pi_c": ["7", "8", "1"]
            }"#,
        )
        .unwrap();

        run(cli(&input, &dir, Layout::Direct)).unwrap();

        let prepared = fs::read_to_string(dir.join(PREPARED_PROOF_FILE)).unwrap();
        let prepared: PreparedProof = serde_json::from_str(&prepared).unwrap();
        assert_eq!(prepared.proof_a.len(), 64);
        assert_eq!(prepared.proof_b.len(), 128);
        assert_eq!(prepared.proof_c.len(), 64);
        assert_eq!(prepared.raw.len(), 256);
        assert_eq!(prepared.proof_a[0], 1);
        assert_eq!(prepared.proof_b[32], 5);
        assert_eq!(prepared.proof_c[32], 8);

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join(RAW_PROOF_FILE)).unwrap()).unwrap();
        assert_eq!(raw["pi_b"][1], serde_json::json!(["5", "6"]));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn failed_transcode_writes_nothing() {
        let dir = scratch_dir("fails");
        let input = dir.join("proof.json");
        // Not a curve point, so the syscall layout cannot negate A.
        fs::write(
            &input,
            r#"{"pi_a": ["1", "3"], "pi_b": [["3", "4"], ["5", "6"]], "pi_c": ["7", "8"]}"#,
        )
        .unwrap();

        assert!(run(cli(&input, &dir, Layout::Syscall)).is_err());
        assert!(!dir.join(RAW_PROOF_FILE).exists());
        assert!(!dir.join(PREPARED_PROOF_FILE).exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn layout_flag_parses() {
        let args = ["prepare_proof", "proof.json", "--layout", "syscall"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.layout, Layout::Syscall);
        assert_eq!(ProofLayout::from(cli.layout), ProofLayout::Syscall);
    }
}
