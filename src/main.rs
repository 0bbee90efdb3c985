use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use vclaim::adapter::TranscriptAdapter;
use vclaim::clients::create_oracle;
use vclaim::config::{Config, RuntimeConfig};
use vclaim::cues::{Cue, CueCategory, is_known_cue};
use vclaim::export::{read_analysis_file, write_analysis_file};
use vclaim::heatmap::CueFilter;
use vclaim::model::TranscriptAnalysis;
use vclaim::report::render_report;

#[derive(Parser, Debug)]
#[command(author, version, about = "Forensic linguistic analysis of insurance-claim interview transcripts", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a transcript, or re-score a previously exported analysis
    Analyze {
        /// Transcript file ("-" or omitted reads stdin)
        #[arg(long, short)]
        transcript: Option<PathBuf>,

        /// Exported analysis JSON to load instead of calling the oracle
        #[arg(long)]
        import: Option<PathBuf>,

        /// Write the final analysis as JSON to this path
        #[arg(long)]
        export: Option<PathBuf>,

        /// Cue to highlight in the report (repeatable)
        #[arg(long = "highlight")]
        highlight: Vec<String>,

        /// Print the analysis JSON to stdout instead of the text report
        #[arg(long)]
        json: bool,
    },
    /// List the cue vocabulary
    Cues,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let _ = dotenvy::dotenv();
    let runtime = RuntimeConfig::load_with(|key| std::env::var(key).ok());

    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(runtime.log_level.as_str())
        .with_writer(std::io::stderr)
        .init();

    run(args.command, Config::load).await
}

/// Config is only loaded for commands that need it, so `cues` works with a
/// broken or missing config.
async fn run<F>(command: Command, load_config: F) -> Result<ExitCode>
where
    F: FnOnce() -> Result<Config>,
{
    match command {
        Command::Cues => {
            print_cues();
            Ok(ExitCode::SUCCESS)
        }
        Command::Analyze {
            transcript,
            import,
            export,
            highlight,
            json,
        } => {
            let config = load_config().map_err(|e| {
                eprintln!("Failed to load configuration: {}", e);
                e
            })?;

            let analysis = match load_analysis(&config, transcript, import).await {
                Ok(Some(analysis)) => analysis,
                Ok(None) => {
                    eprintln!("Please provide a transcript or import a file.");
                    return Ok(ExitCode::from(2));
                }
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    return Ok(ExitCode::FAILURE);
                }
            };

            if let Some(path) = export {
                write_analysis_file(&path, &analysis, &config.calibration)
                    .with_context(|| format!("Failed to export to {}", path.display()))?;
                eprintln!("Exported analysis to {}", path.display());
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                for cue in highlight.iter().filter(|c| !is_known_cue(c)) {
                    warn!(cue = %cue, "Highlight cue is not in the cue vocabulary");
                }
                let mut filter = CueFilter::new(highlight);
                filter.retain_available(&analysis);
                print!("{}", render_report(&analysis, &filter));
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// An imported file wins over transcript text; `Ok(None)` means no input at all
async fn load_analysis(
    config: &Config,
    transcript: Option<PathBuf>,
    import: Option<PathBuf>,
) -> Result<Option<TranscriptAnalysis>> {
    if let Some(path) = import {
        let analysis = read_analysis_file(&path, &config.calibration)?;
        info!(path = %path.display(), "Successfully loaded analysis from file");
        return Ok(Some(analysis));
    }

    let text = match transcript {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read transcript {}", path.display()))?,
        Some(_) => read_stdin()?,
        None if !std::io::stdin().is_terminal() => read_stdin()?,
        None => String::new(),
    };
    if text.trim().is_empty() {
        return Ok(None);
    }

    let oracle = create_oracle(config)?;
    let adapter = TranscriptAdapter::new(oracle);
    let analysis = adapter
        .analyze_transcript(&text, &config.calibration)
        .await?;
    Ok(Some(analysis))
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read transcript from stdin")?;
    Ok(buf)
}

fn print_cues() {
    for (title, category) in [
        ("Foundational Linguistic Cues", CueCategory::Foundational),
        ("Narrative & Deception Cues", CueCategory::Narrative),
    ] {
        println!("{}", title);
        for cue in Cue::in_category(category) {
            println!("  {:<28} {}", cue.as_str(), cue.description());
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn broken_config() -> Result<Config> {
        anyhow::bail!("oracle.timeout_ms must be > 0")
    }

    #[tokio::test]
    async fn cues_runs_without_config() {
        let args = Args::try_parse_from(["vclaim", "cues"]).unwrap();
        let code = run(args.command, broken_config).await.unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[tokio::test]
    async fn analyze_reports_config_errors() {
        let args = Args::try_parse_from(["vclaim", "analyze", "--import", "missing.json"]).unwrap();
        let err = run(args.command, broken_config).await.unwrap_err();
        assert!(err.to_string().contains("timeout_ms"));
    }
}
