// src/cli.rs
use crate::analysis::{Analyzer, LinkedInAnalysisRequest, ResumeAnalysisRequest, Source, Tier};
use crate::environment::EnvironmentConfig;
use crate::utils::read_file_content;
use crate::web::{start_web_server, AnalysisResponse};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "ats-optimizer")]
#[command(about = "Score and rewrite resumes and LinkedIn profiles with an LLM")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[arg(long, default_value = "config.yaml")]
    pub config: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve {
        /// Overrides the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Analyze one document and print the response JSON
    Analyze {
        #[arg(long, value_enum)]
        source: Source,
        #[arg(long, value_enum, default_value = "free")]
        tier: Tier,
        /// Target job role, e.g. "Data Scientist"
        #[arg(long)]
        role: String,
        /// Plain-text resume or LinkedIn profile
        #[arg(long)]
        input: PathBuf,
        /// Job posting to match against (paid resume analysis only)
        #[arg(long)]
        job_description: Option<PathBuf>,
    },
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    let mut config = EnvironmentConfig::load(&cli.config)?;

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            let analyzer = crate::build_analyzer(&config)?;
            start_web_server(config, analyzer).await
        }

        Command::Analyze {
            source,
            tier,
            role,
            input,
            job_description,
        } => {
            let analyzer = crate::build_analyzer(&config)?;
            let text = read_file_content(&input).await?;
            let job_description = match job_description {
                Some(path) => Some(read_file_content(&path).await?),
                None => None,
            };

            info!(
                "Running {} {} analysis from {}",
                tier.as_str(),
                source.label(),
                input.display()
            );

            let response =
                run_analysis(&analyzer, source, tier, text, role, job_description).await?;
            let rendered = serde_json::to_string_pretty(&response)
                .context("Failed to serialize analysis response")?;
            println!("{}", rendered);
            Ok(())
        }
    }
}

async fn run_analysis(
    analyzer: &Analyzer,
    source: Source,
    tier: Tier,
    text: String,
    role: String,
    job_description: Option<String>,
) -> Result<AnalysisResponse> {
    let result = match source {
        Source::Resume => {
            let request = ResumeAnalysisRequest {
                resume_text: Some(text),
                job_role: Some(role),
                is_specific_job: Some(job_description.is_some()),
                job_description,
            };
            match tier {
                Tier::Free => analyzer.analyze_resume_free(&request).await,
                Tier::Paid => analyzer.analyze_resume_paid(&request).await,
            }
        }
        Source::LinkedIn => {
            let request = LinkedInAnalysisRequest {
                linkedin_text: Some(text),
                job_role: Some(role),
            };
            match tier {
                Tier::Free => analyzer.analyze_linkedin_free(&request).await,
                Tier::Paid => analyzer.analyze_linkedin_paid(&request).await,
            }
        }
    };

    let analysis = result.map_err(|e| anyhow::anyhow!("{} ({})", e, e.error_code()))?;
    Ok(AnalysisResponse::from_analysis(analysis, None))
}
