//! Interactive front: reads one report, prints the normalized text, the
//! extracted hints and the incident record.

use std::io::{self, BufRead, Write};

use anyhow::Context;
use chrono::{NaiveDate, NaiveTime};
use clap::Parser;

use incident_extractor::config::ExtractorConfig;
use incident_extractor::pipeline::preprocess::TextPreprocessor;
use incident_extractor::pipeline::structuring::{GenerationOptions, IncidentExtractor, OllamaClient};

#[derive(Parser, Debug)]
#[command(name = "incident-cli", version, about = "Extract a structured incident from a report")]
struct Cli {
    /// Ollama model (overrides INCIDENT_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Extra context appended to the hints given to the model
    #[arg(long, default_value = "")]
    context: String,

    /// Date relative words resolve against, YYYY-MM-DD (default: today)
    #[arg(long)]
    reference_date: Option<NaiveDate>,

    /// Report text; read from stdin when omitted
    text: Vec<String>,
}

fn read_report(args: &[String]) -> anyhow::Result<String> {
    if !args.is_empty() {
        return Ok(args.join(" "));
    }

    eprint!("Digite o relato do incidente: ");
    io::stderr().flush().ok();

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read report from stdin")?;
    Ok(line)
}

fn main() -> anyhow::Result<()> {
    incident_extractor::init_tracing();
    let cli = Cli::parse();

    let text = read_report(&cli.text)?;
    if text.trim().is_empty() {
        println!("Nenhum texto informado.");
        return Ok(());
    }

    let config = ExtractorConfig::from_env();
    let model = cli.model.unwrap_or(config.model);
    let reference = cli
        .reference_date
        .map(|date| date.and_time(NaiveTime::MIN))
        .unwrap_or_else(|| chrono::Local::now().naive_local());
    let preprocessor = TextPreprocessor::new(reference);

    let normalized = preprocessor.preprocess(&text);
    println!("Texto normalizado:\n{}\n", normalized.cleaned_text);
    println!("Pistas extraídas:");
    if normalized.hints.is_empty() {
        println!("  (nenhuma)");
    }
    for (kind, value) in &normalized.hints {
        println!("  {kind}: {value}");
    }
    println!();

    let llm = OllamaClient::new(
        &config.ollama_host,
        config.timeout_secs,
        GenerationOptions {
            temperature: config.temperature,
        },
    )
    .context("Failed to build Ollama client")?;
    let extractor = IncidentExtractor::new(preprocessor, Box::new(llm), &model);

    let record = extractor
        .extract_json(&text, &cli.context)
        .with_context(|| format!("Extraction with model {model} failed"))?;

    println!("Incidente:");
    println!(
        "{}",
        serde_json::to_string_pretty(&record).context("Failed to render incident")?
    );
    Ok(())
}
