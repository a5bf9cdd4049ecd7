//! Process command - extract data from a single document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::debug;

use tickex_core::{
    Document, DocumentSource, DocumentType, ExtractOptions, ExtractionOutput, TransportManifest,
    WeighingTicket,
};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (scanned PDF or image)
    input: Option<PathBuf>,

    /// Object store bucket of a remote document
    #[arg(long, requires = "key", conflicts_with = "input")]
    bucket: Option<String>,

    /// Object store key of a remote document
    #[arg(long, requires = "bucket", conflicts_with = "input")]
    key: Option<String>,

    /// Document type; omit to auto-detect
    #[arg(short = 't', long)]
    document_type: Option<DocumentType>,

    /// Layout id to try (repeatable, requires --document-type)
    #[arg(short, long, requires = "document_type")]
    layout: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;
    let extractor = super::build_extractor(&config)?;

    if let Some(input) = &args.input {
        if !input.exists() {
            anyhow::bail!("Input file not found: {}", input.display());
        }
    }

    let source = DocumentSource::from_parts(args.input.clone(), args.bucket.clone(), args.key.clone())?;

    let options = ExtractOptions {
        document_type: args.document_type,
        layouts: if args.layout.is_empty() {
            None
        } else {
            Some(args.layout.clone())
        },
    };

    let result = extractor.extract(&source, &options).await?;

    // Format output
    let output = format_output(&result, args.format)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if result.review_required {
        eprintln!("{}", style("Review required:").yellow());
        for reason in &result.review_reasons {
            eprintln!("  - {}", reason);
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_output(
    result: &ExtractionOutput<Document>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_text(result: &ExtractionOutput<Document>) -> String {
    let mut output = String::new();

    let base = result.data.base();
    output.push_str(&format!("Document type: {}\n", base.document_type));
    if let Some(layout_id) = &result.layout_id {
        output.push_str(&format!("Layout: {}\n", layout_id));
    }
    output.push('\n');

    match &result.data {
        Document::WeighingTicket(ticket) => format_ticket(&mut output, ticket),
        Document::TransportManifest(manifest) => format_manifest(&mut output, manifest),
    }

    if !base.missing_required_fields.is_empty() {
        output.push_str(&format!(
            "\nMissing required fields: {}\n",
            base.missing_required_fields.join(", ")
        ));
    }
    if !base.low_confidence_fields.is_empty() {
        output.push_str(&format!(
            "Low confidence fields: {}\n",
            base.low_confidence_fields.join(", ")
        ));
    }

    output
}

fn format_ticket(output: &mut String, ticket: &WeighingTicket) {
    if let Some(field) = &ticket.ticket_number {
        output.push_str(&format!("Ticket:   {}\n", field.parsed));
    }
    if let Some(field) = &ticket.plate {
        output.push_str(&format!("Plate:    {}\n", field.parsed));
    }
    if let Some(field) = &ticket.product {
        output.push_str(&format!("Product:  {}\n", field.parsed));
    }
    if let Some(field) = &ticket.supplier {
        output.push_str(&format!("Supplier: {}\n", field.parsed));
    }
    output.push('\n');
    if let Some(field) = &ticket.gross_weight {
        output.push_str(&format!(
            "Gross: {} {}",
            field.parsed.value, field.parsed.unit
        ));
        if let Some(at) = &ticket.gross_weight_at {
            output.push_str(&format!("  ({})", at.parsed));
        }
        output.push('\n');
    }
    if let Some(field) = &ticket.tare_weight {
        output.push_str(&format!(
            "Tare:  {} {}",
            field.parsed.value, field.parsed.unit
        ));
        if let Some(at) = &ticket.tare_weight_at {
            output.push_str(&format!("  ({})", at.parsed));
        }
        output.push('\n');
    }
    if let Some(field) = &ticket.net_weight {
        output.push_str(&format!(
            "Net:   {} {}\n",
            field.parsed.value, field.parsed.unit
        ));
    }
}

fn format_manifest(output: &mut String, manifest: &TransportManifest) {
    if let Some(field) = &manifest.manifest_number {
        output.push_str(&format!("MTR:         {}\n", field.parsed));
    }
    if let Some(field) = &manifest.issue_date {
        output.push_str(&format!("Issued:      {}\n", field.parsed));
    }
    if let Some(field) = &manifest.transporter {
        output.push_str(&format!("Transporter: {}\n", field.parsed));
    }

    if !manifest.items.is_empty() {
        output.push_str("\nItems:\n");
        for item in &manifest.items {
            let quantity = item
                .quantity
                .map(|q| q.to_string())
                .unwrap_or_else(|| "?".to_string());
            let unit = item.unit.as_deref().unwrap_or("");
            output.push_str(&format!(
                "  {} {} - {} {}\n",
                item.item, item.description, quantity, unit
            ));
        }
    }
}
