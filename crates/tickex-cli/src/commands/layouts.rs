//! Layouts command - list registered layout parsers.

use clap::Args;
use console::style;

use tickex_core::{DocumentType, LayoutRegistry, default_layout_ids};

/// Arguments for the layouts command.
#[derive(Args)]
pub struct LayoutsArgs {
    /// Only show layouts for this document type
    #[arg(short = 't', long)]
    document_type: Option<DocumentType>,
}

pub async fn run(args: LayoutsArgs) -> anyhow::Result<()> {
    let registry = LayoutRegistry::builder().with_builtin_layouts().build();

    println!("{}", style("Registered layouts:").bold());
    for (document_type, layout_id) in registry.layout_keys() {
        if args
            .document_type
            .is_some_and(|wanted| wanted != document_type)
        {
            continue;
        }
        let defaults = default_layout_ids(document_type);
        let marker = if defaults.contains(&layout_id) {
            ""
        } else {
            "  (not tried by auto-detect)"
        };
        println!("  {}/{}{}", document_type, layout_id, marker);
    }

    Ok(())
}
