//! Export command: top products of the stored history

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use pantry_core::{analyze_with, export_products, ExportFormat, ProductStats};

use super::{load_config, load_stored_history, open_store};

pub fn cmd_export(config_path: Option<&Path>, format: &str, output: Option<&Path>) -> Result<()> {
    let format: ExportFormat = format.parse()?;
    let config = load_config(config_path)?;
    let rules = config.rule_table().context("Invalid category rules")?;
    let store = open_store(&config)?;

    let records = load_stored_history(&store)?;
    let outcome = analyze_with(&records, &rules);
    let products: &[ProductStats] = outcome
        .analysis()
        .map(|a| a.top_products.as_slice())
        .unwrap_or(&[]);

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            export_products(products, format, BufWriter::new(file))?;
            println!("✅ Exported {} products to {}", products.len(), path.display());
        }
        None => {
            // Write to stdout
            export_products(products, format, io::stdout().lock())?;
        }
    }

    Ok(())
}
