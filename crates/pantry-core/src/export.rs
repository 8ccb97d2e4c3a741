//! Export of the top-products view
//!
//! Supports:
//! - CSV with a header row and a 1-based rank column
//! - Pretty-printed JSON array of product stats

use std::io::Write;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::ProductStats;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(Error::InvalidData(format!(
                "Unknown export format: {} (expected csv or json)",
                other
            ))),
        }
    }
}

/// One CSV row
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductRow<'a> {
    rank: usize,
    product_id: &'a str,
    name: &'a str,
    unit_label: &'a str,
    price_cents: u32,
    occurrence_count: u32,
    total_quantity: u32,
}

/// Write products, in the given order, to `writer`
pub fn export_products<W: Write>(
    products: &[ProductStats],
    format: ExportFormat,
    writer: W,
) -> Result<()> {
    match format {
        ExportFormat::Csv => {
            let mut csv = csv::Writer::from_writer(writer);
            for (i, product) in products.iter().enumerate() {
                csv.serialize(ProductRow {
                    rank: i + 1,
                    product_id: &product.product_id,
                    name: &product.name,
                    unit_label: &product.unit_label,
                    price_cents: product.price_cents,
                    occurrence_count: product.occurrence_count,
                    total_quantity: product.total_quantity,
                })?;
            }
            csv.flush()?;
        }
        ExportFormat::Json => {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, products)?;
            writeln!(writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn products() -> Vec<ProductStats> {
        vec![
            ProductStats {
                product_id: "k1".to_string(),
                name: "Goudse kaas, jong".to_string(),
                unit_label: "190 g".to_string(),
                price_cents: 349,
                occurrence_count: 5,
                total_quantity: 6,
            },
            ProductStats {
                product_id: "m1".to_string(),
                name: "Halfvolle melk".to_string(),
                unit_label: "1 liter".to_string(),
                price_cents: 0,
                occurrence_count: 2,
                total_quantity: 2,
            },
        ]
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_csv_export() {
        let mut out = Vec::new();
        export_products(&products(), ExportFormat::Csv, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(
            lines[0],
            "rank,productId,name,unitLabel,priceCents,occurrenceCount,totalQuantity"
        );
        // Names containing commas are quoted
        assert_eq!(lines[1], "1,k1,\"Goudse kaas, jong\",190 g,349,5,6");
        assert_eq!(lines[2], "2,m1,Halfvolle melk,1 liter,0,2,2");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_json_export() {
        let mut out = Vec::new();
        export_products(&products(), ExportFormat::Json, &mut out).unwrap();
        let parsed: Vec<ProductStats> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, products());
    }

    #[test]
    fn test_empty_csv_export_has_no_rows() {
        let mut out = Vec::new();
        export_products(&[], ExportFormat::Csv, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().lines().count() <= 1);
    }
}
