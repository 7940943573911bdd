//! Cross-section table ingest.
//!
//! Tables are plain text with whitespace-separated `(mass, xsec, xsec_unc)`
//! triples. Records are read in order until end of input or the first token
//! that does not parse as a number; an incomplete trailing record is dropped.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::data::registry::InputDescriptor;
use crate::domain::Sample;
use crate::error::AppError;

/// Ingest output: samples in file order plus where they came from.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub descriptor: InputDescriptor,
    pub path: PathBuf,
    pub samples: Vec<Sample>,
}

/// Load the table named by `descriptor` from `input_dir`.
pub fn load_table(input_dir: &Path, descriptor: &InputDescriptor) -> Result<LoadedTable, AppError> {
    let path = input_dir.join(descriptor.file_name());
    info!("Reading cross-sections from {}", path.display());

    let text = fs::read_to_string(&path).map_err(|e| AppError::InputFormat {
        path: path.clone(),
        reason: format!("cannot read file: {e}"),
    })?;

    let samples = parse_samples(&text);
    if samples.is_empty() {
        return Err(AppError::InputFormat {
            path,
            reason: "no complete (mass, xsec, xsec_unc) record found".to_string(),
        });
    }

    if samples.len() != descriptor.expected_points {
        warn!(
            "{} has {} records, the published {} {} table has {}",
            path.display(),
            samples.len(),
            descriptor.grid,
            descriptor.composition,
            descriptor.expected_points
        );
    } else {
        debug!("{} records loaded", samples.len());
    }

    Ok(LoadedTable {
        descriptor: descriptor.clone(),
        path,
        samples,
    })
}

/// Parse whitespace-separated numeric triples.
pub fn parse_samples(text: &str) -> Vec<Sample> {
    let mut out = Vec::new();
    let mut tokens = text.split_whitespace().map(str::parse::<f64>);

    loop {
        let (Some(Ok(mass)), Some(Ok(xsec)), Some(Ok(xsec_unc))) = (tokens.next(), tokens.next(), tokens.next())
        else {
            break;
        };
        out.push(Sample { mass, xsec, xsec_unc });
    }

    out
}
