//! Export the actual vs fitted comparison to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::data::registry::InputDescriptor;
use crate::error::AppError;
use crate::report::DiffRow;

/// Write diff rows to a CSV file.
pub fn write_diff_csv(path: &Path, rows: &[DiffRow], descriptor: &InputDescriptor) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}'", path.display()), e))?;
    let mut out = BufWriter::new(file);
    let write_err = |e: std::io::Error| AppError::io(format!("Failed to write export CSV '{}'", path.display()), e);

    writeln!(
        out,
        "grid,composition,mass_gev,window,xsec_fb,fit_xsec_fb,xsec_diff_pct,xsec_unc_fb,fit_unc_fb,unc_diff_pct"
    )
    .map_err(write_err)?;

    for r in rows {
        writeln!(
            out,
            "{},{},{},{},{:.10e},{:.10e},{},{:.10e},{:.10e},{}",
            descriptor.grid,
            descriptor.composition,
            r.mass,
            r.window,
            r.xsec,
            r.fit_xsec,
            r.xsec_diff_pct.map(|v| format!("{v:.6}")).unwrap_or_default(),
            r.xsec_unc,
            r.fit_unc,
            r.unc_diff_pct.map(|v| format!("{v:.6}")).unwrap_or_default(),
        )
        .map_err(write_err)?;
    }

    out.flush().map_err(write_err)
}
