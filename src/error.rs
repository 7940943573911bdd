//! Error taxonomy for the fitting run.
//!
//! Every component returns `Result<_, AppError>`; only the binary entry point
//! turns an error into user-facing text and a process exit code.

use std::path::PathBuf;

use crate::domain::SeriesVariant;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The (grid, composition) pair is not in the registry.
    #[error(
        "Couldn't find cross-sections for grid {grid} and composition {composition}.\n\
         Valid combinations are:\n{valid}"
    )]
    Configuration {
        grid: String,
        composition: String,
        valid: String,
    },

    /// Input table missing, unreadable or without a single complete record.
    #[error("Invalid input table '{}': {reason}", path.display())]
    InputFormat { path: PathBuf, reason: String },

    /// A (variant, window) regression could not be performed.
    #[error("Fit failed for {variant} series in window #{window} [{lo}, {hi}): {reason}")]
    Fit {
        variant: SeriesVariant,
        window: usize,
        lo: f64,
        hi: f64,
        reason: String,
    },

    /// Division by a zero (or non-finite) nominal value.
    #[error("Arithmetic degeneracy at mass {mass} GeV: {context}")]
    ArithmeticDegeneracy { mass: f64, context: String },

    /// Invalid run settings that are not a registry lookup (e.g. a bad grid step).
    #[error("Invalid setting: {0}")]
    Setting(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Persistence or plotting adapter failure.
    #[error("{0}")]
    Output(String),
}

impl AppError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Configuration { .. } | AppError::Setting(_) => 2,
            AppError::InputFormat { .. } => 3,
            AppError::Fit { .. } | AppError::ArithmeticDegeneracy { .. } => 4,
            AppError::Io { .. } | AppError::Output(_) => 5,
        }
    }
}
