//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ClientError;

/// Map client errors to a string for CLI output.
pub fn map_error(e: &ClientError) -> String {
    match e {
        ClientError::ActionFailed(action) => format!("careplan: {} failed (see messages above)", action),
        other => format!("careplan: {}", other),
    }
}
