//! JSON job descriptions: a shell triple, an operator and scatter offsets,
//! loadable from disk for batch or command-line evaluation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::basis::{ncart, ContractedShell, ContractionPrimitive, ShellError};

use super::{Operator, ScatterOffsets};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveSpec {
    pub exponent: f64,
    #[serde(default = "default_coefficient")]
    pub coefficient: f64,
}

fn default_coefficient() -> f64 {
    1.0
}

/// One contracted shell; a single primitive with unit coefficient
/// describes a bare primitive shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShellSpec {
    pub angular_momentum: usize,
    pub center: [f64; 3],
    pub primitives: Vec<PrimitiveSpec>,
}

impl ShellSpec {
    pub fn to_contracted(&self) -> Result<ContractedShell, ShellError> {
        ContractedShell::new(
            self.angular_momentum,
            self.center,
            self.primitives
                .iter()
                .map(|p| ContractionPrimitive {
                    exponent: p.exponent,
                    coefficient: p.coefficient,
                })
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EriJob {
    pub operator: Operator,
    pub shell_a: ShellSpec,
    pub shell_b: ShellSpec,
    pub shell_c: ShellSpec,
    #[serde(default)]
    pub offsets: ScatterOffsets,
}

impl EriJob {
    /// Smallest output tensor shape that fits the scattered block.
    pub fn output_shape(&self) -> (usize, usize, usize) {
        (
            self.offsets.a + ncart(self.shell_a.angular_momentum),
            self.offsets.b + ncart(self.shell_b.angular_momentum),
            self.offsets.c + ncart(self.shell_c.angular_momentum),
        )
    }
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("failed to read job file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse job file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn load_job(path: impl AsRef<Path>) -> Result<EriJob, JobError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| JobError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| JobError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
