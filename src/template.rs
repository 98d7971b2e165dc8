//! Output path templates for per-category tables.
//!
//! `matrix_{kind}.csv` expands to `matrix_3.csv` for category 3. `{category}`
//! is accepted as an alias. `-` sends every table to stdout.

use anyhow::{Context, bail};
use regex::Regex;
use std::path::PathBuf;

pub const DEFAULT_TEMPLATE: &str = "matrix_{kind}.csv";

const PLACEHOLDER_RE: &str = r"\{([^{}]*)\}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTemplate {
    Stdout,
    /// Literal chunks interleaved with the category id.
    Path { parts: Vec<String> },
}

impl OutputTemplate {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        if raw == "-" {
            return Ok(Self::Stdout);
        }
        if raw.is_empty() {
            bail!("output template is empty");
        }

        let re = Regex::new(PLACEHOLDER_RE).context("compile placeholder pattern")?;
        let mut parts = Vec::new();
        let mut last = 0;
        for caps in re.captures_iter(raw) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            match name.as_str() {
                "kind" | "category" => {}
                other => bail!(
                    "unknown placeholder {{{}}} in output template {:?} (expected {{kind}})",
                    other,
                    raw
                ),
            }
            parts.push(raw[last..whole.start()].to_string());
            last = whole.end();
        }
        parts.push(raw[last..].to_string());

        Ok(Self::Path { parts })
    }

    /// True when distinct categories map to distinct outputs.
    pub fn is_per_category(&self) -> bool {
        match self {
            Self::Stdout => true,
            Self::Path { parts } => parts.len() > 1,
        }
    }

    /// Path for one category; `None` for stdout.
    pub fn expand(&self, category: i64) -> Option<PathBuf> {
        match self {
            Self::Stdout => None,
            Self::Path { parts } => Some(PathBuf::from(parts.join(&category.to_string()))),
        }
    }
}
