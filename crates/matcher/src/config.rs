use std::collections::HashSet;

use serde::Deserialize;

use crate::error::MatchError;
use crate::matcher::MatchFields;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MatchConfig {
    #[serde(default = "default_name")]
    pub name: String,
    pub source: SourceConfig,
    pub registry: RegistryConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_name() -> String {
    "establishment units".into()
}

// ---------------------------------------------------------------------------
// Datasets
// ---------------------------------------------------------------------------

/// The dataset whose rows need an establishment unit.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub file: String,
    #[serde(default = "default_source_identifier")]
    pub identifier: String,
    #[serde(default = "default_source_address")]
    pub address: String,
    /// Field delimiter for delimited text; sniffed when omitted.
    #[serde(default)]
    pub delimiter: Option<String>,
    /// Worksheet to read from a workbook; first sheet when omitted.
    #[serde(default)]
    pub sheet: Option<String>,
    /// Source columns echoed into the results. All columns when omitted.
    #[serde(default)]
    pub copy_columns: Option<Vec<String>>,
}

/// The KBO registry extract.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    pub file: String,
    #[serde(default = "default_registry_identifier")]
    pub identifier: String,
    /// Address columns compared against the source address, in priority order.
    #[serde(default = "default_registry_addresses")]
    pub addresses: Vec<String>,
    #[serde(default = "default_registry_unit")]
    pub unit: String,
    #[serde(default)]
    pub delimiter: Option<String>,
    #[serde(default)]
    pub sheet: Option<String>,
}

fn default_source_identifier() -> String {
    "Enterprise Number".into()
}

fn default_source_address() -> String {
    "Address".into()
}

fn default_registry_identifier() -> String {
    "EnterpriseNumber".into()
}

fn default_registry_addresses() -> Vec<String> {
    vec!["Adress NL".into(), "Adress FR".into()]
}

fn default_registry_unit() -> String {
    "EntityNumber".into()
}

// ---------------------------------------------------------------------------
// Scoring + Run
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Matches scoring below this are labelled low confidence.
    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

fn default_min_score() -> f64 {
    0.8
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_true")]
    pub parallel: bool,
    /// Size of a dedicated worker pool; the global pool when omitted.
    #[serde(default)]
    pub threads: Option<usize>,
}

fn default_true() -> bool {
    true
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub csv: Option<String>,
    #[serde(default = "default_output_delimiter")]
    pub delimiter: String,
    #[serde(default)]
    pub xlsx: Option<String>,
    #[serde(default)]
    pub json: Option<String>,
    /// Source rows copied into the workbook's sample sheet.
    #[serde(default = "default_sample_rows")]
    pub source_sample_rows: usize,
}

fn default_output_delimiter() -> String {
    ";".into()
}

fn default_sample_rows() -> usize {
    1000
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv: None,
            delimiter: default_output_delimiter(),
            xlsx: None,
            json: None,
            source_sample_rows: default_sample_rows(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MatchConfig {
    pub fn from_toml(input: &str) -> Result<Self, MatchError> {
        let config: MatchConfig =
            toml::from_str(input).map_err(|e| MatchError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        let invalid = |msg: String| Err(MatchError::ConfigValidation(msg));

        let named = [
            ("source.identifier", &self.source.identifier),
            ("source.address", &self.source.address),
            ("registry.identifier", &self.registry.identifier),
            ("registry.unit", &self.registry.unit),
        ];
        for (key, value) in named {
            if value.trim().is_empty() {
                return invalid(format!("{key} must name a column"));
            }
        }

        if self.registry.addresses.is_empty() {
            return invalid("registry.addresses must list at least one column".into());
        }
        let mut seen = HashSet::new();
        for column in &self.registry.addresses {
            if column.trim().is_empty() {
                return invalid("registry.addresses contains an empty column name".into());
            }
            if !seen.insert(column.as_str()) {
                return invalid(format!("registry.addresses lists '{column}' twice"));
            }
        }

        let min_score = self.scoring.min_score;
        if !(0.0..=1.0).contains(&min_score) {
            return invalid(format!("scoring.min_score must be within [0, 1], got {min_score}"));
        }

        if self.run.threads == Some(0) {
            return invalid("run.threads must be at least 1".into());
        }

        delimiter_byte("source.delimiter", self.source.delimiter.as_deref())?;
        delimiter_byte("registry.delimiter", self.registry.delimiter.as_deref())?;
        delimiter_byte("output.delimiter", Some(&self.output.delimiter))?;

        Ok(())
    }

    /// Column names the row matcher reads.
    pub fn match_fields(&self) -> MatchFields {
        MatchFields {
            source_address: self.source.address.clone(),
            registry_addresses: self.registry.addresses.clone(),
            registry_unit: self.registry.unit.clone(),
        }
    }

    pub fn source_delimiter(&self) -> Option<u8> {
        delimiter_byte("source.delimiter", self.source.delimiter.as_deref()).ok().flatten()
    }

    pub fn registry_delimiter(&self) -> Option<u8> {
        delimiter_byte("registry.delimiter", self.registry.delimiter.as_deref()).ok().flatten()
    }

    pub fn output_delimiter(&self) -> u8 {
        delimiter_byte("output.delimiter", Some(&self.output.delimiter))
            .ok()
            .flatten()
            .unwrap_or(b';')
    }
}

/// A delimiter must be exactly one ASCII character. `\t` is accepted as tab.
fn delimiter_byte(key: &str, value: Option<&str>) -> Result<Option<u8>, MatchError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let value = if value == "\\t" { "\t" } else { value };
    match value.as_bytes() {
        [b] if b.is_ascii() => Ok(Some(*b)),
        _ => Err(MatchError::ConfigValidation(format!(
            "{key} must be a single ASCII character, got {value:?}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
