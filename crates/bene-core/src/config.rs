//! Pipeline configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! command-line overrides applied by the caller. Every table in the file is
//! optional; an absent table keeps its defaults.
//!
//! ```toml
//! [columns]
//! district_name = "district"
//!
//! [gender_map]
//! M = "Male"
//! F = "Female"
//! T = "Transgender"
//!
//! [[reports.crosstabs]]
//! title = "Number of Students by District and Gender"
//! row = "district"
//! column = "gender"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use bene_model::ChartMeta;
use bene_transform::AGE_GROUP_COLUMN;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Y-axis label shared by every cross-tab chart.
pub const COUNT_AXIS_LABEL: &str = "Number of Students";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// Names of the input columns the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnConfig {
    /// District reference in the beneficiaries table.
    pub beneficiary_district: String,
    /// Unique district id in the districts table.
    pub district_id: String,
    /// District display name in the districts table.
    pub district_name: String,
    pub dob: String,
    pub gender: String,
    pub caste: String,
    pub religion: String,
    pub qualification: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            beneficiary_district: "district_id".to_string(),
            district_id: "dist_id".to_string(),
            district_name: "dist_name".to_string(),
            dob: "dob".to_string(),
            gender: "gender".to_string(),
            caste: "cast".to_string(),
            religion: "religion".to_string(),
            qualification: "qualification".to_string(),
        }
    }
}

impl ColumnConfig {
    /// Joined-table column holding `attribute`.
    pub fn column_for(&self, attribute: Attribute) -> &str {
        match attribute {
            Attribute::District => self.district_name.as_str(),
            Attribute::Gender => self.gender.as_str(),
            Attribute::Caste => self.caste.as_str(),
            Attribute::Religion => self.religion.as_str(),
            Attribute::Qualification => self.qualification.as_str(),
            Attribute::AgeGroup => AGE_GROUP_COLUMN,
        }
    }

    /// `(setting, column)` pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("beneficiary_district", self.beneficiary_district.as_str()),
            ("district_id", self.district_id.as_str()),
            ("district_name", self.district_name.as_str()),
            ("dob", self.dob.as_str()),
            ("gender", self.gender.as_str()),
            ("caste", self.caste.as_str()),
            ("religion", self.religion.as_str()),
            ("qualification", self.qualification.as_str()),
        ]
    }
}

/// A categorical attribute of the joined table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    District,
    Gender,
    Caste,
    Religion,
    Qualification,
    AgeGroup,
}

impl Attribute {
    pub fn display_name(self) -> &'static str {
        match self {
            Attribute::District => "District",
            Attribute::Gender => "Gender",
            Attribute::Caste => "Caste",
            Attribute::Religion => "Religion",
            Attribute::Qualification => "Qualification",
            Attribute::AgeGroup => "Age Group",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single-column count request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrequencySpec {
    pub attribute: Attribute,
    #[serde(default)]
    pub title: Option<String>,
}

impl FrequencySpec {
    pub fn new(attribute: Attribute) -> Self {
        Self {
            attribute,
            title: None,
        }
    }

    /// Explicit title, or "Counts by {attribute}".
    pub fn title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("Counts by {}", self.attribute))
    }
}

/// A two-attribute count request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrosstabSpec {
    pub title: String,
    pub row: Attribute,
    pub column: Attribute,
}

impl CrosstabSpec {
    pub fn new(title: impl Into<String>, row: Attribute, column: Attribute) -> Self {
        Self {
            title: title.into(),
            row,
            column,
        }
    }

    /// Stacked bar chart labels: rows along the x axis, columns stacked.
    pub fn chart(&self) -> ChartMeta {
        ChartMeta {
            x_label: self.row.display_name().to_string(),
            y_label: COUNT_AXIS_LABEL.to_string(),
            legend_title: self.column.display_name().to_string(),
        }
    }
}

/// The ordered list of reports to emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSpec {
    pub frequencies: Vec<FrequencySpec>,
    pub crosstabs: Vec<CrosstabSpec>,
}

impl Default for ReportSpec {
    fn default() -> Self {
        use Attribute::{AgeGroup, Caste, District, Gender, Qualification, Religion};

        let frequencies = [Gender, Caste, District, Religion, Qualification, AgeGroup]
            .into_iter()
            .map(FrequencySpec::new)
            .collect();
        let crosstabs = vec![
            CrosstabSpec::new(
                "Number of Students by District and Qualification",
                District,
                Qualification,
            ),
            CrosstabSpec::new("Number of Students by District and Religion", District, Religion),
            CrosstabSpec::new("Number of Students by District and Gender", District, Gender),
            CrosstabSpec::new("Number of Students by District and Caste", District, Caste),
            CrosstabSpec::new("Number of Students by Religion and Gender", Religion, Gender),
            CrosstabSpec::new(
                "Number of Students by Religion and Qualification",
                Qualification,
                Religion,
            ),
            CrosstabSpec::new(
                "Number of Students by Gender and Qualification",
                Qualification,
                Gender,
            ),
            CrosstabSpec::new("Number of Students by Gender and Caste", Caste, Gender),
            CrosstabSpec::new(
                "Number of Students by Qualification and Caste",
                Caste,
                Qualification,
            ),
        ];
        Self {
            frequencies,
            crosstabs,
        }
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub columns: ColumnConfig,
    /// Substitutions applied to the gender column before aggregation.
    pub gender_map: BTreeMap<String, String>,
    pub reports: ReportSpec,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            columns: ColumnConfig::default(),
            gender_map: BTreeMap::from([
                ("M".to_string(), "Male".to_string()),
                ("F".to_string(), "Female".to_string()),
            ]),
            reports: ReportSpec::default(),
        }
    }
}

impl PipelineConfig {
    /// Parse a TOML document layered over the defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read, parse and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce a report.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (setting, column) in self.columns.entries() {
            if column.trim().is_empty() {
                return Err(ConfigError::invalid(format!(
                    "column name for '{setting}' is empty"
                )));
            }
        }
        for spec in &self.reports.frequencies {
            if spec.title().trim().is_empty() {
                return Err(ConfigError::invalid(format!(
                    "frequency report for {} has an empty title",
                    spec.attribute
                )));
            }
        }
        for spec in &self.reports.crosstabs {
            if spec.title.trim().is_empty() {
                return Err(ConfigError::invalid(format!(
                    "cross-tab of {} by {} has an empty title",
                    spec.row, spec.column
                )));
            }
            let row = self.columns.column_for(spec.row);
            let column = self.columns.column_for(spec.column);
            if row.trim().eq_ignore_ascii_case(column.trim()) {
                return Err(ConfigError::invalid(format!(
                    "cross-tab '{}' uses column '{row}' for both rows and columns",
                    spec.title
                )));
            }
        }
        Ok(())
    }
}
