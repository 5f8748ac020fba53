//! Declarative column schemas.
//!
//! A [`SchemaConfig`] drives the whole pipeline: which column holds the claim
//! status, which source columns must exist, how they are renamed and ordered,
//! and which output columns carry dates or amounts. The built-in
//! [`SchemaVariant`]s cover the three source layouts seen in practice; custom
//! layouts can be loaded from TOML.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// Status value a claim must carry to be exported.
pub const DEFAULT_SENTINEL: &str = "R";

/// Name of the leading 1-based sequence column in every output table.
pub const SEQUENCE_COLUMN: &str = "No";

pub const DEFAULT_WORKSHEET_NAME: &str = "Benefit Claim";

/// Excel's hard limit on worksheet name length.
pub const MAX_WORKSHEET_NAME_LEN: usize = 31;

const INVALID_WORKSHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// One projected column: where it comes from and what it is called in the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub source: String,
    pub output: String,
}

impl ColumnMapping {
    pub fn new(source: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
        }
    }
}

/// Output columns feeding the claim summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TotalsColumns {
    pub billed: String,
    pub accepted: String,
    pub excess: String,
    pub unpaid: String,
}

impl Default for TotalsColumns {
    fn default() -> Self {
        Self {
            billed: "Billed".to_string(),
            accepted: "Accepted".to_string(),
            excess: "Excess Total".to_string(),
            unpaid: "Unpaid".to_string(),
        }
    }
}

impl TotalsColumns {
    fn names(&self) -> [&str; 4] {
        [&self.billed, &self.accepted, &self.excess, &self.unpaid]
    }
}

fn default_sentinel() -> String {
    DEFAULT_SENTINEL.to_string()
}

fn default_worksheet_name() -> String {
    DEFAULT_WORKSHEET_NAME.to_string()
}

/// Full pipeline configuration for one source layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    /// Short label used in logs and error messages.
    pub name: String,
    /// Column inspected by the status filter.
    pub status_column: String,
    /// Exact value a row must hold in `status_column` to survive filtering.
    #[serde(default = "default_sentinel")]
    pub status_sentinel: String,
    /// Source columns that must be present, in reporting order.
    pub required_columns: Vec<String>,
    /// Output columns coerced to dates.
    #[serde(default)]
    pub date_columns: Vec<String>,
    /// Output columns coerced to decimal amounts.
    #[serde(default)]
    pub numeric_columns: Vec<String>,
    /// Projection in output order.
    pub columns: Vec<ColumnMapping>,
    #[serde(default = "default_worksheet_name")]
    pub worksheet_name: String,
    #[serde(default)]
    pub totals: TotalsColumns,
}

impl SchemaConfig {
    /// Parse a TOML schema and validate it.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn output_columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|mapping| mapping.output.as_str())
    }

    pub fn has_output(&self, output: &str) -> bool {
        self.columns.iter().any(|mapping| mapping.output == output)
    }

    pub fn mapping_for_output(&self, output: &str) -> Option<&ColumnMapping> {
        self.columns.iter().find(|mapping| mapping.output == output)
    }

    pub fn is_required(&self, source: &str) -> bool {
        self.required_columns.iter().any(|column| column == source)
    }

    pub fn is_date_column(&self, output: &str) -> bool {
        self.date_columns.iter().any(|column| column == output)
    }

    pub fn is_numeric_column(&self, output: &str) -> bool {
        self.numeric_columns.iter().any(|column| column == output)
    }

    /// Check internal consistency. Built-in variants always pass.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(self.invalid("no output columns defined"));
        }
        if self.status_column.trim().is_empty() {
            return Err(self.invalid("status column name is empty"));
        }
        if self.status_sentinel.is_empty() {
            return Err(self.invalid("status sentinel is empty"));
        }

        let mut outputs = BTreeSet::new();
        for mapping in &self.columns {
            if mapping.source.trim().is_empty() || mapping.output.trim().is_empty() {
                return Err(self.invalid("column mapping with an empty name"));
            }
            if mapping.output == SEQUENCE_COLUMN {
                return Err(self.invalid(format!(
                    "output column '{SEQUENCE_COLUMN}' is reserved for the sequence number"
                )));
            }
            if !outputs.insert(mapping.output.as_str()) {
                return Err(self.invalid(format!("duplicate output column '{}'", mapping.output)));
            }
        }

        for column in &self.date_columns {
            if !outputs.contains(column.as_str()) {
                return Err(self.invalid(format!("date column '{column}' is not an output column")));
            }
            if self.is_numeric_column(column) {
                return Err(self.invalid(format!(
                    "column '{column}' cannot be both a date and a numeric column"
                )));
            }
        }
        for column in &self.numeric_columns {
            if !outputs.contains(column.as_str()) {
                return Err(
                    self.invalid(format!("numeric column '{column}' is not an output column"))
                );
            }
        }
        for column in self.totals.names() {
            if !outputs.contains(column) {
                return Err(
                    self.invalid(format!("totals column '{column}' is not an output column"))
                );
            }
        }

        if let Some(reason) = worksheet_name_problem(&self.worksheet_name) {
            return Err(self.invalid(reason));
        }
        Ok(())
    }

    fn invalid(&self, reason: impl Into<String>) -> SchemaError {
        SchemaError::Invalid {
            name: self.name.clone(),
            reason: reason.into(),
        }
    }
}

/// Read and validate a TOML schema file.
pub fn load_schema_file(path: &Path) -> Result<SchemaConfig> {
    let contents = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    SchemaConfig::from_toml_str(&contents)
}

/// Reason Excel would refuse `name` as a worksheet name, if any.
pub fn worksheet_name_problem(name: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        return Some("worksheet name is empty");
    }
    if name.chars().count() > MAX_WORKSHEET_NAME_LEN {
        return Some("worksheet name is longer than 31 characters");
    }
    if name.chars().any(|ch| INVALID_WORKSHEET_CHARS.contains(&ch)) {
        return Some("worksheet name contains one of [ ] : * ? / \\");
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Some("worksheet name starts or ends with an apostrophe");
    }
    if name.eq_ignore_ascii_case("History") {
        return Some("'History' is reserved by Excel");
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    Date,
    Amount,
}

struct ClaimField {
    camel: &'static str,
    output: &'static str,
    kind: FieldKind,
}

const fn field(camel: &'static str, output: &'static str, kind: FieldKind) -> ClaimField {
    ClaimField {
        camel,
        output,
        kind,
    }
}

// Spaced-layout source names are identical to the output names.
const CLAIM_FIELDS: [ClaimField; 23] = [
    field("ClientName", "Client Name", FieldKind::Text),
    field("PolicyNo", "Policy No", FieldKind::Text),
    field("ClaimNo", "Claim No", FieldKind::Text),
    field("MemberNo", "Member No", FieldKind::Text),
    field("Membership", "Membership", FieldKind::Text),
    field("PatientName", "Patient Name", FieldKind::Text),
    field("EmpID", "Emp ID", FieldKind::Text),
    field("EmpName", "Emp Name", FieldKind::Text),
    field("ClaimType", "Claim Type", FieldKind::Text),
    field("ProductType", "Product Type", FieldKind::Text),
    field("RoomOption", "Room Option", FieldKind::Text),
    field("TreatmentRoomClass", "Treatment Room Class", FieldKind::Text),
    field("TreatmentPlace", "Treatment Place", FieldKind::Text),
    field("TreatmentStart", "Treatment Start", FieldKind::Date),
    field("TreatmentFinish", "Treatment Finish", FieldKind::Date),
    field("Diagnosis", "Diagnosis", FieldKind::Text),
    field("PaymentDate", "Payment Date", FieldKind::Date),
    field("Billed", "Billed", FieldKind::Amount),
    field("Accepted", "Accepted", FieldKind::Amount),
    field("ExcessCoy", "Excess Coy", FieldKind::Amount),
    field("ExcessEmp", "Excess Emp", FieldKind::Amount),
    field("ExcessTotal", "Excess Total", FieldKind::Amount),
    field("Unpaid", "Unpaid", FieldKind::Amount),
];

/// Output column left out of the reduced layout.
const REDUCED_DROPPED_OUTPUT: &str = "Excess Emp";

/// Built-in source layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    /// `ClientName`, `PolicyNo`, ... with status in `ClaimStatus`.
    #[default]
    Camel,
    /// `Client Name`, `Policy No`, ... with status in `Status Claim`.
    Spaced,
    /// Camel-case layout without the employee excess column.
    Reduced,
}

impl SchemaVariant {
    pub const ALL: [Self; 3] = [Self::Camel, Self::Spaced, Self::Reduced];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Camel => "camel",
            Self::Spaced => "spaced",
            Self::Reduced => "reduced",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Camel => "Camel-case source columns (ClientName, ClaimStatus, ...)",
            Self::Spaced => "Spaced source columns (Client Name, Status Claim, ...)",
            Self::Reduced => "Camel-case source columns without Excess Emp",
        }
    }

    fn status_column(self) -> &'static str {
        match self {
            Self::Camel | Self::Reduced => "ClaimStatus",
            Self::Spaced => "Status Claim",
        }
    }

    /// Build the configuration for this layout.
    pub fn config(self) -> SchemaConfig {
        let fields: Vec<&ClaimField> = CLAIM_FIELDS
            .iter()
            .filter(|field| self != Self::Reduced || field.output != REDUCED_DROPPED_OUTPUT)
            .collect();
        let source = |field: &ClaimField| match self {
            Self::Camel | Self::Reduced => field.camel.to_string(),
            Self::Spaced => field.output.to_string(),
        };
        let outputs_of = |kind: FieldKind| {
            fields
                .iter()
                .filter(|field| field.kind == kind)
                .map(|field| field.output.to_string())
                .collect::<Vec<_>>()
        };

        SchemaConfig {
            name: self.as_str().to_string(),
            status_column: self.status_column().to_string(),
            status_sentinel: DEFAULT_SENTINEL.to_string(),
            required_columns: fields.iter().map(|&field| source(field)).collect(),
            date_columns: outputs_of(FieldKind::Date),
            numeric_columns: outputs_of(FieldKind::Amount),
            columns: fields
                .iter()
                .map(|&field| ColumnMapping::new(source(field), field.output))
                .collect(),
            worksheet_name: DEFAULT_WORKSHEET_NAME.to_string(),
            totals: TotalsColumns::default(),
        }
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVariant {
    type Err = SchemaError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| SchemaError::UnknownVariant(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_variants_validate() {
        for variant in SchemaVariant::ALL {
            variant.config().validate().expect("built-in schema is valid");
        }
    }

    #[test]
    fn camel_matches_claim_template() {
        let config = SchemaVariant::Camel.config();
        assert_eq!(config.columns.len(), 23);
        assert_eq!(config.columns[0], ColumnMapping::new("ClientName", "Client Name"));
        assert_eq!(config.columns[22], ColumnMapping::new("Unpaid", "Unpaid"));
        assert_eq!(
            config.date_columns,
            vec!["Treatment Start", "Treatment Finish", "Payment Date"]
        );
        assert_eq!(config.numeric_columns.len(), 6);
        assert_eq!(config.required_columns.len(), 23);
        assert_eq!(config.status_column, "ClaimStatus");
    }

    #[test]
    fn spaced_differs_only_in_source_names() {
        let camel = SchemaVariant::Camel.config();
        let spaced = SchemaVariant::Spaced.config();
        let camel_outputs: Vec<&str> = camel.output_columns().collect();
        let spaced_outputs: Vec<&str> = spaced.output_columns().collect();
        assert_eq!(camel_outputs, spaced_outputs);
        assert_eq!(spaced.status_column, "Status Claim");
        assert!(spaced.is_required("Treatment Room Class"));
    }

    #[test]
    fn reduced_drops_employee_excess() {
        let config = SchemaVariant::Reduced.config();
        assert_eq!(config.columns.len(), 22);
        assert!(!config.has_output("Excess Emp"));
        assert!(!config.is_required("ExcessEmp"));
        assert!(!config.is_numeric_column("Excess Emp"));
    }

    #[test]
    fn variant_parses_case_insensitively() {
        assert_eq!("Spaced".parse::<SchemaVariant>().unwrap(), SchemaVariant::Spaced);
        assert!(matches!(
            "wide".parse::<SchemaVariant>(),
            Err(SchemaError::UnknownVariant(_))
        ));
    }

    #[test]
    fn worksheet_name_rules() {
        assert_eq!(worksheet_name_problem("Benefit Claim"), None);
        assert!(worksheet_name_problem("").is_some());
        assert!(worksheet_name_problem("a/b").is_some());
        assert!(worksheet_name_problem(&"x".repeat(32)).is_some());
        assert!(worksheet_name_problem("history").is_some());
    }
}
