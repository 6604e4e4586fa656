//! Table records and the columns that can be filtered on.
//!
//! A dataset is supplied once at startup, either built in or loaded from a
//! JSON/TOML file. There is no update API: new data means a new table.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Kind of item a row describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatumType {
    Coin,
    Note,
}

impl DatumType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Coin => "Coin",
            Self::Note => "Note",
        }
    }
}

impl fmt::Display for DatumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datum {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DatumType,
}

impl Datum {
    pub fn new(name: impl Into<String>, kind: DatumType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Cell text for a column. This is the exact string filters compare against.
    pub fn field(&self, column: Column) -> String {
        match column {
            Column::Name => self.name.clone(),
            Column::Type => self.kind.to_string(),
        }
    }
}

/// Filterable columns, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    Type,
}

impl Column {
    pub const ALL: [Column; 2] = [Column::Name, Column::Type];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Type => "Type",
        }
    }

    /// Position of this column in a rendered row
    pub fn index(&self) -> usize {
        match self {
            Self::Name => 0,
            Self::Type => 1,
        }
    }

    /// Parse a column from its title (case-insensitive)
    pub fn from_title(title: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.title().eq_ignore_ascii_case(title.trim()))
    }
}

/// TOML wrapper: `[[rows]]` tables
#[derive(Debug, Deserialize)]
struct TomlDataset {
    #[serde(default)]
    rows: Vec<Datum>,
}

/// Built-in dataset used when no file is given
pub fn default_dataset() -> Vec<Datum> {
    vec![
        Datum::new("A", DatumType::Coin),
        Datum::new("B", DatumType::Coin),
        Datum::new("C", DatumType::Note),
        Datum::new("D", DatumType::Note),
    ]
}

/// Load a dataset from disk. `.toml` files use `[[rows]]`, everything else is
/// parsed as a JSON array.
pub fn load_dataset(path: &Path) -> Result<Vec<Datum>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file: {:?}", path))?;

    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);

    if is_toml {
        parse_toml_dataset(&contents).with_context(|| format!("Failed to parse {:?}", path))
    } else {
        parse_json_dataset(&contents).with_context(|| format!("Failed to parse {:?}", path))
    }
}

pub fn parse_json_dataset(contents: &str) -> Result<Vec<Datum>> {
    let data: Vec<Datum> = serde_json::from_str(contents).context("Invalid JSON dataset")?;
    validate_dataset(&data)?;
    Ok(data)
}

pub fn parse_toml_dataset(contents: &str) -> Result<Vec<Datum>> {
    let parsed: TomlDataset = toml::from_str(contents).context("Invalid TOML dataset")?;
    validate_dataset(&parsed.rows)?;
    Ok(parsed.rows)
}

/// Reject rows whose name cannot be shown or matched
fn validate_dataset(data: &[Datum]) -> Result<()> {
    if let Some(pos) = data.iter().position(|d| d.name.trim().is_empty()) {
        bail!("Row {} has an empty name", pos + 1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_text_matches_display() {
        let datum = Datum::new("A", DatumType::Coin);
        assert_eq!(datum.field(Column::Name), "A");
        assert_eq!(datum.field(Column::Type), "Coin");
    }

    #[test]
    fn test_column_order_and_titles() {
        assert_eq!(Column::ALL[0].index(), 0);
        assert_eq!(Column::ALL[1].index(), 1);
        assert_eq!(Column::from_title("type"), Some(Column::Type));
        assert_eq!(Column::from_title(" Name "), Some(Column::Name));
        assert_eq!(Column::from_title("price"), None);
    }

    #[test]
    fn test_parse_json_dataset() {
        let json = r#"[{"name":"A","type":"Coin"},{"name":"C","type":"Note"}]"#;
        let data = parse_json_dataset(json).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[1], Datum::new("C", DatumType::Note));
    }

    #[test]
    fn test_parse_toml_dataset() {
        let toml = r#"
            [[rows]]
            name = "A"
            type = "Coin"

            [[rows]]
            name = "B"
            type = "Note"
        "#;
        let data = parse_toml_dataset(toml).unwrap();
        assert_eq!(data, vec![Datum::new("A", DatumType::Coin), Datum::new("B", DatumType::Note)]);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let json = r#"[{"name":"A","type":"Bond"}]"#;
        assert!(parse_json_dataset(json).is_err());
    }

    #[test]
    fn test_empty_name_rejected() {
        let json = r#"[{"name":"A","type":"Coin"},{"name":"  ","type":"Note"}]"#;
        let err = parse_json_dataset(json).unwrap_err();
        assert!(err.to_string().contains("Row 2"));
    }

    #[test]
    fn test_load_dataset_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("rows.json");
        fs::write(&json_path, r#"[{"name":"X","type":"Note"}]"#).unwrap();
        assert_eq!(load_dataset(&json_path).unwrap()[0].name, "X");

        let toml_path = dir.path().join("rows.toml");
        fs::write(&toml_path, "[[rows]]\nname = \"Y\"\ntype = \"Coin\"\n").unwrap();
        assert_eq!(load_dataset(&toml_path).unwrap()[0].kind, DatumType::Coin);
    }

    #[test]
    fn test_default_dataset() {
        let data = default_dataset();
        assert_eq!(data.len(), 4);
        assert_eq!(data.iter().filter(|d| d.kind == DatumType::Coin).count(), 2);
    }
}
