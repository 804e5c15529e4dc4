use std::collections::HashSet;

use tracing::{debug, trace, warn};

use crate::domain::{DTError, HeaderPolicy, RenderConfig};
use crate::humanize::humanize_field_name;
use crate::record::{CellValue, Record};

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    /// Identity in keyed targets. Equal to the label.
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeaderRow {
    pub cells: Vec<HeaderCell>,
}

impl HeaderRow {
    /// Keys that occur more than once, in order of their second occurrence.
    pub fn duplicate_keys(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.cells
            .iter()
            .filter(|c| !seen.insert(c.key.as_str()))
            .map(|c| c.key.as_str())
            .collect()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|c| c.label.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Field name the value was looked up by.
    pub key: String,
    pub value: Option<CellValue>,
}

impl Cell {
    pub fn text(&self) -> String {
        self.value.as_ref().map(|v| v.to_string()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BodyRow {
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableArtifact {
    Empty,
    Table { header: HeaderRow, body: Vec<BodyRow> },
}

impl TableArtifact {
    pub fn is_empty(&self) -> bool {
        matches!(self, TableArtifact::Empty)
    }

    pub fn header(&self) -> Option<&HeaderRow> {
        match self {
            TableArtifact::Empty => None,
            TableArtifact::Table { header, .. } => Some(header),
        }
    }

    pub fn body(&self) -> &[BodyRow] {
        match self {
            TableArtifact::Empty => &[],
            TableArtifact::Table { body, .. } => body,
        }
    }
}

/// Builds a header and body rows from a sequence of uniform records.
#[derive(Debug, Clone, Default)]
pub struct TableRenderer {
    config: RenderConfig,
}

impl TableRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Field names of the first record, without the trailing one unless configured otherwise.
    pub fn derive_field_names(&self, dataset: &[Record]) -> Result<Vec<String>, DTError> {
        let first = dataset.first().ok_or(DTError::NoFields)?;
        if first.is_empty() {
            return Err(DTError::NoFields);
        }
        let mut names: Vec<String> = first.field_names().map(str::to_string).collect();
        if self.config.drop_trailing_field
            && let Some(dropped) = names.pop()
        {
            trace!("Dropping trailing field {dropped:?}");
        }
        Ok(names)
    }

    pub fn build_header_row(&self, field_names: &[String]) -> Result<HeaderRow, DTError> {
        let cells = field_names
            .iter()
            .map(|name| {
                let label = match humanize_field_name(name) {
                    Ok(label) => label,
                    Err(e) if self.config.header_policy == HeaderPolicy::Fallback => {
                        warn!("{e}; using raw field name");
                        name.clone()
                    }
                    Err(e) => return Err(DTError::from(e)),
                };
                Ok(HeaderCell {
                    key: label.clone(),
                    label,
                })
            })
            .collect::<Result<Vec<_>, DTError>>()?;

        let header = HeaderRow { cells };
        for key in header.duplicate_keys() {
            warn!("Header label {key:?} occurs more than once");
        }
        Ok(header)
    }

    pub fn build_cell(field_name: &str, record: &Record) -> Cell {
        Cell {
            key: field_name.to_string(),
            value: record.get(field_name).cloned(),
        }
    }

    pub fn build_body_rows(field_names: &[String], dataset: &[Record]) -> Vec<BodyRow> {
        dataset
            .iter()
            .map(|record| BodyRow {
                cells: field_names
                    .iter()
                    .map(|name| Self::build_cell(name, record))
                    .collect(),
            })
            .collect()
    }

    pub fn render(&self, dataset: Option<&[Record]>) -> Result<TableArtifact, DTError> {
        let dataset = match dataset {
            Some(d) if !d.is_empty() => d,
            _ => {
                debug!("Nothing to render");
                return Ok(TableArtifact::Empty);
            }
        };

        let field_names = self.derive_field_names(dataset)?;
        let header = self.build_header_row(&field_names)?;
        let body = Self::build_body_rows(&field_names, dataset);
        debug!(
            "Rendered {} columns x {} rows",
            header.cells.len(),
            body.len()
        );
        Ok(TableArtifact::Table { header, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FormatError;

    fn users() -> Vec<Record> {
        vec![
            Record::new().with("userName", "al").with("age", 30).with("pad", 0),
            Record::new().with("userName", "bo").with("age", 40).with("pad", 0),
        ]
    }

    #[test]
    fn empty_and_absent_render_nothing() {
        let renderer = TableRenderer::default();
        for artifact in [
            renderer.render(None).unwrap(),
            renderer.render(Some(&[])).unwrap(),
        ] {
            assert!(artifact.is_empty());
            assert!(artifact.header().is_none());
            assert!(artifact.body().is_empty());
        }
    }

    #[test]
    fn drops_last_field_of_first_record() {
        let data = vec![Record::new().with("id", 1).with("userName", "al").with("extra", "x")];
        let names = TableRenderer::default().derive_field_names(&data).unwrap();
        assert_eq!(names, vec!["id", "userName"]);
    }

    #[test]
    fn keeps_last_field_when_configured() {
        let renderer = TableRenderer::new(RenderConfig {
            drop_trailing_field: false,
            ..RenderConfig::default()
        });
        let data = vec![Record::new().with("id", 1).with("extra", "x")];
        assert_eq!(renderer.derive_field_names(&data).unwrap(), vec!["id", "extra"]);
    }

    #[test]
    fn record_without_fields_is_an_error() {
        let data = vec![Record::new()];
        assert!(matches!(
            TableRenderer::default().derive_field_names(&data),
            Err(DTError::NoFields)
        ));
        assert!(matches!(
            TableRenderer::default().render(Some(&data)),
            Err(DTError::NoFields)
        ));
    }

    #[test]
    fn single_field_record_renders_no_columns() {
        let data = vec![Record::new().with("id", 1), Record::new().with("id", 2)];
        let artifact = TableRenderer::default().render(Some(&data)).unwrap();
        assert_eq!(artifact.header().unwrap().cells.len(), 0);
        assert_eq!(artifact.body().len(), 2);
        assert!(artifact.body().iter().all(|r| r.cells.is_empty()));
    }

    #[test]
    fn body_rows_follow_dataset_order() {
        let artifact = TableRenderer::default().render(Some(&users())).unwrap();
        let header: Vec<&str> = artifact.header().unwrap().labels().collect();
        assert_eq!(header, vec!["User Name", "Age"]);

        let body = artifact.body();
        assert_eq!(body.len(), 2);
        let values: Vec<Vec<Option<CellValue>>> = body
            .iter()
            .map(|r| r.cells.iter().map(|c| c.value.clone()).collect())
            .collect();
        assert_eq!(
            values,
            vec![
                vec![Some(CellValue::from("al")), Some(CellValue::Int(30))],
                vec![Some(CellValue::from("bo")), Some(CellValue::Int(40))],
            ]
        );
        let keys: Vec<&str> = body[0].cells.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["userName", "age"]);
    }

    #[test]
    fn render_is_idempotent() {
        let renderer = TableRenderer::default();
        let data = users();
        assert_eq!(
            renderer.render(Some(&data)).unwrap(),
            renderer.render(Some(&data)).unwrap()
        );
    }

    #[test]
    fn missing_field_renders_empty_cell() {
        let data = vec![
            Record::new().with("name", "al").with("age", 30).with("pad", 0),
            Record::new().with("name", "bo").with("pad", 0),
        ];
        let artifact = TableRenderer::default().render(Some(&data)).unwrap();
        let cell = &artifact.body()[1].cells[1];
        assert_eq!(cell.key, "age");
        assert_eq!(cell.value, None);
        assert_eq!(cell.text(), "");
    }

    #[test]
    fn bad_field_name_aborts_strict_render() {
        let data = vec![Record::new().with("userID", 1).with("pad", 0)];
        let err = TableRenderer::default().render(Some(&data)).unwrap_err();
        assert!(matches!(
            err,
            DTError::FormatError(FormatError { ref field, position: 4 }) if field == "userID"
        ));
    }

    #[test]
    fn fallback_policy_uses_raw_name() {
        let renderer = TableRenderer::new(RenderConfig {
            header_policy: HeaderPolicy::Fallback,
            ..RenderConfig::default()
        });
        let data = vec![Record::new().with("userID", 1).with("userName", "al").with("pad", 0)];
        let artifact = renderer.render(Some(&data)).unwrap();
        let header: Vec<&str> = artifact.header().unwrap().labels().collect();
        assert_eq!(header, vec!["userID", "User Name"]);
    }

    #[test]
    fn colliding_labels_are_reported() {
        let renderer = TableRenderer::default();
        let header = renderer
            .build_header_row(&["userName".to_string(), "UserName".to_string()])
            .unwrap();
        assert_eq!(header.cells.len(), 2);
        assert_eq!(header.duplicate_keys(), vec!["User Name"]);
    }
}
