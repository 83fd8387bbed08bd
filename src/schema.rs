use crate::models::Field;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Plain,
    StatusBadge,
    Actions,
    Date,
}

/// One table column. `data_key` is required for `Plain` and `Date` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub label: &'static str,
    pub kind: ColumnKind,
    pub data_key: Option<Field>,
    pub style_class: Option<&'static str>,
    /// Preferred terminal width in cells.
    pub width: u16,
}

impl ColumnSpec {
    pub const fn plain(label: &'static str, key: Field, width: u16) -> Self {
        Self {
            label,
            kind: ColumnKind::Plain,
            data_key: Some(key),
            style_class: None,
            width,
        }
    }

    pub const fn date(label: &'static str, key: Field, width: u16) -> Self {
        Self {
            label,
            kind: ColumnKind::Date,
            data_key: Some(key),
            style_class: Some("col-date"),
            width,
        }
    }

    pub const fn with_class(mut self, class: &'static str) -> Self {
        self.style_class = Some(class);
        self
    }
}

pub const JOB_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        label: "Status",
        kind: ColumnKind::StatusBadge,
        data_key: Some(Field::Status),
        style_class: Some("col-status"),
        width: 12,
    },
    ColumnSpec {
        label: "Actions",
        kind: ColumnKind::Actions,
        data_key: None,
        style_class: Some("col-actions"),
        width: 20,
    },
    ColumnSpec::plain("Job title", Field::JobTitle, 32).with_class("col-title"),
    ColumnSpec::plain("German", Field::GermanRequired, 8),
    ColumnSpec::plain("Tech job", Field::TechJob, 8),
    ColumnSpec::plain("Seniority", Field::Seniority, 10),
    ColumnSpec::plain("Company", Field::Company, 20),
    ColumnSpec::plain("Location", Field::Location, 16),
    ColumnSpec::date("Added", Field::LastModTime, 26),
    ColumnSpec::plain("Required skills", Field::RequiredSkills, 30).with_class("col-notes"),
    ColumnSpec::plain("Preferred skills", Field::PreferredSkills, 30).with_class("col-notes"),
    ColumnSpec::plain("Immatrikulation", Field::Immatrikulation, 10),
    ColumnSpec::plain("Other requirements", Field::OtherRequirements, 30).with_class("col-notes"),
    ColumnSpec::plain("Category", Field::Category, 16),
];

/// The static column set for the job table.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSchema {
    columns: &'static [ColumnSpec],
}

impl ColumnSchema {
    pub const fn new(columns: &'static [ColumnSpec]) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &'static [ColumnSpec] {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn header(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.label).collect()
    }
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self::new(JOB_COLUMNS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_layout() {
        let schema = ColumnSchema::default();
        assert_eq!(schema.len(), 14);
        assert_eq!(schema.columns()[0].kind, ColumnKind::StatusBadge);
        assert_eq!(schema.columns()[1].kind, ColumnKind::Actions);
        assert_eq!(schema.header()[2], "Job title");
    }

    #[test]
    fn test_data_columns_have_keys() {
        for col in ColumnSchema::default().columns() {
            match col.kind {
                ColumnKind::Plain | ColumnKind::Date => {
                    assert!(col.data_key.is_some(), "{} has no data key", col.label)
                }
                ColumnKind::Actions => assert!(col.data_key.is_none()),
                ColumnKind::StatusBadge => {}
            }
        }
    }

    #[test]
    fn test_exactly_one_date_column_reads_last_mod_time() {
        let dates: Vec<_> = ColumnSchema::default()
            .columns()
            .iter()
            .filter(|c| c.kind == ColumnKind::Date)
            .collect();
        assert_eq!(dates.len(), 1);
        assert_eq!(dates[0].data_key, Some(Field::LastModTime));
    }
}
