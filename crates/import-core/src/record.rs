//! A single parsed data row.

use serde::Serialize;

/// One data row read from a delimited text file.
///
/// Columns keep the order they had in the header line. Both names and
/// values are stored already trimmed; the CSV source is responsible for
/// trimming before building a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Line number in the source file where this row starts (header is line 1).
    pub line: u64,
    fields: Vec<(String, String)>,
}

impl Record {
    /// Create an empty record for the given source line.
    pub fn new(line: u64) -> Self {
        Self {
            line,
            fields: Vec::new(),
        }
    }

    /// Append a column. A repeated column name replaces the earlier value,
    /// keeping its original position.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some(existing) => existing.1 = value,
            None => self.fields.push((column, value)),
        }
    }

    /// Builder-style variant of [`Record::push`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
