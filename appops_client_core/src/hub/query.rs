//! Typed record queries rendered to SOQL

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
}

impl FieldValue {
    fn render(&self) -> String {
        match self {
            Self::Text(text) => format!("'{}'", escape(text)),
            Self::Bool(value) => value.to_string(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Equality condition on a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: String,
    pub value: FieldValue,
}

/// A query over one object with AND-ed equality conditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    pub object: String,
    pub fields: Vec<String>,
    pub conditions: Vec<Condition>,
    /// Field the rows are sorted on, newest first
    pub order_by_desc: Option<String>,
    pub limit: Option<usize>,
}

impl RecordQuery {
    pub fn select(object: &str, fields: &[&str]) -> Self {
        Self {
            object: object.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            conditions: Vec::new(),
            order_by_desc: None,
            limit: None,
        }
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.conditions.push(Condition {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn order_by_desc(mut self, field: &str) -> Self {
        self.order_by_desc = Some(field.to_string());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Condition placed on `field`, if any
    pub fn condition(&self, field: &str) -> Option<&FieldValue> {
        self.conditions
            .iter()
            .find(|c| c.field == field)
            .map(|c| &c.value)
    }

    pub fn to_soql(&self) -> String {
        let mut soql = format!("SELECT {} FROM {}", self.fields.join(", "), self.object);

        if !self.conditions.is_empty() {
            let clauses: Vec<String> = self
                .conditions
                .iter()
                .map(|c| format!("{} = {}", c.field, c.value.render()))
                .collect();
            soql.push_str(" WHERE ");
            soql.push_str(&clauses.join(" AND "));
        }

        if let Some(field) = &self.order_by_desc {
            soql.push_str(&format!(" ORDER BY {field} DESC"));
        }

        if let Some(limit) = self.limit {
            soql.push_str(&format!(" LIMIT {limit}"));
        }

        soql
    }
}

impl fmt::Display for RecordQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_soql())
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}
