use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::form_urlencoded;

use crate::database::models::Book;

/// Raw list query parameters as they arrive on `GET /api/books`.
///
/// Everything is kept as a string so that malformed numbers can be reported
/// as field errors instead of a generic extractor rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterData {
    pub title: Option<String>,
    pub author: Option<String>,
    pub author_name: Option<String>,
    pub publication_year: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl FilterData {
    /// Read from a raw query string. A repeated key keeps its last value; unknown keys are ignored.
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut data = Self::default();
        for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let slot = match key.as_ref() {
                "title" => &mut data.title,
                "author" => &mut data.author,
                "author_name" => &mut data.author_name,
                "publication_year" => &mut data.publication_year,
                "search" => &mut data.search,
                "ordering" => &mut data.ordering,
                _ => continue,
            };
            *slot = Some(value.into_owned());
        }
        data
    }
}

/// Last value of `key` in a raw query string.
pub fn query_value(raw: Option<&str>, key: &str) -> Option<String> {
    form_urlencoded::parse(raw.unwrap_or_default().as_bytes())
        .filter(|(k, _)| k == key)
        .last()
        .map(|(_, v)| v.into_owned())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    IContains,
}

/// Columns a list query may test against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Title,
    AuthorId,
    PublicationYear,
    AuthorName,
}

impl FilterField {
    pub fn column(&self) -> &'static str {
        match self {
            FilterField::Title => "b.title",
            FilterField::AuthorId => "b.author_id",
            FilterField::PublicationYear => "b.publication_year",
            FilterField::AuthorName => "a.name",
        }
    }

    pub fn value_of(&self, row: &BookRow<'_>) -> Value {
        match self {
            FilterField::Title => Value::String(row.book.title.clone()),
            FilterField::AuthorId => Value::from(row.book.author_id),
            FilterField::PublicationYear => Value::from(row.book.publication_year),
            FilterField::AuthorName => Value::String(row.author_name.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterWhereInfo {
    pub field: FilterField,
    pub operator: FilterOp,
    pub data: Value,
}

#[derive(Debug, Clone)]
pub enum FilterCondition {
    /// A single field test.
    Field(FilterWhereInfo),
    /// Satisfied when any inner test holds (one search term across fields).
    AnyOf(Vec<FilterWhereInfo>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Fields a caller may order by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    Title,
    PublicationYear,
}

impl OrderField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "title" => Some(OrderField::Title),
            "publication_year" => Some(OrderField::PublicationYear),
            _ => None,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            OrderField::Title => "b.title",
            OrderField::PublicationYear => "b.publication_year",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOrderInfo {
    pub field: OrderField,
    pub sort: SortDirection,
}

/// A book joined with its author's name, the shape in-memory matching works on.
#[derive(Debug, Clone, Copy)]
pub struct BookRow<'a> {
    pub book: &'a Book,
    pub author_name: &'a str,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_keys_keep_the_last_value() {
        let data = FilterData::from_query(Some("title=a&title=The%20Hobbit&ordering=-title&page=2"));
        assert_eq!(data.title.as_deref(), Some("The Hobbit"));
        assert_eq!(data.ordering.as_deref(), Some("-title"));
        assert_eq!(data.search, None);
    }

    #[test]
    fn missing_query_is_empty() {
        assert_eq!(FilterData::from_query(None), FilterData::default());
    }

    #[test]
    fn decodes_plus_as_space() {
        assert_eq!(query_value(Some("name=Central+Library&name=Main+Branch"), "name").as_deref(), Some("Main Branch"));
        assert_eq!(query_value(Some("title=x"), "name"), None);
    }
}
