use serde_json::Value;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{
    BookRow, FilterCondition, FilterData, FilterField, FilterOp, FilterOrderInfo, FilterWhereInfo, SqlResult,
};

const BOOK_SELECT: &str =
    "SELECT b.id, b.title, b.publication_year, b.author_id FROM books b JOIN authors a ON a.id = b.author_id";

/// Compiled list query: exact filters, search terms and ordering.
#[derive(Debug, Clone)]
pub struct Filter {
    conditions: Vec<FilterCondition>,
    order_data: Vec<FilterOrderInfo>,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            conditions: vec![],
            order_data: FilterOrder::DEFAULT.to_vec(),
        }
    }
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(mut self, data: FilterData) -> Result<Self, FilterError> {
        if let Some(title) = non_empty(data.title.as_deref()) {
            self = self.exact(FilterField::Title, Value::String(title.to_string()));
        }
        if let Some(author) = non_empty(data.author.as_deref()) {
            let id = parse_number("author", author)?;
            self = self.exact(FilterField::AuthorId, Value::from(id));
        }
        if let Some(name) = non_empty(data.author_name.as_deref()) {
            self = self.exact(FilterField::AuthorName, Value::String(name.to_string()));
        }
        if let Some(year) = non_empty(data.publication_year.as_deref()) {
            let year = parse_number("publication_year", year)?;
            self = self.exact(FilterField::PublicationYear, Value::from(year));
        }
        if let Some(search) = data.search.as_deref() {
            self = self.search(search);
        }
        self.order_data = FilterOrder::resolve(data.ordering.as_deref());
        Ok(self)
    }

    pub fn exact(mut self, field: FilterField, value: Value) -> Self {
        self.conditions.push(FilterCondition::Field(FilterWhereInfo {
            field,
            operator: FilterOp::Eq,
            data: value,
        }));
        self
    }

    /// Every term must appear in the title or the author name.
    pub fn search(mut self, text: &str) -> Self {
        for term in split_search_terms(text) {
            let infos = [FilterField::Title, FilterField::AuthorName]
                .into_iter()
                .map(|field| FilterWhereInfo {
                    field,
                    operator: FilterOp::IContains,
                    data: Value::String(term.clone()),
                })
                .collect();
            self.conditions.push(FilterCondition::AnyOf(infos));
        }
        self
    }

    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    pub fn order_data(&self) -> &[FilterOrderInfo] {
        &self.order_data
    }

    pub fn to_sql(&self) -> SqlResult {
        let (where_clause, params) = FilterWhere::generate(&self.conditions, 0);
        let order_clause = FilterOrder::generate(&self.order_data);
        let query = format!("{} WHERE {} {}", BOOK_SELECT, where_clause, order_clause);
        SqlResult { query, params }
    }

    pub fn matches(&self, row: &BookRow<'_>) -> bool {
        FilterWhere::matches(&self.conditions, row)
    }

    /// Filter and sort in-memory rows.
    pub fn apply<'a>(&self, rows: Vec<BookRow<'a>>) -> Vec<BookRow<'a>> {
        let mut kept: Vec<BookRow<'a>> = rows.into_iter().filter(|row| self.matches(row)).collect();
        kept.sort_by(|a, b| FilterOrder::compare(&self.order_data, a, b));
        kept
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Integer filter value. Integral decimals such as `1937.0` or `1.937e3` are accepted.
fn parse_number(field: &str, value: &str) -> Result<i64, FilterError> {
    if let Ok(n) = value.parse::<i64>() {
        return Ok(n);
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < MAX_EXACT_FLOAT => Ok(f as i64),
        _ => Err(FilterError::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

// 2^53, the largest range where every integer is exactly representable as f64
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// Split free text into search terms on whitespace and commas.
pub fn split_search_terms(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .map(|t| t.replace('\0', ""))
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Book;
    use crate::filter::types::{OrderField, SortDirection};

    fn catalog() -> Vec<(Book, &'static str)> {
        vec![
            (Book { id: 1, title: "Harry Potter".into(), publication_year: 1997, author_id: 1 }, "J.K. Rowling"),
            (Book { id: 2, title: "The Hobbit".into(), publication_year: 1937, author_id: 2 }, "J.R.R. Tolkien"),
            (Book { id: 3, title: "Fantastic Beasts".into(), publication_year: 2001, author_id: 1 }, "J.K. Rowling"),
        ]
    }

    fn run(filter: &Filter) -> Vec<i64> {
        let books = catalog();
        let rows = books.iter().map(|(b, n)| BookRow { book: b, author_name: n }).collect();
        filter.apply(rows).into_iter().map(|r| r.book.id).collect()
    }

    #[test]
    fn default_orders_by_title() {
        assert_eq!(run(&Filter::new()), vec![3, 1, 2]);
    }

    #[test]
    fn assigns_filters_search_and_ordering() {
        let data = FilterData {
            author: Some("1".into()),
            ordering: Some("-publication_year".into()),
            ..Default::default()
        };
        let filter = Filter::new().assign(data).unwrap();
        assert_eq!(run(&filter), vec![3, 1]);
        assert_eq!(
            filter.order_data(),
            &[FilterOrderInfo { field: OrderField::PublicationYear, sort: SortDirection::Desc }]
        );
    }

    #[test]
    fn search_terms_are_and_ed() {
        let filter = Filter::new().search("rowling, beasts");
        assert_eq!(run(&filter), vec![3]);
        let filter = Filter::new().search("hobbit rowling");
        assert!(run(&filter).is_empty());
    }

    #[test]
    fn blank_parameters_are_ignored() {
        let data = FilterData {
            title: Some("".into()),
            author: Some("  ".into()),
            search: Some("   ".into()),
            ..Default::default()
        };
        let filter = Filter::new().assign(data).unwrap();
        assert!(filter.conditions().is_empty());
    }

    #[test]
    fn rejects_non_numeric_year() {
        let data = FilterData { publication_year: Some("nineteen".into()), ..Default::default() };
        let err = Filter::new().assign(data).unwrap_err();
        assert!(matches!(err, FilterError::InvalidNumber { ref field, .. } if field == "publication_year"));
    }

    #[test]
    fn accepts_integral_decimal_years() {
        let data = FilterData { publication_year: Some("1937.0".into()), ..Default::default() };
        let filter = Filter::new().assign(data).unwrap();
        assert_eq!(run(&filter), vec![2]);

        for bad in ["1937.5", "inf", "NaN"] {
            let data = FilterData { publication_year: Some(bad.into()), ..Default::default() };
            assert!(Filter::new().assign(data).is_err(), "{}", bad);
        }
    }

    #[test]
    fn author_name_is_an_exact_match() {
        let data = FilterData { author_name: Some("J.K. Rowling".into()), ..Default::default() };
        let filter = Filter::new().assign(data).unwrap();
        assert_eq!(run(&filter), vec![3, 1]);

        let data = FilterData { author_name: Some("rowling".into()), ..Default::default() };
        assert!(run(&Filter::new().assign(data).unwrap()).is_empty());
    }

    #[test]
    fn builds_joined_select() {
        let filter = Filter::new().exact(FilterField::Title, Value::String("The Hobbit".into()));
        let sql = filter.to_sql();
        assert_eq!(
            sql.query,
            format!("{} WHERE b.title = $1 ORDER BY b.title ASC, b.id ASC", BOOK_SELECT)
        );
        assert_eq!(sql.params.len(), 1);
    }
}
