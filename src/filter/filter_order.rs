use std::cmp::Ordering;

use super::types::{BookRow, FilterOrderInfo, OrderField, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Title ascending, applied when the caller names no valid field.
    pub const DEFAULT: [FilterOrderInfo; 1] = [FilterOrderInfo {
        field: OrderField::Title,
        sort: SortDirection::Asc,
    }];

    /// Parse `ordering=-publication_year,title`. Unknown fields are skipped.
    pub fn parse(ordering: &str) -> Vec<FilterOrderInfo> {
        let mut out = Vec::new();
        for part in ordering.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }
            let (name, sort) = match trimmed.strip_prefix('-') {
                Some(rest) => (rest, SortDirection::Desc),
                None => (trimmed, SortDirection::Asc),
            };
            match OrderField::parse(name) {
                Some(field) => out.push(FilterOrderInfo { field, sort }),
                None => tracing::debug!("Ignoring unknown ordering field: {}", name),
            }
        }
        out
    }

    /// Parsed ordering, or the default when nothing valid was given.
    pub fn resolve(ordering: Option<&str>) -> Vec<FilterOrderInfo> {
        let parsed = ordering.map(Self::parse).unwrap_or_default();
        if parsed.is_empty() {
            Self::DEFAULT.to_vec()
        } else {
            parsed
        }
    }

    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        let mut parts: Vec<String> = infos
            .iter()
            .map(|i| format!("{} {}", i.field.column(), i.sort.to_sql()))
            .collect();
        parts.push("b.id ASC".to_string());
        format!("ORDER BY {}", parts.join(", "))
    }

    pub fn compare(infos: &[FilterOrderInfo], a: &BookRow<'_>, b: &BookRow<'_>) -> Ordering {
        for info in infos {
            let ord = match info.field {
                OrderField::Title => a.book.title.cmp(&b.book.title),
                OrderField::PublicationYear => a.book.publication_year.cmp(&b.book.publication_year),
            };
            let ord = match info.sort {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        a.book.id.cmp(&b.book.id)
    }
}
