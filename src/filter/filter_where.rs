use serde_json::Value;

use super::types::{BookRow, FilterCondition, FilterOp, FilterWhereInfo};

pub struct FilterWhere {
    param_values: Vec<Value>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Render conditions as a parameterized SQL predicate joined with AND.
    pub fn generate(conditions: &[FilterCondition], starting_param_index: usize) -> (String, Vec<Value>) {
        let mut filter_where = Self::new(starting_param_index);
        let clause = filter_where.build(conditions);
        (clause, filter_where.param_values)
    }

    /// Evaluate conditions against an in-memory row.
    pub fn matches(conditions: &[FilterCondition], row: &BookRow<'_>) -> bool {
        conditions.iter().all(|condition| match condition {
            FilterCondition::Field(info) => Self::matches_info(info, row),
            FilterCondition::AnyOf(infos) => infos.iter().any(|info| Self::matches_info(info, row)),
        })
    }

    fn build(&mut self, conditions: &[FilterCondition]) -> String {
        let mut sql_conditions = vec![];
        for condition in conditions {
            match condition {
                FilterCondition::Field(info) => sql_conditions.push(self.build_sql_condition(info)),
                FilterCondition::AnyOf(infos) => {
                    if infos.is_empty() {
                        continue;
                    }
                    let parts: Vec<String> = infos.iter().map(|info| self.build_sql_condition(info)).collect();
                    sql_conditions.push(format!("({})", parts.join(" OR ")));
                }
            }
        }
        if sql_conditions.is_empty() {
            "1=1".to_string()
        } else {
            sql_conditions.join(" AND ")
        }
    }

    fn build_sql_condition(&mut self, info: &FilterWhereInfo) -> String {
        let column = info.field.column();
        match info.operator {
            FilterOp::Eq => format!("{} = {}", column, self.param(info.data.clone())),
            // strpos avoids having to escape LIKE wildcards in user input
            FilterOp::IContains => format!("strpos(lower({}), lower({})) > 0", column, self.param(info.data.clone())),
        }
    }

    fn matches_info(info: &FilterWhereInfo, row: &BookRow<'_>) -> bool {
        let actual = info.field.value_of(row);
        match info.operator {
            FilterOp::Eq => actual == info.data,
            FilterOp::IContains => match (actual.as_str(), info.data.as_str()) {
                (Some(haystack), Some(needle)) => haystack.to_lowercase().contains(&needle.to_lowercase()),
                _ => false,
            },
        }
    }

    fn param(&mut self, value: Value) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}
