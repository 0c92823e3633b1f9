//! Generic query building for list endpoints
//!
//! Translates untrusted query-string parameters (`searchTerm`, entity
//! filters, `sort`, `page`, `limit`, `fields`) into SQL against a static
//! per-entity allow-list. The count query and the page query are rendered
//! from the same condition list and bind list, so the total can never be
//! computed against a different filter than the rows.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Pool, Postgres};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

/// Value kind a filterable column accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Int,
    Bool,
    Uuid,
}

/// One entry of a schema's filterable allow-list
#[derive(Debug, Clone, Copy)]
pub struct Column {
    /// Query-string key exposed to clients
    pub key: &'static str,
    /// Qualified SQL column the key maps to
    pub column: &'static str,
    pub kind: ColumnKind,
}

/// Static description of an entity's queryable surface
///
/// Every SQL identifier a query can touch comes from here; client input
/// only ever reaches the database as a bound value.
pub struct QuerySchema {
    /// Fixed predicates applied to every query (e.g. soft-delete exclusion)
    pub base: &'static [&'static str],
    pub filterable: &'static [Column],
    /// Columns included in the free-text `searchTerm` disjunction
    pub searchable: &'static [&'static str],
    /// Sort keys exposed to clients, with the column each maps to
    pub sortable: &'static [(&'static str, &'static str)],
    /// Response fields a `fields` projection may keep
    pub selectable: &'static [&'static str],
    /// Column ordered descending when no sort is given
    pub default_sort: &'static str,
}

/// A value bound into the effective filter
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Int(i64),
    Bool(bool),
    Uuid(Uuid),
}

/// Pagination metadata returned alongside list data
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}

fn is_reserved(key: &str) -> bool {
    matches!(key, "searchTerm" | "sort" | "page" | "limit" | "fields")
}

/// A fully translated list query
///
/// Build one with [`ListQuery::build`], or with [`ListQuery::new`] +
/// [`ListQuery::push_eq`] + [`ListQuery::apply`] when the caller scopes the
/// query to a row set (ownership, approval state) before client parameters
/// are layered on. `apply` runs the translation once; placeholders are
/// numbered at push time so scope predicates and client predicates share
/// one bind list.
pub struct ListQuery {
    schema: &'static QuerySchema,
    conditions: Vec<String>,
    binds: Vec<BindValue>,
    order_by: String,
    page: i64,
    limit: i64,
    fields: Option<Vec<String>>,
}

impl ListQuery {
    pub fn new(schema: &'static QuerySchema) -> Self {
        let mut query = Self {
            schema,
            conditions: Vec::new(),
            binds: Vec::new(),
            order_by: format!("{} DESC", schema.default_sort),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            fields: None,
        };
        for condition in schema.base {
            query.push_raw(condition);
        }
        query
    }

    /// Translate client parameters in one step
    pub fn build(
        schema: &'static QuerySchema,
        params: &IndexMap<String, String>,
    ) -> AppResult<Self> {
        let mut query = Self::new(schema);
        query.apply(params)?;
        Ok(query)
    }

    /// Fixed predicate with no bound value
    pub fn push_raw(&mut self, condition: &str) {
        self.conditions.push(condition.to_string());
    }

    /// Equality predicate with a bound value
    pub fn push_eq(&mut self, column: &str, value: BindValue) {
        self.binds.push(value);
        self.conditions.push(format!("{} = ${}", column, self.binds.len()));
    }

    /// Run the five translation stages over the raw parameter map
    pub fn apply(&mut self, params: &IndexMap<String, String>) -> AppResult<()> {
        self.apply_search(params);
        self.apply_filters(params)?;
        self.apply_sort(params);
        self.apply_pagination(params);
        self.apply_fields(params);
        Ok(())
    }

    fn apply_search(&mut self, params: &IndexMap<String, String>) {
        let Some(term) = params.get("searchTerm") else {
            return;
        };
        let term = term.trim();
        if term.is_empty() || self.schema.searchable.is_empty() {
            return;
        }

        self.binds
            .push(BindValue::Text(format!("%{}%", term.to_lowercase())));
        let placeholder = self.binds.len();
        let group = self
            .schema
            .searchable
            .iter()
            .map(|column| format!("LOWER({}) LIKE ${}", column, placeholder))
            .collect::<Vec<_>>()
            .join(" OR ");
        self.conditions.push(format!("({})", group));
    }

    fn apply_filters(&mut self, params: &IndexMap<String, String>) -> AppResult<()> {
        for (key, value) in params {
            if is_reserved(key) {
                continue;
            }

            let column = self
                .schema
                .filterable
                .iter()
                .find(|column| column.key == key)
                .ok_or_else(|| {
                    AppError::BadRequest(format!("Unknown filter field: {}", key))
                })?;

            let bind = match column.kind {
                ColumnKind::Text => BindValue::Text(value.clone()),
                ColumnKind::Int => BindValue::Int(value.parse().map_err(|_| {
                    AppError::BadRequest(format!("Invalid value for {}: {}", key, value))
                })?),
                ColumnKind::Bool => BindValue::Bool(value.parse().map_err(|_| {
                    AppError::BadRequest(format!("Invalid value for {}: {}", key, value))
                })?),
                ColumnKind::Uuid => {
                    BindValue::Uuid(Uuid::parse_str(value).map_err(|_| {
                        AppError::BadRequest(format!("Invalid value for {}: {}", key, value))
                    })?)
                }
            };

            self.push_eq(column.column, bind);
        }
        Ok(())
    }

    fn apply_sort(&mut self, params: &IndexMap<String, String>) {
        let Some(raw) = params.get("sort") else {
            return;
        };

        let mut clauses = Vec::new();
        for part in raw.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let (key, direction) = match part.strip_prefix('-') {
                Some(rest) => (rest, "DESC"),
                None => (part, "ASC"),
            };
            // Unknown sort keys are dropped rather than rejected.
            if let Some((_, column)) =
                self.schema.sortable.iter().find(|(k, _)| *k == key)
            {
                clauses.push(format!("{} {}", column, direction));
            }
        }

        if !clauses.is_empty() {
            self.order_by = clauses.join(", ");
        }
    }

    fn apply_pagination(&mut self, params: &IndexMap<String, String>) {
        self.page = params
            .get("page")
            .and_then(|value| value.parse::<i64>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(DEFAULT_PAGE);

        self.limit = params
            .get("limit")
            .and_then(|value| value.parse::<i64>().ok())
            .filter(|limit| *limit >= 1)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);
    }

    fn apply_fields(&mut self, params: &IndexMap<String, String>) {
        let Some(raw) = params.get("fields") else {
            return;
        };

        let mut fields: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|field| {
                !field.is_empty() && self.schema.selectable.iter().any(|s| s == field)
            })
            .map(str::to_string)
            .collect();

        if fields.is_empty() {
            return;
        }
        if !fields.iter().any(|field| field == "id") {
            fields.insert(0, "id".to_string());
        }
        self.fields = Some(fields);
    }

    /// The one WHERE clause shared by `count_sql` and `select_sql`
    fn filter_sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Count query over the effective filter
    pub fn count_sql(&self, from: &str) -> String {
        format!("SELECT COUNT(*) FROM {}{}", from, self.filter_sql())
    }

    /// Page query over the same effective filter
    pub fn select_sql(&self, from: &str, select_list: &str) -> String {
        format!(
            "SELECT {} FROM {}{} ORDER BY {} LIMIT {} OFFSET {}",
            select_list,
            from,
            self.filter_sql(),
            self.order_by,
            self.limit,
            (self.page - 1).saturating_mul(self.limit),
        )
    }

    /// Run the count query and the page query, binding the filter values
    /// onto both in placeholder order
    pub async fn fetch_page<O>(
        &self,
        pool: &Pool<Postgres>,
        from: &str,
        select_list: &str,
    ) -> AppResult<(Vec<O>, i64)>
    where
        O: Send + Unpin + for<'r> FromRow<'r, PgRow>,
    {
        let count_sql = self.count_sql(from);
        let mut count = sqlx::query_scalar::<_, i64>(&count_sql);
        for bind in &self.binds {
            count = match bind {
                BindValue::Text(value) => count.bind(value),
                BindValue::Int(value) => count.bind(*value),
                BindValue::Bool(value) => count.bind(*value),
                BindValue::Uuid(value) => count.bind(*value),
            };
        }
        let total = count.fetch_one(pool).await?;

        let select_sql = self.select_sql(from, select_list);
        let mut rows = sqlx::query_as::<_, O>(&select_sql);
        for bind in &self.binds {
            rows = match bind {
                BindValue::Text(value) => rows.bind(value),
                BindValue::Int(value) => rows.bind(*value),
                BindValue::Bool(value) => rows.bind(*value),
                BindValue::Uuid(value) => rows.bind(*value),
            };
        }
        Ok((rows.fetch_all(pool).await?, total))
    }

    pub fn meta(&self, total: i64) -> PageMeta {
        PageMeta {
            page: self.page,
            limit: self.limit,
            total,
        }
    }

    /// Apply the `fields` projection to serialized rows; `id` is always kept
    pub fn project(&self, mut rows: Vec<Value>) -> Vec<Value> {
        let Some(fields) = &self.fields else {
            return rows;
        };
        for row in &mut rows {
            if let Value::Object(map) = row {
                map.retain(|key, _| key == "id" || fields.iter().any(|f| f == key));
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static TEST_SCHEMA: QuerySchema = QuerySchema {
        base: &["b.is_deleted = FALSE"],
        filterable: &[
            Column {
                key: "author",
                column: "b.author",
                kind: ColumnKind::Text,
            },
            Column {
                key: "genre",
                column: "b.genre_id",
                kind: ColumnKind::Uuid,
            },
            Column {
                key: "rating",
                column: "b.rating_count",
                kind: ColumnKind::Int,
            },
        ],
        searchable: &["b.title", "b.author"],
        sortable: &[("title", "b.title"), ("createdAt", "b.created_at")],
        selectable: &["id", "title", "author"],
        default_sort: "b.created_at",
    };

    fn params(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_count_and_select_share_the_filter() {
        let query = ListQuery::build(
            &TEST_SCHEMA,
            &params(&[("searchTerm", "Dune"), ("author", "Frank Herbert")]),
        )
        .unwrap();

        let count = query.count_sql("books b");
        let select = query.select_sql("books b", "b.*");

        let where_clause = count
            .strip_prefix("SELECT COUNT(*) FROM books b")
            .unwrap();
        assert!(where_clause.starts_with(" WHERE "));
        assert!(select.contains(where_clause));
    }

    #[test]
    fn test_placeholders_number_in_push_order() {
        let query = ListQuery::build(
            &TEST_SCHEMA,
            &params(&[("searchTerm", "dune"), ("author", "Frank Herbert")]),
        )
        .unwrap();

        let sql = query.count_sql("books b");
        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM books b WHERE b.is_deleted = FALSE \
             AND (LOWER(b.title) LIKE $1 OR LOWER(b.author) LIKE $1) \
             AND b.author = $2"
        );
        assert_eq!(
            query.binds,
            vec![
                BindValue::Text("%dune%".to_string()),
                BindValue::Text("Frank Herbert".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_term_is_lowercased_and_wrapped() {
        let query =
            ListQuery::build(&TEST_SCHEMA, &params(&[("searchTerm", "  DUNE ")]))
                .unwrap();
        assert_eq!(query.binds, vec![BindValue::Text("%dune%".to_string())]);
    }

    #[test]
    fn test_scope_predicate_shares_the_bind_list() {
        let owner = Uuid::new_v4();
        let mut query = ListQuery::new(&TEST_SCHEMA);
        query.push_eq("b.owner_id", BindValue::Uuid(owner));
        query.apply(&params(&[("searchTerm", "dune")])).unwrap();

        let sql = query.count_sql("books b");
        assert!(sql.contains("b.owner_id = $1"));
        assert!(sql.contains("LIKE $2"));
        assert_eq!(query.binds.len(), 2);
        assert_eq!(query.binds[0], BindValue::Uuid(owner));
    }

    #[test]
    fn test_unknown_filter_key_is_rejected() {
        let result = ListQuery::build(&TEST_SCHEMA, &params(&[("publisher", "Ace")]));
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_unparsable_filter_value_is_rejected() {
        let result = ListQuery::build(&TEST_SCHEMA, &params(&[("genre", "not-a-uuid")]));
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let result = ListQuery::build(&TEST_SCHEMA, &params(&[("rating", "many")]));
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_reserved_keys_are_not_filters() {
        let query = ListQuery::build(
            &TEST_SCHEMA,
            &params(&[("page", "2"), ("limit", "5"), ("fields", "title")]),
        )
        .unwrap();
        assert_eq!(query.conditions, vec!["b.is_deleted = FALSE".to_string()]);
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let query = ListQuery::build(&TEST_SCHEMA, &params(&[])).unwrap();
        let sql = query.select_sql("books b", "b.*");
        assert!(sql.contains("ORDER BY b.created_at DESC"));
        assert!(sql.ends_with("LIMIT 10 OFFSET 0"));
    }

    #[test]
    fn test_sort_directions_and_unknown_keys() {
        let query = ListQuery::build(
            &TEST_SCHEMA,
            &params(&[("sort", "-title,createdAt,isbn")]),
        )
        .unwrap();
        let sql = query.select_sql("books b", "b.*");
        assert!(sql.contains("ORDER BY b.title DESC, b.created_at ASC"));

        let query =
            ListQuery::build(&TEST_SCHEMA, &params(&[("sort", "isbn")])).unwrap();
        let sql = query.select_sql("books b", "b.*");
        assert!(sql.contains("ORDER BY b.created_at DESC"));
    }

    #[test]
    fn test_pagination_coercion() {
        let query = ListQuery::build(
            &TEST_SCHEMA,
            &params(&[("page", "3"), ("limit", "20")]),
        )
        .unwrap();
        let sql = query.select_sql("books b", "b.*");
        assert!(sql.ends_with("LIMIT 20 OFFSET 40"));

        for bad in ["abc", "0", "-5", ""] {
            let query = ListQuery::build(
                &TEST_SCHEMA,
                &params(&[("page", bad), ("limit", bad)]),
            )
            .unwrap();
            let meta = query.meta(0);
            assert_eq!(meta.page, 1);
            assert_eq!(meta.limit, 10);
        }
    }

    #[test]
    fn test_limit_is_capped() {
        let query =
            ListQuery::build(&TEST_SCHEMA, &params(&[("limit", "1000")])).unwrap();
        assert_eq!(query.meta(0).limit, 100);
    }

    #[test]
    fn test_huge_page_saturates_the_offset() {
        let query = ListQuery::build(
            &TEST_SCHEMA,
            &params(&[("page", "9223372036854775807")]),
        )
        .unwrap();
        let sql = query.select_sql("books b", "b.*");
        assert!(sql.ends_with(&format!("LIMIT 10 OFFSET {}", i64::MAX)));
    }

    #[test]
    fn test_fields_projection_keeps_id() {
        let query = ListQuery::build(
            &TEST_SCHEMA,
            &params(&[("fields", "title,password,")]),
        )
        .unwrap();

        let rows = query.project(vec![json!({
            "id": "1", "title": "Dune", "author": "Frank Herbert"
        })]);
        assert_eq!(rows, vec![json!({"id": "1", "title": "Dune"})]);
    }

    #[test]
    fn test_no_selectable_match_returns_full_rows() {
        let query =
            ListQuery::build(&TEST_SCHEMA, &params(&[("fields", "password")])).unwrap();
        let row = json!({"id": "1", "title": "Dune", "author": "Frank Herbert"});
        let rows = query.project(vec![row.clone()]);
        assert_eq!(rows, vec![row]);
    }

    #[test]
    fn test_empty_search_term_is_ignored() {
        let query =
            ListQuery::build(&TEST_SCHEMA, &params(&[("searchTerm", "   ")])).unwrap();
        assert_eq!(query.conditions.len(), 1);
        assert!(query.binds.is_empty());
    }
}
