//! Identifier lookup behind the `api-id-picker` collaborator
//!
//! The operator picks a table, a random sample of `(uuid, identifier)` rows
//! is queried from it (scoped to a client when the table has a join path),
//! and the uuid of the picked row is the result.

use tracing::{debug, warn};

use crate::error::{ExplorerError, Result};
use crate::settings::{IdLookupSettings, TableLookup};
use crate::tools::{QueryRunner, Selector};

/// Shown for rows whose identifier column is empty
const NO_IDENTIFIER: &str = "(no identifier)";

/// One selectable row
#[derive(Debug, Clone, PartialEq)]
pub struct IdRow {
    pub uuid: String,
    pub identifier: String,
}

impl IdRow {
    /// `<uuid> - <identifier>`
    pub fn display_line(&self) -> String {
        format!("{} - {}", self.uuid, self.identifier)
    }

    fn from_cells(cells: &[String]) -> Option<Self> {
        let [uuid, identifier, ..] = cells else {
            return None;
        };
        let identifier = identifier.replace(['\n', '\r'], " ");

        Some(Self {
            uuid: uuid.clone(),
            identifier: if identifier.is_empty() {
                NO_IDENTIFIER.to_string()
            } else {
                identifier
            },
        })
    }
}

/// Recover the uuid from a line produced by [`IdRow::display_line`]
pub fn uuid_from_line(line: &str) -> &str {
    line.split(" - ").next().unwrap_or(line).trim()
}

/// SQL for one lookup
#[derive(Debug, Clone, PartialEq)]
pub struct LookupQuery {
    pub sql: String,
    /// Whether the rows are restricted to the client
    pub scoped: bool,
}

/// Runs the table -> row -> uuid selection
pub struct IdLookup<'a> {
    settings: &'a IdLookupSettings,
    selector: &'a dyn Selector,
    runner: &'a dyn QueryRunner,
}

impl<'a> IdLookup<'a> {
    pub fn new(
        settings: &'a IdLookupSettings,
        selector: &'a dyn Selector,
        runner: &'a dyn QueryRunner,
    ) -> Self {
        Self {
            settings,
            selector,
            runner,
        }
    }

    /// Configured table names, sorted
    pub fn tables(&self) -> Vec<String> {
        let mut tables: Vec<String> = self.settings.tables.keys().cloned().collect();
        tables.sort();
        tables
    }

    /// Build the sampling query for `table`, filtered by `client` when the
    /// table declares a client filter.
    pub fn build_query(&self, table: &str, client: Option<&str>) -> Result<LookupQuery> {
        let lookup = self
            .settings
            .tables
            .get(table)
            .ok_or_else(|| ExplorerError::UnknownTable(table.to_string()))?;

        Ok(sample_query(
            self.settings.schema.as_deref(),
            table,
            lookup,
            client,
            self.settings.limit,
        ))
    }

    /// Query rows for `table`
    pub fn rows(&self, table: &str, client: Option<&str>) -> Result<Vec<IdRow>> {
        let query = self.build_query(table, client)?;
        if client.is_some() && !query.scoped {
            warn!("No client join path for {}, showing all records", table);
        }

        let rows: Vec<IdRow> = self
            .runner
            .query(&query.sql)?
            .iter()
            .filter_map(|cells| IdRow::from_cells(cells))
            .collect();
        debug!("{} rows from {}", rows.len(), table);

        Ok(rows)
    }

    /// Full selection flow. `Ok(None)` when the operator declines either
    /// selection.
    pub fn run(&self, client: Option<&str>) -> Result<Option<String>> {
        let tables = self.tables();
        if tables.is_empty() {
            return Err(ExplorerError::NoLookupTables);
        }

        let Some(table) = self.selector.select("Select table", &tables)? else {
            debug!("No table selected");
            return Ok(None);
        };

        let rows = self.rows(&table, client)?;
        if rows.is_empty() {
            return Err(ExplorerError::NoRows(table));
        }

        let lines: Vec<String> = rows.iter().map(IdRow::display_line).collect();
        let prompt = format!("Select UUID from {}", table);
        let Some(selected) = self.selector.select(&prompt, &lines)? else {
            debug!("No row selected");
            return Ok(None);
        };

        Ok(Some(uuid_from_line(&selected).to_string()))
    }
}

fn sample_query(
    schema: Option<&str>,
    table: &str,
    lookup: &TableLookup,
    client: Option<&str>,
    limit: usize,
) -> LookupQuery {
    let qualified = match schema {
        Some(schema) => format!("{}.{}", schema, table),
        None => table.to_string(),
    };

    match client.filter(|_| !lookup.client_filter.is_empty()) {
        Some(client) => {
            let mut parts = vec![
                format!("SELECT t.uuid, t.{}", lookup.identifier),
                format!("FROM {} t", qualified),
            ];
            if !lookup.joins.trim().is_empty() {
                parts.push(lookup.joins.trim().to_string());
            }
            parts.push(format!(
                "WHERE {} = '{}'",
                lookup.client_filter,
                client.replace('\'', "''")
            ));
            parts.push(format!("ORDER BY RANDOM() LIMIT {};", limit));

            LookupQuery {
                sql: parts.join(" "),
                scoped: true,
            }
        }
        None => LookupQuery {
            sql: format!(
                "SELECT uuid, {} FROM {} ORDER BY RANDOM() LIMIT {};",
                lookup.identifier, qualified, limit
            ),
            scoped: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::fake::{FakeQueryRunner, FakeSelector};
    use indexmap::IndexMap;

    fn settings() -> IdLookupSettings {
        let mut tables = IndexMap::new();
        tables.insert(
            "widget".to_string(),
            TableLookup {
                identifier: "code".to_string(),
                joins: "JOIN app.company co ON co.id = t.company_id".to_string(),
                client_filter: "co.owner_client_id".to_string(),
            },
        );
        tables.insert(
            "currency".to_string(),
            TableLookup {
                identifier: "iso_code".to_string(),
                joins: String::new(),
                client_filter: String::new(),
            },
        );

        IdLookupSettings {
            schema: Some("app".to_string()),
            limit: 50,
            tables,
        }
    }

    #[test]
    fn test_tables_are_sorted() {
        let settings = settings();
        let selector = FakeSelector::default();
        let runner = FakeQueryRunner::default();
        let lookup = IdLookup::new(&settings, &selector, &runner);

        assert_eq!(lookup.tables(), vec!["currency", "widget"]);
    }

    #[test]
    fn test_build_query_scoped_and_unscoped() {
        let settings = settings();
        let selector = FakeSelector::default();
        let runner = FakeQueryRunner::default();
        let lookup = IdLookup::new(&settings, &selector, &runner);

        let scoped = lookup.build_query("widget", Some("c-1")).unwrap();
        assert!(scoped.scoped);
        assert_eq!(
            scoped.sql,
            "SELECT t.uuid, t.code FROM app.widget t \
             JOIN app.company co ON co.id = t.company_id \
             WHERE co.owner_client_id = 'c-1' ORDER BY RANDOM() LIMIT 50;"
        );

        let plain = lookup.build_query("widget", None).unwrap();
        assert!(!plain.scoped);
        assert_eq!(
            plain.sql,
            "SELECT uuid, code FROM app.widget ORDER BY RANDOM() LIMIT 50;"
        );

        // No client path: unfiltered even with a client
        let unscopable = lookup.build_query("currency", Some("c-1")).unwrap();
        assert!(!unscopable.scoped);

        assert!(matches!(
            lookup.build_query("nope", None),
            Err(ExplorerError::UnknownTable(_))
        ));
    }

    #[test]
    fn test_client_quotes_are_escaped() {
        let settings = settings();
        let selector = FakeSelector::default();
        let runner = FakeQueryRunner::default();
        let lookup = IdLookup::new(&settings, &selector, &runner);

        let query = lookup.build_query("widget", Some("o'neil")).unwrap();
        assert!(query.sql.contains("= 'o''neil'"));
    }

    #[test]
    fn test_run_returns_uuid_of_picked_row() {
        let settings = settings();
        let selector = FakeSelector::new([Some("widget"), Some("9c1b - (no identifier)")]);
        let runner = FakeQueryRunner::with_rows(&[&["3f2a", "W-1"], &["9c1b", ""], &["short"]]);
        let lookup = IdLookup::new(&settings, &selector, &runner);

        let picked = lookup.run(Some("c-1")).unwrap();

        assert_eq!(picked.as_deref(), Some("9c1b"));
        assert_eq!(
            selector.offered.borrow()[1],
            vec!["3f2a - W-1", "9c1b - (no identifier)"]
        );
        assert!(runner.queries.borrow()[0].contains("WHERE co.owner_client_id = 'c-1'"));
    }

    #[test]
    fn test_run_declined_and_empty() {
        let settings = settings();
        let runner = FakeQueryRunner::default();

        let declined = FakeSelector::new([None]);
        let lookup = IdLookup::new(&settings, &declined, &runner);
        assert_eq!(lookup.run(None).unwrap(), None);

        let selector = FakeSelector::new([Some("currency")]);
        let lookup = IdLookup::new(&settings, &selector, &runner);
        assert!(matches!(lookup.run(None), Err(ExplorerError::NoRows(t)) if t == "currency"));
    }

    #[test]
    fn test_no_tables_configured() {
        let settings = IdLookupSettings::default();
        let selector = FakeSelector::default();
        let runner = FakeQueryRunner::default();
        let lookup = IdLookup::new(&settings, &selector, &runner);

        assert!(matches!(lookup.run(None), Err(ExplorerError::NoLookupTables)));
    }

    #[test]
    fn test_uuid_from_line() {
        assert_eq!(uuid_from_line("3f2a - Alpha - Beta"), "3f2a");
        assert_eq!(uuid_from_line("3f2a"), "3f2a");
    }
}
