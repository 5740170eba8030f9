//! AWS Athena engine
//!
//! Queries run through the Athena REST API: start the execution in the
//! configured workgroup, poll until it settles, then page through the result
//! set. The async AWS client is driven by a per-connection current-thread
//! runtime so the rest of the tap stays blocking.

use super::information_schema::{InformationSchemaInspector, RawSql};
use super::{SchemaInspector, SqlConnection, SqlEngine, TableQuery};
use crate::config::AthenaConfig;
use crate::error::{Error, Result};
use crate::types::{JsonValue, Row};
use rusoto_athena::{
    Athena, AthenaClient, GetQueryExecutionInput, GetQueryResultsInput, QueryExecutionContext,
    ResultConfiguration, Row as ResultRow, StartQueryExecutionInput,
};
use rusoto_core::{HttpClient, Region};
use rusoto_credential::StaticProvider;
use std::str::FromStr;
use std::time::Duration;

/// How long to sleep between query status polls
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Result page size requested from the API (the service maximum)
const RESULTS_PAGE_SIZE: i64 = 1000;

/// `SqlEngine` backed by AWS Athena
pub struct AthenaEngine {
    config: AthenaConfig,
}

impl AthenaEngine {
    /// Create an engine for the given config
    pub fn new(config: AthenaConfig) -> Self {
        Self { config }
    }
}

impl SqlEngine for AthenaEngine {
    fn connect(&self) -> Result<Box<dyn SqlConnection>> {
        Ok(Box::new(AthenaConnection::open(&self.config)?))
    }

    fn inspector(&self) -> Result<Box<dyn SchemaInspector>> {
        let conn = AthenaConnection::open(&self.config)?;
        Ok(Box::new(InformationSchemaInspector::new(conn)))
    }
}

struct AthenaConnection {
    client: AthenaClient,
    runtime: tokio::runtime::Runtime,
    database: String,
    output_location: String,
    work_group: String,
}

impl AthenaConnection {
    fn open(config: &AthenaConfig) -> Result<Self> {
        let region = Region::from_str(&config.aws_region)
            .map_err(|e| Error::invalid_value("aws_region", e.to_string()))?;
        let credentials = StaticProvider::new(
            config.aws_access_key_id.clone(),
            config.aws_secret_access_key.clone(),
            config.aws_session_token.clone(),
            None,
        );
        let dispatcher = HttpClient::new()
            .map_err(|e| Error::connection(format!("failed to create HTTP client: {e}")))?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        tracing::debug!(
            "Opening Athena connection: {}",
            config.connection_info().unwrap_or_default()
        );

        Ok(Self {
            client: AthenaClient::new_with(dispatcher, credentials, region),
            runtime,
            database: config.schema_name.clone(),
            output_location: config.s3_staging_dir.clone(),
            work_group: config.athena_workgroup.clone(),
        })
    }

    fn run_query(&mut self, sql: &str) -> Result<Vec<Row>> {
        tracing::debug!("Executing query: {}", sql);
        let execution_id = self.start(sql)?;
        self.wait(&execution_id)?;
        self.fetch_rows(&execution_id)
    }

    fn start(&mut self, sql: &str) -> Result<String> {
        let input = StartQueryExecutionInput {
            query_string: sql.to_string(),
            query_execution_context: Some(QueryExecutionContext {
                database: Some(self.database.clone()),
                ..Default::default()
            }),
            result_configuration: Some(ResultConfiguration {
                output_location: Some(self.output_location.clone()),
                ..Default::default()
            }),
            work_group: Some(self.work_group.clone()),
            ..Default::default()
        };

        let output = self
            .runtime
            .block_on(self.client.start_query_execution(input))
            .map_err(|e| Error::query(format!("failed to start query: {e}")))?;
        output
            .query_execution_id
            .ok_or_else(|| Error::query("Athena returned no query execution id"))
    }

    fn wait(&mut self, execution_id: &str) -> Result<()> {
        loop {
            let input = GetQueryExecutionInput {
                query_execution_id: execution_id.to_string(),
                ..Default::default()
            };
            let output = self
                .runtime
                .block_on(self.client.get_query_execution(input))
                .map_err(|e| Error::query(format!("failed to poll query status: {e}")))?;

            let status = output.query_execution.and_then(|q| q.status);
            let state = status
                .as_ref()
                .and_then(|s| s.state.clone())
                .unwrap_or_default();
            match state.as_str() {
                "SUCCEEDED" => return Ok(()),
                "FAILED" | "CANCELLED" => {
                    let reason = status
                        .and_then(|s| s.state_change_reason)
                        .unwrap_or_else(|| "no reason reported".to_string());
                    return Err(Error::query(format!("query {state}: {reason}")));
                }
                _ => std::thread::sleep(POLL_INTERVAL),
            }
        }
    }

    fn fetch_rows(&mut self, execution_id: &str) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        let mut next_token: Option<String> = None;
        let mut columns: Option<Vec<(String, String)>> = None;
        let mut first_page = true;

        loop {
            let input = GetQueryResultsInput {
                query_execution_id: execution_id.to_string(),
                max_results: Some(RESULTS_PAGE_SIZE),
                next_token: next_token.clone(),
                ..Default::default()
            };
            let output = self
                .runtime
                .block_on(self.client.get_query_results(input))
                .map_err(|e| Error::query(format!("failed to fetch results: {e}")))?;

            if let Some(result_set) = output.result_set {
                if columns.is_none() {
                    columns = Some(
                        result_set
                            .result_set_metadata
                            .and_then(|m| m.column_info)
                            .unwrap_or_default()
                            .into_iter()
                            .map(|c| (c.name, c.type_))
                            .collect(),
                    );
                }
                let column_defs = columns.as_deref().unwrap_or(&[]);

                let data_rows = result_set.rows.unwrap_or_default();
                // Athena repeats the column names as the first row of the
                // first page for SELECT queries.
                let skip = usize::from(first_page && !data_rows.is_empty());
                for data_row in data_rows.into_iter().skip(skip) {
                    rows.push(convert_row(column_defs, data_row));
                }
            }

            first_page = false;
            next_token = output.next_token;
            if next_token.is_none() {
                break;
            }
        }

        Ok(rows)
    }
}

impl RawSql for AthenaConnection {
    fn run_sql(&mut self, sql: &str) -> Result<Vec<Row>> {
        self.run_query(sql)
    }
}

impl SqlConnection for AthenaConnection {
    fn select(&mut self, query: &TableQuery) -> Result<Vec<Row>> {
        self.run_query(&query.to_sql())
    }
}

fn convert_row(columns: &[(String, String)], row: ResultRow) -> Row {
    let mut out = Row::new();
    for (index, datum) in row.data.unwrap_or_default().into_iter().enumerate() {
        let Some((name, native_type)) = columns.get(index) else {
            continue;
        };
        out.insert(name.clone(), convert_value(native_type, datum.var_char_value));
    }
    out
}

/// Everything comes off the wire as a varchar; narrow the obvious scalar
/// types and pass the rest through as strings.
fn convert_value(native_type: &str, value: Option<String>) -> JsonValue {
    let Some(text) = value else {
        return JsonValue::Null;
    };
    match native_type {
        "tinyint" | "smallint" | "integer" | "int" | "bigint" => text
            .parse::<i64>()
            .map(JsonValue::from)
            .unwrap_or(JsonValue::String(text)),
        "boolean" => text
            .parse::<bool>()
            .map(JsonValue::Bool)
            .unwrap_or(JsonValue::String(text)),
        t if t == "float" || t == "real" || t == "double" || t.starts_with("decimal") => text
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::String(text)),
        _ => JsonValue::String(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_convert_value_narrowing() {
        assert_eq!(convert_value("bigint", Some("42".to_string())), json!(42));
        assert_eq!(convert_value("double", Some("1.5".to_string())), json!(1.5));
        assert_eq!(
            convert_value("decimal(10,2)", Some("3.25".to_string())),
            json!(3.25)
        );
        assert_eq!(convert_value("boolean", Some("true".to_string())), json!(true));
        assert_eq!(
            convert_value("varchar", Some("hello".to_string())),
            json!("hello")
        );
        assert_eq!(convert_value("bigint", None), JsonValue::Null);
    }

    #[test]
    fn test_convert_value_keeps_unparseable_text() {
        assert_eq!(
            convert_value("bigint", Some("not-a-number".to_string())),
            json!("not-a-number")
        );
    }
}
