use crate::client::transport::{Transport, TransportError};
use crate::config::Config;
use crate::records::{map_row, ColumnMap, Record};
use crate::sheet::{parse_rows, EnvelopeError, RawRow};
use thiserror::Error;

/// Errors raised while loading rows from a sheet.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("fetch failed with HTTP status {status}")]
    Status { status: u16 },

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
}

/// Reads rows from the spreadsheet's query endpoint or, for sheets the
/// script proxies itself, from the script endpoint's fetch action.
///
/// Every call is one independent blocking request. Concurrent fetches of the
/// same sheet are neither deduplicated nor cancelled; under rapid refresh a
/// stale response can land after a newer one, and callers that care must
/// sequence their requests themselves.
pub struct SheetReader<'a, T: Transport> {
    config: &'a Config,
    transport: &'a T,
}

impl<'a, T: Transport> SheetReader<'a, T> {
    pub fn new(config: &'a Config, transport: &'a T) -> Self {
        Self { config, transport }
    }

    /// Fetches the raw data rows of one sheet via the query endpoint. The
    /// header row is already stripped.
    pub fn fetch_rows(&self, sheet: &str) -> Result<Vec<RawRow>, FetchError> {
        self.fetch(self.config.query_url(sheet).as_str(), sheet)
    }

    /// Fetches raw data rows through the script endpoint's fetch action,
    /// the read path the directory page uses.
    pub fn fetch_rows_via_script(&self, sheet: &str) -> Result<Vec<RawRow>, FetchError> {
        self.fetch(self.config.script_fetch_url(sheet).as_str(), sheet)
    }

    /// Fetches one sheet and maps it into domain records: empty mapped rows
    /// are dropped, ids are fresh, and `row_index` comes from this fetch.
    pub fn fetch_records(
        &self,
        sheet: &str,
        map: &'static ColumnMap,
    ) -> Result<Vec<Record>, FetchError> {
        let rows = self.fetch_rows(sheet)?;
        Ok(map_records(&rows, map))
    }

    /// Script-endpoint variant of [`Self::fetch_records`].
    pub fn fetch_records_via_script(
        &self,
        sheet: &str,
        map: &'static ColumnMap,
    ) -> Result<Vec<Record>, FetchError> {
        let rows = self.fetch_rows_via_script(sheet)?;
        Ok(map_records(&rows, map))
    }

    fn fetch(&self, url: &str, sheet: &str) -> Result<Vec<RawRow>, FetchError> {
        log::debug!("fetching sheet '{}'", sheet);
        let response = self.transport.get(url)?;
        if !response.is_success() {
            log::warn!("fetch of '{}' failed with HTTP {}", sheet, response.status);
            return Err(FetchError::Status { status: response.status });
        }
        let rows = parse_rows(&response.body)?;
        log::debug!("sheet '{}' returned {} data rows", sheet, rows.len());
        Ok(rows)
    }
}

/// Maps fetched rows into records, keeping the positional row indices of the
/// rows that were dropped for emptiness.
pub fn map_records(rows: &[RawRow], map: &'static ColumnMap) -> Vec<Record> {
    rows.iter()
        .enumerate()
        .filter_map(|(position, row)| map_row(row, map, position))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::transport::stub::{ok, status, StubTransport};
    use crate::records::calendar::WORKING_DAY_COLUMNS;

    fn config() -> Config {
        Config::new("abc123", "https://example.com/script/exec").unwrap()
    }

    const BODY: &str = concat!(
        "google.visualization.Query.setResponse(",
        r#"{"table":{"rows":["#,
        r#"{"c":[{"v":"Working Date"},{"v":"Day"}]},"#,
        r#"{"c":[{"v":"Date(2025,11,12)"},{"v":"Fri"},{"v":50},{"v":12}]},"#,
        r#"{"c":[null,null,null,null]},"#,
        r#"{"c":[{"v":"13/12/2025"},{"v":"Sat"},{"v":50},{"v":12}]}"#,
        "]}});"
    );

    #[test]
    fn fetch_rows_hits_query_endpoint() {
        let config = config();
        let transport = StubTransport::replying(vec![ok(BODY)]);
        let reader = SheetReader::new(&config, &transport);
        let rows = reader.fetch_rows("Working Day Calendar").unwrap();
        assert_eq!(rows.len(), 3);

        let requests = transport.requests.borrow();
        assert_eq!(
            requests[0].0,
            "https://docs.google.com/spreadsheets/d/abc123/gviz/tq?tqx=out%3Ajson&sheet=Working+Day+Calendar"
        );
    }

    #[test]
    fn fetch_rows_via_script_hits_script_endpoint() {
        let config = config();
        let transport = StubTransport::replying(vec![ok(r#"{"table":{"rows":[]}}"#)]);
        let reader = SheetReader::new(&config, &transport);
        reader.fetch_rows_via_script("Whatsapp").unwrap();

        let requests = transport.requests.borrow();
        assert_eq!(
            requests[0].0,
            "https://example.com/script/exec?sheet=Whatsapp&action=fetch"
        );
    }

    #[test]
    fn fetch_records_drops_empty_rows_but_keeps_positions() {
        let config = config();
        let transport = StubTransport::replying(vec![ok(BODY)]);
        let reader = SheetReader::new(&config, &transport);
        let records = reader
            .fetch_records("Working Day Calendar", &WORKING_DAY_COLUMNS)
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("date"), "12/12/2025");
        assert_eq!(records[0].row_index, 2);
        // The all-empty row in between was dropped without shifting indices
        assert_eq!(records[1].get("date"), "13/12/2025");
        assert_eq!(records[1].row_index, 4);
    }

    #[test]
    fn fetch_reports_http_failure() {
        let config = config();
        let transport = StubTransport::replying(vec![status(503, "unavailable")]);
        let reader = SheetReader::new(&config, &transport);
        assert!(matches!(
            reader.fetch_rows("Working Day Calendar"),
            Err(FetchError::Status { status: 503 })
        ));
    }

    #[test]
    fn fetch_reports_unparseable_body() {
        let config = config();
        let transport = StubTransport::replying(vec![ok("<html>sign in</html>")]);
        let reader = SheetReader::new(&config, &transport);
        assert!(matches!(
            reader.fetch_rows("Working Day Calendar"),
            Err(FetchError::Envelope(EnvelopeError::MissingPayload))
        ));
    }
}
