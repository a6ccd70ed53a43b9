use crate::sheet::cell::CellValue;
use crate::sheet::RawRow;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while locating or decoding the read endpoint's payload.
#[derive(Error, Debug)]
pub enum EnvelopeError {
    /// The body holds no JSON object at all
    #[error("response body contains no recognizable JSON payload")]
    MissingPayload,

    /// A JSON payload was found but does not match any known shape
    #[error("malformed response payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The payload shapes the endpoints are known to emit.
///
/// The query endpoint wraps a `{table:{rows:[..]}}` envelope; the script
/// endpoint's fetch action may answer with a bare row array or a plain
/// `{values:[[..]]}` grid instead.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Table { table: Table },
    Grid { values: Vec<Option<WireRow>> },
    Rows(Vec<Option<WireRow>>),
}

#[derive(Deserialize)]
struct Table {
    #[serde(default)]
    rows: Vec<Option<WireRow>>,
}

/// One row: either the query envelope's cell objects or a plain value array.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireRow {
    Cells {
        #[serde(default)]
        c: Vec<Option<WireCell>>,
    },
    Values(Vec<Option<WireValue>>),
}

#[derive(Deserialize)]
struct WireCell {
    #[serde(default)]
    v: Option<WireValue>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl WireValue {
    fn into_cell(self) -> CellValue {
        match self {
            Self::Bool(value) => CellValue::Text(value.to_string()),
            Self::Number(value) => CellValue::Number(value),
            Self::Text(value) => CellValue::from_text(value),
        }
    }
}

impl WireRow {
    fn into_raw(self) -> RawRow {
        match self {
            Self::Cells { c } => c
                .into_iter()
                .map(|cell| match cell.and_then(|cell| cell.v) {
                    Some(value) => value.into_cell(),
                    None => CellValue::Empty,
                })
                .collect(),
            Self::Values(values) => values
                .into_iter()
                .map(|value| match value {
                    Some(value) => value.into_cell(),
                    None => CellValue::Empty,
                })
                .collect(),
        }
    }
}

/// Decodes a response body into data rows, dropping the header row.
///
/// The body is first tried as-is; when that fails, the payload is located
/// between the first `{` and the last `}` (the query endpoint wraps its JSON
/// in a function-call prefix and suffix). The first row of every payload is
/// a column header and never reaches the caller.
pub fn parse_rows(body: &str) -> Result<Vec<RawRow>, EnvelopeError> {
    let payload = decode(body)?;
    let mut rows: Vec<RawRow> = match payload {
        Payload::Table { table } => table.rows,
        Payload::Grid { values } => values,
        Payload::Rows(rows) => rows,
    }
    .into_iter()
    // A null row stays in the list as an empty row: it still occupies a
    // physical sheet position.
    .map(|row| row.map(WireRow::into_raw).unwrap_or_default())
    .collect();

    if !rows.is_empty() {
        rows.remove(0);
    }
    Ok(rows)
}

fn decode(body: &str) -> Result<Payload, EnvelopeError> {
    if let Ok(payload) = serde_json::from_str(body) {
        return Ok(payload);
    }
    let start = body.find('{').ok_or(EnvelopeError::MissingPayload)?;
    let end = body
        .rfind('}')
        .filter(|end| start < *end)
        .ok_or(EnvelopeError::MissingPayload)?;
    Ok(serde_json::from_str(&body[start..=end])?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WRAPPED: &str = concat!(
        "/*O_o*/\ngoogle.visualization.Query.setResponse(",
        r#"{"version":"0.6","table":{"rows":["#,
        r#"{"c":[{"v":"Date"},{"v":"Day"}]},"#,
        r#"{"c":[{"v":"Date(2025,11,12)"},{"v":"Friday"}]},"#,
        r#"{"c":[null,{"v":42}]}"#,
        "]}});"
    );

    #[test]
    fn wrapped_envelope() {
        let rows = parse_rows(WRAPPED).unwrap();
        // Header row is gone
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0][0],
            CellValue::DateLiteral("Date(2025,11,12)".to_owned())
        );
        assert_eq!(rows[0][1], CellValue::Text("Friday".to_owned()));
        assert_eq!(rows[1][0], CellValue::Empty);
        assert_eq!(rows[1][1], CellValue::Number(42.0));
    }

    #[test]
    fn bare_json_envelope() {
        let body = r#"{"table":{"rows":[{"c":[{"v":"h"}]},{"c":[{"v":"a"}]}]}}"#;
        let rows = parse_rows(body).unwrap();
        assert_eq!(rows, vec![vec![CellValue::Text("a".to_owned())]]);
    }

    #[test]
    fn values_grid() {
        let body = r#"{"values":[["header"],["IT","Manager"],[null,"x"]]}"#;
        let rows = parse_rows(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], CellValue::Text("IT".to_owned()));
        assert_eq!(rows[1][0], CellValue::Empty);
    }

    #[test]
    fn bare_row_array() {
        let body = r#"[{"c":[{"v":"h"}]},{"c":[{"v":1},{"v":null}]}]"#;
        let rows = parse_rows(body).unwrap();
        assert_eq!(
            rows,
            vec![vec![CellValue::Number(1.0), CellValue::Empty]]
        );
    }

    #[test]
    fn missing_payload() {
        assert!(matches!(
            parse_rows("<!DOCTYPE html><html>error page</html>"),
            Err(EnvelopeError::MissingPayload)
        ));
    }

    #[test]
    fn malformed_payload() {
        assert!(matches!(
            parse_rows("prefix {\"table\":} suffix"),
            Err(EnvelopeError::Malformed(_))
        ));
    }

    #[test]
    fn null_rows_keep_their_position() {
        let body = r#"{"table":{"rows":[{"c":[{"v":"h"}]},null,{"c":[{"v":"a"}]}]}}"#;
        let rows = parse_rows(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_empty());
        assert_eq!(rows[1][0], CellValue::Text("a".to_owned()));
    }

    #[test]
    fn empty_table_yields_no_rows() {
        let rows = parse_rows(r#"{"table":{"rows":[]}}"#).unwrap();
        assert!(rows.is_empty());
    }
}
