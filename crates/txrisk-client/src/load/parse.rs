use crate::export::derived_columns_start;
use crate::load::{
    AMOUNT_COLUMN, COUNTRY_COLUMN, CUSTOMER_COLUMN, TIME_COLUMN, TransactionFrame,
    TransactionRecord,
};
use crate::{ClientError, ClientResult};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug)]
struct ColumnLayout {
    width: usize,
    amount: usize,
    country: Option<usize>,
    time: Option<usize>,
    customer: Option<usize>,
    kept: usize,
}

/// Parses CSV bytes with a header row into a frame of transaction records.
///
/// Blank content is `empty_input`. A missing `Amount` column, ragged rows,
/// cells that are not UTF-8, and non-numeric amounts are `malformed_input`,
/// with the 1-based data row attached whenever one can be named. Lines made
/// only of whitespace are skipped.
pub fn load_transactions<B>(content: B) -> ClientResult<TransactionFrame>
where
    B: AsRef<[u8]>,
{
    let bytes = content.as_ref();
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ClientError::empty_input(
            "No transactions were provided. The input is empty.",
        ));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body);

    let headers = reader
        .headers()
        .map_err(|error| {
            ClientError::malformed_input(
                &format!("CSV header row is missing or unreadable: {error}"),
                None,
            )
        })?
        .iter()
        .map(|value| value.trim().to_string())
        .collect::<Vec<String>>();

    let layout = ColumnLayout::from_headers(&headers)?;

    let mut records = Vec::new();
    for (row_index, result_row) in reader.records().enumerate() {
        let row = row_index + 1;
        let record = result_row.map_err(|error| {
            ClientError::malformed_input(
                &format!("Row {row}: CSV row is malformed or not UTF-8 ({error})."),
                Some(row),
            )
        })?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        records.push(layout.read_record(row, &record)?);
    }

    tracing::debug!(
        rows = records.len(),
        columns = layout.kept,
        "loaded transactions"
    );

    Ok(TransactionFrame {
        headers: headers.into_iter().take(layout.kept).collect(),
        records,
    })
}

impl ColumnLayout {
    fn from_headers(headers: &[String]) -> ClientResult<Self> {
        let Some(amount) = find_column(headers, AMOUNT_COLUMN) else {
            return Err(ClientError::missing_amount_column(headers.to_vec()));
        };

        Ok(Self {
            width: headers.len(),
            amount,
            country: find_column(headers, COUNTRY_COLUMN),
            time: find_column(headers, TIME_COLUMN),
            customer: find_column(headers, CUSTOMER_COLUMN),
            kept: derived_columns_start(headers).unwrap_or(headers.len()),
        })
    }

    fn read_record(
        &self,
        row: usize,
        record: &csv::StringRecord,
    ) -> ClientResult<TransactionRecord> {
        if record.len() != self.width {
            return Err(ClientError::malformed_input(
                &format!(
                    "Row {row}: expected {} cells to match the header, found {}.",
                    self.width,
                    record.len()
                ),
                Some(row),
            ));
        }

        let raw_amount = record.get(self.amount).unwrap_or("");
        let amount = parse_amount(row, raw_amount)?;

        Ok(TransactionRecord {
            row,
            amount,
            country: optional_cell(record, self.country),
            time: optional_cell(record, self.time),
            customer: optional_cell(record, self.customer),
            fields: record
                .iter()
                .take(self.kept)
                .map(str::to_string)
                .collect(),
        })
    }
}

fn find_column(headers: &[String], name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name))
}

fn parse_amount(row: usize, raw: &str) -> ClientResult<f64> {
    let candidate = raw.trim();
    if candidate.is_empty() {
        return Err(ClientError::invalid_amount(row, raw));
    }

    match candidate.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(ClientError::invalid_amount(row, raw)),
    }
}

fn optional_cell(record: &csv::StringRecord, index: Option<usize>) -> Option<String> {
    let value = record.get(index?)?.trim();
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}
