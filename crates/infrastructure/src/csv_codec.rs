//! CSV codec for uploaded datasets.
//!
//! Input must carry a header row with a `group` and a `value` column. Other
//! columns are ignored, surrounding whitespace is trimmed and blank lines are
//! skipped. Row numbers in errors count data records from 1.

use hypothesis_lab_application::DatasetDecoder;
use hypothesis_lab_domain::{Dataset, DatasetError, Observation};
use tracing::debug;

use crate::Result;

/// Header of the group label column
pub const GROUP_COLUMN: &str = "group";
/// Header of the numeric value column
pub const VALUE_COLUMN: &str = "value";

/// Reads and writes `group,value` CSV
#[derive(Debug, Clone)]
pub struct CsvDatasetCodec {
    delimiter: u8,
}

impl CsvDatasetCodec {
    /// Comma-separated codec
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Use a different field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Decode CSV bytes into a validated dataset
    pub fn decode_bytes(&self, bytes: &[u8]) -> std::result::Result<Dataset, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let headers = reader
            .headers()
            .map_err(|e| DatasetError::Malformed(e.to_string()))?
            .clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
        };
        let group_idx = column(GROUP_COLUMN)?;
        let value_idx = column(VALUE_COLUMN)?;

        let mut observations = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let row = idx + 1;
            let record = record.map_err(|e| DatasetError::Malformed(e.to_string()))?;

            let field = |i: usize, name: &str| match record.get(i) {
                Some(text) if !text.is_empty() => Ok(text),
                _ => Err(DatasetError::MissingField {
                    row,
                    field: name.to_string(),
                }),
            };

            let group = field(group_idx, GROUP_COLUMN)?;
            let raw = field(value_idx, VALUE_COLUMN)?;
            let value: f64 = raw.parse().map_err(|_| DatasetError::InvalidValue {
                row,
                value: raw.to_string(),
            })?;

            observations.push(Observation::new(group, value));
        }

        debug!(rows = observations.len(), "Decoded CSV dataset");
        Dataset::new(observations)
    }

    /// Encode observations as `group,value` CSV with a header row
    pub fn encode(&self, observations: &[Observation]) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());

        writer.write_record([GROUP_COLUMN, VALUE_COLUMN])?;
        for obs in observations {
            writer.write_record([obs.group.as_str(), obs.value.to_string().as_str()])?;
        }

        writer
            .into_inner()
            .map_err(|e| crate::Error::Storage(e.into_error()))
    }
}

impl Default for CsvDatasetCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetDecoder for CsvDatasetCodec {
    fn decode(&self, bytes: &[u8]) -> std::result::Result<Dataset, DatasetError> {
        self.decode_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(text: &str) -> std::result::Result<Dataset, DatasetError> {
        CsvDatasetCodec::new().decode_bytes(text.as_bytes())
    }

    #[test]
    fn test_decode_basic() {
        let dataset = decode("group,value\nA,1\nA,2\nB,10\nB,11\n").unwrap();
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.values(), vec![1.0, 2.0, 10.0, 11.0]);
        assert_eq!(dataset.group_count(), 2);
    }

    #[test]
    fn test_extra_columns_and_order_ignored() {
        let dataset = decode("id,value,group,note\n1, 3.5 ,ctrl,x\n2,4.5,trt,\n").unwrap();
        let obs = dataset.observations();
        assert_eq!(obs[0], Observation::new("ctrl", 3.5));
        assert_eq!(obs[1], Observation::new("trt", 4.5));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let dataset = decode("group,value\n\nA,1\n\nB,2\n\n").unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_missing_column() {
        let err = decode("label,value\nA,1\n").unwrap_err();
        assert_eq!(err, DatasetError::MissingColumn("group".to_string()));

        let err = decode("group,score\nA,1\n").unwrap_err();
        assert_eq!(err, DatasetError::MissingColumn("value".to_string()));
    }

    #[test]
    fn test_missing_field() {
        let err = decode("group,value\nA,1\nB,\n").unwrap_err();
        assert_eq!(
            err,
            DatasetError::MissingField {
                row: 2,
                field: "value".to_string()
            }
        );

        let err = decode("value,group\n1\n").unwrap_err();
        assert!(matches!(err, DatasetError::MissingField { row: 1, ref field } if field == "group"));
    }

    #[test]
    fn test_invalid_value() {
        let err = decode("group,value\nA,1\nA,abc\n").unwrap_err();
        assert_eq!(
            err,
            DatasetError::InvalidValue {
                row: 2,
                value: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_non_finite_and_empty() {
        assert!(matches!(
            decode("group,value\nA,1\nA,inf\n"),
            Err(DatasetError::NonFinite { row: 2 })
        ));
        assert_eq!(decode("group,value\n").unwrap_err(), DatasetError::Empty);
    }

    #[test]
    fn test_encode_decodes_back() {
        let codec = CsvDatasetCodec::new();
        let rows = vec![Observation::new("A", 1.5), Observation::new("B, C", -2.0)];
        let bytes = codec.encode(&rows).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with("group,value\n"));

        let dataset = codec.decode_bytes(&bytes).unwrap();
        assert_eq!(dataset.observations(), rows.as_slice());
    }

    #[test]
    fn test_semicolon_delimiter() {
        let codec = CsvDatasetCodec::new().with_delimiter(b';');
        let dataset = codec.decode_bytes(b"group;value\nA;1\nB;2\n").unwrap();
        assert_eq!(dataset.len(), 2);
    }
}
