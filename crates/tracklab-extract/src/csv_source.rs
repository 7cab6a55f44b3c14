//! DeepLabCut CSV exports as a [`TabularSource`].
//!
//! The export has three header rows followed by one row per frame:
//!
//! ```text
//! scorer,    DLC_net, DLC_net, DLC_net,    ...
//! bodyparts, nose,    nose,    nose,       ...
//! coords,    x,       y,       likelihood, ...
//! 0,         12.5,    40.1,    0.998,      ...
//! ```
//!
//! The first column holds the header names and then the frame index.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use tracklab_core::{Error, Result};

use crate::source::{Channel, TabularSource};

const HEADER_ROWS: [&str; 3] = ["scorer", "bodyparts", "coords"];

/// Wide table loaded from a single-animal DeepLabCut CSV file
#[derive(Debug, Clone)]
pub struct DlcCsvSource {
    scorer: String,
    labels: Vec<String>,
    column_index: HashMap<(String, Channel), usize>,
    columns: Vec<Vec<f64>>,
    frame_index: Vec<u64>,
}

impl DlcCsvSource {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| Error::Io(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "reading DeepLabCut table");
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = csv_reader.records();
        let mut header_rows: Vec<Vec<String>> = Vec::with_capacity(HEADER_ROWS.len());

        for expected in HEADER_ROWS {
            let record = records
                .next()
                .ok_or_else(|| Error::Csv(format!("missing '{}' header row", expected)))?
                .map_err(|e| Error::Csv(e.to_string()))?;

            let row: Vec<String> = record.iter().map(str::to_string).collect();
            match row.first().map(String::as_str) {
                Some(name) if name == expected => header_rows.push(row),
                Some("individuals") => {
                    return Err(Error::InvalidInput(
                        "multi-animal tables are not supported".into(),
                    ))
                }
                other => {
                    return Err(Error::Csv(format!(
                        "expected '{}' header row, found {:?}",
                        expected, other
                    )))
                }
            }
        }

        let scorer = header_rows[0].get(1).cloned().unwrap_or_default();
        let n_columns = header_rows[0].len().saturating_sub(1);

        let mut labels = Vec::new();
        let mut column_index = HashMap::new();
        for col in 0..n_columns {
            let label = header_rows[1]
                .get(col + 1)
                .ok_or_else(|| Error::Csv(format!("bodyparts row too short at column {}", col + 1)))?;
            let channel: Channel = header_rows[2]
                .get(col + 1)
                .ok_or_else(|| Error::Csv(format!("coords row too short at column {}", col + 1)))?
                .parse()?;

            if !labels.contains(label) {
                labels.push(label.clone());
            }
            column_index.insert((label.clone(), channel), col);
        }

        let mut columns = vec![Vec::new(); n_columns];
        let mut frame_index = Vec::new();
        for (row, record) in records.enumerate() {
            let record = record.map_err(|e| Error::Csv(e.to_string()))?;
            let frame = record
                .get(0)
                .unwrap_or_default()
                .parse::<u64>()
                .map_err(|e| Error::Csv(format!("bad frame index at data row {}: {}", row, e)))?;
            frame_index.push(frame);

            for (col, values) in columns.iter_mut().enumerate() {
                let cell = record.get(col + 1).unwrap_or_default();
                values.push(parse_cell(cell).map_err(|e| {
                    Error::Csv(format!("data row {}, column {}: {}", row, col + 1, e))
                })?);
            }
        }

        tracing::debug!(
            scorer = %scorer,
            labels = labels.len(),
            frames = frame_index.len(),
            "loaded DeepLabCut table"
        );

        Ok(Self {
            scorer,
            labels,
            column_index,
            columns,
            frame_index,
        })
    }

    pub fn n_frames(&self) -> usize {
        self.frame_index.len()
    }

    /// Frame indices from the first column
    pub fn frame_index(&self) -> &[u64] {
        &self.frame_index
    }
}

fn parse_cell(cell: &str) -> std::result::Result<f64, std::num::ParseFloatError> {
    if cell.is_empty() {
        Ok(f64::NAN)
    } else {
        cell.parse()
    }
}

impl TabularSource for DlcCsvSource {
    fn scorer(&self) -> &str {
        &self.scorer
    }

    fn labels(&self) -> Vec<String> {
        self.labels.clone()
    }

    fn read_channel(&self, label: &str, channel: Channel) -> Result<Vec<f64>> {
        if !self.labels.iter().any(|l| l == label) {
            return Err(Error::UnknownLabel(label.to_string()));
        }

        let col = self
            .column_index
            .get(&(label.to_string(), channel))
            .ok_or_else(|| Error::MissingChannel {
                label: label.to_string(),
                channel: channel.to_string(),
            })?;
        Ok(self.columns[*col].clone())
    }
}
