//! Wide tracking tables addressed by `(scorer, body-part, channel)`.
//!
//! Extraction only needs two things from a table: the list of body-part
//! labels and the ability to read one channel of one label. Both are captured
//! by [`TabularSource`], so the extractor never depends on a particular file
//! format.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracklab_core::{Error, Marker, Result};

/// Per-marker channel of a wide table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    X,
    Y,
    Likelihood,
}

impl Channel {
    /// Every channel, in the column order of a wide table
    pub const ALL: [Channel; 3] = [Channel::X, Channel::Y, Channel::Likelihood];

    /// Column name of the channel in a wide table header
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::X => "x",
            Channel::Y => "y",
            Channel::Likelihood => "likelihood",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "x" => Ok(Channel::X),
            "y" => Ok(Channel::Y),
            "likelihood" => Ok(Channel::Likelihood),
            other => Err(Error::InvalidInput(format!("unknown channel '{}'", other))),
        }
    }
}

/// Read access to a wide tracking table
pub trait TabularSource {
    /// Scorer (network) that produced the table
    fn scorer(&self) -> &str;

    /// All body-part labels present, in source order
    fn labels(&self) -> Vec<String>;

    /// One channel of one label, one value per frame
    fn read_channel(&self, label: &str, channel: Channel) -> Result<Vec<f64>>;

    /// Read the `(x, y, likelihood)` triple of a label as a [`Marker`]
    fn read_marker(&self, label: &str) -> Result<Marker> {
        let x = self.read_channel(label, Channel::X)?;
        let y = self.read_channel(label, Channel::Y)?;
        let likelihood = self.read_channel(label, Channel::Likelihood)?;
        Marker::from_vecs(label, x, y, likelihood)
    }
}

/// In-memory wide table preserving label insertion order
#[derive(Debug, Clone, Default)]
pub struct WideTable {
    scorer: String,
    labels: Vec<String>,
    columns: HashMap<(String, Channel), Vec<f64>>,
    n_rows: Option<usize>,
}

impl WideTable {
    /// Empty table attributed to `scorer`
    pub fn new(scorer: impl Into<String>) -> Self {
        Self {
            scorer: scorer.into(),
            ..Default::default()
        }
    }

    /// Number of frames (rows); zero while the table is empty
    pub fn n_rows(&self) -> usize {
        self.n_rows.unwrap_or(0)
    }

    /// Insert or replace one column
    pub fn insert_channel(&mut self, label: &str, channel: Channel, values: Vec<f64>) -> Result<()> {
        match self.n_rows {
            Some(rows) if rows != values.len() => {
                return Err(Error::ShapeMismatch {
                    context: format!("column ({}, {})", label, channel),
                    expected: rows,
                    actual: values.len(),
                });
            }
            Some(_) => {}
            None => self.n_rows = Some(values.len()),
        }

        if !self.labels.iter().any(|l| l == label) {
            self.labels.push(label.to_string());
        }
        self.columns.insert((label.to_string(), channel), values);
        Ok(())
    }

    /// Insert all three channels of a marker
    pub fn insert_marker(
        &mut self,
        label: &str,
        x: Vec<f64>,
        y: Vec<f64>,
        likelihood: Vec<f64>,
    ) -> Result<()> {
        self.insert_channel(label, Channel::X, x)?;
        self.insert_channel(label, Channel::Y, y)?;
        self.insert_channel(label, Channel::Likelihood, likelihood)
    }

    /// Builder form of [`WideTable::insert_marker`]
    pub fn with_marker(
        mut self,
        label: &str,
        x: Vec<f64>,
        y: Vec<f64>,
        likelihood: Vec<f64>,
    ) -> Result<Self> {
        self.insert_marker(label, x, y, likelihood)?;
        Ok(self)
    }
}

impl TabularSource for WideTable {
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

        self.columns
            .get(&(label.to_string(), channel))
            .cloned()
            .ok_or_else(|| Error::MissingChannel {
                label: label.to_string(),
                channel: channel.to_string(),
            })
    }
}
