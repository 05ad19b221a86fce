use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::trace::{Step, Trace};

pub const TRACE_TAPE_SCHEMA_VERSION: u32 = 1;

/// Identifies which instrumented routine produced a tape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TapeHeader {
    pub schema_version: u32,
    pub created_at_ms: u64,
    /// Step family, e.g. `graph`, `heap`, `search`.
    pub family: String,
    /// Routine within the family, e.g. `dijkstra`, `heap_sort`.
    pub algorithm: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TraceTapeJsonlLine<S> {
    Header(TapeHeader),
    Step { index: usize, step: S },
}

/// JSONL persistence for a materialized trace: one header line, then one line
/// per step in trace order.
#[derive(Debug, Clone)]
pub struct TraceTape<S> {
    pub header: TapeHeader,
    pub trace: Trace<S>,
}

impl<S> TraceTape<S>
where
    S: Step + Serialize + DeserializeOwned + Clone,
{
    pub fn new(family: &str, algorithm: &str, trace: Trace<S>) -> Self {
        Self {
            header: TapeHeader {
                schema_version: TRACE_TAPE_SCHEMA_VERSION,
                created_at_ms: now_ms(),
                family: family.to_string(),
                algorithm: algorithm.to_string(),
            },
            trace,
        }
    }

    pub fn write_jsonl<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let header: TraceTapeJsonlLine<S> = TraceTapeJsonlLine::Header(self.header.clone());
        writeln!(
            writer,
            "{}",
            serde_json::to_string(&header).map_err(io::Error::other)?
        )?;
        for (index, step) in self.trace.iter().enumerate() {
            let line = TraceTapeJsonlLine::Step {
                index,
                step: step.clone(),
            };
            writeln!(
                writer,
                "{}",
                serde_json::to_string(&line).map_err(io::Error::other)?
            )?;
        }
        writer.flush()
    }

    pub fn write_jsonl_to_path(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        self.write_jsonl(BufWriter::new(file))
    }

    pub fn read_jsonl_from_path(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Self::read_jsonl(BufReader::new(file))
    }

    pub fn read_jsonl<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut header: Option<TapeHeader> = None;
        let mut steps = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let parsed: TraceTapeJsonlLine<S> =
                serde_json::from_str(&line).map_err(|e| io::Error::other(format!("{e}")))?;
            match parsed {
                TraceTapeJsonlLine::Header(h) => {
                    if idx != 0 {
                        return Err(io::Error::other("tape header must be the first JSONL line"));
                    }
                    header = Some(h);
                }
                TraceTapeJsonlLine::Step { index, step } => {
                    if index != steps.len() {
                        return Err(io::Error::other(format!(
                            "tape step {index} is out of order (expected {})",
                            steps.len()
                        )));
                    }
                    steps.push(step);
                }
            }
        }

        let header = header.ok_or_else(|| io::Error::other("missing tape header"))?;
        if header.schema_version != TRACE_TAPE_SCHEMA_VERSION {
            return Err(io::Error::other(format!(
                "unsupported tape schema version {}",
                header.schema_version
            )));
        }
        let trace = Trace::materialize(steps).map_err(io::Error::other)?;

        Ok(Self { header, trace })
    }
}

/// Read only the header of a tape, to decide which step family to decode.
pub fn read_header(path: &Path) -> io::Result<TapeHeader> {
    let file = File::open(path)?;
    let mut first = String::new();
    BufReader::new(file).read_line(&mut first)?;
    let parsed: TraceTapeJsonlLine<serde_json::Value> =
        serde_json::from_str(first.trim()).map_err(|e| io::Error::other(format!("{e}")))?;
    match parsed {
        TraceTapeJsonlLine::Header(header) => Ok(header),
        TraceTapeJsonlLine::Step { .. } => Err(io::Error::other("missing tape header")),
    }
}

pub fn now_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
