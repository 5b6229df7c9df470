use super::{LoggedEvent, RoundSnapshot};
use anyhow::Result;
use csv::Writer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct SnapshotLogger {
    writer: Writer<File>,
}

impl SnapshotLogger {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let writer = Writer::from_path(path)?;
        Ok(Self { writer })
    }

    pub fn log(&mut self, snapshot: &RoundSnapshot) -> Result<()> {
        self.writer.serialize(snapshot)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn log_batch(&mut self, snapshots: &[RoundSnapshot]) -> Result<()> {
        for snapshot in snapshots {
            self.writer.serialize(snapshot)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// One JSON object per line.
pub fn write_events(path: impl AsRef<Path>, events: &[LoggedEvent]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for event in events {
        serde_json::to_writer(&mut out, event)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
