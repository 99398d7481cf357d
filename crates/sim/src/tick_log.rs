//! Text log of every tick, written on a background thread so a slow disk
//! never holds up the physics.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::mpsc::{channel, Sender};
use std::thread::{self, JoinHandle};

use crate::error::{SimError, SimResult};
use crate::snapshot::PlantSnapshot;

pub struct TickLog {
    tx: Option<Sender<PlantSnapshot>>,
    worker: Option<JoinHandle<io::Result<()>>>,
}

impl TickLog {
    /// Start a fresh log at `path`, truncating any previous run's log.
    pub fn create(path: &Path) -> SimResult<Self> {
        let file = File::create(path)?;
        let (tx, rx) = channel::<PlantSnapshot>();

        let worker = thread::Builder::new()
            .name("tick-log".to_string())
            .spawn(move || {
                let mut out = BufWriter::new(file);
                for snapshot in rx {
                    write!(out, "{snapshot}")?;
                    out.flush()?;
                }
                out.flush()
            })?;

        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
        })
    }

    /// Queue a snapshot for writing. Never blocks on I/O.
    pub fn record(&self, snapshot: &PlantSnapshot) {
        if let Some(tx) = &self.tx {
            if tx.send(snapshot.clone()).is_err() {
                tracing::warn!(tick = snapshot.tick, "tick log writer has stopped, dropping entry");
            }
        }
    }

    /// Flush the queue and surface any write error from the worker.
    pub fn finish(mut self) -> SimResult<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> SimResult<()> {
        drop(self.tx.take());
        match self.worker.take() {
            Some(handle) => match handle.join() {
                Ok(result) => result.map_err(SimError::from),
                Err(_) => Err(SimError::Log(io::Error::new(
                    io::ErrorKind::Other,
                    "tick log writer panicked",
                ))),
            },
            None => Ok(()),
        }
    }
}

impl Drop for TickLog {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            tracing::warn!(error = %e, "tick log did not close cleanly");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::model::ReactorModel;
    use crate::scenario::ScenarioParameters;

    #[test]
    fn writes_one_block_per_tick() {
        let path = std::env::temp_dir().join(format!("pwr-tick-log-{}.txt", std::process::id()));
        let mut model = ReactorModel::new(&ScenarioParameters::nominal(), SimConfig::default()).unwrap();

        let log = TickLog::create(&path).unwrap();
        for _ in 0..3 {
            log.record(model.tick(1.0).unwrap());
        }
        log.finish().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("New update:").count(), 3);
        assert!(text.contains("New update: 3s (tick 3)"));
        assert!(text.contains("Core Temperature: 330.000°C"));
        let _ = std::fs::remove_file(&path);
    }
}
