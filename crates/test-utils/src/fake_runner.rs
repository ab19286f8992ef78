use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use watchrun::config::CommandConfig;
use watchrun::exec::CommandRunner;

/// What the recording runner saw, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunRecord {
    Started(String),
    Finished(String),
}

/// A fake runner that:
/// - records when each command (by rendered form) starts and finishes
/// - optionally holds a command "running" for a configured delay
/// - never spawns a process.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    records: Arc<Mutex<Vec<RunRecord>>>,
    delays: Arc<HashMap<String, Duration>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make commands whose executable is `command` take `delay` to finish.
    pub fn with_delay(mut self, command: &str, delay: Duration) -> Self {
        Arc::make_mut(&mut self.delays).insert(command.to_string(), delay);
        self
    }

    pub fn records(&self) -> Vec<RunRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Rendered commands in start order.
    pub fn started(&self) -> Vec<String> {
        self.records()
            .into_iter()
            .filter_map(|r| match r {
                RunRecord::Started(c) => Some(c),
                RunRecord::Finished(_) => None,
            })
            .collect()
    }

    pub fn finished_count(&self) -> usize {
        self.records()
            .iter()
            .filter(|r| matches!(r, RunRecord::Finished(_)))
            .count()
    }
}

impl CommandRunner for RecordingRunner {
    fn run<'a>(&'a self, cmd: &'a CommandConfig) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        let rendered = cmd.to_string();
        let delay = self.delays.get(&cmd.command).copied();

        Box::pin(async move {
            self.records
                .lock()
                .unwrap()
                .push(RunRecord::Started(rendered.clone()));

            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            self.records
                .lock()
                .unwrap()
                .push(RunRecord::Finished(rendered));
        })
    }
}
