//! Background terrain generation with a single-flight policy.
//!
//! At most one run is in flight. A request made while a run is busy is
//! refused rather than queued or restarted; the caller sees
//! [`RequestStatus::Busy`] and can retry once the current result arrives.
//! Finished terrain is handed over as one `Arc`, so a consumer swapping it in
//! never observes a half-built mesh.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

use glam::Vec2;

use crate::error::TerrainError;
use crate::noise_field::CoherentNoise;
use crate::pipeline::{build_terrain, GeneratedTerrain, TerrainGenerator, TerrainSettings};

/// Answer to a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    /// A worker started on this request.
    Started { id: u64 },
    /// Another run is still in flight; the request was dropped.
    Busy,
}

/// Result of one background run.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub id: u64,
    pub result: Result<Arc<GeneratedTerrain>, TerrainError>,
}

/// Clears the busy flag when the worker thread ends, even by unwinding.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

pub struct BackgroundGenerator {
    settings: Arc<TerrainSettings>,
    source: Arc<dyn CoherentNoise>,
    busy: Arc<AtomicBool>,
    tx: Sender<GenerationOutcome>,
    rx: Receiver<GenerationOutcome>,
    next_id: u64,
}

impl BackgroundGenerator {
    pub fn new(settings: TerrainSettings, source: Arc<dyn CoherentNoise>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            settings: Arc::new(settings),
            source,
            busy: Arc::new(AtomicBool::new(false)),
            tx,
            rx,
            next_id: 0,
        }
    }

    /// Worker sharing a generator's settings and noise source.
    pub fn for_generator(generator: &TerrainGenerator) -> Self {
        Self::new(generator.settings().clone(), generator.source())
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Start generating at `offset` unless a run is already in flight.
    pub fn request(&mut self, offset: Vec2) -> Result<RequestStatus, TerrainError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::debug!("terrain request ignored: generation already in flight");
            return Ok(RequestStatus::Busy);
        }

        self.next_id += 1;
        let id = self.next_id;
        let settings = Arc::clone(&self.settings);
        let source = Arc::clone(&self.source);
        let busy = Arc::clone(&self.busy);
        let tx = self.tx.clone();

        let spawned = std::thread::Builder::new()
            .name(format!("terrain-gen-{id}"))
            .spawn(move || {
                // Dropped last: the outcome is sent before the flag clears, so an
                // idle worker never has a result in transit.
                let _guard = BusyGuard(busy);
                let run = panic::catch_unwind(AssertUnwindSafe(|| {
                    build_terrain(&settings, offset, source.as_ref())
                }));
                let result = match run {
                    Ok(result) => result.map(Arc::new),
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        log::error!("terrain generation #{} panicked: {}", id, message);
                        Err(TerrainError::Panicked(message))
                    }
                };
                let _ = tx.send(GenerationOutcome { id, result });
            });

        if let Err(e) = spawned {
            self.busy.store(false, Ordering::Release);
            return Err(TerrainError::Worker(e));
        }
        log::debug!("terrain generation #{} started", id);
        Ok(RequestStatus::Started { id })
    }

    /// Finished result, if one is waiting.
    pub fn try_recv(&self) -> Option<GenerationOutcome> {
        self.rx.try_recv().ok()
    }

    /// Block up to `timeout` for the next result.
    pub fn wait(&self, timeout: Duration) -> Option<GenerationOutcome> {
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
