use crate::document::LoadedCity;
use crate::error::CitError;
use crate::progress::LoadEvent;
use crate::registry::Registry;
use crate::scan::{ScanConfig, scan_entities};
use crate::statics;
use std::{
    path::{Path, PathBuf},
    sync::{
        Arc,
        mpsc::{self, Receiver, TryRecvError},
    },
    thread,
};

/// A loaded document together with the registry of editable entries built from it.
#[derive(Debug, Clone)]
pub struct Session {
    pub city: LoadedCity,
    pub registry: Registry,
}

impl Session {
    /// Run the whole load pipeline on the calling thread, reporting progress through `emit`.
    /// `emit` never sees `LoadEvent::Finished`; the caller owns the outcome.
    pub fn open(
        path: &Path,
        config: &ScanConfig,
        mut emit: impl FnMut(LoadEvent),
    ) -> Result<Self, CitError> {
        emit(LoadEvent::progress(0.0, statics::EN_PROGRESS_LOADING));
        tracing::info!(?path, "loading CIT file");
        let city = LoadedCity::load_path(path)?;

        emit(LoadEvent::progress(10.0, statics::EN_PROGRESS_PARSING));
        emit(LoadEvent::CityName(
            city.city_name()
                .unwrap_or(statics::EN_UNKNOWN_CITY)
                .to_string(),
        ));

        emit(LoadEvent::progress(60.0, statics::EN_PROGRESS_SCANNING));
        let registry = Self::build_registry(&city, config);

        emit(LoadEvent::progress(100.0, statics::EN_PROGRESS_DONE));
        Ok(Self { city, registry })
    }

    fn build_registry(city: &LoadedCity, config: &ScanConfig) -> Registry {
        let found = scan_entities(&city.root, config);
        let registry = Registry::build_with_scan(&city.root, found);
        tracing::info!(
            categories = registry.categories.len(),
            entries = registry.entry_count(),
            "built registry"
        );
        registry
    }

    /// Commit every entry into a copy of the document and write it to `path`.
    ///
    /// The in-memory document and the entries' saved text are only updated once the
    /// write succeeded, so a failed save can simply be retried.
    pub fn save_to_path(&mut self, path: &Path) -> Result<(), CitError> {
        let mut city = self.city.clone();
        let writes = self.registry.commit(&mut city.root)?;
        city.save_to_path(path)?;
        tracing::info!(?path, writes, "saved CIT file");

        self.city = city;
        self.registry.mark_saved();
        Ok(())
    }
}

/// A load running on a worker thread.
struct LoadJob {
    path: PathBuf,
    rx: Receiver<WorkerMessage>,
}

enum WorkerMessage {
    Event(LoadEvent),
    Done(Result<Box<Session>, CitError>),
}

impl LoadJob {
    fn spawn(path: PathBuf, config: Arc<ScanConfig>) -> Self {
        let (tx, rx) = mpsc::channel();
        let worker_path = path.clone();
        thread::spawn(move || {
            let result = Session::open(&worker_path, &config, |event| {
                // A closed receiver means the editor went away; nothing left to report to.
                let _ = tx.send(WorkerMessage::Event(event));
            });
            let _ = tx.send(WorkerMessage::Done(result.map(Box::new)));
        });
        Self { path, rx }
    }
}

/// Owns the current session and serializes access to it: at most one load or
/// save is in flight at any time.
pub struct CityEditor {
    config: Arc<ScanConfig>,
    session: Option<Session>,
    job: Option<LoadJob>,
}

impl Default for CityEditor {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

impl CityEditor {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config: Arc::new(config),
            session: None,
            job: None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// `None` while a load is in flight, so the registry cannot be edited mid-load.
    pub fn session_mut(&mut self) -> Option<&mut Session> {
        if self.is_busy() {
            return None;
        }
        self.session.as_mut()
    }

    pub fn is_busy(&self) -> bool {
        self.job.is_some()
    }

    /// Start loading `path` on a worker thread. Rejected with `Busy` if a load is running.
    pub fn begin_load(&mut self, path: PathBuf) -> Result<(), CitError> {
        if let Some(job) = &self.job {
            tracing::warn!(requested = ?path, running = ?job.path, "rejecting concurrent load");
            return Err(CitError::Busy);
        }
        self.job = Some(LoadJob::spawn(path, Arc::clone(&self.config)));
        Ok(())
    }

    /// Drain pending events without blocking.
    pub fn poll(&mut self) -> Vec<LoadEvent> {
        let mut events = Vec::new();
        while let Some(job) = &self.job {
            match job.rx.try_recv() {
                Ok(msg) => events.push(self.handle(msg)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => events.push(self.worker_vanished()),
            }
        }
        events
    }

    /// Block until the running load finishes, returning every event it produced.
    pub fn wait(&mut self) -> Vec<LoadEvent> {
        let mut events = Vec::new();
        while let Some(job) = &self.job {
            match job.rx.recv() {
                Ok(msg) => events.push(self.handle(msg)),
                Err(_) => events.push(self.worker_vanished()),
            }
        }
        events
    }

    /// Load synchronously on the calling thread.
    pub fn load_blocking(&mut self, path: PathBuf) -> Result<(), CitError> {
        self.begin_load(path.clone())?;
        match self.wait().pop() {
            Some(LoadEvent::Finished(result)) => result.map(|_| ()),
            _ => Err(CitError::WorkerExited { path }),
        }
    }

    /// Commit and write the current session. Rejected with `Busy` while a load is running.
    pub fn save_to_path(&mut self, path: &Path) -> Result<(), CitError> {
        if self.is_busy() {
            tracing::warn!(?path, "rejecting save while a load is running");
            return Err(CitError::Busy);
        }
        let Some(session) = self.session.as_mut() else {
            return Err(CitError::NothingLoaded);
        };
        session.save_to_path(path)
    }

    fn handle(&mut self, msg: WorkerMessage) -> LoadEvent {
        match msg {
            WorkerMessage::Event(event) => event,
            WorkerMessage::Done(result) => {
                let path = self.job.take().map(|job| job.path).unwrap_or_default();
                match result {
                    Ok(session) => {
                        self.session = Some(*session);
                        LoadEvent::Finished(Ok(path))
                    }
                    Err(e) => {
                        // Keep whatever was loaded before.
                        tracing::warn!(?path, error = %e, "load failed");
                        LoadEvent::Finished(Err(e))
                    }
                }
            }
        }
    }

    fn worker_vanished(&mut self) -> LoadEvent {
        let path = self.job.take().map(|job| job.path).unwrap_or_default();
        tracing::error!(?path, "load worker exited without a result");
        LoadEvent::Finished(Err(CitError::WorkerExited { path }))
    }
}
