use std::thread::JoinHandle;

use anyhow::{anyhow, Context, Result};
use ocr::OcrService;

use crate::config::AppConfig;

pub mod ocr;

/// Holds the instantiated boundary collaborators.
pub struct Services {
    pub ocr: Box<dyn OcrService>,
}

impl Services {
    /// Create a new `Services` from the services selected in the given `AppConfig`.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut services = Self {
            ocr: config.ocr_service.create_service(),
        };

        let name = services.ocr.name();
        services
            .ocr
            .init()
            .with_context(|| format!("Failed to initialise OCR service `{name}`"))?;

        Ok(services)
    }
}

impl Drop for Services {
    fn drop(&mut self) {
        if let Err(e) = self.ocr.terminate() {
            log::error!("Failed to terminate OCR service: {e:#}");
        }
    }
}

/// A unit of work running on its own thread. May or may not be finished.
///
/// The UI submits work, keeps the handle, and polls it once per frame with
/// [`ServiceJob::try_wait`].
pub struct ServiceJob<T> {
    handle: Option<JoinHandle<T>>,
}

impl<T: Send + 'static> ServiceJob<T> {
    pub fn new<F: FnOnce() -> T + Send + 'static>(f: F) -> Self {
        std::thread::spawn(f).into()
    }
}

impl<T> ServiceJob<T> {
    /// Get the return value of this job if it has finished.
    ///
    /// - Returns `Err` if the return value was already taken by a previous call;
    /// - Returns `Ok(None)` if the job is still running;
    /// - Returns `Ok(Some(T))` once the job has finished.
    pub fn try_wait(&mut self) -> Result<Option<T>> {
        match &self.handle {
            None => Err(anyhow!("job return value already taken")),
            Some(handle) if handle.is_finished() => {
                let handle = self.handle.take().unwrap();
                Ok(Some(
                    handle.join().map_err(|_| anyhow!("job thread panicked"))?,
                ))
            }
            Some(_) => Ok(None),
        }
    }

    /// Block until the job finishes and return its value.
    pub fn wait(self) -> Result<T> {
        match self.handle {
            None => Err(anyhow!("job return value already taken")),
            Some(handle) => handle.join().map_err(|_| anyhow!("job thread panicked")),
        }
    }
}

impl<T> From<JoinHandle<T>> for ServiceJob<T> {
    fn from(handle: JoinHandle<T>) -> Self {
        Self {
            handle: Some(handle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn wait_returns_job_value() {
        let job = ServiceJob::new(|| 6 * 7);
        assert_eq!(job.wait().unwrap(), 42);
    }

    #[test]
    fn try_wait_yields_value_exactly_once() {
        let mut job = ServiceJob::new(|| "done");

        let value = loop {
            match job.try_wait().unwrap() {
                Some(v) => break v,
                None => std::thread::sleep(Duration::from_millis(1)),
            }
        };
        assert_eq!(value, "done");

        // taking the value a second time is an error, not a hang
        assert!(job.try_wait().is_err());
    }
}
