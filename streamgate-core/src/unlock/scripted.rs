//! Scripted unlock service for tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{JobId, JobInspection, UnlockError, UnlockService};
use crate::session::UnlockCredential;
use crate::source::{CandidateSource, FileEntry};

/// Canned responses for one source reference.
#[derive(Debug, Clone)]
pub struct UnlockScript {
    pub submit: Result<JobId, UnlockError>,
    pub inspect: Result<JobInspection, UnlockError>,
    pub unrestrict: Result<String, UnlockError>,
    /// Delay before answering submit, to shuffle completion order
    pub delay: Option<Duration>,
}

impl UnlockScript {
    /// Script where every call succeeds with the given files and final URL.
    pub fn success(job: &str, files: Vec<FileEntry>, url: &str) -> Self {
        Self {
            submit: Ok(JobId(job.to_string())),
            inspect: Ok(JobInspection {
                files,
                links: vec![format!("https://unlock.test/d/{job}")],
            }),
            unrestrict: Ok(url.to_string()),
            delay: None,
        }
    }

    /// Script whose submit call is refused.
    pub fn rejected() -> Self {
        Self {
            submit: Err(UnlockError::Rejected {
                status: 400,
                message: "unsupported source".to_string(),
            }),
            inspect: Err(UnlockError::EmptyLocator),
            unrestrict: Err(UnlockError::EmptyLocator),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Unlock service answering from scripts keyed by source reference.
///
/// Records every call as `"<operation>:<argument>"` in call order.
#[derive(Debug, Default)]
pub struct ScriptedUnlockService {
    scripts: HashMap<String, UnlockScript>,
    jobs: Mutex<HashMap<JobId, String>>,
    links: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedUnlockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a script for the source with the given reference.
    pub fn with_script(mut self, reference: &str, script: UnlockScript) -> Self {
        self.scripts.insert(reference.to_string(), script);
        self
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }

    fn unknown(what: &str) -> UnlockError {
        UnlockError::Rejected {
            status: 404,
            message: format!("unknown {what}"),
        }
    }
}

#[async_trait]
impl UnlockService for ScriptedUnlockService {
    async fn submit(
        &self,
        _credential: &UnlockCredential,
        source: &CandidateSource,
    ) -> Result<JobId, UnlockError> {
        self.record(format!("submit:{}", source.reference));
        let script = self
            .scripts
            .get(&source.reference)
            .ok_or_else(|| Self::unknown("source"))?;

        if let Some(delay) = script.delay {
            tokio::time::sleep(delay).await;
        }

        let job = script.submit.clone()?;
        self.jobs.lock().insert(job.clone(), source.reference.clone());
        Ok(job)
    }

    async fn inspect(
        &self,
        _credential: &UnlockCredential,
        job: &JobId,
    ) -> Result<JobInspection, UnlockError> {
        self.record(format!("inspect:{job}"));
        let reference = self
            .jobs
            .lock()
            .get(job)
            .cloned()
            .ok_or_else(|| Self::unknown("job"))?;
        let script = self
            .scripts
            .get(&reference)
            .ok_or_else(|| Self::unknown("source"))?;

        let inspection = script.inspect.clone()?;
        let mut links = self.links.lock();
        for link in &inspection.links {
            links.insert(link.clone(), reference.clone());
        }
        Ok(inspection)
    }

    async fn unrestrict(
        &self,
        _credential: &UnlockCredential,
        link: &str,
    ) -> Result<String, UnlockError> {
        self.record(format!("unrestrict:{link}"));
        let reference = self
            .links
            .lock()
            .get(link)
            .cloned()
            .ok_or_else(|| Self::unknown("link"))?;
        self.scripts
            .get(&reference)
            .ok_or_else(|| Self::unknown("source"))?
            .unrestrict
            .clone()
    }
}
