use crate::clock::now_rfc3339;
use std::path::{Path, PathBuf};

const RELOAD_STAMP_FILE: &str = "reload";
const DISABLE_ENV_VAR: &str = "STREAKCHART_DISABLE_RELOAD_SIGNAL";

/// Out-of-process "please re-read the cache" ping for the widget host.
/// Fire-and-forget: no delivery guarantee, no acknowledgment, failures are
/// swallowed.
pub trait ReloadSignal {
    fn ping(&self);
}

/// Stamps a `reload` file in the shared directory. A widget host polls the
/// stamp (or its mtime) to decide when to re-pull the cached series.
pub struct StampSignal {
    path: PathBuf,
}

impl StampSignal {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(RELOAD_STAMP_FILE),
        }
    }
}

impl ReloadSignal for StampSignal {
    fn ping(&self) {
        let stamp = match now_rfc3339() {
            Ok(stamp) => stamp,
            Err(_) => return,
        };
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = std::fs::write(&self.path, stamp);
    }
}

pub struct NoopSignal;

impl ReloadSignal for NoopSignal {
    fn ping(&self) {}
}

pub fn signal_for_dir(dir: &Path) -> Box<dyn ReloadSignal> {
    if std::env::var(DISABLE_ENV_VAR).is_ok() {
        return Box::new(NoopSignal);
    }
    Box::new(StampSignal::new(dir))
}

/// Most recent ping stamp, if any. Used by the widget host and `status`.
pub fn last_reload(dir: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(dir.join(RELOAD_STAMP_FILE)).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
