// src/locate.rs

//! Tool path lookup.
//!
//! Resolves a bare tool name (`"git"`) to an absolute path by asking the
//! shell, through the engine, with `whereis`/`which`. Hits are cached in
//! memory for the locator's lifetime; the cache is never persisted.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use crate::command::ScriptCommand;
use crate::exec::Engine;

/// Resolves and caches tool paths.
///
/// An explicit value owning its cache; create one per engine and share it
/// by reference.
pub struct Locator {
    engine: Engine,
    cache: Mutex<HashMap<String, String>>,
}

impl Locator {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Absolute path of `tool`, or `None` when the shell cannot find it.
    ///
    /// Looked up with `whereis -b -q` first and `which` as a fallback, both
    /// resolved against the shell's own `PATH` via host mode.
    pub async fn locate(&self, tool: &str) -> Option<String> {
        if let Some(hit) = self
            .cache
            .lock()
            .expect("locator cache lock poisoned")
            .get(tool)
        {
            return Some(hit.clone());
        }

        let path = match self.lookup(&Self::whereis(tool)).await {
            Some(path) => path,
            None => self.lookup(&Self::which(tool)).await?,
        };

        debug!(tool, path = %path, "located tool");
        self.cache
            .lock()
            .expect("locator cache lock poisoned")
            .insert(tool.to_string(), path.clone());
        Some(path)
    }

    async fn lookup(&self, command: &ScriptCommand) -> Option<String> {
        let output = self.engine.execute(command).await.ok().flatten()?;
        let path = output.trim();
        (!path.is_empty()).then(|| path.to_string())
    }

    /// `whereis -b -q <tool>`: binary only, quiet — prints the bare path.
    fn whereis(tool: &str) -> ScriptCommand {
        ScriptCommand::host("whereis").duplicate(vec![
            "-b".to_string(),
            "-q".to_string(),
            tool.to_string(),
        ])
    }

    fn which(tool: &str) -> ScriptCommand {
        ScriptCommand::host("which").duplicate(vec![tool.to_string()])
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::exec::{HostError, ScriptHost};

    /// Host that answers every lookup with a fixed path and counts calls.
    struct FixedPathHost {
        path: &'static str,
        calls: AtomicUsize,
    }

    impl ScriptHost for FixedPathHost {
        fn run(&self, _source: &str) -> Result<Option<String>, HostError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(self.path.to_string()))
        }
    }

    #[tokio::test]
    async fn locate_caches_resolved_paths() {
        let host = Arc::new(FixedPathHost {
            path: "/usr/bin/git",
            calls: AtomicUsize::new(0),
        });
        let locator = Locator::new(Engine::with_host(Arc::clone(&host) as Arc<dyn ScriptHost>));

        assert_eq!(locator.locate("git").await.as_deref(), Some("/usr/bin/git"));
        assert_eq!(locator.locate("git").await.as_deref(), Some("/usr/bin/git"));
        // second call is served from the cache
        assert_eq!(host.calls.load(Ordering::SeqCst), 1);
    }

    /// Host that fails the first (whereis) lookup and answers the second.
    struct WhichOnlyHost;

    impl ScriptHost for WhichOnlyHost {
        fn run(&self, source: &str) -> Result<Option<String>, HostError> {
            if source.contains("whereis") {
                Ok(None)
            } else {
                Ok(Some("/opt/bin/pod".to_string()))
            }
        }
    }

    #[tokio::test]
    async fn locate_falls_back_to_which() {
        let locator = Locator::new(Engine::with_host(Arc::new(WhichOnlyHost)));
        assert_eq!(locator.locate("pod").await.as_deref(), Some("/opt/bin/pod"));
    }

    /// Host that never finds anything.
    struct EmptyHost;

    impl ScriptHost for EmptyHost {
        fn run(&self, _source: &str) -> Result<Option<String>, HostError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn locate_returns_none_for_unknown_tools() {
        let locator = Locator::new(Engine::with_host(Arc::new(EmptyHost)));
        assert_eq!(locator.locate("no-such-tool").await, None);
    }
}
