use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use translite_config::Config;

use crate::language::preview;
use crate::types::AUTO_WORD;
use crate::{
    Backend, Direction, Endpoint, GoogleBackend, LibreBackend, Mode, Outcome, ResolverError,
    Source,
};

/// Text sent by connectivity probes
pub const PROBE_TEXT: &str = "Hello";

const PREVIEW_CHARS: usize = 50;

/// Picks which backend serves a translation request.
///
/// The endpoint list is fixed at construction. The only mutable state is the
/// mode, stored as one atomic word so a UI thread can switch it while a
/// request is running elsewhere.
pub struct Resolver {
    endpoints: Vec<Endpoint>,
    backends: Vec<Arc<dyn Backend>>,
    alternate: Option<Arc<dyn Backend>>,
    mode: AtomicUsize,
}

impl Resolver {
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = crate::http::build_client(&config.network)?;

        let entries = config
            .translator
            .libre_servers
            .iter()
            .map(|url| {
                let backend: Arc<dyn Backend> = Arc::new(LibreBackend::new(client.clone(), url));
                (url.clone(), backend)
            })
            .collect();

        let alternate = config.translator.enable_google_fallback.then(|| {
            Arc::new(GoogleBackend::new(client, &config.translator.google_url)) as Arc<dyn Backend>
        });

        tracing::info!(
            endpoints = config.translator.libre_servers.len(),
            alternate = alternate.is_some(),
            timeout_seconds = config.network.timeout_seconds,
            "translation resolver ready"
        );

        Ok(Self::with_backends(entries, alternate))
    }

    /// `entries` are `(url, backend)` pairs in priority order; the first is the primary.
    pub fn with_backends(
        entries: Vec<(String, Arc<dyn Backend>)>,
        alternate: Option<Arc<dyn Backend>>,
    ) -> Self {
        let (endpoints, backends) = entries
            .into_iter()
            .enumerate()
            .map(|(index, (url, backend))| (Endpoint::new(index, url), backend))
            .unzip();

        Self {
            endpoints,
            backends,
            alternate,
            mode: AtomicUsize::new(AUTO_WORD),
        }
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn mode(&self) -> Mode {
        Mode::decode(self.mode.load(Ordering::Acquire))
    }

    pub fn set_mode(&self, mode: Mode) -> Result<(), ResolverError> {
        let word = match mode {
            Mode::Pinned(index) if index >= self.endpoints.len() => None,
            mode => mode.encode(),
        };
        let Some(word) = word else {
            return Err(ResolverError::InvalidMode(format!(
                "{mode} (have {} endpoints)",
                self.endpoints.len()
            )));
        };

        self.mode.store(word, Ordering::Release);
        tracing::info!(%mode, "translation mode changed");
        Ok(())
    }

    /// Human-readable name of the active mode
    pub fn describe_mode(&self) -> String {
        match self.mode() {
            Mode::Auto => "Automatic".to_string(),
            Mode::Pinned(index) => self
                .endpoints
                .get(index)
                .map(|endpoint| endpoint.display_name.clone())
                .unwrap_or_else(|| format!("Server {index}")),
        }
    }

    /// Never fails: when every candidate is exhausted the sentinel outcome is returned.
    pub async fn translate(&self, text: &str) -> Outcome {
        let direction = Direction::detect(text);
        // Read once; a concurrent set_mode affects the next request only.
        let mode = self.mode();

        tracing::debug!(
            text = %preview(text, PREVIEW_CHARS),
            %direction,
            %mode,
            "translating"
        );

        if let Mode::Pinned(index) = mode
            && let Some(backend) = self.backends.get(index)
        {
            if let Some(text) = self.attempt(backend.as_ref(), text, direction).await {
                return Outcome::new(text, Source::Manual(index));
            }
            tracing::debug!(index, "pinned endpoint failed, falling back to automatic chain");
        }

        for (endpoint, backend) in self.endpoints.iter().zip(&self.backends) {
            if let Some(text) = self.attempt(backend.as_ref(), text, direction).await {
                let source = if endpoint.is_primary() {
                    Source::Primary
                } else {
                    Source::Backup(endpoint.index)
                };
                return Outcome::new(text, source);
            }
        }

        if let Some(alternate) = &self.alternate
            && let Some(text) = self.attempt(alternate.as_ref(), text, direction).await
        {
            return Outcome::new(text, Source::Alternate);
        }

        tracing::warn!("all translation services failed");
        Outcome::failed()
    }

    /// Single probe against one endpoint, no fallback
    pub async fn test_endpoint(&self, index: usize) -> Result<bool, ResolverError> {
        let backend = self
            .backends
            .get(index)
            .ok_or(ResolverError::IndexOutOfRange {
                index,
                len: self.backends.len(),
            })?;

        let ok = self
            .attempt(backend.as_ref(), PROBE_TEXT, Direction::probe())
            .await
            .is_some();
        tracing::info!(index, ok, "endpoint test finished");
        Ok(ok)
    }

    /// Tests the pinned endpoint, or the primary in automatic mode.
    /// Returns the index that was tested alongside the result.
    pub async fn test_current(&self) -> (usize, Result<bool, ResolverError>) {
        let index = match self.mode() {
            Mode::Auto => 0,
            Mode::Pinned(index) => index,
        };
        (index, self.test_endpoint(index).await)
    }

    async fn attempt(&self, backend: &dyn Backend, text: &str, direction: Direction) -> Option<String> {
        match backend.translate(text, direction).await {
            Ok(translated) => {
                tracing::debug!(
                    backend = backend.name(),
                    result = %preview(&translated, PREVIEW_CHARS),
                    "translation succeeded"
                );
                Some(translated)
            }
            Err(e) => {
                tracing::debug!(backend = backend.name(), "translation attempt failed: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::{FAILURE_TEXT, Language, TranslateError};

    type CallLog = Arc<Mutex<Vec<(String, Direction)>>>;

    /// Scripted backend that records every call into a shared log
    struct FakeBackend {
        name: String,
        reply: Option<String>,
        calls: CallLog,
    }

    #[async_trait]
    impl Backend for FakeBackend {
        async fn translate(&self, _text: &str, direction: Direction) -> Result<String, TranslateError> {
            self.calls
                .lock()
                .unwrap()
                .push((self.name.clone(), direction));
            self.reply.clone().ok_or(TranslateError::MissingTranslation)
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    fn fake(name: &str, reply: Option<&str>, calls: &CallLog) -> Arc<dyn Backend> {
        Arc::new(FakeBackend {
            name: name.to_string(),
            reply: reply.map(String::from),
            calls: calls.clone(),
        })
    }

    /// One endpoint per `(name, reply)`; `None` replies fail
    fn resolver(
        endpoints: &[(&str, Option<&str>)],
        alternate: Option<Option<&str>>,
    ) -> (Resolver, CallLog) {
        let calls = CallLog::default();
        let entries = endpoints
            .iter()
            .map(|(name, reply)| (format!("https://{name}/translate"), fake(name, *reply, &calls)))
            .collect();
        let alternate = alternate.map(|reply| fake("google", reply, &calls));
        (Resolver::with_backends(entries, alternate), calls)
    }

    fn called(calls: &CallLog) -> Vec<String> {
        calls.lock().unwrap().iter().map(|(n, _)| n.clone()).collect()
    }

    #[tokio::test]
    async fn direction_follows_script() {
        let (resolver, calls) = resolver(&[("primary", Some("ok"))], None);

        resolver.translate("你好").await;
        resolver.translate("good morning").await;

        let log = calls.lock().unwrap();
        assert_eq!(log[0].1.from, Language::Zh);
        assert_eq!(log[0].1.to, Language::En);
        assert_eq!(log[1].1.from, Language::En);
        assert_eq!(log[1].1.to, Language::Zh);
    }

    #[tokio::test]
    async fn primary_success_short_circuits() {
        let (resolver, calls) = resolver(
            &[("primary", Some("bonjour")), ("backup-a", Some("x")), ("backup-b", Some("y"))],
            Some(Some("z")),
        );

        let outcome = resolver.translate("hello").await;
        assert_eq!(outcome, Outcome::new("bonjour", Source::Primary));
        assert_eq!(outcome.source_label(), "primary");
        assert_eq!(called(&calls), vec!["primary"]);
    }

    #[tokio::test]
    async fn backups_are_tried_in_order() {
        let (resolver, calls) = resolver(
            &[("primary", None), ("backup-a", None), ("backup-b", Some("from b"))],
            Some(Some("z")),
        );

        let outcome = resolver.translate("hello").await;
        assert_eq!(outcome, Outcome::new("from b", Source::Backup(2)));
        assert_eq!(outcome.source_label(), "backup-2");
        assert_eq!(called(&calls), vec!["primary", "backup-a", "backup-b"]);
    }

    #[tokio::test]
    async fn alternate_is_last_resort() {
        let (resolver, calls) = resolver(&[("primary", None), ("backup-a", None)], Some(Some("z")));

        let outcome = resolver.translate("hello").await;
        assert_eq!(outcome, Outcome::new("z", Source::Alternate));
        assert_eq!(outcome.source_label(), "secondary-service");
        assert_eq!(called(&calls), vec!["primary", "backup-a", "google"]);
    }

    #[tokio::test]
    async fn everything_failing_yields_sentinel() {
        let (resolver, calls) = resolver(&[("primary", None), ("backup-a", None)], Some(None));

        let outcome = resolver.translate("hello").await;
        assert_eq!(outcome.text, FAILURE_TEXT);
        assert_eq!(outcome.source_label(), "none");
        assert!(outcome.is_failure());
        assert_eq!(called(&calls), vec!["primary", "backup-a", "google"]);
    }

    #[tokio::test]
    async fn disabled_alternate_is_never_called() {
        let (resolver, calls) = resolver(
            &[("primary", None), ("backup-a", None), ("backup-b", None)],
            None,
        );

        let outcome = resolver.translate("hello").await;
        assert_eq!(outcome, Outcome::failed());
        assert_eq!(called(&calls), vec!["primary", "backup-a", "backup-b"]);
    }

    #[tokio::test]
    async fn pinned_success_is_labelled_manual() {
        let (resolver, calls) = resolver(
            &[("primary", Some("p")), ("backup-a", Some("a")), ("backup-b", Some("b"))],
            None,
        );
        resolver.set_mode(Mode::Pinned(2)).unwrap();

        let outcome = resolver.translate("hello").await;
        assert_eq!(outcome, Outcome::new("b", Source::Manual(2)));
        assert_eq!(outcome.source_label(), "manual:2");
        assert_eq!(called(&calls), vec!["backup-b"]);
    }

    #[tokio::test]
    async fn pinned_failure_falls_back_silently() {
        let (resolver, calls) = resolver(
            &[("primary", Some("p")), ("backup-a", None)],
            Some(Some("z")),
        );
        resolver.set_mode(Mode::Pinned(1)).unwrap();

        let outcome = resolver.translate("hello").await;
        assert_eq!(outcome, Outcome::new("p", Source::Primary));
        assert_eq!(called(&calls), vec!["backup-a", "primary"]);
        assert_eq!(resolver.mode(), Mode::Pinned(1));
    }

    #[tokio::test]
    async fn pinned_failure_retries_full_chain() {
        let (resolver, calls) = resolver(
            &[("primary", None), ("backup-a", None), ("backup-b", None)],
            None,
        );
        resolver.set_mode(Mode::Pinned(1)).unwrap();

        assert!(resolver.translate("hello").await.is_failure());
        assert_eq!(
            called(&calls),
            vec!["backup-a", "primary", "backup-a", "backup-b"]
        );
        assert_eq!(resolver.mode(), Mode::Pinned(1));
    }

    #[test]
    fn out_of_range_mode_is_rejected() {
        let (resolver, _) = resolver(&[("primary", None), ("backup-a", None)], None);
        resolver.set_mode(Mode::Pinned(1)).unwrap();

        let err = resolver.set_mode(Mode::Pinned(2)).unwrap_err();
        assert!(matches!(err, ResolverError::InvalidMode(_)));
        assert_eq!(resolver.mode(), Mode::Pinned(1));

        assert!(resolver.set_mode(Mode::Pinned(usize::MAX)).is_err());
        assert_eq!(resolver.mode(), Mode::Pinned(1));

        resolver.set_mode(Mode::Auto).unwrap();
        assert_eq!(resolver.mode(), Mode::Auto);
    }

    #[test]
    fn negative_mode_string_is_rejected() {
        let (resolver, _) = resolver(&[("primary", None)], None);
        let result = "-1".parse::<Mode>().and_then(|mode| resolver.set_mode(mode));
        assert!(matches!(result, Err(ResolverError::InvalidMode(_))));
        assert_eq!(resolver.mode(), Mode::Auto);
    }

    #[test]
    fn endpoints_keep_order() {
        let (resolver, _) = resolver(&[("primary", None), ("a", None), ("b", None)], None);
        let endpoints = resolver.endpoints();
        assert_eq!(endpoints.len(), 3);
        assert!(endpoints[0].is_primary());
        assert_eq!(endpoints[1].url, "https://a/translate");
        assert_eq!(endpoints[2].index, 2);
        assert_eq!(endpoints[2].display_name, "Backup server 2");
    }

    #[tokio::test]
    async fn endpoint_test_is_a_single_probe() {
        let (resolver, calls) = resolver(&[("primary", Some("你好")), ("backup-a", None)], Some(Some("z")));

        assert_eq!(resolver.test_endpoint(0).await, Ok(true));
        assert_eq!(resolver.test_endpoint(1).await, Ok(false));
        assert_eq!(
            resolver.test_endpoint(2).await,
            Err(ResolverError::IndexOutOfRange { index: 2, len: 2 })
        );

        let log = calls.lock().unwrap();
        assert_eq!(log.len(), 2);
        assert!(log.iter().all(|(_, direction)| *direction == Direction::probe()));
    }

    #[tokio::test]
    async fn current_test_follows_mode() {
        let (resolver, calls) = resolver(&[("primary", Some("p")), ("backup-a", None)], None);

        assert_eq!(resolver.test_current().await, (0, Ok(true)));
        resolver.set_mode(Mode::Pinned(1)).unwrap();
        assert_eq!(resolver.test_current().await, (1, Ok(false)));
        assert_eq!(called(&calls), vec!["primary", "backup-a"]);
    }

    #[test]
    fn mode_description() {
        let (resolver, _) = resolver(&[("primary", None), ("backup-a", None)], None);
        assert_eq!(resolver.describe_mode(), "Automatic");
        resolver.set_mode(Mode::Pinned(1)).unwrap();
        assert_eq!(resolver.describe_mode(), "Backup server 1");
    }

    #[test]
    fn builds_from_default_config() {
        let config = Config::default();
        let resolver = Resolver::from_config(&config).unwrap();
        assert_eq!(resolver.endpoints().len(), config.translator.libre_servers.len());
        assert_eq!(resolver.endpoints()[0].url, "https://libretranslate.de/translate");
        assert!(resolver.alternate.is_some());
        assert_eq!(resolver.mode(), Mode::Auto);
    }
}
