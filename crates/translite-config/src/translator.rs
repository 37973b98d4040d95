use serde::{Deserialize, Serialize};

fn default_libre_servers() -> Vec<String> {
    [
        "https://libretranslate.de/translate",
        "https://translate.fedilab.app/translate",
        "https://translate.argosopentech.com/translate",
        "https://translate.astian.org/translate",
        "https://libretranslate.pussthcat.org/translate",
        "https://translate.mentality.rip/translate",
        "https://libretranslate.eownerdead.dedyn.io/translate",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_enable_google_fallback() -> bool {
    true
}

fn default_google_url() -> String {
    "https://translate.googleapis.com/translate_a/single".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// LibreTranslate endpoints in priority order, first one is the primary
    #[serde(default = "default_libre_servers")]
    pub libre_servers: Vec<String>,
    #[serde(default = "default_enable_google_fallback")]
    pub enable_google_fallback: bool,
    #[serde(default = "default_google_url")]
    pub google_url: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            libre_servers: default_libre_servers(),
            enable_google_fallback: default_enable_google_fallback(),
            google_url: default_google_url(),
        }
    }
}

impl TranslatorConfig {
    pub(crate) fn normalize(&mut self) {
        self.libre_servers = self
            .libre_servers
            .iter()
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
            .map(String::from)
            .collect();

        if self.libre_servers.is_empty() {
            tracing::warn!("no translation servers configured, using built-in list");
            self.libre_servers = default_libre_servers();
        }

        if self.google_url.trim().is_empty() {
            self.google_url = default_google_url();
        }
    }
}
