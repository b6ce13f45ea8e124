//! Application configuration. Groups, topics, credentials, paths.

use crate::domain::Topic;
use serde::Deserialize;
use std::path::PathBuf;

/// Groups scanned when none are configured.
pub const DEFAULT_GROUPS: &[&str] = &[
    // Pickleball groups
    "https://www.facebook.com/groups/1165030964029637",
    "https://www.facebook.com/groups/ocpickleball",
    "https://www.facebook.com/groups/2670990313289380",
    "https://www.facebook.com/groups/irvinelife",
    // Local community / real estate / neighborhood groups
    "https://www.facebook.com/groups/1489929731220541",
    "https://www.facebook.com/groups/354499855042339",
    "https://www.facebook.com/groups/NewportBeachDailyPost",
    "https://www.facebook.com/groups/1649809359092008",
    "https://www.facebook.com/groups/sdbeachcities",
    "https://www.facebook.com/groups/299032211029304",
    "https://www.facebook.com/groups/2096630413981134",
    "https://www.facebook.com/groups/258031801293776",
    "https://www.facebook.com/groups/temeculatalk01",
    "https://www.facebook.com/groups/irvineresidentsconnect",
    "https://www.facebook.com/groups/622910064501669",
    "https://www.facebook.com/groups/ResidentsOfIrvine",
];

pub const DEFAULT_HOME_URL: &str = "https://www.facebook.com";
pub const DEFAULT_FROM_EMAIL: &str = "Pickleball & Real Estate Leads <onboarding@resend.dev>";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Group page URLs to scan. Read from the config file (or LEAD_SCOUT_GROUPS, comma-separated).
    #[serde(default)]
    pub groups: Option<Vec<String>>,

    /// Topic keyword sets. Config file only; defaults to pickleball + real estate.
    #[serde(default)]
    pub topics: Option<Vec<Topic>>,

    /// Name used in the built-in replies and personas. Read from LEAD_SCOUT_PERSONA_NAME.
    #[serde(default)]
    pub persona_name: Option<String>,

    pub data_dir: Option<String>,
    /// Exported session cookies (JSON array). Read from LEAD_SCOUT_COOKIES_PATH.
    pub cookies_path: Option<String>,
    /// Seen-post identifiers (JSON array). Read from LEAD_SCOUT_SEEN_PATH.
    pub seen_path: Option<String>,
    pub home_url: Option<String>,

    /// "server" runs Chromium headless. Read from LEAD_SCOUT_RUN_ENV or RUN_ENV.
    #[serde(default)]
    pub run_env: Option<String>,

    /// Explicit Chrome/Chromium binary. Read from LEAD_SCOUT_CHROME_PATH.
    #[serde(default)]
    pub chrome_path: Option<String>,

    /// Delay in ms after each feed scroll (default 2000). Read from LEAD_SCOUT_SCROLL_DELAY_MS.
    #[serde(default)]
    pub scroll_delay_ms: Option<u64>,

    // ─────────────────────────────────────────────────────────────────────────
    // Reply drafting (OpenAI-compatible)
    // ─────────────────────────────────────────────────────────────────────────
    /// Read from LEAD_SCOUT_AI_API_KEY or OPENAI_API_KEY.
    #[serde(default)]
    pub ai_api_key: Option<String>,

    #[serde(default)]
    pub ai_api_url: Option<String>,

    /// Defaults to "gpt-4.1".
    #[serde(default)]
    pub ai_model: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Mail delivery (Resend)
    // ─────────────────────────────────────────────────────────────────────────
    /// Read from LEAD_SCOUT_RESEND_API_KEY or RESEND_API_KEY.
    #[serde(default)]
    pub resend_api_key: Option<String>,

    /// Digest recipient. Read from LEAD_SCOUT_NOTIFY_EMAIL or LEAD_NOTIFY_EMAIL.
    #[serde(default)]
    pub notify_email: Option<String>,

    /// Digest sender. Read from LEAD_SCOUT_FROM_EMAIL or LEAD_FROM_EMAIL.
    #[serde(default)]
    pub from_email: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(
            config::Environment::with_prefix("LEAD_SCOUT")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("groups"),
        );
        if let Ok(path) = std::env::var("LEAD_SCOUT_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    /// Parse a TOML document (same keys as the config file).
    pub fn from_toml(raw: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn groups_or_default(&self) -> Vec<String> {
        match &self.groups {
            Some(g) if !g.is_empty() => g.clone(),
            _ => DEFAULT_GROUPS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn persona_name_or_default(&self) -> String {
        self.persona_name
            .clone()
            .unwrap_or_else(|| "Zack".to_string())
    }

    pub fn data_dir_or_default(&self) -> PathBuf {
        PathBuf::from(self.data_dir.as_deref().unwrap_or("./data"))
    }

    /// Cookie file; relative to the data directory unless configured.
    pub fn cookies_path_or_default(&self) -> PathBuf {
        self.cookies_path
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.data_dir_or_default().join("fb-cookies.json"))
    }

    /// Seen file; relative to the data directory unless configured.
    pub fn seen_path_or_default(&self) -> PathBuf {
        self.seen_path
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.data_dir_or_default().join("seen-fb-posts.json"))
    }

    pub fn home_url_or_default(&self) -> String {
        self.home_url
            .clone()
            .unwrap_or_else(|| DEFAULT_HOME_URL.to_string())
    }

    pub fn run_env(&self) -> Option<String> {
        self.run_env
            .clone()
            .or_else(|| std::env::var("RUN_ENV").ok())
    }

    /// Headless on servers; headed locally so the session can be watched.
    pub fn is_server(&self) -> bool {
        self.run_env().as_deref() == Some("server")
    }

    pub fn scroll_delay_ms_or_default(&self) -> u64 {
        self.scroll_delay_ms.unwrap_or(2000)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // AI Configuration Helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn ai_api_key(&self) -> Option<String> {
        self.ai_api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.is_empty())
    }

    pub fn ai_api_url_or_default(&self) -> String {
        self.ai_api_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com/v1/chat/completions".to_string())
    }

    pub fn ai_model_or_default(&self) -> String {
        self.ai_model
            .clone()
            .unwrap_or_else(|| "gpt-4.1".to_string())
    }

    pub fn is_ai_configured(&self) -> bool {
        self.ai_api_key().is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mail Configuration Helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn resend_api_key(&self) -> Option<String> {
        self.resend_api_key
            .clone()
            .or_else(|| std::env::var("RESEND_API_KEY").ok())
            .filter(|k| !k.is_empty())
    }

    pub fn notify_email(&self) -> Option<String> {
        self.notify_email
            .clone()
            .or_else(|| std::env::var("LEAD_NOTIFY_EMAIL").ok())
            .filter(|e| !e.is_empty())
    }

    pub fn from_email_or_default(&self) -> String {
        self.from_email
            .clone()
            .or_else(|| std::env::var("LEAD_FROM_EMAIL").ok())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_FROM_EMAIL.to_string())
    }

    /// True when both an API key and a recipient are available.
    pub fn is_mail_configured(&self) -> bool {
        self.resend_api_key().is_some() && self.notify_email().is_some()
    }
}
