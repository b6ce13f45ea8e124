//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run one scan.
//! No business logic here.

use dotenv::dotenv;
use lead_scout::adapters::ai::{CannedAdapter, OpenAiAdapter};
use lead_scout::adapters::browser::{ChromiumBrowser, ChromiumOptions};
use lead_scout::adapters::mail::ResendAdapter;
use lead_scout::adapters::persistence::SeenJson;
use lead_scout::adapters::ui::progress::group_progress;
use lead_scout::domain::TopicSet;
use lead_scout::ports::{GroupBrowser, Mailer, ReplyDrafter, SeenStore};
use lead_scout::shared::config::AppConfig;
use lead_scout::usecases::{DigestService, MailSettings, ScanService};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,chromiumoxide=off")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    if let Err(e) = run().await {
        error!(error = %e, "fatal lead-scout error");
        return Err(e);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::load().map_err(|e| anyhow::anyhow!("config: {}", e))?;
    info!("lead scout starting");

    let data_dir = cfg.data_dir_or_default();
    tokio::fs::create_dir_all(&data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("create data dir: {}", e))?;
    info!(path = %data_dir.display(), "data directory");

    let topics = TopicSet::from_configured(cfg.topics.clone(), &cfg.persona_name_or_default());
    info!(topics = topics.len(), "topic sets loaded");

    // --- Seen set (before the browser, so first-run detection sees the file as it was) ---
    let seen: Arc<dyn SeenStore> = Arc::new(
        SeenJson::open(cfg.seen_path_or_default())
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?,
    );

    // --- Reply drafting ---
    let drafter: Arc<dyn ReplyDrafter> = if cfg.is_ai_configured() {
        info!(
            model = %cfg.ai_model_or_default(),
            url = %cfg.ai_api_url_or_default(),
            "reply drafting enabled with OpenAI adapter"
        );
        Arc::new(OpenAiAdapter::new(
            cfg.ai_api_url_or_default(),
            cfg.ai_api_key().unwrap_or_default(),
            cfg.ai_model_or_default(),
        ))
    } else {
        warn!("OPENAI_API_KEY not set, using canned replies");
        Arc::new(CannedAdapter::new())
    };

    // --- Mail delivery ---
    let mailer: Option<(Arc<dyn Mailer>, MailSettings)> = if cfg.is_mail_configured() {
        let to = cfg.notify_email().unwrap_or_default();
        let from = cfg.from_email_or_default();
        info!(to = %to, from = %from, "digest delivery via Resend");
        let mailer: Arc<dyn Mailer> =
            Arc::new(ResendAdapter::new(cfg.resend_api_key().unwrap_or_default()));
        Some((mailer, MailSettings { from, to }))
    } else {
        warn!("RESEND_API_KEY or LEAD_NOTIFY_EMAIL not set, digests will be skipped");
        None
    };
    let digests = Arc::new(DigestService::new(drafter, mailer));

    // --- Browser ---
    let browser: Arc<dyn GroupBrowser> = Arc::new(
        ChromiumBrowser::launch(ChromiumOptions {
            headless: cfg.is_server(),
            cookies_path: cfg.cookies_path_or_default(),
            home_url: cfg.home_url_or_default(),
            scroll_delay: Duration::from_millis(cfg.scroll_delay_ms_or_default()),
            executable: cfg.chrome_path.as_deref().map(PathBuf::from),
        })
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?,
    );

    let groups = cfg.groups_or_default();
    let scan = ScanService::new(browser, seen, digests, topics, groups);
    let group_count = scan.groups().len();
    let scan = scan.with_progress(group_progress(group_count));

    let report = scan.run().await.map_err(|e| anyhow::anyhow!("{}", e))?;
    for (topic, count) in &report.leads_by_topic {
        info!(topic = %topic, count, "leads this run");
    }
    info!("lead scout run complete");
    Ok(())
}
