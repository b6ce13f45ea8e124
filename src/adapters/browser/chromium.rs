//! Chromium adapter (chromiumoxide). Implements GroupBrowser.
//!
//! One browser, one page, reused for every group in a run. The CDP handler is
//! driven on a background task until the browser is closed.

use crate::adapters::browser::cookies::load_cookie_file;
use crate::domain::{DomainError, ScanDepth, ScrapedPost};
use crate::ports::GroupBrowser;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Launch flags for small servers (no sandbox, no shm, no GPU, minimal background work).
const SERVER_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--disable-software-rasterizer",
    "--no-zygote",
    "--single-process",
    "--disable-extensions",
    "--disable-features=IsolateOrigins,site-per-process,Translate",
    "--disable-background-networking",
    "--disable-background-timer-throttling",
    "--disable-breakpad",
    "--disable-sync",
    "--metrics-recording-only",
    "--mute-audio",
];

/// Launch options for the Chromium adapter.
#[derive(Debug, Clone)]
pub struct ChromiumOptions {
    pub headless: bool,
    pub cookies_path: PathBuf,
    /// Page opened after cookies are set, to confirm the session.
    pub home_url: String,
    pub scroll_delay: Duration,
    /// Explicit Chrome/Chromium binary; autodetected when None.
    pub executable: Option<PathBuf>,
}

/// Raw article as returned by the extraction script.
#[derive(Debug, Deserialize)]
struct RawArticle {
    text: String,
    link: Option<String>,
}

pub struct ChromiumBrowser {
    browser: Mutex<Option<Browser>>,
    handler: Mutex<Option<JoinHandle<()>>>,
    page: Page,
    scroll_delay: Duration,
}

impl ChromiumBrowser {
    /// Launch Chromium, load session cookies and open the home page.
    /// Fails (and closes the browser) when the cookie file is missing or invalid.
    pub async fn launch(opts: ChromiumOptions) -> Result<Self, DomainError> {
        let mut builder = BrowserConfig::builder().viewport(None);
        if !opts.headless {
            builder = builder.with_head();
        }
        if let Some(exe) = &opts.executable {
            builder = builder.chrome_executable(exe);
        }
        for arg in SERVER_ARGS {
            builder = builder.arg(*arg);
        }
        let config = builder.build().map_err(|e| {
            DomainError::Browser(format!(
                "Failed to build browser config: {}. Is Chrome/Chromium installed?",
                e
            ))
        })?;

        let (mut browser, mut handler) = Browser::launch(config).await.map_err(|e| {
            DomainError::Browser(format!(
                "Failed to launch browser: {}. Make sure Chrome or Chromium is installed.",
                e
            ))
        })?;
        let handle = tokio::spawn(async move { while handler.next().await.is_some() {} });
        info!(headless = opts.headless, "browser launched");

        let page = match Self::open_session(&browser, &opts).await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                handle.abort();
                return Err(e);
            }
        };

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            handler: Mutex::new(Some(handle)),
            page,
            scroll_delay: opts.scroll_delay,
        })
    }

    async fn open_session(browser: &Browser, opts: &ChromiumOptions) -> Result<Page, DomainError> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| DomainError::Browser(format!("Failed to create new page: {}", e)))?;

        let cookies = load_cookie_file(&opts.cookies_path).await?;
        let params = cookies
            .iter()
            .map(|c| c.to_param(&opts.home_url))
            .collect::<Result<Vec<_>, _>>()?;
        let count = params.len();
        page.set_cookies(params)
            .await
            .map_err(|e| DomainError::Browser(format!("Failed to set cookies: {}", e)))?;
        info!(count, path = %opts.cookies_path.display(), "loaded saved session cookies");

        page.goto(opts.home_url.as_str())
            .await
            .map_err(|e| DomainError::Browser(format!("Failed to open {}: {}", opts.home_url, e)))?;
        info!(url = %opts.home_url, "home page loaded with existing session cookies");

        Ok(page)
    }

    async fn scroll_feed(&self, rounds: u32) -> Result<(), DomainError> {
        for round in 0..rounds {
            self.page
                .evaluate("window.scrollBy(0, window.innerHeight)")
                .await
                .map_err(|e| DomainError::Browser(format!("scroll failed: {}", e)))?;
            debug!(round, "scrolled one viewport");
            tokio::time::sleep(self.scroll_delay).await;
        }
        Ok(())
    }
}

/// Script collecting the first `max_posts` articles: trimmed text plus the best link.
fn extraction_script(max_posts: usize) -> String {
    format!(
        r#"(() => {{
  const articles = Array.from(document.querySelectorAll('[role="article"]'));
  return articles.slice(0, {max_posts}).map((el) => {{
    const text = (el.innerText || "").trim();
    const linkEl =
      el.querySelector('a[href*="/posts/"]') ||
      el.querySelector('a[href*="permalink"]') ||
      el.querySelector('a[href*="/groups/"]');
    return {{ text, link: linkEl && linkEl.href ? linkEl.href : null }};
  }});
}})()"#
    )
}

#[async_trait::async_trait]
impl GroupBrowser for ChromiumBrowser {
    async fn scan_group(
        &self,
        group_url: &str,
        depth: ScanDepth,
    ) -> Result<Vec<ScrapedPost>, DomainError> {
        self.page
            .goto(group_url)
            .await
            .map_err(|e| DomainError::Browser(format!("Failed to navigate to {}: {}", group_url, e)))?;

        self.scroll_feed(depth.scroll_rounds()).await?;

        let raw: Vec<RawArticle> = self
            .page
            .evaluate(extraction_script(depth.max_posts()))
            .await
            .map_err(|e| DomainError::Browser(format!("article extraction failed: {}", e)))?
            .into_value()
            .map_err(|e| DomainError::Browser(format!("unexpected extraction result: {}", e)))?;

        Ok(raw
            .into_iter()
            .take(depth.max_posts())
            .map(|a| ScrapedPost {
                text: a.text,
                post_link: a.link,
            })
            .collect())
    }

    async fn close(&self) -> Result<(), DomainError> {
        if let Some(mut browser) = self.browser.lock().await.take() {
            if let Err(e) = browser.close().await {
                warn!(error = %e, "browser close failed");
            }
            let _ = browser.wait().await;
        }
        if let Some(handle) = self.handler.lock().await.take() {
            handle.abort();
        }
        info!("browser closed");
        Ok(())
    }
}
