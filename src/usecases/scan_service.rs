//! Main scan logic: visit groups -> extract posts -> dedupe -> detect topics -> digest.
//!
//! - First run (no seen file) scans deeper to backfill
//! - A failing group is logged and skipped; the run continues
//! - Every new post is marked seen, lead or not
//! - The seen set is persisted only after all digests were delivered

use crate::domain::{DomainError, Lead, ScanDepth, TopicSet, global_post_id, pseudo_id};
use crate::ports::{GroupBrowser, SeenStore};
use crate::usecases::digest_service::DigestService;
use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Outcome of one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub started_at: Option<DateTime<Utc>>,
    pub groups_scanned: usize,
    pub groups_failed: usize,
    /// Posts not seen before this run.
    pub new_posts: usize,
    /// Lead count per topic key, in topic order.
    pub leads_by_topic: Vec<(String, usize)>,
}

impl ScanReport {
    pub fn total_leads(&self) -> usize {
        self.leads_by_topic.iter().map(|(_, n)| n).sum()
    }
}

/// Scan service. Runs one pass over all configured groups.
pub struct ScanService {
    browser: Arc<dyn GroupBrowser>,
    seen: Arc<dyn SeenStore>,
    digests: Arc<DigestService>,
    topics: TopicSet,
    groups: Vec<String>,
    progress: ProgressBar,
}

impl ScanService {
    pub fn new(
        browser: Arc<dyn GroupBrowser>,
        seen: Arc<dyn SeenStore>,
        digests: Arc<DigestService>,
        topics: TopicSet,
        groups: Vec<String>,
    ) -> Self {
        Self {
            browser,
            seen,
            digests,
            topics,
            groups: dedupe_preserving_order(groups),
            progress: ProgressBar::hidden(),
        }
    }

    /// Show progress over the group list on this bar.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Run one full pass. Closes the browser before sending digests.
    pub async fn run(&self) -> Result<ScanReport, DomainError> {
        let depth = if self.seen.is_first_run() {
            info!("first run detected: doing a deeper initial scan");
            ScanDepth::Deep
        } else {
            ScanDepth::Shallow
        };

        let mut report = ScanReport {
            started_at: Some(Utc::now()),
            ..Default::default()
        };
        let mut leads: HashMap<String, Vec<Lead>> = HashMap::new();

        self.progress.set_length(self.groups.len() as u64);
        for group_url in &self.groups {
            self.progress.set_message(group_url.clone());
            match self.scan_group(group_url, depth, &mut leads).await {
                Ok(new_posts) => {
                    report.groups_scanned += 1;
                    report.new_posts += new_posts;
                }
                Err(e) => {
                    report.groups_failed += 1;
                    error!(group = %group_url, error = %e, "error scanning group");
                }
            }
            self.progress.inc(1);
        }
        self.progress.finish_and_clear();

        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "browser close failed");
        }

        let mut first_failure = None;
        for topic in self.topics.iter() {
            let topic_leads = leads.remove(&topic.key).unwrap_or_default();
            report
                .leads_by_topic
                .push((topic.key.clone(), topic_leads.len()));

            if topic_leads.is_empty() {
                info!(topic = %topic.key, "no new {} leads this run", topic.display_name);
                continue;
            }
            if let Err(e) = self.digests.send_digest(topic, &topic_leads).await {
                error!(topic = %topic.key, error = %e, "digest delivery failed");
                first_failure.get_or_insert(e);
            }
        }

        if let Some(e) = first_failure {
            warn!("seen set not saved; undelivered leads will be picked up next run");
            return Err(e);
        }

        self.seen.persist().await?;
        let elapsed_secs = report
            .started_at
            .map(|t| (Utc::now() - t).num_seconds())
            .unwrap_or_default();
        info!(
            elapsed_secs,
            groups = report.groups_scanned,
            failed = report.groups_failed,
            new_posts = report.new_posts,
            leads = report.total_leads(),
            "run complete"
        );
        Ok(report)
    }

    /// Scan one group, appending leads per topic. Returns the number of new posts.
    async fn scan_group(
        &self,
        group_url: &str,
        depth: ScanDepth,
        leads: &mut HashMap<String, Vec<Lead>>,
    ) -> Result<usize, DomainError> {
        info!(group = %group_url, ?depth, "visiting group");
        let posts = self.browser.scan_group(group_url, depth).await?;
        info!(group = %group_url, count = posts.len(), "found articles");

        let mut new_posts = 0usize;
        for (idx, post) in posts.into_iter().enumerate() {
            if post.text.is_empty() {
                continue;
            }
            let id = global_post_id(group_url, &pseudo_id(&post.text, idx));
            if self.seen.contains(&id).await {
                continue;
            }
            new_posts += 1;

            let matched = self.topics.detect_topics(&post.text);
            if !matched.is_empty() {
                let labels = matched
                    .iter()
                    .map(|t| t.display_name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                info!(group = %group_url, topics = %labels, "lead detected");

                for topic in matched {
                    leads.entry(topic.key.clone()).or_default().push(Lead {
                        group_url: group_url.to_string(),
                        group_name: None,
                        text: post.text.clone(),
                        post_link: post.post_link.clone(),
                    });
                }
            }

            self.seen.insert(id).await;
        }
        Ok(new_posts)
    }
}

fn dedupe_preserving_order(groups: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    groups
        .into_iter()
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty() && seen.insert(g.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScrapedPost;
    use crate::ports::Mailer;
    use crate::usecases::MailSettings;
    use crate::usecases::fakes::{FakeBrowser, FakeDrafter, FakeMailer, MemorySeen};

    const G1: &str = "https://www.facebook.com/groups/ocpickleball";
    const G2: &str = "https://www.facebook.com/groups/irvinelife";

    fn post(text: &str) -> ScrapedPost {
        ScrapedPost {
            text: text.to_string(),
            post_link: None,
        }
    }

    struct Harness {
        browser: Arc<FakeBrowser>,
        seen: Arc<MemorySeen>,
        mailer: Arc<FakeMailer>,
    }

    impl Harness {
        fn new(browser: FakeBrowser, seen: MemorySeen, mailer: FakeMailer) -> Self {
            Self {
                browser: Arc::new(browser),
                seen: Arc::new(seen),
                mailer: Arc::new(mailer),
            }
        }

        fn service(&self, groups: &[&str]) -> ScanService {
            let mailer: Arc<dyn Mailer> = self.mailer.clone();
            let settings = MailSettings {
                from: "from@example.com".to_string(),
                to: "to@example.com".to_string(),
            };
            let digests = Arc::new(DigestService::new(
                Arc::new(FakeDrafter::replying("reply")),
                Some((mailer, settings)),
            ));
            ScanService::new(
                self.browser.clone(),
                self.seen.clone(),
                digests,
                TopicSet::defaults("Zack"),
                groups.iter().map(|g| g.to_string()).collect(),
            )
        }
    }

    #[tokio::test]
    async fn test_leads_grouped_by_topic_and_emailed() {
        let browser = FakeBrowser::default()
            .with_posts(G1, vec![post("Anyone selling paddles?"), post("Lost dog")])
            .with_posts(G2, vec![post("We are moving to Irvine, recommend a realtor?")]);
        let h = Harness::new(browser, MemorySeen::existing(&[]), FakeMailer::default());

        let report = h.service(&[G1, G2]).run().await.unwrap();

        assert_eq!(report.groups_scanned, 2);
        assert_eq!(report.new_posts, 3);
        assert_eq!(
            report.leads_by_topic,
            vec![("pickleball".to_string(), 1), ("realestate".to_string(), 1)]
        );
        let sent = h.mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].2.subject, "NEW Facebook Pickleball Leads (1)");
        assert_eq!(sent[1].2.subject, "NEW Facebook Real Estate Leads (1)");
        assert!(h.browser.is_closed());
        assert_eq!(h.seen.persist_count(), 1);
    }

    #[tokio::test]
    async fn test_seen_posts_are_skipped_and_all_new_posts_marked() {
        let seen_id = global_post_id(G1, &pseudo_id("Anyone selling paddles?", 0));
        let browser = FakeBrowser::default()
            .with_posts(G1, vec![post("Anyone selling paddles?"), post("Lost dog")]);
        let h = Harness::new(browser, MemorySeen::existing(&[&seen_id]), FakeMailer::default());

        let report = h.service(&[G1]).run().await.unwrap();

        assert_eq!(report.total_leads(), 0);
        assert!(h.mailer.sent.lock().unwrap().is_empty());
        assert!(h.seen.has(&global_post_id(G1, &pseudo_id("Lost dog", 1))));
        assert_eq!(h.seen.persist_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_text_is_ignored_but_keeps_index() {
        let browser = FakeBrowser::default().with_posts(G1, vec![post(""), post("court time?")]);
        let h = Harness::new(browser, MemorySeen::existing(&[]), FakeMailer::default());

        let report = h.service(&[G1]).run().await.unwrap();

        assert_eq!(report.new_posts, 1);
        assert!(h.seen.has(&global_post_id(G1, &pseudo_id("court time?", 1))));
        assert_eq!(h.seen.len(), 1);
    }

    #[tokio::test]
    async fn test_post_matching_two_topics_lands_in_both_digests() {
        let browser = FakeBrowser::default()
            .with_posts(G1, vec![post("Moving to OC, where are the pickleball courts?")]);
        let h = Harness::new(browser, MemorySeen::existing(&[]), FakeMailer::default());

        let report = h.service(&[G1]).run().await.unwrap();

        assert_eq!(report.total_leads(), 2);
        assert_eq!(h.mailer.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failing_group_does_not_stop_run() {
        let browser = FakeBrowser::default()
            .with_failure(G1, "navigation timeout")
            .with_posts(G2, vec![post("condo for rent?")]);
        let h = Harness::new(browser, MemorySeen::existing(&[]), FakeMailer::default());

        let report = h.service(&[G1, G2]).run().await.unwrap();

        assert_eq!(report.groups_failed, 1);
        assert_eq!(report.groups_scanned, 1);
        assert_eq!(h.mailer.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_first_run_scans_deep() {
        let browser = FakeBrowser::default().with_posts(G1, vec![]);
        let h = Harness::new(browser, MemorySeen::first_run(), FakeMailer::default());

        h.service(&[G1]).run().await.unwrap();

        assert_eq!(h.browser.depths(), vec![ScanDepth::Deep]);
    }

    #[tokio::test]
    async fn test_regular_run_scans_shallow_and_dedupes_groups() {
        let browser = FakeBrowser::default().with_posts(G1, vec![]);
        let h = Harness::new(browser, MemorySeen::existing(&[]), FakeMailer::default());

        let svc = h.service(&[G1, G1, "  "]);
        assert_eq!(svc.groups(), &[G1.to_string()]);
        svc.run().await.unwrap();

        assert_eq!(h.browser.depths(), vec![ScanDepth::Shallow]);
    }

    #[tokio::test]
    async fn test_unconfigured_mail_still_marks_leads_seen() {
        let browser = Arc::new(
            FakeBrowser::default().with_posts(G1, vec![post("Anyone selling paddles?")]),
        );
        let seen = Arc::new(MemorySeen::existing(&[]));
        let drafter = Arc::new(FakeDrafter::replying("reply"));
        let digests = Arc::new(DigestService::new(drafter.clone(), None));
        let service = ScanService::new(
            browser.clone(),
            seen.clone(),
            digests,
            TopicSet::defaults("Zack"),
            vec![G1.to_string()],
        );

        let report = service.run().await.unwrap();

        assert_eq!(
            report.leads_by_topic,
            vec![("pickleball".to_string(), 1), ("realestate".to_string(), 0)]
        );
        assert_eq!(seen.persist_count(), 1);
        assert!(seen.has(&global_post_id(G1, &pseudo_id("Anyone selling paddles?", 0))));
        assert_eq!(drafter.calls(), 0);
        assert!(browser.is_closed());
    }

    #[tokio::test]
    async fn test_mail_failure_skips_persist() {
        let browser = FakeBrowser::default().with_posts(G1, vec![post("paddle")]);
        let h = Harness::new(browser, MemorySeen::existing(&[]), FakeMailer::failing());

        let err = h.service(&[G1]).run().await.unwrap_err();

        assert!(matches!(err, DomainError::Mail(_)));
        assert_eq!(h.seen.persist_count(), 0);
        assert!(h.browser.is_closed());
    }

    #[test]
    fn test_dedupe_preserving_order() {
        let out = dedupe_preserving_order(vec![
            "b".to_string(),
            "a".to_string(),
            " b ".to_string(),
            "c".to_string(),
        ]);
        assert_eq!(out, vec!["b", "a", "c"]);
    }
}
