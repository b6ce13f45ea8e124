//! In-memory port implementations for use-case tests.

use crate::domain::{Digest, DomainError, Lead, ScanDepth, ScrapedPost, Topic};
use crate::ports::{GroupBrowser, Mailer, ReplyDrafter, SeenStore};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
pub struct FakeBrowser {
    pages: HashMap<String, Result<Vec<ScrapedPost>, String>>,
    depths: Mutex<Vec<ScanDepth>>,
    closed: AtomicBool,
}

impl FakeBrowser {
    pub fn with_posts(mut self, url: &str, posts: Vec<ScrapedPost>) -> Self {
        self.pages.insert(url.to_string(), Ok(posts));
        self
    }

    pub fn with_failure(mut self, url: &str, reason: &str) -> Self {
        self.pages.insert(url.to_string(), Err(reason.to_string()));
        self
    }

    pub fn depths(&self) -> Vec<ScanDepth> {
        self.depths.lock().unwrap().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl GroupBrowser for FakeBrowser {
    async fn scan_group(
        &self,
        group_url: &str,
        depth: ScanDepth,
    ) -> Result<Vec<ScrapedPost>, DomainError> {
        self.depths.lock().unwrap().push(depth);
        match self.pages.get(group_url) {
            Some(Ok(posts)) => Ok(posts.clone()),
            Some(Err(reason)) => Err(DomainError::Browser(reason.clone())),
            None => Err(DomainError::Browser(format!("unknown group {}", group_url))),
        }
    }

    async fn close(&self) -> Result<(), DomainError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

pub struct MemorySeen {
    first_run: bool,
    ids: Mutex<HashSet<String>>,
    persists: AtomicUsize,
}

impl MemorySeen {
    pub fn first_run() -> Self {
        Self {
            first_run: true,
            ids: Mutex::new(HashSet::new()),
            persists: AtomicUsize::new(0),
        }
    }

    pub fn existing(ids: &[&str]) -> Self {
        Self {
            first_run: false,
            ids: Mutex::new(ids.iter().map(|s| s.to_string()).collect()),
            persists: AtomicUsize::new(0),
        }
    }

    pub fn has(&self, id: &str) -> bool {
        self.ids.lock().unwrap().contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.lock().unwrap().len()
    }

    pub fn persist_count(&self) -> usize {
        self.persists.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SeenStore for MemorySeen {
    fn is_first_run(&self) -> bool {
        self.first_run
    }

    async fn contains(&self, post_id: &str) -> bool {
        self.has(post_id)
    }

    async fn insert(&self, post_id: String) {
        self.ids.lock().unwrap().insert(post_id);
    }

    async fn persist(&self) -> Result<(), DomainError> {
        self.persists.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FakeDrafter {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl FakeDrafter {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ReplyDrafter for FakeDrafter {
    async fn draft_reply(&self, _topic: &Topic, _lead: &Lead) -> Result<String, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| DomainError::Ai("model unavailable".to_string()))
    }
}

#[derive(Default)]
pub struct FakeMailer {
    pub sent: Mutex<Vec<(String, String, Digest)>>,
    fail: bool,
}

impl FakeMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[async_trait::async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, from: &str, to: &str, digest: &Digest) -> Result<String, DomainError> {
        if self.fail {
            return Err(DomainError::Mail("503 Service Unavailable".to_string()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push((from.to_string(), to.to_string(), digest.clone()));
        Ok(format!("msg-{}", sent.len()))
    }
}
