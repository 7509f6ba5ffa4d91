//! Test doubles for evidence sources and the reasoning engine.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use factcheck::adapters::{EngineError, EvidenceSource, ReasoningEngine, RetrievalError};
use factcheck::domain::{EvidenceItem, SourceName};

/// Scripted behavior for one query
#[derive(Clone)]
pub enum Reply {
    Items(Vec<EvidenceItem>),
    Fail(String),
    Hang,
    Panic,
}

/// Source that answers from a per-query script and records every call
pub struct StubSource {
    name: SourceName,
    replies: HashMap<String, Reply>,
    default: Reply,
    pub calls: Mutex<Vec<String>>,
}

impl StubSource {
    pub fn new(name: SourceName) -> Self {
        Self {
            name,
            replies: HashMap::new(),
            default: Reply::Items(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on(mut self, query: &str, reply: Reply) -> Self {
        self.replies.insert(query.to_string(), reply);
        self
    }

    pub fn otherwise(mut self, reply: Reply) -> Self {
        self.default = reply;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl EvidenceSource for StubSource {
    fn name(&self) -> SourceName {
        self.name
    }

    async fn retrieve(&self, query: &str) -> Result<Vec<EvidenceItem>, RetrievalError> {
        self.calls.lock().unwrap().push(query.to_string());

        let reply = self
            .replies
            .get(query)
            .cloned()
            .unwrap_or_else(|| self.default.clone());

        match reply {
            Reply::Items(items) => Ok(items),
            Reply::Fail(reason) => Err(RetrievalError::Decode(reason)),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(300)).await;
                Ok(Vec::new())
            }
            Reply::Panic => panic!("stub source exploded"),
        }
    }
}

/// Engine that returns a canned reply and remembers the prompts it saw
pub struct MockEngine {
    reply: Result<String, u16>,
    pub prompts: Mutex<Vec<String>>,
}

impl MockEngine {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Engine whose every call fails with the given HTTP status
    pub fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ReasoningEngine for MockEngine {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, prompt: &str) -> Result<String, EngineError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(EngineError::Status {
                status: *status,
                body: "unauthorized".to_string(),
            }),
        }
    }
}

pub fn wiki(title: &str, summary: &str) -> EvidenceItem {
    EvidenceItem::WikiSummary {
        title: title.to_string(),
        summary: summary.to_string(),
        url: format!("https://en.wikipedia.org/wiki/{}", title.replace(' ', "_")),
    }
}

pub fn news(text: &str) -> EvidenceItem {
    EvidenceItem::NewsArticle(text.to_string())
}

pub fn empty_sources() -> Vec<Arc<StubSource>> {
    SourceName::ALL
        .into_iter()
        .map(|name| Arc::new(StubSource::new(name)))
        .collect()
}

pub fn as_dyn(sources: &[Arc<StubSource>]) -> Vec<Arc<dyn EvidenceSource>> {
    sources
        .iter()
        .map(|s| Arc::clone(s) as Arc<dyn EvidenceSource>)
        .collect()
}
