//! Shared test fixtures: a tiny cache request type, programmable route
//! nodes, and a counting diagnostics sink.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use shadow_route::observability::failure::{Category, DiagnosticsSink};
use shadow_route::{is_shadow_traffic, Request, RouteError, RouteHandle, RouteNode};

/// Get-like cache request with a precomputed routing-key hash.
#[derive(Debug, Clone)]
pub struct TestRequest {
    pub key: Vec<u8>,
    pub hash: u32,
}

impl TestRequest {
    pub fn new(key: &str, hash: u32) -> Self {
        Self {
            key: key.as_bytes().to_vec(),
            hash,
        }
    }
}

impl Request for TestRequest {
    type Reply = TestReply;

    fn routing_key(&self) -> &[u8] {
        &self.key
    }

    fn routing_key_hash(&self) -> u32 {
        self.hash
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestReply {
    pub value: String,
}

/// What a recording node observed for one request.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub key: Vec<u8>,
    pub shadow: bool,
}

/// Node that replies with a fixed value and records every request it serves,
/// optionally after a delay or with a failure.
pub struct RecordingNode {
    name: &'static str,
    reply: String,
    delay: Option<Duration>,
    fail: bool,
    seen: Mutex<Vec<SeenRequest>>,
}

impl RecordingNode {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            name: "recording",
            reply: reply.into(),
            delay: None,
            fail: false,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn named(name: &'static str, reply: &str) -> Arc<Self> {
        Arc::new(Self {
            name,
            reply: reply.into(),
            delay: None,
            fail: false,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn with_delay(reply: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            name: "recording",
            reply: reply.into(),
            delay: Some(delay),
            fail: false,
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            name: "failing",
            reply: String::new(),
            delay: None,
            fail: true,
            seen: Mutex::new(Vec::new()),
        })
    }

    /// Requests served so far. Delayed nodes record only after the delay.
    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl RouteNode<TestRequest> for RecordingNode {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn route(&self, req: &TestRequest) -> Result<TestReply, RouteError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.seen.lock().unwrap().push(SeenRequest {
            key: req.key.clone(),
            shadow: is_shadow_traffic(),
        });
        if self.fail {
            return Err(RouteError::upstream("backend down"));
        }
        Ok(TestReply {
            value: self.reply.clone(),
        })
    }
}

/// Upcast a recording node into a shareable route handle.
pub fn handle(node: &Arc<RecordingNode>) -> RouteHandle<TestRequest> {
    node.clone()
}

/// Diagnostics sink that counts and records every emission.
#[derive(Default)]
pub struct CountingSink {
    emitted: Mutex<Vec<(Category, String)>>,
}

impl CountingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn count(&self) -> usize {
        self.emitted.lock().unwrap().len()
    }

    pub fn emitted(&self) -> Vec<(Category, String)> {
        self.emitted.lock().unwrap().clone()
    }
}

impl DiagnosticsSink for CountingSink {
    fn emit(&self, category: Category, message: &str) {
        self.emitted
            .lock()
            .unwrap()
            .push((category, message.to_string()));
    }
}

/// Shadow policy with observable call counts, a switchable delay decision,
/// and a callback that pairs the primary reply with each shadow reply.
#[derive(Default)]
pub struct ProbePolicy {
    pub delay: bool,
    pub adjusted_key: Option<&'static str>,
    pub adjustments: AtomicUsize,
    pub reply_pairs: Arc<Mutex<Vec<(String, String)>>>,
}

impl ProbePolicy {
    pub fn delaying() -> Self {
        Self {
            delay: true,
            ..Self::default()
        }
    }

    pub fn adjustments(&self) -> usize {
        self.adjustments.load(Ordering::SeqCst)
    }

    pub fn reply_pairs(&self) -> Vec<(String, String)> {
        self.reply_pairs.lock().unwrap().clone()
    }
}

impl shadow_route::ShadowPolicy<TestRequest> for ProbePolicy {
    fn make_adjusted_normal_request(&self, req: &TestRequest) -> TestRequest {
        self.adjustments.fetch_add(1, Ordering::SeqCst);
        match self.adjusted_key {
            Some(key) => TestRequest::new(key, req.hash),
            None => req.clone(),
        }
    }

    fn should_delay_shadow(&self) -> bool {
        self.delay
    }

    fn make_post_shadow_reply_fn(
        &self,
        normal_reply: &TestReply,
    ) -> Option<shadow_route::PostShadowReplyFn<TestRequest>> {
        let normal = normal_reply.value.clone();
        let pairs = self.reply_pairs.clone();
        Some(Box::new(move |shadow_reply: &TestReply| {
            pairs
                .lock()
                .unwrap()
                .push((normal, shadow_reply.value.clone()));
        }))
    }
}

/// Let queued detached shadow tasks run on the current-thread test runtime.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
