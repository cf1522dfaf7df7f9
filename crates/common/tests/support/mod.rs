//! In-memory fakes for the registry and login seams
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use common::metadata::{PackageMetadata, VersionManifest};
use common::name::PackageName;
use common::registry::Registry;
use common::session::{BearerToken, HandshakeStatus, LoginEndpoint, LoginTicket};

#[derive(Debug, thiserror::Error)]
#[error("fake failure: {0}")]
pub struct FakeError(pub String);

pub fn names(raw: &[&str]) -> Vec<PackageName> {
    raw.iter().map(|n| PackageName::from_display(*n)).collect()
}

pub fn displays(names: &[PackageName]) -> Vec<String> {
    names.iter().map(|n| n.display().to_string()).collect()
}

/// A registry backed by maps, recording every call it receives.
#[derive(Default)]
pub struct FakeRegistry {
    index: Vec<PackageName>,
    metadata: HashMap<String, PackageMetadata>,
    fail_metadata: Option<String>,
    fail_delete: Option<String>,
    pub fetched: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
}

impl FakeRegistry {
    pub fn new(index: &[&str]) -> Self {
        Self {
            index: names(index),
            ..Default::default()
        }
    }

    pub fn index(&self) -> &[PackageName] {
        &self.index
    }

    /// Add a version of `name` depending on `deps`.
    pub fn with_deps(self, name: &str, deps: &[&str]) -> Self {
        self.with_version(name, deps, &[])
    }

    pub fn with_version(mut self, name: &str, deps: &[&str], optional: &[&str]) -> Self {
        let to_map = |list: &[&str]| -> Option<BTreeMap<String, String>> {
            if list.is_empty() {
                None
            } else {
                Some(list.iter().map(|d| (d.to_string(), "*".to_string())).collect())
            }
        };
        let meta = self.metadata.entry(name.to_string()).or_default();
        let version = format!("1.0.{}", meta.versions.len());
        meta.versions.insert(
            version,
            VersionManifest {
                dependencies: to_map(deps),
                optional_dependencies: to_map(optional),
            },
        );
        self
    }

    pub fn failing_metadata(mut self, name: &str) -> Self {
        self.fail_metadata = Some(name.to_string());
        self
    }

    pub fn failing_delete(mut self, name: &str) -> Self {
        self.fail_delete = Some(name.to_string());
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Registry for FakeRegistry {
    type Error = FakeError;

    async fn all_packages(&self) -> Result<Vec<PackageName>, Self::Error> {
        Ok(self.index.clone())
    }

    async fn package_metadata(&self, name: &PackageName) -> Result<PackageMetadata, Self::Error> {
        self.fetched.lock().unwrap().push(name.display().to_string());
        if self.fail_metadata.as_deref() == Some(name.display()) {
            return Err(FakeError(format!("metadata for {}", name)));
        }
        Ok(self
            .metadata
            .get(name.display())
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_package(&self, name: &PackageName) -> Result<(), Self::Error> {
        if self.fail_delete.as_deref() == Some(name.display()) {
            return Err(FakeError(format!("delete of {}", name)));
        }
        self.deleted.lock().unwrap().push(name.display().to_string());
        Ok(())
    }
}

pub fn ticket() -> LoginTicket {
    LoginTicket {
        login_url: "http://registry.test/login?id=42".to_string(),
        done_url: "http://registry.test/check_done?id=42".to_string(),
    }
}

/// A login endpoint that completes after a set number of polls.
pub struct FakeLoginEndpoint {
    complete_after: Option<usize>,
    failing_checks: usize,
    fail_ticket: bool,
    pub tickets_requested: AtomicUsize,
    pub checks: AtomicUsize,
}

impl FakeLoginEndpoint {
    /// Completes on poll number `polls` (one based).
    pub fn completing_after(polls: usize) -> Self {
        Self {
            complete_after: Some(polls),
            failing_checks: 0,
            fail_ticket: false,
            tickets_requested: AtomicUsize::new(0),
            checks: AtomicUsize::new(0),
        }
    }

    pub fn never_completing() -> Self {
        Self {
            complete_after: None,
            ..Self::completing_after(0)
        }
    }

    /// The first `count` polls fail at the transport level.
    pub fn with_failing_checks(mut self, count: usize) -> Self {
        self.failing_checks = count;
        self
    }

    pub fn failing_ticket(mut self) -> Self {
        self.fail_ticket = true;
        self
    }

    pub fn tickets_requested(&self) -> usize {
        self.tickets_requested.load(Ordering::SeqCst)
    }

    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LoginEndpoint for FakeLoginEndpoint {
    type Error = FakeError;

    async fn request_ticket(&self) -> Result<LoginTicket, Self::Error> {
        self.tickets_requested.fetch_add(1, Ordering::SeqCst);
        if self.fail_ticket {
            return Err(FakeError("login ticket".to_string()));
        }
        Ok(ticket())
    }

    async fn check_done(&self, _ticket: &LoginTicket) -> Result<HandshakeStatus, Self::Error> {
        let poll = self.checks.fetch_add(1, Ordering::SeqCst) + 1;
        if poll <= self.failing_checks {
            return Err(FakeError("connection reset".to_string()));
        }
        match self.complete_after {
            Some(n) if poll >= n => Ok(HandshakeStatus::Complete(BearerToken::new("np_token"))),
            _ => Ok(HandshakeStatus::Pending),
        }
    }
}
