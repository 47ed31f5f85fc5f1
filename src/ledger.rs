//! Credential rotation with per-key usage accounting.
//!
//! Every API key carries a running count of the words it has been charged
//! for. Selection walks the keys in stored order and hands out the first one
//! still under the quota; usage is added after each successful request.
//!
//! [`FileLedger`] re-reads and rewrites the whole JSON file on every call and
//! takes no lock. Two processes sharing one file can both pick the same key
//! and push it past its quota. The quota is only checked before a request, so
//! a key can also end up over quota by the size of its last request.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::LedgerError;

/// Words a single key may be charged before it stops being selected.
pub const DEFAULT_QUOTA: u64 = 10_000;

/// Default location of the ledger file.
pub const DEFAULT_LEDGER_PATH: &str = "api_keys.json";

/// One API key and the words charged to it so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub key: String,
    pub used: u64,
    /// Any other fields in the ledger entry, written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Credential {
    pub fn new(key: impl Into<String>, used: u64) -> Self {
        Self {
            key: key.into(),
            used,
            extra: Map::new(),
        }
    }

    /// The key with everything past its first four characters hidden.
    pub fn masked_key(&self) -> String {
        mask_key(&self.key)
    }
}

/// A key picked for the next request, with its position in the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedCredential {
    pub index: usize,
    pub key: String,
    pub used: u64,
}

/// Storage for API keys and their usage counters.
///
/// Callers only go through this trait, so a transactional store can replace
/// the flat file without touching the synthesis loop.
pub trait CredentialLedger {
    /// Words a key may be charged before it is skipped.
    fn quota(&self) -> u64;

    /// Return the first key, in stored order, whose usage is below the quota.
    ///
    /// Fails with [`LedgerError::Exhausted`] when every key is at or over quota.
    fn select_available(&mut self) -> Result<SelectedCredential, LedgerError>;

    /// Add `words` to the usage counter of the entry at `index`.
    fn record_usage(&mut self, index: usize, words: u64) -> Result<(), LedgerError>;

    /// Snapshot of every entry in stored order.
    fn credentials(&mut self) -> Result<Vec<Credential>, LedgerError>;
}

/// Ledger persisted as a JSON array of `{ "key": ..., "used": ... }` objects.
#[derive(Debug, Clone)]
pub struct FileLedger {
    path: PathBuf,
    quota: u64,
}

impl FileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_quota(path, DEFAULT_QUOTA)
    }

    pub fn with_quota(path: impl Into<PathBuf>, quota: u64) -> Self {
        Self {
            path: path.into(),
            quota,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<Credential>, LedgerError> {
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, credentials: &[Credential]) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(credentials)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl CredentialLedger for FileLedger {
    fn quota(&self) -> u64 {
        self.quota
    }

    fn select_available(&mut self) -> Result<SelectedCredential, LedgerError> {
        let credentials = self.load()?;
        select_from(&credentials, self.quota)
    }

    fn record_usage(&mut self, index: usize, words: u64) -> Result<(), LedgerError> {
        let mut credentials = self.load()?;
        charge(&mut credentials, index, words)?;
        self.save(&credentials)?;
        log::debug!(
            "Charged {words} words to key #{index}, ledger saved to {}",
            self.path.display()
        );
        Ok(())
    }

    fn credentials(&mut self) -> Result<Vec<Credential>, LedgerError> {
        self.load()
    }
}

/// Ledger held in memory, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    credentials: Vec<Credential>,
    quota: u64,
}

impl MemoryLedger {
    pub fn new(credentials: Vec<Credential>, quota: u64) -> Self {
        Self { credentials, quota }
    }
}

impl CredentialLedger for MemoryLedger {
    fn quota(&self) -> u64 {
        self.quota
    }

    fn select_available(&mut self) -> Result<SelectedCredential, LedgerError> {
        select_from(&self.credentials, self.quota)
    }

    fn record_usage(&mut self, index: usize, words: u64) -> Result<(), LedgerError> {
        charge(&mut self.credentials, index, words)
    }

    fn credentials(&mut self) -> Result<Vec<Credential>, LedgerError> {
        Ok(self.credentials.clone())
    }
}

fn select_from(credentials: &[Credential], quota: u64) -> Result<SelectedCredential, LedgerError> {
    credentials
        .iter()
        .enumerate()
        .find(|(_, c)| c.used < quota)
        .map(|(index, c)| {
            log::debug!("Selected key #{index} ({}), used {}/{quota}", c.masked_key(), c.used);
            SelectedCredential {
                index,
                key: c.key.clone(),
                used: c.used,
            }
        })
        .ok_or(LedgerError::Exhausted)
}

fn charge(credentials: &mut [Credential], index: usize, words: u64) -> Result<(), LedgerError> {
    let entry = credentials
        .get_mut(index)
        .ok_or(LedgerError::IndexOutOfRange(index))?;
    entry.used = entry.used.saturating_add(words);
    Ok(())
}

pub fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(4).collect();
    if visible.len() == key.len() {
        visible
    } else {
        format!("{visible}…")
    }
}
