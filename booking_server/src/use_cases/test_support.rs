use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::entities::{OtpEntry, UserAccount};
use crate::domain::ports::{Clock, Notifier, OtpStore, UserDirectory};

pub(crate) type CodeTable = Arc<Mutex<HashMap<String, OtpEntry>>>;

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) u64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub get: bool,
    pub set: bool,
    pub delete: bool,
}

#[derive(Clone)]
pub(crate) struct RecordingOtpStore {
    codes: CodeTable,
    failures: FailureFlags,
}

impl RecordingOtpStore {
    pub(crate) fn new() -> Self {
        Self {
            codes: Arc::new(Mutex::new(HashMap::new())),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_entry(&self, phone: impl Into<String>, entry: OtpEntry) {
        let mut guard = self.codes.lock().expect("codes mutex poisoned");
        guard.insert(phone.into(), entry);
    }

    pub(crate) fn get_test_entry(&self, phone: &str) -> Option<OtpEntry> {
        let guard = self.codes.lock().expect("codes mutex poisoned");
        guard.get(phone).cloned()
    }

    pub(crate) fn entry_count(&self) -> usize {
        let guard = self.codes.lock().expect("codes mutex poisoned");
        guard.len()
    }
}

#[async_trait]
impl OtpStore for RecordingOtpStore {
    async fn get(&self, phone: &str) -> Result<Option<OtpEntry>, String> {
        if self.failures.get {
            return Err("get failed".to_string());
        }

        let guard = self.codes.lock().expect("codes mutex poisoned");
        Ok(guard.get(phone).cloned())
    }

    async fn set(&self, phone: String, entry: OtpEntry) -> Result<(), String> {
        if self.failures.set {
            return Err("set failed".to_string());
        }

        let mut guard = self.codes.lock().expect("codes mutex poisoned");
        guard.insert(phone, entry);
        Ok(())
    }

    async fn delete(&self, phone: &str) -> Result<bool, String> {
        if self.failures.delete {
            return Err("delete failed".to_string());
        }

        let mut guard = self.codes.lock().expect("codes mutex poisoned");
        Ok(guard.remove(phone).is_some())
    }

    async fn sweep(&self, cutoff_epoch_seconds: u64) -> Result<usize, String> {
        let mut guard = self.codes.lock().expect("codes mutex poisoned");
        let before = guard.len();
        guard.retain(|_, entry| entry.expires_at > cutoff_epoch_seconds);
        Ok(before - guard.len())
    }
}

// Notifier fake that records dispatches and can simulate delivery failure.
#[derive(Clone)]
pub(crate) struct RecordingNotifier {
    pub(crate) sent: Arc<Mutex<Vec<(String, String)>>>,
    pub(crate) should_fail: bool,
}

impl RecordingNotifier {
    pub(crate) fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            should_fail: false,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            should_fail: true,
        }
    }

    pub(crate) fn last_code(&self) -> Option<String> {
        let guard = self.sent.lock().expect("sent mutex poisoned");
        guard.last().map(|(_, code)| code.clone())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, phone: &str, code: &str) -> Result<(), String> {
        if self.should_fail {
            return Err("gateway rejected message".to_string());
        }

        let mut guard = self.sent.lock().expect("sent mutex poisoned");
        guard.push((phone.to_string(), code.to_string()));
        Ok(())
    }
}

// Directory fake backed by a fixed phone set.
#[derive(Clone, Default)]
pub(crate) struct FixedDirectory {
    pub(crate) known_phones: Vec<String>,
    pub(crate) should_fail: bool,
}

#[async_trait]
impl UserDirectory for FixedDirectory {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<UserAccount>, String> {
        if self.should_fail {
            return Err("directory query failed".to_string());
        }

        Ok(self
            .known_phones
            .iter()
            .find(|known| known.as_str() == phone)
            .map(|known| UserAccount {
                id: "user-1".to_string(),
                phone: known.clone(),
                name: None,
            }))
    }
}
