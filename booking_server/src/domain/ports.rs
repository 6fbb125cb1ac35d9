use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entities::{OtpEntry, Queue, QueueEntry, UserAccount};

// Port for the pending-code store used by OTP use cases. Keyed by normalized
// phone number; a distributed cache can be substituted behind this interface.
#[async_trait]
pub trait OtpStore: Send + Sync {
    async fn get(&self, phone: &str) -> Result<Option<OtpEntry>, String>;
    async fn set(&self, phone: String, entry: OtpEntry) -> Result<(), String>;
    async fn delete(&self, phone: &str) -> Result<bool, String>;
    // Drop entries whose expiry is at or before the cutoff. Returns how many
    // were removed.
    async fn sweep(&self, cutoff_epoch_seconds: u64) -> Result<usize, String>;
}

// Port for code delivery (SMS dispatch). Best-effort from the caller's view.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, phone: &str, code: &str) -> Result<(), String>;
}

// Port for account lookups during login verification.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<UserAccount>, String>;
}

// Port for queue reads from persistent storage.
#[async_trait]
pub trait QueueStore: Send + Sync {
    async fn list_active(&self) -> Result<Vec<Queue>, String>;
    async fn find_entry_by_booking(&self, booking_id: &str) -> Result<Option<QueueEntry>, String>;
}

// Port deciding whether a bearer token identifies a live session.
#[async_trait]
pub trait SessionGate: Send + Sync {
    async fn is_valid(&self, token: &str) -> Result<bool, String>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> u64;
}

// Forwarding impls so app state can hold `Arc<dyn Trait>` while the use cases
// stay generic over their collaborators.
#[async_trait]
impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    async fn send(&self, phone: &str, code: &str) -> Result<(), String> {
        (**self).send(phone, code).await
    }
}

#[async_trait]
impl<T: UserDirectory + ?Sized> UserDirectory for Arc<T> {
    async fn find_by_phone(&self, phone: &str) -> Result<Option<UserAccount>, String> {
        (**self).find_by_phone(phone).await
    }
}

#[async_trait]
impl<T: QueueStore + ?Sized> QueueStore for Arc<T> {
    async fn list_active(&self) -> Result<Vec<Queue>, String> {
        (**self).list_active().await
    }

    async fn find_entry_by_booking(&self, booking_id: &str) -> Result<Option<QueueEntry>, String> {
        (**self).find_entry_by_booking(booking_id).await
    }
}
