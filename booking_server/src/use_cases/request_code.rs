use std::sync::Arc;

use rand::Rng;

use crate::domain::entities::OtpEntry;
use crate::domain::errors::OtpError;
use crate::domain::phone::normalize_phone;
use crate::domain::ports::{Clock, Notifier, OtpStore};
use crate::interface_adapters::protocol::SendCodeRequest;
use crate::use_cases::phone_locks::PhoneLocks;
use crate::use_cases::{CODE_TTL_SECONDS, MAX_SENDS_PER_WINDOW, RATE_LIMIT_WINDOW_SECONDS};

// Response returned by the code issuance use case.
#[derive(Debug)]
pub struct RequestCodeResponse {
    pub expires_in: u64,
}

// Code issuance use case with injected dependencies.
pub struct RequestCodeUseCase<C, S, N> {
    pub clock: C,
    pub store: S,
    pub notifier: N,
    pub locks: Arc<PhoneLocks>,
}

impl<C, S, N> RequestCodeUseCase<C, S, N>
where
    C: Clock,
    S: OtpStore,
    N: Notifier,
{
    pub async fn execute(&self, payload: SendCodeRequest) -> Result<RequestCodeResponse, OtpError> {
        let phone = normalize_phone(&payload.phone)?;

        // Serialize the whole read-check-write sequence for this phone.
        let _guard = self.locks.lock_for(&phone).await;

        let now = self.clock.now_epoch_seconds();
        let existing = self
            .store
            .get(&phone)
            .await
            .map_err(|_| OtpError::StorageFailure)?;

        if let Some(entry) = &existing {
            let window_end = entry.expires_at + RATE_LIMIT_WINDOW_SECONDS;
            if entry.attempts >= MAX_SENDS_PER_WINDOW && now < window_end {
                let retry_after = (window_end - now).min(RATE_LIMIT_WINDOW_SECONDS);
                return Err(OtpError::RateLimited { retry_after });
            }
        }

        let attempts = existing.map_or(1, |entry| entry.attempts + 1);
        let code = generate_code();
        let entry = OtpEntry {
            code: code.clone(),
            expires_at: now + CODE_TTL_SECONDS,
            attempts,
        };

        // The entry is stored before dispatch; a failed delivery leaves it in
        // place so a retry reuses the same rate window.
        self.store
            .set(phone.clone(), entry)
            .await
            .map_err(|_| OtpError::StorageFailure)?;

        self.notifier
            .send(&phone, &code)
            .await
            .map_err(|_| OtpError::DeliveryFailed)?;

        Ok(RequestCodeResponse {
            expires_in: CODE_TTL_SECONDS,
        })
    }
}

// Uniform over the full 6-digit space, keeping leading zeros.
fn generate_code() -> String {
    let value: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{value:06}")
}
