use std::sync::Arc;

use tracing::debug;

use crate::domain::errors::OtpError;
use crate::domain::phone::normalize_phone;
use crate::domain::ports::{Clock, OtpStore, UserDirectory};
use crate::interface_adapters::protocol::{Purpose, VerifyCodeRequest};
use crate::use_cases::phone_locks::PhoneLocks;

// Response returned by the code verification use case.
pub struct VerifyCodeResponse {
    // Present only for login verification: whether an account exists for the
    // phone, so the caller can route to registration.
    pub user_exists: Option<bool>,
}

// Code verification use case with injected dependencies.
pub struct VerifyCodeUseCase<C, S, D> {
    pub clock: C,
    pub store: S,
    pub directory: D,
    pub locks: Arc<PhoneLocks>,
}

impl<C, S, D> VerifyCodeUseCase<C, S, D>
where
    C: Clock,
    S: OtpStore,
    D: UserDirectory,
{
    pub async fn execute(&self, payload: VerifyCodeRequest) -> Result<VerifyCodeResponse, OtpError> {
        let phone = normalize_phone(&payload.phone)?;
        validate_code_shape(&payload.otp)?;

        let _guard = self.locks.lock_for(&phone).await;

        let entry = self
            .store
            .get(&phone)
            .await
            .map_err(|_| OtpError::StorageFailure)?
            .ok_or(OtpError::NotFound)?;

        if self.clock.now_epoch_seconds() > entry.expires_at {
            // Best-effort cleanup of the expired entry.
            let _ = self.store.delete(&phone).await;
            return Err(OtpError::Expired);
        }

        if entry.code != payload.otp {
            // Entry is retained; the caller may retry until expiry.
            return Err(OtpError::Mismatch);
        }

        // Codes are single use.
        self.store
            .delete(&phone)
            .await
            .map_err(|_| OtpError::StorageFailure)?;

        let user_exists = match payload.purpose {
            Purpose::Login => {
                let account = self
                    .directory
                    .find_by_phone(&phone)
                    .await
                    .map_err(|_| OtpError::StorageFailure)?;
                if let Some(account) = &account {
                    debug!(user_id = %account.id, "existing account matched");
                }
                Some(account.is_some())
            }
            Purpose::Register => None,
        };

        Ok(VerifyCodeResponse { user_exists })
    }
}

fn validate_code_shape(code: &str) -> Result<(), OtpError> {
    if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(OtpError::InvalidCode);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::OtpEntry;
    use crate::use_cases::test_support::{
        FailureFlags, FixedClock, FixedDirectory, RecordingOtpStore,
    };

    const PHONE: &str = "+919876543210";

    fn payload(otp: &str, purpose: Purpose) -> VerifyCodeRequest {
        VerifyCodeRequest {
            phone: PHONE.to_string(),
            otp: otp.to_string(),
            purpose,
        }
    }

    fn use_case(
        now: u64,
        store: RecordingOtpStore,
        directory: FixedDirectory,
    ) -> VerifyCodeUseCase<FixedClock, RecordingOtpStore, FixedDirectory> {
        VerifyCodeUseCase {
            clock: FixedClock(now),
            store,
            directory,
            locks: Arc::new(PhoneLocks::new()),
        }
    }

    fn live_entry(code: &str) -> OtpEntry {
        OtpEntry {
            code: code.to_string(),
            expires_at: 1_700_000_300,
            attempts: 1,
        }
    }

    #[tokio::test]
    async fn when_code_matches_then_entry_is_consumed() {
        let store = RecordingOtpStore::new();
        store.insert_test_entry(PHONE, live_entry("042137"));
        let use_case = use_case(1_700_000_100, store.clone(), FixedDirectory::default());

        let result = use_case
            .execute(payload("042137", Purpose::Register))
            .await
            .expect("expected verification to succeed");

        assert_eq!(result.user_exists, None);
        assert!(store.get_test_entry(PHONE).is_none());
    }

    #[tokio::test]
    async fn when_no_entry_is_pending_then_returns_not_found() {
        let use_case = use_case(
            1_700_000_100,
            RecordingOtpStore::new(),
            FixedDirectory::default(),
        );

        let result = use_case.execute(payload("042137", Purpose::Login)).await;

        assert!(matches!(result, Err(OtpError::NotFound)));
    }

    #[tokio::test]
    async fn when_code_is_wrong_then_returns_mismatch_and_entry_survives() {
        let store = RecordingOtpStore::new();
        store.insert_test_entry(PHONE, live_entry("042137"));
        let use_case = use_case(1_700_000_100, store.clone(), FixedDirectory::default());

        let result = use_case.execute(payload("999999", Purpose::Login)).await;

        assert!(matches!(result, Err(OtpError::Mismatch)));
        assert!(store.get_test_entry(PHONE).is_some());
    }

    #[tokio::test]
    async fn when_entry_is_expired_then_returns_expired_and_entry_is_removed() {
        let store = RecordingOtpStore::new();
        store.insert_test_entry(PHONE, live_entry("042137"));

        // Clock advanced past the expiry instant; even the correct code fails.
        let use_case = use_case(1_700_000_301, store.clone(), FixedDirectory::default());
        let result = use_case.execute(payload("042137", Purpose::Login)).await;

        assert!(matches!(result, Err(OtpError::Expired)));
        assert!(store.get_test_entry(PHONE).is_none());
    }

    #[tokio::test]
    async fn when_now_equals_expiry_then_code_still_verifies() {
        let store = RecordingOtpStore::new();
        store.insert_test_entry(PHONE, live_entry("042137"));
        let use_case = use_case(1_700_000_300, store.clone(), FixedDirectory::default());

        let result = use_case.execute(payload("042137", Purpose::Register)).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn when_correct_code_is_replayed_then_returns_not_found() {
        let store = RecordingOtpStore::new();
        store.insert_test_entry(PHONE, live_entry("042137"));

        // First: wrong code leaves the entry in place.
        let result = use_case(1_700_000_100, store.clone(), FixedDirectory::default())
            .execute(payload("111111", Purpose::Login))
            .await;
        assert!(matches!(result, Err(OtpError::Mismatch)));
        assert!(store.get_test_entry(PHONE).is_some());

        // Then: the correct code consumes it.
        use_case(1_700_000_101, store.clone(), FixedDirectory::default())
            .execute(payload("042137", Purpose::Register))
            .await
            .expect("expected verification to succeed");

        // Replaying the same correct code finds nothing.
        let result = use_case(1_700_000_102, store.clone(), FixedDirectory::default())
            .execute(payload("042137", Purpose::Register))
            .await;
        assert!(matches!(result, Err(OtpError::NotFound)));
    }

    #[tokio::test]
    async fn when_purpose_is_login_and_account_exists_then_user_exists_is_true() {
        let store = RecordingOtpStore::new();
        store.insert_test_entry(PHONE, live_entry("042137"));
        let directory = FixedDirectory {
            known_phones: vec![PHONE.to_string()],
            should_fail: false,
        };

        let result = use_case(1_700_000_100, store, directory)
            .execute(payload("042137", Purpose::Login))
            .await
            .expect("expected verification to succeed");

        assert_eq!(result.user_exists, Some(true));
    }

    #[tokio::test]
    async fn when_purpose_is_login_and_account_is_missing_then_user_exists_is_false() {
        let store = RecordingOtpStore::new();
        store.insert_test_entry(PHONE, live_entry("042137"));

        let result = use_case(1_700_000_100, store, FixedDirectory::default())
            .execute(payload("042137", Purpose::Login))
            .await
            .expect("expected verification to succeed");

        assert_eq!(result.user_exists, Some(false));
    }

    #[tokio::test]
    async fn when_directory_fails_then_returns_storage_failure() {
        let store = RecordingOtpStore::new();
        store.insert_test_entry(PHONE, live_entry("042137"));
        let directory = FixedDirectory {
            known_phones: Vec::new(),
            should_fail: true,
        };

        let result = use_case(1_700_000_100, store, directory)
            .execute(payload("042137", Purpose::Login))
            .await;

        assert!(matches!(result, Err(OtpError::StorageFailure)));
    }

    #[tokio::test]
    async fn when_code_shape_is_malformed_then_returns_invalid_code() {
        let store = RecordingOtpStore::new();
        store.insert_test_entry(PHONE, live_entry("042137"));
        let use_case = use_case(1_700_000_100, store, FixedDirectory::default());

        for bad in ["42137", "0421370", "04213a", ""] {
            let result = use_case.execute(payload(bad, Purpose::Login)).await;
            assert!(matches!(result, Err(OtpError::InvalidCode)), "code {bad:?}");
        }
    }

    #[tokio::test]
    async fn when_store_get_fails_then_returns_storage_failure() {
        let store = RecordingOtpStore::new().with_failures(FailureFlags {
            get: true,
            ..Default::default()
        });
        let use_case = use_case(1_700_000_100, store, FixedDirectory::default());

        let result = use_case.execute(payload("042137", Purpose::Login)).await;

        assert!(matches!(result, Err(OtpError::StorageFailure)));
    }
}
