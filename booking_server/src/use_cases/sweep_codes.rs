use crate::domain::errors::OtpError;
use crate::domain::ports::{Clock, OtpStore};
use crate::use_cases::RATE_LIMIT_WINDOW_SECONDS;

// Periodic cleanup of abandoned codes. Entries only become garbage once the
// rate window has elapsed; dropping them earlier would forget issuance counts
// and reopen the rate limit.
pub struct SweepCodesUseCase<C, S> {
    pub clock: C,
    pub store: S,
}

impl<C, S> SweepCodesUseCase<C, S>
where
    C: Clock,
    S: OtpStore,
{
    pub async fn execute(&self) -> Result<usize, OtpError> {
        let now = self.clock.now_epoch_seconds();
        let cutoff = now.saturating_sub(RATE_LIMIT_WINDOW_SECONDS);

        self.store
            .sweep(cutoff)
            .await
            .map_err(|_| OtpError::StorageFailure)
    }
}
