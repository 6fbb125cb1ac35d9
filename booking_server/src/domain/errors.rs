// Domain-level errors for the OTP issue/verify flows.
#[derive(Debug, PartialEq)]
pub enum OtpError {
    InvalidPhone,
    InvalidCode,
    RateLimited { retry_after: u64 },
    NotFound,
    Expired,
    Mismatch,
    DeliveryFailed,
    StorageFailure,
}

// Domain-level errors for queue lookups.
#[derive(Debug, PartialEq)]
pub enum QueueError {
    EntryNotFound,
    Unavailable,
}
