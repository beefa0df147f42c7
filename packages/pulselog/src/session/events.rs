#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SessionEvent {
    /// A log file was created and is open for append.
    Opened,
    /// Mount failed, a create failed hard, or every name was taken.
    ProvisioningFailed,
    /// A record was written and flushed.
    Committed,
    /// A short write or a failed flush; the log can no longer be trusted.
    IntegrityLost,
}
