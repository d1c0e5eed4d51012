// Domain-level errors for ledger and fleet workflows.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    // No persisted game state yet.
    NotInitialized,
    StorageFailure,
    InsufficientResources,
    UnknownUpgrade,
    AlreadyPurchased,
    EmptyDeposit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployError {
    UnknownShipType,
    InsufficientResources,
    LedgerUnavailable,
}

impl From<LedgerError> for DeployError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::InsufficientResources => DeployError::InsufficientResources,
            _ => DeployError::LedgerUnavailable,
        }
    }
}

impl LedgerError {
    /// Short message used in client-facing error payloads.
    pub fn message(self) -> &'static str {
        match self {
            LedgerError::NotInitialized => "game state not found",
            LedgerError::StorageFailure => "ledger storage unavailable",
            LedgerError::InsufficientResources => "insufficient resources",
            LedgerError::UnknownUpgrade => "unknown upgrade",
            LedgerError::AlreadyPurchased => "upgrade already purchased",
            LedgerError::EmptyDeposit => "no resources provided",
        }
    }
}

impl DeployError {
    pub fn message(self) -> &'static str {
        match self {
            DeployError::UnknownShipType => "unknown ship type",
            DeployError::InsufficientResources => "insufficient resources",
            DeployError::LedgerUnavailable => "ledger storage unavailable",
        }
    }
}
