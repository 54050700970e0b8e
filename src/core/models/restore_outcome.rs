use super::log_entry::{AuditAction, LogEntry};
use super::target::TargetType;

/// Broad class of a rejected restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    /// The log entry or its target does not exist.
    NotFound,
    /// The entry lacks what its kind of restoration needs.
    InvalidState,
}

/// Why a restore was refused. Every variant is an expected condition
/// that leaves both stores untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("Log entry '{log_id}' not found")]
    LogNotFound { log_id: String },

    #[error("Log entry '{log_id}' has invalid target type '{target_type}'")]
    InvalidTargetType { log_id: String, target_type: String },

    #[error("Log entry '{log_id}' does not name a target")]
    MissingTargetId { log_id: String },

    #[error("Cannot undo add: {target_type} '{target_id}' no longer exists")]
    TargetGone {
        target_type: TargetType,
        target_id: String,
    },

    #[error("Nothing to restore: '{action}' entry '{log_id}' has no prior state recorded")]
    NothingToRestore { log_id: String, action: AuditAction },

    #[error("Cannot restore: {target_type} '{target_id}' not found")]
    TargetNotFound {
        target_type: TargetType,
        target_id: String,
    },

    #[error("'{action}' entries cannot be restored")]
    NotRestorable { action: AuditAction },
}

impl Rejection {
    pub fn kind(&self) -> RejectionKind {
        match self {
            Rejection::LogNotFound { .. }
            | Rejection::TargetGone { .. }
            | Rejection::TargetNotFound { .. } => RejectionKind::NotFound,
            Rejection::InvalidTargetType { .. }
            | Rejection::MissingTargetId { .. }
            | Rejection::NothingToRestore { .. }
            | Rejection::NotRestorable { .. } => RejectionKind::InvalidState,
        }
    }
}

/// Result of a restore attempt that reached a decision.
#[derive(Debug, Clone, PartialEq)]
pub enum RestoreOutcome {
    /// The entity was restored (or removed, for an undone add) and the
    /// restoration itself was recorded as `entry`.
    Restored { message: String, entry: LogEntry },
    Rejected(Rejection),
}

impl RestoreOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RestoreOutcome::Restored { .. })
    }

    /// Human-readable confirmation or rejection reason.
    pub fn message(&self) -> String {
        match self {
            RestoreOutcome::Restored { message, .. } => message.clone(),
            RestoreOutcome::Rejected(rejection) => rejection.to_string(),
        }
    }

    /// The `(success, message)` pair handed to operator-facing callers.
    pub fn into_parts(self) -> (bool, String) {
        (self.is_success(), self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_kinds() {
        let gone = Rejection::LogNotFound {
            log_id: "x".into(),
        };
        assert_eq!(gone.kind(), RejectionKind::NotFound);

        let terminal = Rejection::NotRestorable {
            action: AuditAction::Loan,
        };
        assert_eq!(terminal.kind(), RejectionKind::InvalidState);
    }

    #[test]
    fn rejected_outcome_parts() {
        let outcome = RestoreOutcome::Rejected(Rejection::NotRestorable {
            action: AuditAction::RestoreDelete,
        });
        let (success, message) = outcome.into_parts();
        assert!(!success);
        assert_eq!(message, "'restore_delete' entries cannot be restored");
    }
}
