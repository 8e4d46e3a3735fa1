//! Common error infrastructure for battle-core.
//!
//! This module provides the shared severity classification and the trait every
//! error type in the crate implements. Domain-specific errors (e.g.
//! `SetupError`, `ResolutionWarning`) live next to the components that raise
//! them.
//!
//! # Severity in the battle engine
//!
//! - **Fatal** errors abort session creation and are surfaced to the host loop.
//! - Everything raised after setup is **Recoverable** or **Validation**: it
//!   degrades to a no-effect result instead of ending the battle.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable - the battle continues with a no-effect outcome.
    ///
    /// Examples: target died before resolution, conflicting trigger directives
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: command for a dead actor, unknown target
    Validation,

    /// Internal error - unexpected inconsistency between definitions and state.
    ///
    /// Examples: formula produced a non-finite number
    Internal,

    /// Fatal error - the session cannot be created or continued.
    ///
    /// Examples: empty troop, missing definitions oracle
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error must be surfaced to the host loop.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Common trait for all battle-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
