//! Outcome recorded when a state finishes.

/// The result attached to a state when it is marked as ended.
///
/// Conditions read the agent's last outcome (see
/// [`SuccessCheck`](crate::SuccessCheck)) to branch on whether the previous
/// state did its job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// The state completed its work.
    #[default]
    Succeeded,

    /// The state gave up or could not complete its work.
    Failed,
}

impl Outcome {
    /// Returns `true` if this outcome is `Succeeded`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Succeeded)
    }

    /// Returns `true` if this outcome is `Failed`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Outcome::Failed)
    }
}

impl From<bool> for Outcome {
    fn from(success: bool) -> Self {
        if success {
            Outcome::Succeeded
        } else {
            Outcome::Failed
        }
    }
}
