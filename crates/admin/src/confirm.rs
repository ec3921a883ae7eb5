//! Yes/no confirmation before destructive actions.

/// Asks the operator to confirm an action.
///
/// Returning `false` cancels the action silently.
pub trait Confirm: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// Confirms everything; for non-interactive runs (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}
