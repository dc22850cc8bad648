//! Operator interaction seam.

/// Abstract yes/no prompt and status-message sink provided by the host.
///
/// The provisioning workflow owns no UI: an editor host backs this with
/// modal dialogs and a status bar, a terminal host with stdin and stderr,
/// and tests with scripted answers. `notify` carries both progress updates
/// ("installing toolchain…") and terminal failure explanations; every
/// failing provisioning run leaves at least one `notify` message
/// describing the unsatisfied requirement.
pub trait Interaction {
    /// Asks the operator a yes/no question and returns their answer.
    fn confirm(&self, message: &str) -> bool;

    /// Shows a non-interactive status message.
    fn notify(&self, message: &str);
}
