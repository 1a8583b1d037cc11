//! Read-only permission queries over an ACL entry list.

use waymark_core::{AgentSelector, Mode, ModeSet, PermissionEntry};

/// True iff some entry matching `selector` grants `mode`.
///
/// Duplicate entries for the same agents value are tolerated: any one of
/// them granting the mode suffices, agreement across all matches is not
/// required. Absence of a match is a normal `false`, not an error.
pub fn has_mode(entries: &[PermissionEntry], selector: &AgentSelector, mode: Mode) -> bool {
    entries
        .iter()
        .filter(|entry| selector.matches(entry))
        .any(|entry| entry.modes.contains(mode))
}

/// True iff every mode of `required` is granted to `selector`, possibly
/// spread across several entries.
pub fn has_all_modes(
    entries: &[PermissionEntry],
    selector: &AgentSelector,
    required: &ModeSet,
) -> bool {
    required.iter().all(|&mode| has_mode(entries, selector, mode))
}
