//! Permission merge: computes the replacement entry list for a grant.
//!
//! The ACL resource has no partial-update primitive, so a grant is a pure
//! transform of the full entry list and the caller persists the result as
//! a whole-list replacement.

use waymark_core::{AgentSelector, ModeSet, PermissionEntry};

/// The existing entry whose shape seeds a named-agent grant.
enum Template {
    /// The everyone entry. A template signal only -- never mutated.
    Everyone,
    /// A named-agent entry at this index, extended in place.
    Named(usize),
}

/// Returns the entry list to persist so that `selector` is granted `modes`.
///
/// For a named agent, the template entry is chosen among candidates whose
/// mode-set size is less than or equal to the number of modes being
/// granted, preferring the everyone entry:
///
/// - everyone template: a new entry scoped to the agent is appended and
///   the everyone entry stays untouched;
/// - named-agent template: the agent joins that entry's agent list in
///   place and its mode set becomes `modes`, so a multi-mode grant lands
///   on one entry;
/// - no candidate: a fresh single-agent entry is appended.
///
/// For everyone, the modes are unioned into the existing everyone entry if
/// present, keeping at most one entry per distinct agents value.
///
/// Known limitation: candidates are matched by mode-set size, not by mode
/// identity, so a Write-only entry can seed a Read grant.
///
/// Agent lists are appended without deduplication; granting to an agent
/// the template already names repeats the identifier.
pub fn merge_modes(
    mut entries: Vec<PermissionEntry>,
    selector: &AgentSelector,
    modes: &ModeSet,
) -> Vec<PermissionEntry> {
    match selector {
        AgentSelector::Everyone => merge_everyone(&mut entries, modes),
        AgentSelector::Agent(agent) => merge_agent(&mut entries, agent, modes),
    }
    entries
}

fn merge_everyone(entries: &mut Vec<PermissionEntry>, modes: &ModeSet) {
    match entries.iter_mut().find(|entry| entry.is_everyone()) {
        Some(entry) => entry.modes.union_with(modes),
        None => entries.push(PermissionEntry::everyone(modes.clone())),
    }
}

fn merge_agent(entries: &mut Vec<PermissionEntry>, agent: &str, modes: &ModeSet) {
    let mut template = None;
    for (idx, entry) in entries.iter().enumerate() {
        if entry.modes.len() > modes.len() {
            continue;
        }
        if entry.is_everyone() {
            // Everyone wins over any named candidate; stop scanning.
            template = Some(Template::Everyone);
            break;
        }
        if template.is_none() {
            template = Some(Template::Named(idx));
        }
    }

    match template {
        Some(Template::Named(idx)) => {
            let entry = &mut entries[idx];
            if let Some(agents) = entry.agents.as_mut() {
                agents.push(agent.to_string());
            }
            entry.modes = modes.clone();
        }
        Some(Template::Everyone) | None => {
            entries.push(PermissionEntry::for_agent(agent, modes.clone()));
        }
    }
}
