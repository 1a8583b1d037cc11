//! App-permission gate.
//!
//! Checks the application's POD-wide grants from the trusted-app registry.
//! These are distinct from per-resource ACLs: a failed check is surfaced
//! to the user as a notification, never as an error.

use waymark_core::error::WaymarkResult;
use waymark_core::{Mode, ModeSet};
use waymark_pod::PodStore;

/// Modes the companion application needs on the user's POD.
pub const REQUIRED_APP_MODES: [Mode; 4] = [Mode::Append, Mode::Read, Mode::Write, Mode::Control];

/// True iff `granted` covers every mode of `required`.
pub fn check_app_permissions(granted: &ModeSet, required: &ModeSet) -> bool {
    granted.is_superset_of(required)
}

/// True iff the registry grants `mode` to the application.
pub async fn has_app_permission<S: PodStore + ?Sized>(
    store: &S,
    web_id: &str,
    mode: Mode,
) -> WaymarkResult<bool> {
    let granted = store.get_app_permissions(web_id).await?;
    Ok(granted.map_or(false, |modes| modes.contains(&mode)))
}

/// User-facing notification payload for a failed gate check.
///
/// Plain strings so hosts can localize before constructing it.
#[derive(Debug, Clone)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub link_label: String,
    pub link_href: String,
}

/// Presentation hook for surfacing a failed gate check.
pub trait Notifier {
    fn notify(&self, notice: &Notice);
}

/// Fallback notifier that logs the notice.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: &Notice) {
        tracing::warn!(
            title = %notice.title,
            message = %notice.message,
            href = %notice.link_href,
            "app permissions missing"
        );
    }
}

/// Fetches the app's granted modes and verifies the full required profile.
///
/// A missing registry entry or a missing mode counts as "not satisfied"
/// and goes through `notifier`; only transport failures are errors.
pub async fn verify_app_permissions<S, N>(
    store: &S,
    web_id: &str,
    notifier: &N,
    notice: Notice,
) -> WaymarkResult<bool>
where
    S: PodStore + ?Sized,
    N: Notifier,
{
    let granted = store.get_app_permissions(web_id).await?;
    let required = ModeSet::from_modes(&REQUIRED_APP_MODES);

    let satisfied = granted.map_or(false, |modes| {
        check_app_permissions(&ModeSet::from_modes(&modes), &required)
    });

    if !satisfied {
        notifier.notify(&notice);
    }
    Ok(satisfied)
}
