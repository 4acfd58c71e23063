//! Theme preference persistence.
//!
//! # Invariants
//! - Unset or unrecognized stored values read as `Theme::Light`.

use crate::model::theme::Theme;
use crate::repo::kv_repo::{KeyValueStore, KvResult, THEME_KEY};
use log::{info, warn};

/// Reads the stored theme, defaulting to light.
pub fn load_theme(kv: &impl KeyValueStore) -> Theme {
    match kv.get(THEME_KEY) {
        Ok(Some(raw)) => Theme::parse(&raw).unwrap_or_else(|| {
            warn!("event=theme_load module=theme status=unrecognized fallback=light");
            Theme::Light
        }),
        Ok(None) => Theme::Light,
        Err(err) => {
            warn!("event=theme_load module=theme status=error fallback=light error={err}");
            Theme::Light
        }
    }
}

pub fn save_theme(kv: &impl KeyValueStore, theme: Theme) -> KvResult<()> {
    kv.set(THEME_KEY, theme.as_str())
}

/// Flips `current` and persists the result.
pub fn toggle_theme(kv: &impl KeyValueStore, current: Theme) -> KvResult<Theme> {
    let next = current.toggled();
    save_theme(kv, next)?;
    info!("event=theme_toggle module=theme status=ok theme={next}");
    Ok(next)
}
