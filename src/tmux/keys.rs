//! Named-key vocabulary and character-at-a-time input.

use std::time::Duration;
use tokio::time::sleep;

use crate::contracts::KeyInjector;
use crate::error::TrackerError;

/// Key names tmux accepts as a single key rather than literal text.
pub const NAMED_KEYS: &[&str] = &[
    "Up", "Down", "Left", "Right", "Home", "End", "PageUp", "PageDown", "PgUp", "PgDn", "PPage",
    "NPage", "Enter", "Escape", "Tab", "BTab", "BSpace", "DC", "IC", "Space", "F1", "F2", "F3",
    "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
];

const MODIFIER_PREFIXES: [&str; 3] = ["C-", "M-", "S-"];

/// Whether `text` names a key (`Up`, `F5`, `C-c`, `M-Left`, ...).
pub fn is_named_key(text: &str) -> bool {
    let mut rest = text;
    let mut modified = false;
    while let Some(stripped) = MODIFIER_PREFIXES
        .iter()
        .find_map(|prefix| rest.strip_prefix(prefix))
    {
        rest = stripped;
        modified = true;
    }
    if rest.is_empty() {
        return false;
    }
    if modified && rest.chars().count() == 1 {
        return true;
    }
    NAMED_KEYS.iter().any(|name| name.eq_ignore_ascii_case(rest))
}

/// Send `text` without Enter: a named key goes out as that key, anything
/// else one character at a time with `delay` between characters.
pub async fn type_keys(
    injector: &dyn KeyInjector,
    pane_id: &str,
    text: &str,
    delay: Duration,
) -> Result<(), TrackerError> {
    let trimmed = text.trim();
    if is_named_key(trimmed) {
        return injector.send_keys(pane_id, &[trimmed.to_string()]).await;
    }

    let mut buf = [0u8; 4];
    for (idx, ch) in text.chars().enumerate() {
        if idx > 0 && !delay.is_zero() {
            sleep(delay).await;
        }
        injector
            .send_text(pane_id, ch.encode_utf8(&mut buf), false)
            .await?;
    }
    Ok(())
}
