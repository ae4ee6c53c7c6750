//! `tmux send-keys` argument builders.

/// Type `text` literally; `--` keeps leading dashes from reading as flags.
pub(crate) fn send_literal_args(pane_id: &str, text: &str) -> Vec<String> {
    vec![
        "send-keys".to_string(),
        "-l".to_string(),
        "-t".to_string(),
        pane_id.to_string(),
        "--".to_string(),
        text.to_string(),
    ]
}

/// Send named keys (`Enter`, `C-c`, ...) in order.
pub(crate) fn send_named_keys_args(pane_id: &str, keys: &[String]) -> Vec<String> {
    let mut args = vec![
        "send-keys".to_string(),
        "-t".to_string(),
        pane_id.to_string(),
    ];
    args.extend(keys.iter().cloned());
    args
}

pub(crate) fn send_enter_args(pane_id: &str) -> Vec<String> {
    send_named_keys_args(pane_id, &["Enter".to_string()])
}
