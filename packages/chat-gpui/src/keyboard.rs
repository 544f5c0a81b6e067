//! Keyboard bindings for the composer

use gpui::*;

/// Key context set on the composer's input field
pub const COMPOSER_CONTEXT: &str = "Composer";

actions!(
    composer,
    [
        SendDraft,
        InsertNewline,
        DismissKeyboard,
    ]
);

/// Initialize keyboard bindings
pub fn init(cx: &mut App) {
    cx.bind_keys([
        KeyBinding::new("enter", SendDraft, Some(COMPOSER_CONTEXT)),
        KeyBinding::new("shift-enter", InsertNewline, Some(COMPOSER_CONTEXT)),
        KeyBinding::new("escape", DismissKeyboard, Some(COMPOSER_CONTEXT)),
    ]);

    tracing::debug!("Composer key bindings initialized");
}
