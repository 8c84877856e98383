use crate::{appresult::UserError, include_res, res};

use super::{MAX_MESSAGE_CHARS, log::ChatMessage};

pub(crate) fn msg_to_html(message: &ChatMessage) -> String {
    res::fill(include_res!(str, "/pages/chat_message.html"), &[
        ("id", &message.id.to_string()),
        ("timestamp", &message.timestamp_display()),
        ("username", &res::escape(&message.username)),
        ("content", &res::markdown(&message.text)),
    ])
}

/// Trims the text and checks it is fit to post. `empty` is the message shown
/// when nothing was typed.
pub(crate) fn check_text<'a>(text: &'a str, empty: &str) -> Result<&'a str, UserError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(UserError::validation(empty));
    }
    if text.chars().count() > MAX_MESSAGE_CHARS {
        return Err(UserError::validation(format!(
            "Messages are limited to {MAX_MESSAGE_CHARS} characters."
        )));
    }
    Ok(text)
}
