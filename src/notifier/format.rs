//! HTML text for notifications.

use crate::response::Offer;
use crate::telegram::{CAPTION_LIMIT, MESSAGE_LIMIT};
use crate::time::format_iso_date;
use chrono_tz::Tz;

const ELLIPSIS: &str = "...";
/// Characters kept of a caption which is too long.
const CAPTION_KEEP: usize = 1020;
/// Characters kept of a message which is too long.
const MESSAGE_KEEP: usize = 4090;
/// Shown instead of a price when the store doesn't give one.
const UNKNOWN_PRICE: &str = "N/A";

/// Escapes text for use in HTML messages.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }

    escaped
}

/// Cuts `text` to `keep` characters followed by `...` when it is longer than `limit`.
pub fn truncate(
    text: &str,
    limit: usize,
    keep: usize,
) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }

    let mut truncated = text.chars()
        .take(keep)
        .collect::<String>();

    truncated.push_str(ELLIPSIS);
    truncated
}

/// Whether a formatted price such as `¥0.00` or `0` is an amount of zero.
pub fn is_zero_price(price: &str) -> bool {
    let mut digits = price.chars().filter(char::is_ascii_digit).peekable();

    digits.peek().is_some() && digits.all(|c| c == '0')
}

/// The original price, struck through unless it is unknown or already zero.
fn original_price_display(price: &str) -> String {
    let escaped = escape_html(price);

    if price == UNKNOWN_PRICE || is_zero_price(price) {
        escaped
    } else {
        format!("<s>{escaped}</s>")
    }
}

/// The caption sent with an offer's image. A title too long for the caption is shortened before
/// it is escaped so the markup stays intact.
pub fn offer_caption(offer: &Offer, timezone: &Tz) -> String {
    let title = escape_html(&offer.title);
    let caption = caption_with_title(offer, timezone, &title);
    let length = caption.chars().count();

    if length <= CAPTION_LIMIT {
        return caption;
    }

    let room = CAPTION_LIMIT.saturating_sub(length - title.chars().count());
    let caption = caption_with_title(offer, timezone, &escape_html_within(&offer.title, room));

    // Only when the rest of the caption is too long on its own.
    truncate(&caption, CAPTION_LIMIT, CAPTION_KEEP)
}

fn caption_with_title(
    offer: &Offer,
    timezone: &Tz,
    title: &str,
) -> String {
    format!(
        "🎮 <b>{title}</b>\n\n\
        💰 Original price: {original_price}\n\
        🎁 Now: <b>Free</b>\n\
        ⏰ Free period ({timezone}):\n\
        \u{20}  Start: {start}\n\
        \u{20}  End: {end}\n\n\
        🔗 <a href=\"{url}\">⚡️ Claim it now ⚡️</a>\n",
        original_price = original_price_display(&offer.original_price),
        timezone = timezone.name(),
        start = format_iso_date(&offer.start_date, timezone),
        end = format_iso_date(&offer.end_date, timezone),
        url = escape_html(&offer.url),
    )
}

/// Escapes `text`, keeping as many whole characters as fit in `room` characters together with a
/// trailing `...`. Entities are never split.
fn escape_html_within(text: &str, room: usize) -> String {
    let budget = room.saturating_sub(ELLIPSIS.len());
    let mut escaped = String::new();
    let mut length = 0;

    for c in text.chars() {
        let piece = escape_html(c.encode_utf8(&mut [0; 4]));
        let piece_length = piece.chars().count();

        if length + piece_length > budget {
            break;
        }

        escaped.push_str(&piece);
        length += piece_length;
    }

    escaped.push_str(ELLIPSIS);
    escaped
}

/// The message sent instead of a photo when the photo could not be sent.
pub fn photo_fallback_text(caption: &str) -> String {
    let text = format!("🖼️ The image could not be loaded, here are the details:\n{caption}");

    truncate(&text, MESSAGE_LIMIT, MESSAGE_KEEP)
}

/// Sent before new offers in a scheduled broadcast.
pub fn broadcast_header(free_games_url: &str) -> String {
    format!(
        "🎉 <b>New free games on the Epic Games Store!</b> 🎉\n\
        <a href=\"{}\">Visit the free games page</a>\n",
        escape_html(free_games_url),
    )
}

/// Sent before the results of a manual check.
pub fn manual_check_header(free_games_url: &str) -> String {
    format!(
        "✨ <b>Current free games on the Epic Games Store:</b> ✨\n\
        (Results of a manual check, not a new game notification)\n\
        <a href=\"{}\">Visit the free games page</a>\n",
        escape_html(free_games_url),
    )
}
