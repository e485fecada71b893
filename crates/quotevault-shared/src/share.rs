use crate::models::Quote;

/// Plain-text rendering used when sharing a quote.
pub fn share_text(quote: &Quote) -> String {
    format!("\u{201c}{}\u{201d}\n\n\u{2014} {}", quote.text.trim(), quote.author.trim())
}
