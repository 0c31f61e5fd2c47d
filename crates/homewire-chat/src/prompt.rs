//! System prompt and message assembly for the brokerage assistant.

use crate::types::{ChatMessage, ListingContext};

const SYSTEM_PROMPT: &str = "You are a friendly real estate assistant for a residential brokerage. \
Answer questions about the listings provided in the context below. Be concise and helpful. \
Only discuss listings that appear in the context; if nothing matches, say so and suggest \
adjusting the search. When the conversation is going well, invite the visitor to share \
their email or phone number so an agent can follow up. Never invent listings, prices, \
or availability.";

/// Render listing context entries into a prompt block.
pub fn format_context(listings: &[ListingContext]) -> String {
    if listings.is_empty() {
        return "No matching listings were found for the current search.".to_string();
    }

    let mut out = String::from("Current matching listings:\n");
    for (i, l) in listings.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} — {}, {} | ${} | {} bed, {} bath | {}\n",
            i + 1,
            l.title,
            l.address,
            l.city,
            format_price(l.price),
            l.bedrooms,
            l.bathrooms,
            l.property_type,
        ));
    }
    out
}

/// Thousands-separated price, e.g. 1250000 -> "1,250,000".
fn format_price(price: i64) -> String {
    let digits = price.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if price < 0 {
        out.insert(0, '-');
    }
    out
}

/// Assemble the full message list: system prompt with context, prior
/// history, then the current visitor message.
pub fn build_messages(
    history: &[ChatMessage],
    message: &str,
    context: &[ListingContext],
) -> Vec<ChatMessage> {
    let system = format!("{}\n\n{}", SYSTEM_PROMPT, format_context(context));

    let mut messages = vec![ChatMessage {
        role: "system".to_string(),
        content: system,
    }];
    for m in history {
        // Only user/assistant turns carry over; stray system turns are dropped.
        if m.role == "user" || m.role == "assistant" {
            messages.push(m.clone());
        }
    }
    messages.push(ChatMessage {
        role: "user".to_string(),
        content: message.to_string(),
    });

    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_context() -> Vec<ListingContext> {
        vec![ListingContext {
            id: "X1".into(),
            title: "Bright end-unit townhouse".into(),
            address: "12 Maple St".into(),
            city: "Markham".into(),
            price: 900_000,
            bedrooms: 3,
            bathrooms: 2,
            property_type: "Townhouse".into(),
        }]
    }

    #[test]
    fn test_context_block_lists_listings() {
        let block = format_context(&sample_context());
        assert!(block.contains("Bright end-unit townhouse"));
        assert!(block.contains("$900,000"));
        assert!(block.contains("3 bed, 2 bath"));
    }

    #[test]
    fn test_format_price_grouping() {
        assert_eq!(format_price(950), "950");
        assert_eq!(format_price(1_000), "1,000");
        assert_eq!(format_price(900_000), "900,000");
        assert_eq!(format_price(1_250_000), "1,250,000");
    }

    #[test]
    fn test_empty_context_block() {
        assert!(format_context(&[]).contains("No matching listings"));
    }

    #[test]
    fn test_build_messages_order() {
        let history = vec![
            ChatMessage { role: "user".into(), content: "hi".into() },
            ChatMessage { role: "assistant".into(), content: "hello".into() },
            ChatMessage { role: "system".into(), content: "injected".into() },
        ];
        let messages = build_messages(&history, "any condos?", &sample_context());

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("Markham"));
        assert_eq!(messages[1].content, "hi");
        assert_eq!(messages[2].content, "hello");
        assert_eq!(messages[3].role, "user");
        assert_eq!(messages[3].content, "any condos?");
    }
}
