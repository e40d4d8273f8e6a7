//! Inbound chat-message classification.
//!
//! The connector forwards every human-authored message; this module
//! decides whether it is a coding-activity event (fenced code block), a
//! greeting, or noise.

/// What an inbound message means to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSignal {
    /// Contains a fenced code block: counts as a solve.
    CodeBlock,
    /// Greets the bot: gets a greeting reply, no tracking.
    Greeting,
    /// Nothing we care about.
    None,
}

const CODE_FENCE: &str = "```";

pub fn classify(content: &str) -> MessageSignal {
    if content.contains(CODE_FENCE) {
        MessageSignal::CodeBlock
    } else if content.to_lowercase().contains("hello") {
        MessageSignal::Greeting
    } else {
        MessageSignal::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_code_is_a_solve() {
        assert_eq!(
            classify("here's my fix:\n```rust\nfn main() {}\n```"),
            MessageSignal::CodeBlock
        );
    }

    #[test]
    fn greeting_is_detected_case_insensitively() {
        assert_eq!(classify("Hello everyone!"), MessageSignal::Greeting);
        assert_eq!(classify("HELLO"), MessageSignal::Greeting);
    }

    #[test]
    fn code_block_wins_over_greeting() {
        assert_eq!(classify("hello ```py x=1```"), MessageSignal::CodeBlock);
    }

    #[test]
    fn plain_chatter_is_ignored() {
        assert_eq!(classify("lunch anyone?"), MessageSignal::None);
    }
}
