//! Canned bot content -- motivational blurbs, puzzle prompts, reminders.
//!
//! Kept behind a trait so the command handler and the inactivity scanner
//! stay independent of the actual wording, and so tests can pin the
//! output. The built-in provider picks uniformly at random from a fixed
//! set.

use rand::seq::SliceRandom;

/// A motivational blurb addressed to one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Motivation {
    pub title: String,
    pub message: String,
}

/// Source of user-facing flavor text.
pub trait ContentProvider {
    /// Motivational blurb for the named member.
    fn motivation(&self, display_name: &str) -> Motivation;

    /// Prompt for the daily puzzle.
    fn puzzle(&self) -> String;

    /// Reminder line for a member gone quiet.
    fn reminder(&self, display_name: &str) -> String;

    /// Greeting reply for a member who says hello.
    fn greeting(&self, display_name: &str) -> String;
}

const MOTIVATION_TITLES: [&str; 5] = [
    "Keep the streak alive",
    "Debugging champion",
    "On a roll",
    "Future of the leaderboard",
    "Compiler whisperer",
];

const MOTIVATION_MESSAGES: [&str; 5] = [
    "{name}, the leaderboard is watching. One more problem today?",
    "{name}, every bug you squash makes the next one easier. Keep going!",
    "{name}, your keyboard is warmed up. Ship something today!",
    "{name}, consistency beats intensity. A single solve keeps the streak.",
    "{name}, the hardest part is opening the editor. You've got this.",
];

const PUZZLES: [&str; 5] = [
    "Reverse the words in a sentence without using split().",
    "Find the first non-repeating character in a string.",
    "Merge two sorted lists into one sorted list.",
    "Given an array of ints, return indices of two numbers adding to a target.",
    "Check whether a string is a valid sequence of balanced brackets.",
];

const REMINDERS: [&str; 4] = [
    "{name}, it's been a day since your last solve. The streak misses you!",
    "{name}, no code from you in 24 hours. Everything okay over there?",
    "{name}, your editor is collecting dust. Time for a quick problem?",
    "{name}, one small solve today keeps the leaderboard in reach.",
];

const GREETINGS: [&str; 3] = [
    "Hello, {name}! Ready to solve something today?",
    "Hey {name}! The leaderboard awaits.",
    "Hi {name}! Paste a code block to log a solve.",
];

/// Built-in provider with a fixed message pool.
#[derive(Debug, Default, Clone)]
pub struct BuiltinContent;

impl BuiltinContent {
    fn pick<'a>(pool: &[&'a str]) -> &'a str {
        let mut rng = rand::thread_rng();
        pool.choose(&mut rng).copied().unwrap_or(pool[0])
    }
}

impl ContentProvider for BuiltinContent {
    fn motivation(&self, display_name: &str) -> Motivation {
        Motivation {
            title: Self::pick(&MOTIVATION_TITLES).to_string(),
            message: Self::pick(&MOTIVATION_MESSAGES).replace("{name}", display_name),
        }
    }

    fn puzzle(&self) -> String {
        Self::pick(&PUZZLES).to_string()
    }

    fn reminder(&self, display_name: &str) -> String {
        Self::pick(&REMINDERS).replace("{name}", display_name)
    }

    fn greeting(&self, display_name: &str) -> String {
        Self::pick(&GREETINGS).replace("{name}", display_name)
    }
}

/// Deterministic provider for tests.
#[cfg(test)]
pub(crate) struct FixedContent;

#[cfg(test)]
impl ContentProvider for FixedContent {
    fn motivation(&self, display_name: &str) -> Motivation {
        Motivation {
            title: "title".to_string(),
            message: format!("go {display_name}"),
        }
    }

    fn puzzle(&self) -> String {
        "puzzle".to_string()
    }

    fn reminder(&self, display_name: &str) -> String {
        format!("reminder for {display_name}")
    }

    fn greeting(&self, display_name: &str) -> String {
        format!("hello {display_name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motivation_mentions_the_member() {
        let m = BuiltinContent.motivation("Sam");
        assert!(m.message.contains("Sam"));
        assert!(!m.title.is_empty());
    }

    #[test]
    fn reminder_and_greeting_mention_the_member() {
        assert!(BuiltinContent.reminder("Sam").contains("Sam"));
        assert!(BuiltinContent.greeting("Sam").contains("Sam"));
    }

    #[test]
    fn puzzle_comes_from_the_pool() {
        let p = BuiltinContent.puzzle();
        assert!(PUZZLES.contains(&p.as_str()));
    }
}
