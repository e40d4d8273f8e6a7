//! Line-delimited JSON gateway.
//!
//! The chat connector writes one event per line on our stdin and reads
//! one outbound item per line from our stdout. The connector owns the
//! platform session; we own everything the events mean.

use chrono::{DateTime, Utc};
use codestreak_core::{Command, CommandHandler, ContentProvider, Invocation, Response, StorePersistence};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Inbound event from the connector.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayEvent {
    /// A chat message the bot can see.
    Message {
        user_id: String,
        display_name: String,
        #[serde(default)]
        is_bot: bool,
        content: String,
        at: DateTime<Utc>,
    },
    /// A slash-command invocation.
    Command {
        user_id: String,
        display_name: String,
        #[serde(default)]
        is_admin: bool,
        name: String,
        #[serde(default)]
        args: serde_json::Value,
        at: DateTime<Utc>,
    },
}

/// Outbound item for the connector to deliver.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayOut {
    Reply { text: String, ephemeral: bool },
    Relay { channel: String, text: String },
}

fn response_out(response: Response) -> Vec<GatewayOut> {
    let mut out = vec![GatewayOut::Reply {
        text: response.reply.text,
        ephemeral: response.reply.ephemeral,
    }];
    if let Some(relay) = response.relay {
        out.push(GatewayOut::Relay {
            channel: relay.channel,
            text: relay.text,
        });
    }
    out
}

/// Map a command name plus JSON args onto a [`Command`].
fn parse_command(name: &str, args: &serde_json::Value) -> Result<Command, String> {
    let str_arg = |key: &str| -> Result<String, String> {
        args.get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| format!("missing argument '{key}' for /{name}"))
    };

    match name {
        "leaderboard" => Ok(Command::Leaderboard),
        "stats" => Ok(Command::Stats {
            target: args
                .get("target")
                .and_then(|v| v.as_str())
                .map(str::to_string),
        }),
        "streak" => Ok(Command::Streak),
        "top_streaks" => Ok(Command::TopStreaks),
        "set_goal" => {
            let goal = args
                .get("goal")
                .and_then(|v| v.as_u64())
                .ok_or_else(|| format!("missing argument 'goal' for /{name}"))?;
            Ok(Command::SetGoal { goal })
        }
        "progress" => Ok(Command::Progress),
        "daily_puzzle" => Ok(Command::DailyPuzzle),
        "modify_solves" => {
            let amount = args
                .get("amount")
                .and_then(|v| v.as_i64())
                .ok_or_else(|| format!("missing argument 'amount' for /{name}"))?;
            Ok(Command::ModifySolves {
                target: str_arg("target")?,
                amount,
            })
        }
        "user_report" => Ok(Command::UserReport {
            target: str_arg("target")?,
        }),
        "send" => Ok(Command::Send {
            channel: str_arg("channel")?,
            text: str_arg("text")?,
        }),
        "motivate" => Ok(Command::Motivate {
            target: str_arg("target")?,
        }),
        "help" => Ok(Command::Help),
        other => Err(format!("unknown command /{other}")),
    }
}

/// Process one input line; returns the outbound items it produced.
pub fn process_line<P, C>(handler: &mut CommandHandler<P, C>, line: &str) -> Vec<GatewayOut>
where
    P: StorePersistence,
    C: ContentProvider,
{
    let event: GatewayEvent = match serde_json::from_str(line) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "unparseable gateway event");
            return Vec::new();
        }
    };

    match event {
        GatewayEvent::Message {
            is_bot: true, ..
        } => Vec::new(),
        GatewayEvent::Message {
            user_id,
            display_name,
            content,
            at,
            ..
        } => {
            let inv = Invocation {
                user_id,
                display_name,
                is_admin: false,
                now: at,
            };
            match handler.handle_message(&inv, &content) {
                Ok(Some(reply)) => vec![GatewayOut::Reply {
                    text: reply.text,
                    ephemeral: reply.ephemeral,
                }],
                Ok(None) => Vec::new(),
                Err(e) => {
                    error!(user = %inv.user_id, error = %e, "message handling failed");
                    Vec::new()
                }
            }
        }
        GatewayEvent::Command {
            user_id,
            display_name,
            is_admin,
            name,
            args,
            at,
        } => {
            let inv = Invocation {
                user_id,
                display_name,
                is_admin,
                now: at,
            };
            match parse_command(&name, &args) {
                Ok(cmd) => response_out(handler.handle(&inv, cmd)),
                Err(message) => vec![GatewayOut::Reply {
                    text: message,
                    ephemeral: true,
                }],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_the_full_command_surface() {
        let cases = [
            ("leaderboard", json!({}), Command::Leaderboard),
            (
                "stats",
                json!({"target": "7"}),
                Command::Stats {
                    target: Some("7".to_string()),
                },
            ),
            ("streak", json!({}), Command::Streak),
            ("top_streaks", json!({}), Command::TopStreaks),
            ("set_goal", json!({"goal": 10}), Command::SetGoal { goal: 10 }),
            ("progress", json!({}), Command::Progress),
            ("daily_puzzle", json!({}), Command::DailyPuzzle),
            (
                "modify_solves",
                json!({"target": "7", "amount": -2}),
                Command::ModifySolves {
                    target: "7".to_string(),
                    amount: -2,
                },
            ),
            (
                "user_report",
                json!({"target": "7"}),
                Command::UserReport {
                    target: "7".to_string(),
                },
            ),
            (
                "send",
                json!({"channel": "general", "text": "hi"}),
                Command::Send {
                    channel: "general".to_string(),
                    text: "hi".to_string(),
                },
            ),
            (
                "motivate",
                json!({"target": "ada"}),
                Command::Motivate {
                    target: "ada".to_string(),
                },
            ),
            ("help", json!({}), Command::Help),
        ];
        for (name, args, expected) in cases {
            assert_eq!(parse_command(name, &args).unwrap(), expected);
        }
    }

    #[test]
    fn unknown_command_is_an_error() {
        assert!(parse_command("dance", &json!({})).is_err());
    }

    #[test]
    fn missing_argument_is_an_error() {
        let err = parse_command("modify_solves", &json!({"target": "7"})).unwrap_err();
        assert!(err.contains("amount"));
    }

    #[test]
    fn message_event_roundtrip() {
        let line = r#"{"type":"message","user_id":"1","display_name":"ada","content":"```x```","at":"2024-06-10T12:00:00Z"}"#;
        let event: GatewayEvent = serde_json::from_str(line).unwrap();
        assert!(matches!(event, GatewayEvent::Message { .. }));
    }

    struct NullStore;

    impl codestreak_core::StorePersistence for NullStore {
        fn load(&self) -> codestreak_core::ActivityStore {
            codestreak_core::ActivityStore::new()
        }

        fn save(
            &self,
            _store: &codestreak_core::ActivityStore,
        ) -> Result<(), codestreak_core::StoreError> {
            Ok(())
        }
    }

    fn handler() -> CommandHandler<NullStore, codestreak_core::BuiltinContent> {
        CommandHandler::new(
            codestreak_core::Tracker::open(NullStore),
            codestreak_core::BuiltinContent,
            codestreak_core::Settings::default(),
            None,
        )
    }

    #[test]
    fn code_block_message_records_silently() {
        let mut h = handler();
        let line = r#"{"type":"message","user_id":"1","display_name":"ada","content":"```x```","at":"2024-06-10T12:00:00Z"}"#;
        let out = process_line(&mut h, line);
        assert!(out.is_empty());
        assert_eq!(h.tracker().store().get("1").unwrap().problems_solved, 1);
    }

    #[test]
    fn bot_messages_are_ignored() {
        let mut h = handler();
        let line = r#"{"type":"message","user_id":"1","display_name":"bot","is_bot":true,"content":"```x```","at":"2024-06-10T12:00:00Z"}"#;
        let out = process_line(&mut h, line);
        assert!(out.is_empty());
        assert!(!h.tracker().store().contains("1"));
    }

    #[test]
    fn command_event_produces_a_reply() {
        let mut h = handler();
        let line = r#"{"type":"command","user_id":"1","display_name":"ada","name":"help","at":"2024-06-10T12:00:00Z"}"#;
        let out = process_line(&mut h, line);
        assert_eq!(out.len(), 1);
        assert!(matches!(&out[0], GatewayOut::Reply { text, .. } if text.contains("/leaderboard")));
    }

    #[test]
    fn garbage_input_produces_nothing() {
        let mut h = handler();
        assert!(process_line(&mut h, "{not json").is_empty());
    }

    #[test]
    fn reply_serializes_with_type_tag() {
        let out = GatewayOut::Reply {
            text: "hi".to_string(),
            ephemeral: false,
        };
        let line = serde_json::to_string(&out).unwrap();
        assert!(line.contains(r#""type":"reply""#));
    }
}
