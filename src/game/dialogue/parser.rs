use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

const UNKNOWN_SPEAKER: &str = "Unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct DialogueItem {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AvatarPosition {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AvatarData {
    pub name: String,
    pub url: String,
    pub position: AvatarPosition,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDialogue {
    pub emojis: HashMap<String, String>,
    pub avatars: HashMap<String, AvatarData>,
    pub dialogues: Vec<DialogueItem>,
}

#[derive(Deserialize)]
struct EmojiEntry {
    name: Option<String>,
    key: Option<String>,
    url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawPosition {
    Right,
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct AvatarEntry {
    name: Option<String>,
    url: Option<String>,
    #[serde(default)]
    position: Option<RawPosition>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DialogueEntry {
    Bare(String),
    Line { name: Option<String>, text: Option<String> },
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Turns the magic-words payload into lookup tables and an ordered script.
/// Never fails: anything that does not decode is left out.
pub struct DialogueParser;

impl DialogueParser {
    pub fn parse(data: &Value) -> ParsedDialogue {
        let mut parsed = ParsedDialogue::default();
        match data {
            Value::Object(object) => {
                let emoji_list = object
                    .get("emojies")
                    .filter(|v| !v.is_null())
                    .or_else(|| object.get("magicwords"));
                if let Some(list) = emoji_list {
                    Self::parse_emojis(list, &mut parsed.emojis);
                }
                if let Some(list) = object.get("avatars") {
                    Self::parse_avatars(list, &mut parsed.avatars);
                }
                if let Some(list) = object.get("dialogue") {
                    Self::parse_dialogues(list, &mut parsed.dialogues);
                }
            }
            // older payloads were a flat list of lines
            Value::Array(_) => Self::parse_dialogues(data, &mut parsed.dialogues),
            _ => {}
        }
        debug!(
            "DialogueParser: {} emojis, {} avatars, {} lines",
            parsed.emojis.len(),
            parsed.avatars.len(),
            parsed.dialogues.len()
        );
        parsed
    }

    fn elements<'a, T: Deserialize<'a>>(list: &'a Value) -> impl Iterator<Item = T> + 'a {
        list.as_array()
            .into_iter()
            .flatten()
            .filter_map(|element| T::deserialize(element).ok())
    }

    fn parse_emojis(list: &Value, emojis: &mut HashMap<String, String>) {
        for entry in Self::elements::<EmojiEntry>(list) {
            let key = non_empty(entry.name).or_else(|| non_empty(entry.key));
            if let (Some(key), Some(url)) = (key, non_empty(entry.url)) {
                emojis.insert(key, url);
            }
        }
    }

    fn parse_avatars(list: &Value, avatars: &mut HashMap<String, AvatarData>) {
        for entry in Self::elements::<AvatarEntry>(list) {
            if let (Some(name), Some(url)) = (non_empty(entry.name), non_empty(entry.url)) {
                let position = match entry.position {
                    Some(RawPosition::Right) => AvatarPosition::Right,
                    _ => AvatarPosition::Left,
                };
                avatars.insert(
                    name.clone(),
                    AvatarData {
                        name,
                        url,
                        position,
                    },
                );
            }
        }
    }

    fn parse_dialogues(list: &Value, dialogues: &mut Vec<DialogueItem>) {
        for entry in Self::elements::<DialogueEntry>(list) {
            let (name, text) = match entry {
                DialogueEntry::Bare(text) => (None, Some(text)),
                DialogueEntry::Line { name, text } => (name, text),
            };
            if let Some(text) = non_empty(text) {
                dialogues.push(DialogueItem {
                    name: non_empty(name).unwrap_or_else(|| UNKNOWN_SPEAKER.to_string()),
                    text,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mixed_dialogue_shapes() {
        let parsed = DialogueParser::parse(&json!({
            "dialogue": ["hi", { "name": "Bob", "text": "yo" }]
        }));
        assert_eq!(
            parsed.dialogues,
            vec![
                DialogueItem {
                    name: "Unknown".into(),
                    text: "hi".into()
                },
                DialogueItem {
                    name: "Bob".into(),
                    text: "yo".into()
                },
            ]
        );
    }

    #[test]
    fn malformed_elements_are_skipped() {
        let parsed = DialogueParser::parse(&json!({
            "dialogue": [42, { "name": "Bob" }, { "text": "" }, null, { "name": 3, "text": "x" }, "ok"],
            "avatars": [{ "name": "Bob" }, "nope"],
            "emojies": [{ "url": "u" }, 5]
        }));
        assert_eq!(parsed.dialogues.len(), 1);
        assert_eq!(parsed.dialogues[0].text, "ok");
        assert!(parsed.avatars.is_empty());
        assert!(parsed.emojis.is_empty());
    }

    #[test]
    fn emojies_win_over_magicwords_and_name_over_key() {
        let parsed = DialogueParser::parse(&json!({
            "emojies": [{ "name": "sad", "key": "ignored", "url": "a" }],
            "magicwords": [{ "key": "happy", "url": "b" }]
        }));
        assert_eq!(parsed.emojis.len(), 1);
        assert_eq!(parsed.emojis.get("sad").map(String::as_str), Some("a"));

        let legacy = DialogueParser::parse(&json!({
            "magicwords": [{ "key": "happy", "url": "b" }]
        }));
        assert_eq!(legacy.emojis.get("happy").map(String::as_str), Some("b"));
    }

    #[test]
    fn avatar_position_defaults_to_left() {
        let parsed = DialogueParser::parse(&json!({
            "avatars": [
                { "name": "Sheldon", "url": "s", "position": "right" },
                { "name": "Penny", "url": "p" },
                { "name": "Leonard", "url": "l", "position": "up" }
            ]
        }));
        assert_eq!(parsed.avatars["Sheldon"].position, AvatarPosition::Right);
        assert_eq!(parsed.avatars["Penny"].position, AvatarPosition::Left);
        assert_eq!(parsed.avatars["Leonard"].position, AvatarPosition::Left);
    }

    #[test]
    fn flat_array_and_garbage() {
        let parsed = DialogueParser::parse(&json!(["one", "two", 3]));
        assert_eq!(parsed.dialogues.len(), 2);
        assert_eq!(DialogueParser::parse(&Value::Null), ParsedDialogue::default());
        assert_eq!(DialogueParser::parse(&json!({ "error": "x" })), ParsedDialogue::default());
    }
}
