use serde::{Deserialize, Serialize};

/// Catalog entry returned by `GET /voices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub name: String,
    pub language: String,
    pub gender: String,
}

impl VoiceInfo {
    /// Decode language and gender from the voice naming conventions the
    /// pretrained packs use.
    ///
    /// Kokoro-style names carry a two-letter prefix (`af_bella`: `a` =
    /// American English, `f` = female). KittenTTS voice packs are
    /// English-only and end in `-f` / `-m` (`expr-voice-2-f`). Anything
    /// else maps to "Unknown".
    pub fn from_name(name: &str) -> Self {
        let (language, gender) = parse_prefix(name)
            .or_else(|| parse_suffix(name))
            .unwrap_or(("Unknown", "Unknown"));

        Self {
            name: name.to_string(),
            language: language.to_string(),
            gender: gender.to_string(),
        }
    }
}

fn language_for_code(code: char) -> Option<&'static str> {
    match code {
        'a' => Some("American English"),
        'b' => Some("British English"),
        'j' => Some("Japanese"),
        'z' => Some("Mandarin Chinese"),
        'e' => Some("Spanish"),
        'f' => Some("French"),
        'h' => Some("Hindi"),
        'i' => Some("Italian"),
        'p' => Some("Brazilian Portuguese"),
        _ => None,
    }
}

fn gender_for_code(code: char) -> Option<&'static str> {
    match code {
        'f' => Some("Female"),
        'm' => Some("Male"),
        _ => None,
    }
}

/// `af_bella` → (American English, Female)
fn parse_prefix(name: &str) -> Option<(&'static str, &'static str)> {
    let prefix = name.split('_').next()?;
    let mut chars = prefix.chars();
    let language = language_for_code(chars.next()?)?;
    let gender = gender_for_code(chars.next()?)?;
    if chars.next().is_some() {
        return None;
    }
    Some((language, gender))
}

/// `expr-voice-2-f` → (English, Female)
fn parse_suffix(name: &str) -> Option<(&'static str, &'static str)> {
    let last = name.rsplit('-').next()?;
    if last.len() != 1 || !name.contains('-') {
        return None;
    }
    let gender = gender_for_code(last.chars().next()?)?;
    Some(("English", gender))
}
