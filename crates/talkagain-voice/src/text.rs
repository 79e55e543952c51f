//! Preparing assistant replies for speech.

/// Removes markdown emphasis markers and coaching annotations so that only
/// the character's own words are spoken.
///
/// Each line loses its `*` characters (covering both `*italic*` and
/// `**bold**`); a line whose remainder starts with `Coach:` is dropped
/// entirely. The result is trimmed.
pub fn clean_for_speech(text: &str) -> String {
    let kept: Vec<String> = text
        .lines()
        .map(|line| line.replace('*', ""))
        .filter(|line| !line.trim_start().starts_with("Coach:"))
        .collect();
    kept.join("\n").trim().to_string()
}
