//! AppleScript sources for the Music app and parsers for what they print.
//!
//! Multi-field output is joined with ASCII unit separators (31) and rows with
//! record separators (30) so track names containing tabs or newlines survive.

use cadenza_core::{FailureKind, HandlerFailure};
use serde::Serialize;

const FIELD_SEP: char = '\u{1f}';
const ROW_SEP: char = '\u{1e}';
const MISSING_MARKER: &str = "missing";

/// Escape text for use inside an AppleScript string literal.
pub fn quote(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

pub fn play_location(url: &str) -> String {
    format!(
        r#"set musicApp to application "Music"
if not running of musicApp then
    launch musicApp
end if
delay 0.2
open location {url}
delay 0.5
tell application "Music" to play
"#,
        url = quote(url)
    )
}

pub fn player_state() -> String {
    r#"tell application "Music" to return (player state as string)"#.to_string()
}

/// Script for a playback action other than `now_playing`; prints the player
/// state afterwards. `None` for unknown actions.
pub fn playback_command(action: &str) -> Option<String> {
    let command = match action {
        "play" => "play",
        "pause" => "pause",
        "play_pause" => "playpause",
        "next" => "next track",
        "previous" => "previous track",
        "shuffle_on" => "set shuffle enabled to true",
        "shuffle_off" => "set shuffle enabled to false",
        "repeat_off" => "set song repeat to off",
        "repeat_one" => "set song repeat to one",
        "repeat_all" => "set song repeat to all",
        _ => return None,
    };
    Some(format!(
        r#"tell application "Music"
    {command}
    return (player state as string)
end tell
"#
    ))
}

pub fn now_playing() -> String {
    r#"set sep to (character id 31)
tell application "Music"
    set stateText to (player state as string)
    set header to stateText & sep & (shuffle enabled as string) & sep & (song repeat as string)
    if stateText is "stopped" then
        return header
    end if
    set t to current track
    return header & sep & (name of t) & sep & (artist of t) & sep & (album of t) & sep & ((duration of t) as string) & sep & ((player position) as string)
end tell
"#
    .to_string()
}

fn ensure_playlist(playlist: &str) -> String {
    format!(
        r#"    if not (exists user playlist {name}) then
        make new user playlist with properties {{name:{name}}}
    end if
    set queueList to user playlist {name}
"#,
        name = quote(playlist)
    )
}

/// Copy the library track matching `name`/`artist` into the queue playlist.
/// Prints the new queue length, or `missing` when the library has no match.
pub fn queue_add(playlist: &str, name: &str, artist: &str, play_next: bool) -> String {
    let insert = if play_next {
        r#"    set existingIds to database ID of every track of queueList
    duplicate newTrack to queueList
    repeat with trackId in existingIds
        duplicate (first track of queueList whose database ID is trackId) to queueList
        delete (first track of queueList whose database ID is trackId)
    end repeat
"#
    } else {
        "    duplicate newTrack to queueList\n"
    };
    format!(
        r#"tell application "Music"
{ensure}    set matches to (every track of library playlist 1 whose name is {name} and artist is {artist})
    if (count of matches) is 0 then
        return "{MISSING_MARKER}"
    end if
    set newTrack to item 1 of matches
{insert}    return (count of tracks of queueList) as string
end tell
"#,
        ensure = ensure_playlist(playlist),
        name = quote(name),
        artist = quote(artist),
    )
}

pub fn queue_view(playlist: &str) -> String {
    format!(
        r#"set sep to (character id 31)
set rowSep to (character id 30)
tell application "Music"
{ensure}    set rows to {{}}
    repeat with t in (every track of queueList)
        set end of rows to (name of t) & sep & (artist of t) & sep & (album of t) & sep & ((duration of t) as string)
    end repeat
    set AppleScript's text item delimiters to rowSep
    set output to rows as string
    set AppleScript's text item delimiters to ""
    return output
end tell
"#,
        ensure = ensure_playlist(playlist)
    )
}

pub fn queue_clear(playlist: &str) -> String {
    format!(
        r#"tell application "Music"
{ensure}    set removedCount to count of tracks of queueList
    delete every track of queueList
    return removedCount as string
end tell
"#,
        ensure = ensure_playlist(playlist)
    )
}

/// Delete every library track matching `name`/`artist`; prints the count.
pub fn remove_from_library(name: &str, artist: &str) -> String {
    format!(
        r#"tell application "Music"
    set matches to (every track of library playlist 1 whose name is {name} and artist is {artist})
    set removedCount to count of matches
    if removedCount > 0 then
        delete (every track of library playlist 1 whose name is {name} and artist is {artist})
    end if
    return removedCount as string
end tell
"#,
        name = quote(name),
        artist = quote(artist)
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackInfo {
    pub name: String,
    pub artist: String,
    pub album: String,
    pub duration_seconds: Option<f64>,
    pub position_seconds: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NowPlaying {
    pub state: String,
    pub track: Option<TrackInfo>,
    pub shuffle_enabled: bool,
    pub repeat_mode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueEntry {
    pub position: usize,
    pub name: String,
    pub artist: String,
    pub album: String,
    pub duration_seconds: Option<f64>,
}

/// AppleScript renders reals with the locale's decimal separator.
fn parse_seconds(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "missing value" {
        return None;
    }
    raw.replace(',', ".").parse::<f64>().ok()
}

fn unexpected_output(what: &str, output: &str) -> HandlerFailure {
    HandlerFailure::new(
        FailureKind::AutomationFailed,
        format!("Unexpected {what} output from Music."),
    )
    .with_hint(format!("Got: {}", output.chars().take(120).collect::<String>()))
}

pub fn parse_now_playing(output: &str) -> Result<NowPlaying, HandlerFailure> {
    let fields: Vec<&str> = output.split(FIELD_SEP).collect();
    if fields.len() != 3 && fields.len() != 8 {
        return Err(unexpected_output("now playing", output));
    }
    let track = (fields.len() == 8).then(|| TrackInfo {
        name: fields[3].to_string(),
        artist: fields[4].to_string(),
        album: fields[5].to_string(),
        duration_seconds: parse_seconds(fields[6]),
        position_seconds: parse_seconds(fields[7]),
    });
    Ok(NowPlaying {
        state: fields[0].trim().to_string(),
        track,
        shuffle_enabled: fields[1].trim() == "true",
        repeat_mode: fields[2].trim().to_string(),
    })
}

pub fn parse_queue(output: &str) -> Result<Vec<QueueEntry>, HandlerFailure> {
    if output.trim().is_empty() {
        return Ok(Vec::new());
    }
    output
        .split(ROW_SEP)
        .enumerate()
        .map(|(index, row)| {
            let fields: Vec<&str> = row.split(FIELD_SEP).collect();
            if fields.len() != 4 {
                return Err(unexpected_output("queue", output));
            }
            Ok(QueueEntry {
                position: index + 1,
                name: fields[0].to_string(),
                artist: fields[1].to_string(),
                album: fields[2].to_string(),
                duration_seconds: parse_seconds(fields[3]),
            })
        })
        .collect()
}

/// Parse a count printed by a script; `None` for the missing-track marker.
pub fn parse_count(output: &str) -> Result<Option<u64>, HandlerFailure> {
    let trimmed = output.trim();
    if trimmed == MISSING_MARKER {
        return Ok(None);
    }
    trimmed
        .parse::<u64>()
        .map(Some)
        .map_err(|_| unexpected_output("count", output))
}
