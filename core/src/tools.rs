//! The fixed tool manifest advertised to the host.

use serde_json::json;

use crate::schema::{FieldSpec, RegistryError, SchemaRegistry, ToolSchema};

pub const SEARCH_MUSIC: &str = "search_music";
pub const PLAY_SONG: &str = "play_song";
pub const CONTROL_PLAYBACK: &str = "control_playback";
pub const MANAGE_QUEUE: &str = "manage_queue";
pub const ADD_TO_LIBRARY: &str = "add_to_library";
pub const REMOVE_FROM_LIBRARY: &str = "remove_from_library";
pub const CREATE_PLAYLIST: &str = "create_playlist";
pub const HEALTH_CHECK: &str = "mcp.health_check";

/// Every tool name, in manifest order.
pub const TOOL_NAMES: [&str; 8] = [
    SEARCH_MUSIC,
    PLAY_SONG,
    CONTROL_PLAYBACK,
    MANAGE_QUEUE,
    ADD_TO_LIBRARY,
    REMOVE_FROM_LIBRARY,
    CREATE_PLAYLIST,
    HEALTH_CHECK,
];

pub const SEARCH_TYPES: [&str; 3] = ["songs", "albums", "artists"];
pub const SEARCH_LIMIT_MAX: i64 = 25;
pub const SEARCH_LIMIT_DEFAULT: i64 = 10;

pub const PLAYBACK_ACTIONS: [&str; 11] = [
    "play",
    "pause",
    "play_pause",
    "next",
    "previous",
    "shuffle_on",
    "shuffle_off",
    "repeat_off",
    "repeat_one",
    "repeat_all",
    "now_playing",
];

pub const QUEUE_ACTIONS: [&str; 3] = ["add", "view", "clear"];
pub const LIBRARY_ITEM_TYPES: [&str; 3] = ["songs", "albums", "playlists"];
pub const PLAYLIST_TRACKS_MAX: usize = 100;

pub fn search_music() -> ToolSchema {
    ToolSchema::new(SEARCH_MUSIC, "Search the Apple Music catalog.")
        .field(
            FieldSpec::string("term")
                .required()
                .non_empty()
                .max_length(200)
                .describe("Search text, e.g. an artist, album or song title"),
        )
        .field(
            FieldSpec::string_set("types")
                .one_of(&SEARCH_TYPES)
                .min_items(1)
                .max_items(SEARCH_TYPES.len())
                .describe("Catalog resource types to search")
                .default_value(json!(["songs"])),
        )
        .field(
            FieldSpec::integer("limit")
                .range(1, SEARCH_LIMIT_MAX)
                .describe("Maximum results per type")
                .default_value(json!(SEARCH_LIMIT_DEFAULT)),
        )
        .field(
            FieldSpec::integer("offset")
                .minimum(0)
                .describe("Pagination offset")
                .default_value(json!(0)),
        )
}

pub fn play_song() -> ToolSchema {
    ToolSchema::new(
        PLAY_SONG,
        "Start playback of a catalog song in the Music app.",
    )
    .field(
        FieldSpec::string("track_id")
            .required()
            .non_empty()
            .describe("Catalog song identifier"),
    )
    .field(
        FieldSpec::string("play_location_url")
            .non_empty()
            .describe("Explicit music.apple.com URL to open instead of the catalog URL"),
    )
}

pub fn control_playback() -> ToolSchema {
    ToolSchema::new(
        CONTROL_PLAYBACK,
        "Control playback state (play, pause, skip, shuffle, repeat) or read what is playing.",
    )
    .field(
        FieldSpec::string("action")
            .required()
            .one_of(&PLAYBACK_ACTIONS)
            .describe("Playback action; now_playing reports the current track"),
    )
}

pub fn manage_queue() -> ToolSchema {
    ToolSchema::new(
        MANAGE_QUEUE,
        "Manage the play queue (add a track, view it, or clear it).",
    )
    .field(FieldSpec::string("action").required().one_of(&QUEUE_ACTIONS))
    .field(
        FieldSpec::string("track_id")
            .non_empty()
            .required_when("action", "add")
            .describe("Catalog song identifier; required when action is add"),
    )
    .field(
        FieldSpec::boolean("play_next")
            .describe("Insert at the front of the queue instead of the end")
            .default_value(json!(false)),
    )
}

pub fn add_to_library() -> ToolSchema {
    ToolSchema::new(ADD_TO_LIBRARY, "Add a catalog item to the user's library.")
        .field(
            FieldSpec::string("track_id")
                .required()
                .non_empty()
                .describe("Catalog identifier of the item"),
        )
        .field(
            FieldSpec::string("item_type")
                .one_of(&LIBRARY_ITEM_TYPES)
                .default_value(json!("songs")),
        )
}

pub fn remove_from_library() -> ToolSchema {
    ToolSchema::new(
        REMOVE_FROM_LIBRARY,
        "Remove a catalog song from the local library.",
    )
    .field(
        FieldSpec::string("track_id")
            .required()
            .non_empty()
            .describe("Catalog song identifier"),
    )
}

pub fn create_playlist() -> ToolSchema {
    ToolSchema::new(
        CREATE_PLAYLIST,
        "Create a library playlist, optionally seeded with catalog songs.",
    )
    .field(
        FieldSpec::string("name")
            .required()
            .non_empty()
            .max_length(100)
            .describe("Playlist display name"),
    )
    .field(FieldSpec::string("description").max_length(300))
    .field(
        FieldSpec::string_list("track_ids")
            .non_empty()
            .max_items(PLAYLIST_TRACKS_MAX)
            .describe("Catalog song identifiers to add")
            .default_value(json!([])),
    )
}

pub fn health_check() -> ToolSchema {
    ToolSchema::new(
        HEALTH_CHECK,
        "Report local automation and catalog connectivity.",
    )
}

pub fn tool_schemas() -> Vec<ToolSchema> {
    vec![
        search_music(),
        play_song(),
        control_playback(),
        manage_queue(),
        add_to_library(),
        remove_from_library(),
        create_playlist(),
        health_check(),
    ]
}

/// Registry holding the full manifest.
pub fn default_registry() -> Result<SchemaRegistry, RegistryError> {
    let mut registry = SchemaRegistry::new();
    for schema in tool_schemas() {
        registry.register(schema)?;
    }
    Ok(registry)
}
