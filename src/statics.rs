// Central place for UI strings, CIT keys and the default scan lists.
// Keep these out of gui.rs/scan.rs to reduce duplication and make tweaks safer.

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_APP_TITLE: &str = "CNE: Shadows of Doubt CIT Names Editor";

pub const EN_BTN_OPEN: &str = "Load .CIT File";
pub const EN_BTN_SAVE_AS: &str = "Save Changes";
pub const EN_BTN_ABOUT: &str = "About";
pub const EN_BTN_TOGGLE_THEME: &str = "Theme";
pub const EN_BTN_CLEAR: &str = "Clear";

pub const EN_WINDOW_ABOUT: &str = "About";
pub const EN_ABOUT_HEADING: &str = "CNE: Shadows of Doubt CIT Names Editor";
pub const EN_ABOUT_VERSION: &str = "Version:";
pub const EN_ABOUT_BLURB: &str =
    "Renames the city, its districts, streets and named locations in a .cit file.";

pub const EN_HOME_INSTRUCTIONS: &str = "Load a Shadows of Doubt city (.cit) to begin.";
pub const EN_NO_ENTRIES: &str = "No entries.";

pub const EN_BADGE_MODIFIED: &str = "modified:";
pub const EN_LABEL_REFS: &str = "refs";

pub const EN_DIALOG_FILTER: &str = "CIT files";
pub const EN_DIALOG_EXTENSIONS: &[&str] = &["cit", "gz"];

// Load pipeline status text.
pub const EN_PROGRESS_LOADING: &str = "Loading file...";
pub const EN_PROGRESS_PARSING: &str = "Parsing data...";
pub const EN_PROGRESS_SCANNING: &str = "Scanning entities...";
pub const EN_PROGRESS_DONE: &str = "Done";
pub const EN_PROGRESS_REVEAL_PREFIX: &str = "Loading:";

// Fixed category and entry labels.
pub const EN_CATEGORY_CITY: &str = "City";
pub const EN_CATEGORY_DISTRICTS: &str = "Districts";
pub const EN_CATEGORY_STREETS: &str = "Streets";
pub const EN_ENTRY_CITY_NAME: &str = "City Name";
pub const EN_ENTRY_DISTRICT: &str = "District";
pub const EN_ENTRY_STREET: &str = "Street";

pub const EN_STATUS_LOADED: &str = "Loaded";
pub const EN_STATUS_SAVED: &str = "File saved!";
pub const EN_ERR_LOAD: &str = "Could not load JSON:";
pub const EN_ERR_SAVE: &str = "Could not save file:";

pub const EN_EMPTY: &str = "";
pub const EN_UNKNOWN_CITY: &str = "Unknown";

// Newline constants (used for save formatting; keep out of document/value code).
pub const NL_LF: &str = "\n";
pub const NL_CRLF: &str = "\r\n";

pub const CIT_INDENT: &str = "  ";

// CIT document keys (CIT_ prefix)
pub const CIT_KEY_CITY_NAME: &str = "cityName";
pub const CIT_KEY_DISTRICTS: &str = "districts";
pub const CIT_KEY_STREETS: &str = "streets";
pub const CIT_KEY_NAME: &str = "name";

// Presentation timing/geometry.
pub const REVEAL_STEP_MS: u64 = 50;
pub const WINDOW_SIZE: [f32; 2] = [1000.0, 900.0];
pub const ENTRY_LABEL_WIDTH: f32 = 200.0;

/// Category keywords in priority order. A name joins the first keyword it contains.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "market",
    "store",
    "deli",
    "butcher",
    "bakery",
    "pawn",
    "electronics",
    "diner",
    "cafe",
    "restaurant",
    "grill",
    "pub",
    "bar",
    "sync clinic",
    "pharmacy",
    "hospital",
    "repair",
    "laundromat",
    "tailors",
    "arcade",
    "nightclub",
    "gym",
    "studio",
    "museum",
    "gallery",
    "office",
    "factory",
    "'s",
    "labs",
    "laboratory",
    "networks",
    "systems",
    "hotel",
    "black market",
    "weapons dealer",
    "launderette",
    "management",
    "loan shark",
    "casino",
    "gambling den",
    "chemical plant",
];

/// Substrings that exclude a name from every category (rooms, job titles, filler).
pub const DEFAULT_IGNORE_TERMS: &[&str] = &[
    "null",
    "backroom",
    "storeroom",
    "floor",
    "rooftop",
    "bathroom",
    "kitchen",
    "diner diner",
    "bargains",
    "supermarket",
    "sync sync",
    "dining room",
    "ballroom",
    "control room",
    "reception",
    "pharmacy pharmacy",
    "bar bar",
    "marketing executive",
    "black trader",
    "black doctor",
    "break room",
    "utility cupboard",
    "living room",
    "bedroom",
    "hallway",
    "unknown",
    "study",
    "lobby",
    "penthouse",
    "basement",
    "officer",
    "manager",
    "owner",
    "shower room",
];

/// Whole words dropped when computing a base name, so "Joe's Bakery" and
/// "Joe's Bakery Store" share the base "Joe's".
pub const DEFAULT_IGNORE_WORDS: &[&str] = &[
    "laboratories",
    "labs",
    "clinic",
    "store",
    "market",
    "hardware",
    "bakery",
    "grill",
    "canteen",
];
