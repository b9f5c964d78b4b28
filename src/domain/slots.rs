//! Slot schema: the static table of parameters each domain intent needs.
//!
//! This is configuration data, not request state — it never changes during a
//! conversation. Required slots gate dispatch; optional slots are extracted
//! when present but never asked for.

use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;

use super::intent::Intent;

/// Uniform string-keyed slot map carried in session state.
///
/// A `BTreeMap` keeps serialization order stable.
pub type SlotValues = BTreeMap<String, String>;

/// One named parameter of a downstream operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpec {
    /// Slot key, as stored in session state and sent to the extractor.
    pub name: &'static str,
    /// Extraction hint shown to the generative backend.
    pub description: &'static str,
}

/// Parameter schema for one domain intent.
#[derive(Debug, Clone, Copy)]
pub struct SlotSchema {
    /// Slots that must be resolved before dispatch.
    pub required: &'static [SlotSpec],
    /// Slots extracted opportunistically; dispatch falls back to a default.
    pub optional: &'static [SlotSpec],
}

static TRAIN_BETWEEN_STATIONS: SlotSchema = SlotSchema {
    required: &[
        SlotSpec {
            name: "source",
            description: "Source station code",
        },
        SlotSpec {
            name: "destination",
            description: "Destination station code",
        },
        SlotSpec {
            name: "date",
            description: "Journey date (YYYY-MM-DD)",
        },
    ],
    optional: &[],
};

static PNR_STATUS: SlotSchema = SlotSchema {
    required: &[SlotSpec {
        name: "pnr",
        description: "10-digit PNR number",
    }],
    optional: &[],
};

static LIVE_STATUS: SlotSchema = SlotSchema {
    required: &[
        SlotSpec {
            name: "train_no",
            description: "Train number",
        },
        SlotSpec {
            name: "date",
            description: "Date to check (YYYY-MM-DD)",
        },
    ],
    optional: &[],
};

static TRAIN_SCHEDULE: SlotSchema = SlotSchema {
    required: &[SlotSpec {
        name: "train_no",
        description: "Train number",
    }],
    optional: &[],
};

static SEAT_AVAILABILITY: SlotSchema = SlotSchema {
    required: &[
        SlotSpec {
            name: "train_no",
            description: "Train number (e.g., 19038)",
        },
        SlotSpec {
            name: "source",
            description: "Source station code (e.g., ST)",
        },
        SlotSpec {
            name: "destination",
            description: "Destination station code (e.g., BVI)",
        },
        SlotSpec {
            name: "date",
            description: "Journey date (YYYY-MM-DD)",
        },
    ],
    optional: &[SlotSpec {
        name: "class",
        description: "Class code (e.g., 2A, SL, 3A)",
    }],
};

static LIVE_STATION: SlotSchema = SlotSchema {
    required: &[SlotSpec {
        name: "hours",
        description: "Number of hours to look ahead",
    }],
    optional: &[],
};

static SEARCH_TRAIN: SlotSchema = SlotSchema {
    required: &[SlotSpec {
        name: "query",
        description: "Train name or number to search",
    }],
    optional: &[],
};

static SEARCH_STATION: SlotSchema = SlotSchema {
    required: &[SlotSpec {
        name: "query",
        description: "Station name to search",
    }],
    optional: &[],
};

/// Slot schema for a domain intent.
pub fn schema_for(intent: Intent) -> &'static SlotSchema {
    match intent {
        Intent::TrainBetweenStations => &TRAIN_BETWEEN_STATIONS,
        Intent::PnrStatus => &PNR_STATUS,
        Intent::LiveStatus => &LIVE_STATUS,
        Intent::TrainSchedule => &TRAIN_SCHEDULE,
        Intent::SeatAvailability => &SEAT_AVAILABILITY,
        Intent::LiveStation => &LIVE_STATION,
        Intent::SearchTrain => &SEARCH_TRAIN,
        Intent::SearchStation => &SEARCH_STATION,
    }
}

impl SlotSchema {
    /// True if `name` is a required or optional slot of this schema.
    pub fn contains(&self, name: &str) -> bool {
        self.required.iter().chain(self.optional).any(|s| s.name == name)
    }

    /// Required and optional slots, required first.
    pub fn all_slots(&self) -> impl Iterator<Item = &SlotSpec> {
        self.required.iter().chain(self.optional)
    }
}

/// Human-readable labels used when asking for missing slots.
static SLOT_LABELS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("source", "source station"),
        ("destination", "destination station"),
        ("date", "journey date"),
        ("train_no", "train number"),
        ("pnr", "PNR number"),
        ("hours", "number of hours"),
        ("query", "search keyword"),
        ("class", "class type"),
    ])
});

/// Label for a slot name; falls back to the raw name.
pub fn label_for(slot: &str) -> &str {
    SLOT_LABELS.get(slot).copied().unwrap_or(slot)
}

/// True if a stored value counts as unresolved.
///
/// The extractor filters these out, but merged state may still carry them.
pub fn is_unresolved(value: &str) -> bool {
    value.is_empty() || value == "null"
}

/// Required slots of `intent` not yet resolved in `params`, in schema order.
pub fn missing_slots(intent: Intent, params: &SlotValues) -> Vec<&'static str> {
    schema_for(intent)
        .required
        .iter()
        .filter(|spec| params.get(spec.name).map_or(true, |v| is_unresolved(v)))
        .map(|spec| spec.name)
        .collect()
}

/// Compose the clarification prompt for a non-empty missing-slot list.
///
/// One slot: "Please provide the X." Two: "Please provide the X and Y."
/// Three or more: "I need: A, B, and C."
pub fn clarification_prompt(missing: &[&str]) -> String {
    let labels: Vec<&str> = missing.iter().map(|s| label_for(s)).collect();
    match labels.as_slice() {
        [] => String::new(),
        [only] => format!("Please provide the {only}."),
        [first, second] => format!("Please provide the {first} and {second}."),
        [head @ .., last] => format!("I need: {}, and {last}.", head.join(", ")),
    }
}
