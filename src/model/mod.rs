// File: ./src/model/mod.rs
pub mod assembler;
pub mod classifier;
pub mod entry;
pub mod segmenter;
pub mod spatial;
pub mod suggest;
pub mod tags;
pub mod temporal;

pub use assembler::assemble_entry;
pub use classifier::{Classification, Profile, classify, classify_lightweight, infer_priority};
pub use entry::{
    AutoAction, AutoActionType, Entry, EntryStatus, EntryType, ItemKind, PLACEHOLDER_PREFIX,
    ParsedItem, Priority,
};
pub use segmenter::segment;
pub use spatial::{SpatialMatch, extract_location};
pub use suggest::suggestions;
pub use tags::{TagExtraction, extract_tags, normalize_tags};
pub use temporal::{
    DateResolver, ResolvedDate, SmartDateResolver, TemporalKind, TemporalMatch, extract_dates,
};
