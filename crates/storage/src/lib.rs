#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;
pub mod word_source;

pub use repository::{
    InMemoryRepository, KeyValueStore, ProgressRepository, SettingsRepository, Storage,
    StorageError,
};
pub use word_source::{WordSheet, parse_word_csv, read_word_csv};
