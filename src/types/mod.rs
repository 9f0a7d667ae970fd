pub mod card;
pub mod config;
pub mod crowd_anki_config;
pub mod crowd_anki_models;
pub mod fragment;
