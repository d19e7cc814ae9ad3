pub mod completions;
pub mod rate;
pub mod record;
pub mod stats;
pub mod streak;

use tally_core::{data_dir, Config, Ledger, LocalStore, SqliteBackend, SubjectId};

/// Open the ledger over the default SQLite backend with the JSON fallback
/// store attached.
pub fn open_ledger() -> Result<Ledger<SqliteBackend>, Box<dyn std::error::Error>> {
    let backend = SqliteBackend::open_default()?;
    let fallback = LocalStore::open(data_dir()?.join("activity.json"));
    Ok(Ledger::with_fallback(backend, fallback))
}

/// Subject from the CLI flag, else the configured default.
pub fn resolve_subject(flag: Option<String>, config: &Config) -> SubjectId {
    match flag {
        Some(subject) => SubjectId::new(subject),
        None => SubjectId::new(config.default_subject.clone()),
    }
}
