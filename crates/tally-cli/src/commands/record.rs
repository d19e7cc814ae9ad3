use clap::Subcommand;
use tally_core::{Config, EventCategory};

#[derive(Subcommand)]
pub enum RecordAction {
    /// Record one event (conversion, calculation, date_calculation,
    /// note_saved, visit)
    Event {
        category: String,
        /// Subject identifier (defaults to the configured subject)
        #[arg(long)]
        subject: Option<String>,
    },
    /// Record today's visit
    Visit {
        #[arg(long)]
        subject: Option<String>,
    },
}

pub fn run(action: RecordAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let ledger = super::open_ledger()?;

    match action {
        RecordAction::Event { category, subject } => {
            let category: EventCategory = category.parse()?;
            let subject = super::resolve_subject(subject, &config);
            ledger.record_event(&subject, category);
            println!("recorded {category} for {subject}");
        }
        RecordAction::Visit { subject } => {
            let subject = super::resolve_subject(subject, &config);
            ledger.record_visit(&subject);
            println!("visit recorded for {subject}");
        }
    }
    Ok(())
}
