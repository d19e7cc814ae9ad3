use clap::Subcommand;
use serde_json::json;
use tally_core::{stats, Config, EventCategory};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's counts per category
    Today {
        #[arg(long)]
        subject: Option<String>,
    },
    /// Trailing 7 days for one category
    Weekly {
        category: String,
        #[arg(long)]
        subject: Option<String>,
    },
    /// Current calendar month for one category
    Monthly {
        category: String,
        #[arg(long)]
        subject: Option<String>,
    },
    /// Lifetime totals and profile level
    All {
        #[arg(long)]
        subject: Option<String>,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let ledger = super::open_ledger()?;
    let today = stats::utc_today();

    match action {
        StatsAction::Today { subject } => {
            let subject = super::resolve_subject(subject, &config);
            let snap = ledger.read_snapshot(&subject);
            let output = json!({
                "date": today,
                "conversions": stats::today_count(&snap.daily.conversions, today),
                "calculations": stats::today_count(&snap.daily.calculations, today),
                "date_calculations": stats::today_count(&snap.daily.date_calculations, today),
                "notes_saved": stats::today_count(&snap.daily.notes_saved, today),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        StatsAction::Weekly { category, subject } => {
            let category: EventCategory = category.parse()?;
            let subject = super::resolve_subject(subject, &config);
            let snap = ledger.read_snapshot(&subject);
            let counts = snap.daily.for_category(category).cloned().unwrap_or_default();
            let buckets = stats::weekly(&counts, today);
            println!("{}", serde_json::to_string_pretty(&buckets)?);
        }
        StatsAction::Monthly { category, subject } => {
            let category: EventCategory = category.parse()?;
            let subject = super::resolve_subject(subject, &config);
            let snap = ledger.read_snapshot(&subject);
            let counts = snap.daily.for_category(category).cloned().unwrap_or_default();
            let buckets = stats::monthly(&counts, today);
            println!("{}", serde_json::to_string_pretty(&buckets)?);
        }
        StatsAction::All { subject } => {
            let subject = super::resolve_subject(subject, &config);
            let snap = ledger.read_snapshot(&subject);
            let level = stats::level_state(snap.totals.sum());
            let output = json!({
                "totals": snap.totals,
                "level": level,
                "title": level.title(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}
