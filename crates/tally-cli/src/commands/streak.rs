use clap::Subcommand;
use tally_core::{stats, Config};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Current and best streaks for a subject
    Show {
        #[arg(long)]
        subject: Option<String>,
    },
}

pub fn run(action: StreakAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let ledger = super::open_ledger()?;

    match action {
        StreakAction::Show { subject } => {
            let subject = super::resolve_subject(subject, &config);
            let snap = ledger.read_snapshot(&subject);
            let streak = stats::streak_state(&snap.visits, stats::utc_today());
            println!("{}", serde_json::to_string_pretty(&streak)?);
        }
    }
    Ok(())
}
