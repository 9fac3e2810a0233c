//! Prompt Command
//!
//! Prints the compiled briefing prompt without contacting the provider.

use chrono::Local;

use super::{TripArgs, load_static_context};
use crate::ai::prompt;
use crate::config::ConfigLoader;
use crate::trip::FormState;
use crate::types::Result;

pub fn run(trip: &TripArgs) -> Result<()> {
    let config = ConfigLoader::load()?;
    let today = Local::now().date_naive();

    let form = FormState::from_config(&config, today).apply(trip.updates());
    let inputs = form.snapshot()?;
    let static_context = load_static_context(&config, trip.context_file.as_deref())?;

    println!("{}", prompt::compile(&inputs, &static_context, form.live_search));
    Ok(())
}
