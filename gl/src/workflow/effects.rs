//! Running workflow commands against the StateManager

use tracing::debug;

use crate::state::StateManager;

use super::messages::{Command, Msg};

/// Perform one command and produce the message that reports its result
pub async fn execute(manager: &StateManager, command: Command) -> Msg {
    debug!(?command, "execute: called");
    match command {
        Command::LoadGoals(filter) => Msg::GoalsLoaded(manager.get_goals(filter).await),
        Command::LoadDay(day) => Msg::DayLoaded {
            day,
            result: manager.get_intentions_for_day(day).await,
        },
        Command::SaveIntentions(intentions) => Msg::IntentionsSaved(manager.upsert_intentions(intentions).await),
        Command::SaveReviews(reviews) => Msg::ReviewsSaved(manager.upsert_day_reviews(reviews).await),
    }
}
