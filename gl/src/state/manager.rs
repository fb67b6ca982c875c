//! StateManager - actor that owns the goal store
//!
//! Processes commands via channels for thread-safe access to persistent state.

use std::path::Path;

use chrono::NaiveDate;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::day::DayBoundary;
use crate::domain::{DayReview, Goal, GoalFilter, Intention, NewGoal, Store};

use super::messages::{StateCommand, StateError, StateResponse};

/// Handle to send commands to the StateManager
#[derive(Clone)]
pub struct StateManager {
    tx: mpsc::Sender<StateCommand>,
}

impl StateManager {
    /// Spawn a new StateManager actor on the store at `store_path`
    ///
    /// `store_path` may be a database file or a directory to hold one.
    /// Day queries cover the window `boundary` gives each day.
    pub fn spawn(store_path: impl AsRef<Path>, boundary: DayBoundary) -> eyre::Result<Self> {
        debug!(store_path = %store_path.as_ref().display(), start_hour = boundary.start_hour(), "spawn: called");
        let store = Store::open(store_path.as_ref())?;
        Ok(Self::spawn_with_store(store, boundary))
    }

    /// Spawn the actor around an already opened store
    pub fn spawn_with_store(store: Store, boundary: DayBoundary) -> Self {
        let (tx, rx) = mpsc::channel(256);
        tokio::spawn(actor_loop(store, boundary, rx));
        info!("StateManager spawned");
        Self { tx }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<StateResponse<T>>) -> StateCommand,
    ) -> StateResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)?
    }

    // === Goal operations ===

    /// Goals matching `filter`, in display order
    pub async fn get_goals(&self, filter: GoalFilter) -> StateResponse<Vec<Goal>> {
        debug!(?filter, "get_goals: called");
        self.request(|reply| StateCommand::GetGoals { filter, reply }).await
    }

    /// Create a goal numbered after the current last one
    pub async fn insert_goal(&self, goal: NewGoal) -> StateResponse<Goal> {
        debug!(name = %goal.name, "insert_goal: called");
        self.request(|reply| StateCommand::InsertGoal { goal, reply }).await
    }

    pub async fn upsert_goals(&self, goals: Vec<Goal>) -> StateResponse<()> {
        debug!(count = goals.len(), "upsert_goals: called");
        self.request(|reply| StateCommand::UpsertGoals { goals, reply }).await
    }

    /// Delete goals, returning how many rows went away
    pub async fn delete_goals(&self, goals: Vec<Goal>) -> StateResponse<usize> {
        debug!(count = goals.len(), "delete_goals: called");
        self.request(|reply| StateCommand::DeleteGoals { goals, reply }).await
    }

    // === Intention operations ===

    /// Intentions filed under `day`, ordered by position
    pub async fn get_intentions_for_day(&self, day: NaiveDate) -> StateResponse<Vec<Intention>> {
        debug!(%day, "get_intentions_for_day: called");
        self.request(|reply| StateCommand::GetIntentionsForDay { day, reply })
            .await
    }

    /// Write intentions; the result carries store-assigned ids
    pub async fn upsert_intentions(&self, intentions: Vec<Intention>) -> StateResponse<Vec<Intention>> {
        debug!(count = intentions.len(), "upsert_intentions: called");
        self.request(|reply| StateCommand::UpsertIntentions { intentions, reply })
            .await
    }

    // === Day review operations ===

    pub async fn upsert_day_reviews(&self, reviews: Vec<DayReview>) -> StateResponse<()> {
        debug!(count = reviews.len(), "upsert_day_reviews: called");
        self.request(|reply| StateCommand::UpsertDayReviews { reviews, reply })
            .await
    }

    pub async fn get_day_reviews(&self, date: NaiveDate) -> StateResponse<Vec<DayReview>> {
        debug!(%date, "get_day_reviews: called");
        self.request(|reply| StateCommand::GetDayReviews { date, reply })
            .await
    }

    /// Shutdown the StateManager
    pub async fn shutdown(&self) -> Result<(), StateError> {
        debug!("shutdown: called");
        self.tx
            .send(StateCommand::Shutdown)
            .await
            .map_err(|_| StateError::ChannelError)
    }
}

fn store_err(e: goalstore::StoreError) -> StateError {
    StateError::StoreError(e.to_string())
}

/// Main actor loop
async fn actor_loop(mut store: Store, boundary: DayBoundary, mut rx: mpsc::Receiver<StateCommand>) {
    debug!("actor_loop: called");
    debug!(path = %store.path().display(), "StateManager actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            StateCommand::GetGoals { filter, reply } => {
                debug!(?filter, "actor_loop: GetGoals command");
                let _ = reply.send(store.get_goals(filter).map_err(store_err));
            }

            StateCommand::InsertGoal { goal, reply } => {
                debug!(name = %goal.name, "actor_loop: InsertGoal command");
                let _ = reply.send(store.insert_goal(goal).map_err(store_err));
            }

            StateCommand::UpsertGoals { goals, reply } => {
                debug!(count = goals.len(), "actor_loop: UpsertGoals command");
                let _ = reply.send(store.upsert_goals(&goals).map_err(store_err));
            }

            StateCommand::DeleteGoals { goals, reply } => {
                debug!(count = goals.len(), "actor_loop: DeleteGoals command");
                let _ = reply.send(store.delete_goals(&goals).map_err(store_err));
            }

            StateCommand::GetIntentionsForDay { day, reply } => {
                let (start, end) = boundary.day_interval(day);
                debug!(%day, %start, %end, "actor_loop: GetIntentionsForDay command");
                let result = store
                    .get_intentions_between(start.date(), end.date())
                    .map_err(store_err);
                let _ = reply.send(result);
            }

            StateCommand::UpsertIntentions { intentions, reply } => {
                debug!(count = intentions.len(), "actor_loop: UpsertIntentions command");
                let _ = reply.send(store.upsert_intentions(&intentions).map_err(store_err));
            }

            StateCommand::UpsertDayReviews { reviews, reply } => {
                debug!(count = reviews.len(), "actor_loop: UpsertDayReviews command");
                let _ = reply.send(store.upsert_day_reviews(&reviews).map_err(store_err));
            }

            StateCommand::GetDayReviews { date, reply } => {
                debug!(%date, "actor_loop: GetDayReviews command");
                let _ = reply.send(store.get_day_reviews(date).map_err(store_err));
            }

            StateCommand::Shutdown => {
                info!("StateManager shutting down");
                break;
            }
        }
    }

    debug!("StateManager actor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[tokio::test]
    async fn test_state_manager_goal_crud() {
        let temp = tempdir().unwrap();
        let manager = StateManager::spawn(temp.path(), DayBoundary::default()).unwrap();

        // Create
        let health = manager.insert_goal(NewGoal::new("Health")).await.unwrap();
        let craft = manager.insert_goal(NewGoal::new("Craft")).await.unwrap();
        assert_eq!(health.number, 1);
        assert_eq!(craft.number, 2);

        // Archive
        let mut archived = health.clone();
        archived.archived = true;
        manager.upsert_goals(vec![archived]).await.unwrap();
        let active = manager.get_goals(GoalFilter::Active).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Craft");

        // Delete
        assert_eq!(manager.delete_goals(vec![craft]).await.unwrap(), 1);
        assert_eq!(manager.get_goals(GoalFilter::All).await.unwrap().len(), 1);

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_state_manager_uses_configured_boundary() {
        let temp = tempdir().unwrap();
        let manager = StateManager::spawn(temp.path(), DayBoundary::new(6)).unwrap();
        let prev = day().pred_opt().unwrap();
        let next = day().succ_opt().unwrap();

        let rows = vec![
            Intention::new("-) before", prev),
            Intention::new("-) during", day()),
            Intention::new("-) after", next),
        ];
        manager.upsert_intentions(rows).await.unwrap();

        let loaded = manager.get_intentions_for_day(day()).await.unwrap();
        let contents: Vec<&str> = loaded.iter().map(|i| i.content.as_str()).collect();
        assert_eq!(contents, vec!["-) during"]);

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_state_manager_intentions_roundtrip_through_day() {
        let temp = tempdir().unwrap();
        let manager = StateManager::spawn(temp.path(), DayBoundary::default()).unwrap();
        let goal = manager.insert_goal(NewGoal::new("Health")).await.unwrap();

        let draft = Intention::new("1) run", day()).with_goals(vec![goal.id]);
        let saved = manager.upsert_intentions(vec![draft]).await.unwrap();
        assert!(saved[0].id.is_some());

        let loaded = manager.get_intentions_for_day(day()).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].goals, vec![goal.id]);

        let next = day().succ_opt().unwrap();
        assert!(manager.get_intentions_for_day(next).await.unwrap().is_empty());

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_state_manager_day_reviews() {
        let temp = tempdir().unwrap();
        let manager = StateManager::spawn(temp.path(), DayBoundary::default()).unwrap();
        let goal = manager.insert_goal(NewGoal::new("Health")).await.unwrap();

        let reviews = vec![
            DayReview {
                date: day(),
                goal: Some(goal.id),
                enough: true,
                reflection: "good run".to_string(),
            },
            DayReview {
                date: day(),
                goal: None,
                enough: false,
                reflection: String::new(),
            },
        ];
        manager.upsert_day_reviews(reviews.clone()).await.unwrap();
        manager.upsert_day_reviews(reviews.clone()).await.unwrap();

        let stored = manager.get_day_reviews(day()).await.unwrap();
        assert_eq!(stored, reviews);

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_requests_after_shutdown_fail_with_channel_error() {
        let temp = tempdir().unwrap();
        let manager = StateManager::spawn(temp.path(), DayBoundary::default()).unwrap();
        manager.shutdown().await.unwrap();

        // queued behind Shutdown, so never answered
        let result = manager.get_goals(GoalFilter::All).await;
        assert!(matches!(result, Err(StateError::ChannelError)));
    }
}
