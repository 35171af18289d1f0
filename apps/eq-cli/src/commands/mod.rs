// mod.rs - Shared plumbing for eq subcommands.

pub mod goal;
pub mod state;

use eq_goal::{EventDispatcher, GoalStore, GoalTracker, QuestConfig, QuestEvent};
use tracing::debug;

/// The goal store plus the event sinks configured for this project.
pub struct Quest {
    pub store: GoalStore,
    dispatcher: EventDispatcher,
}

impl Quest {
    pub fn open(config: &QuestConfig) -> anyhow::Result<Self> {
        let store = GoalStore::new(config.goals_path())?;
        let dispatcher = EventDispatcher::from_config(config);
        debug!(
            goals = %store.path().display(),
            sinks = dispatcher.sink_count(),
            "opened quest state"
        );
        Ok(Self { store, dispatcher })
    }

    pub fn load(&self) -> anyhow::Result<GoalTracker> {
        Ok(self.store.load()?)
    }

    /// Persist the tracker and announce it.
    pub fn save(&self, tracker: &GoalTracker) -> anyhow::Result<()> {
        self.store.save(tracker)?;
        self.notify(&QuestEvent::state_saved(tracker, self.store.path()));
        Ok(())
    }

    pub fn notify(&self, event: &QuestEvent) {
        self.dispatcher.dispatch(event);
    }
}
