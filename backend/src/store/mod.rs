//! Meal-plan store
//!
//! Single owner of the planner state. Every change goes through
//! [`MealPlanStore::dispatch`], which applies the pure reducer under an async
//! mutex, records the mutation, and persists the keys the action touched
//! before releasing the lock. Writes are therefore applied and persisted in
//! dispatch order.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use tokio::sync::Mutex;
use tracing::debug;

use crate::storage::PlannerStorage;

pub mod reducer;

pub use reducer::{reduce, MealPlanAction, MealPlanState, ReduceError, Touched};

/// Most recent mutations kept in the log; older entries are dropped
pub const MUTATION_LOG_CAPACITY: usize = 256;

/// One applied mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationRecord {
    pub sequence: u64,
    pub action: &'static str,
    pub applied_at: DateTime<Utc>,
}

struct Inner {
    state: MealPlanState,
    log: VecDeque<MutationRecord>,
    applied: u64,
}

pub struct MealPlanStore {
    inner: Mutex<Inner>,
    storage: PlannerStorage,
}

impl MealPlanStore {
    /// Empty store backed by `storage`, without reading from it
    pub fn new(storage: PlannerStorage) -> Self {
        Self::with_state(storage, MealPlanState::default())
    }

    fn with_state(storage: PlannerStorage, state: MealPlanState) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state,
                log: VecDeque::with_capacity(MUTATION_LOG_CAPACITY),
                applied: 0,
            }),
            storage,
        }
    }

    /// Store initialized from whatever the storage holds
    pub async fn hydrate(storage: PlannerStorage) -> Self {
        let persisted = storage.hydrate().await;
        debug!(
            filled_cells = persisted.week_menu.filled_cells(),
            saved_menus = persisted.saved_menus.len(),
            shopping_items = persisted.shopping_list.len(),
            "Hydrated meal-plan state"
        );
        Self::with_state(storage, persisted.into())
    }

    pub fn storage(&self) -> &PlannerStorage {
        &self.storage
    }

    pub async fn snapshot(&self) -> MealPlanState {
        self.inner.lock().await.state.clone()
    }

    /// The last [`MUTATION_LOG_CAPACITY`] applied mutations, oldest first
    pub async fn mutation_log(&self) -> Vec<MutationRecord> {
        self.inner.lock().await.log.iter().cloned().collect()
    }

    /// Apply an action and persist its effect
    ///
    /// A rejected action leaves the state and the log unchanged.
    pub async fn dispatch(&self, action: MealPlanAction) -> Result<MealPlanState, ReduceError> {
        let mut inner = self.inner.lock().await;
        let next = reduce(&inner.state, &action)?;

        inner.applied += 1;
        let sequence = inner.applied;
        if inner.log.len() == MUTATION_LOG_CAPACITY {
            inner.log.pop_front();
        }
        inner.log.push_back(MutationRecord {
            sequence,
            action: action.name(),
            applied_at: Utc::now(),
        });
        inner.state = next;

        self.persist(action.touches(), &inner.state).await;
        debug!(sequence, action = action.name(), "Dispatched meal-plan action");

        Ok(inner.state.clone())
    }

    async fn persist(&self, touched: Touched, state: &MealPlanState) {
        if touched.week_menu {
            self.storage.save_week_menu(&state.week_menu).await;
        }
        if touched.settings {
            self.storage.save_settings(&state.settings).await;
        }
        if touched.saved_menus {
            self.storage.save_saved_menus(&state.saved_menus).await;
        }
        if touched.shopping_list {
            self.storage.save_shopping_list(&state.shopping_list).await;
        }
        if touched.nutrition_plan {
            self.storage
                .save_nutrition_plan(state.nutrition_plan.as_ref())
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::builtin_recipe;
    use crate::storage::MemoryStore;
    use meal_planner_shared::{
        calculator, ActivityLevel, BiologicalSex, BiometricProfile, Day, FitnessGoal, MealType,
    };
    use std::sync::Arc;
    use uuid::Uuid;

    fn storage() -> PlannerStorage {
        PlannerStorage::new(Arc::new(MemoryStore::new()), "test_")
    }

    #[tokio::test]
    async fn test_dispatch_persists_and_rehydrates() {
        let storage = storage();
        let store = MealPlanStore::new(storage.clone());

        store
            .dispatch(MealPlanAction::AddRecipe {
                day: Day::Friday,
                meal_type: MealType::Dinner,
                recipe: builtin_recipe(MealType::Dinner),
            })
            .await
            .unwrap();
        store
            .dispatch(MealPlanAction::AddShoppingItem {
                name: "melk".to_string(),
                amount: "1".to_string(),
                unit: "l".to_string(),
            })
            .await
            .unwrap();

        let reloaded = MealPlanStore::hydrate(storage).await;
        assert_eq!(reloaded.snapshot().await, store.snapshot().await);
    }

    #[tokio::test]
    async fn test_nutrition_plan_survives_restart() {
        let storage = storage();
        let store = MealPlanStore::new(storage.clone());
        let profile = BiometricProfile {
            weight_kg: Some(70.0),
            height_cm: Some(170.0),
            age_years: Some(35),
            sex: Some(BiologicalSex::Female),
            activity_level: Some(ActivityLevel::Light),
            goal: Some(FitnessGoal::Lose),
            ..Default::default()
        };
        let plan = calculator::compute_nutrition_plan(&profile).unwrap();

        store
            .dispatch(MealPlanAction::SetNutritionPlan(plan.clone()))
            .await
            .unwrap();

        let reloaded = MealPlanStore::hydrate(storage).await.snapshot().await;
        assert_eq!(reloaded.nutrition_plan, Some(plan.clone()));
        assert_eq!(reloaded.settings.calorie_goal, plan.calorie_goal);
    }

    #[tokio::test]
    async fn test_log_orders_applied_mutations_only() {
        let store = MealPlanStore::new(storage());

        store.dispatch(MealPlanAction::ClearWeekMenu).await.unwrap();
        let rejected = store
            .dispatch(MealPlanAction::LoadSavedMenu { id: Uuid::new_v4() })
            .await;
        store.dispatch(MealPlanAction::ClearShoppingList).await.unwrap();

        assert!(rejected.is_err());
        let log = store.mutation_log().await;
        let names: Vec<_> = log.iter().map(|r| (r.sequence, r.action)).collect();
        assert_eq!(
            names,
            vec![(1, "clear_week_menu"), (2, "clear_shopping_list")]
        );
    }

    #[tokio::test]
    async fn test_log_keeps_only_recent_mutations() {
        let store = MealPlanStore::new(storage());
        let total = MUTATION_LOG_CAPACITY as u64 + 10;

        for _ in 0..total {
            store.dispatch(MealPlanAction::ClearShoppingList).await.unwrap();
        }

        let log = store.mutation_log().await;
        assert_eq!(log.len(), MUTATION_LOG_CAPACITY);
        assert_eq!(log.first().unwrap().sequence, 11);
        assert_eq!(log.last().unwrap().sequence, total);
    }

    #[tokio::test]
    async fn test_concurrent_dispatches_all_apply() {
        let store = Arc::new(MealPlanStore::new(storage()));
        let mut handles = Vec::new();

        for day in Day::ALL {
            for meal in MealType::ALL {
                let store = store.clone();
                handles.push(tokio::spawn(async move {
                    store
                        .dispatch(MealPlanAction::AddRecipe {
                            day,
                            meal_type: meal,
                            recipe: builtin_recipe(meal),
                        })
                        .await
                }));
            }
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.snapshot().await.week_menu.filled_cells(), 28);
        assert_eq!(store.mutation_log().await.len(), 28);
        assert_eq!(store.storage().load_week_menu().await.filled_cells(), 28);
    }
}
