use api_types::{
    Id, Money,
    savings_goal::{AddAmount, SavingsGoal, SavingsGoalFilters, SavingsGoalNew, SavingsGoalPatch},
};

use crate::{
    error::Result,
    resource::{Resource, ResourceClient},
};

pub struct SavingsGoals;

impl Resource for SavingsGoals {
    const PATH: &'static str = "savings-goals";

    type Record = SavingsGoal;
    type New = SavingsGoalNew;
    type Patch = SavingsGoalPatch;
    type Filters = SavingsGoalFilters;
}

pub type SavingsGoalsClient<'a> = ResourceClient<'a, SavingsGoals>;

impl ResourceClient<'_, SavingsGoals> {
    /// Adds `amount` to the goal's current amount and returns the new state.
    ///
    /// Not idempotent: every call compounds, so callers must not resubmit on
    /// an ambiguous failure.
    pub async fn add_amount(&self, id: Id, amount: Money) -> Result<SavingsGoal> {
        tracing::debug!(goal = id, %amount, "adding to savings goal");
        self.transport()
            .post(
                &format!("/{}/{id}/add_amount/", SavingsGoals::PATH),
                &AddAmount { amount },
            )
            .await
    }
}
