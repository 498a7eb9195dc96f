use api_types::budget::{Budget, BudgetFilters, BudgetNew, BudgetPatch};

use crate::resource::{Resource, ResourceClient};

pub struct Budgets;

impl Resource for Budgets {
    const PATH: &'static str = "budgets";

    type Record = Budget;
    type New = BudgetNew;
    type Patch = BudgetPatch;
    type Filters = BudgetFilters;

    fn validate_new(new: &BudgetNew) -> Result<(), String> {
        new.validate()
    }
}

pub type BudgetsClient<'a> = ResourceClient<'a, Budgets>;
