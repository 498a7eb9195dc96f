use api_types::category::{Category, CategoryFilters, CategoryNew, CategoryPatch};

use crate::resource::{Resource, ResourceClient};

pub struct Categories;

impl Resource for Categories {
    const PATH: &'static str = "categories";

    type Record = Category;
    type New = CategoryNew;
    type Patch = CategoryPatch;
    type Filters = CategoryFilters;

    fn validate_new(new: &CategoryNew) -> Result<(), String> {
        if new.name.trim().is_empty() {
            return Err("category name must not be empty".to_string());
        }
        Ok(())
    }
}

pub type CategoriesClient<'a> = ResourceClient<'a, Categories>;
