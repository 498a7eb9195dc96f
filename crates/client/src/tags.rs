use api_types::tag::{Tag, TagFilters, TagNew, TagPatch};

use crate::resource::{Resource, ResourceClient};

pub struct Tags;

impl Resource for Tags {
    const PATH: &'static str = "tags";

    type Record = Tag;
    type New = TagNew;
    type Patch = TagPatch;
    type Filters = TagFilters;
}

pub type TagsClient<'a> = ResourceClient<'a, Tags>;
