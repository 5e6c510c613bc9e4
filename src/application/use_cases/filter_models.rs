use std::collections::BTreeSet;

use crate::domain::{AllowList, ModelAvailability, ModelIdentifier};

/// Models that are both available on the server and permitted: `available ∩ permitted`.
pub fn allowed(
    available: &BTreeSet<ModelIdentifier>,
    permitted: &BTreeSet<ModelIdentifier>,
) -> BTreeSet<ModelIdentifier> {
    available.intersection(permitted).cloned().collect()
}

/// Permitted models the server does not have yet: `permitted − available`.
pub fn missing(
    available: &BTreeSet<ModelIdentifier>,
    permitted: &BTreeSet<ModelIdentifier>,
) -> BTreeSet<ModelIdentifier> {
    permitted.difference(available).cloned().collect()
}

pub fn availability(available: &BTreeSet<ModelIdentifier>, allow_list: &AllowList) -> ModelAvailability {
    ModelAvailability {
        allowed: allowed(available, allow_list.permitted()),
        missing: missing(available, allow_list.permitted()),
    }
}
