//! Catalog change broadcast.
//!
//! Views that list modules or resources read [`resources_version`] inside
//! their `use_resource` closure; any component that mutates the catalog calls
//! [`notify_resources_changed`], which bumps the counter and re-runs those
//! resources.

use dioxus::prelude::*;

static RESOURCES_VERSION: GlobalSignal<u64> = Signal::global(|| 0);

/// Subscribe to catalog changes. Call inside a reactive closure.
pub fn resources_version() -> u64 {
    *RESOURCES_VERSION.read()
}

/// Signal that the catalog changed and lists should refetch.
pub fn notify_resources_changed() {
    *RESOURCES_VERSION.write() += 1;
}
