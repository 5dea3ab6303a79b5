// Handler modules for the upgrade backends.
//
// Each handler owns one backend: core version upgrades, and the shared
// plugin/theme automatic-update path. Both recover boundary errors into
// failing outcomes so one item can never abort the batch.

pub mod core_handler;
pub mod package_handler;

pub use core_handler::CoreUpdateHandler;
pub use package_handler::PackageUpdateHandler;
