//! Command implementations for ccm-cli

pub mod init;
pub mod ls;
pub mod project;
pub mod registry;
pub mod rules;
pub mod snapshot;
pub mod sync;

pub use init::run_init;
pub use ls::run_ls;
pub use project::{
    run_project_create, run_project_delete, run_project_link, run_project_list,
    run_project_unlink,
};
pub use registry::{run_cli_add, run_cli_list, run_cli_remove};
pub use rules::{run_rules_set_cli, run_rules_set_global, run_rules_show};
pub use snapshot::{run_backup, run_delete_snapshot, run_restore, run_snapshots};
pub use sync::{run_apply, run_import};

use colored::Colorize;

/// Print non-fatal warnings collected by an operation.
pub(crate) fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }
}
