mod clone_files;
mod execute;
mod fs_utils;
mod layout;
mod locate;
mod meta;
mod planning;
mod walk;

pub use clone_files::copy_untracked_files;
pub use execute::{execute_plan, link_package, unlink_package};
pub use fs_utils::{remove_dir_all_if_exists, remove_file_if_exists};
pub use layout::{PrefixLayout, META_DIR};
pub use locate::{find_prefix, owning_packages};
pub use meta::{linked, read_meta, remove_meta, write_meta, LinkedMeta};
pub use planning::{ensure_linked_plan, plan_explicit, PlannedInstall};
pub use walk::{installed_files, untracked, walk_prefix, WalkIgnore};
