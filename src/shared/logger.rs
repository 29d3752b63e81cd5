//! Re-export of the runtime logger controls so integration code can reach
//! them as `cohort_analytics::shared::logger`.

pub use ::logger::{
    disable_debug, disable_verbose, enable_debug, enable_verbose, init_file_logging,
    is_debug_enabled, is_verbose_enabled, level, set_level, set_level_from_str, Level,
};
