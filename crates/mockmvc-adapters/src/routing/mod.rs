//! Request routing adapters.

pub mod path;

pub use path::{
    BEST_MATCHING_PATTERN_ATTRIBUTE, PATH_VARIABLES_ATTRIBUTE, PathPattern, PathRouter,
    path_variable, path_variables,
};
