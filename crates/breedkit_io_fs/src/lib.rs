//! `breedkit_io_fs` v1:
//! Category image sampling engine.
//!
//! Modules:
//! - `copy`   : category traversal, selection and copy orchestration
//! - `conf`   : constants, defaults and the config file model
//! - `spec`   : enums/options/errors
//! - `report` : run-time report model
//! - `util`   : shared helper functions

pub mod conf;
pub mod copy;
pub mod report;
pub mod spec;
mod util;

pub use conf::{
    C_DIR_DESTINATION_DEFAULT, C_DIR_SOURCE_DEFAULT, C_EXT_OUTPUT_DEFAULT, ConfigError,
    N_COUNT_PER_CATEGORY_DEFAULT, SpecSampleConfig, TUP_IMAGE_EXTENSIONS,
};
pub use copy::sample_tree;
pub use report::{ReportSample, ReportSampleBuilder};
pub use spec::{
    EnumSampleFailureMode, EnumSampleStaleFileStrategy, SampleTreeError, SpecCategoryOutcome,
    SpecImageSelection, SpecSampleError, SpecSampleOptions,
};
