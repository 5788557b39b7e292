//! Wire types for the activity type registration API

pub mod activity_type;
pub mod long_running;
pub mod parameters;
pub mod responses;

pub use activity_type::{ActivityType, ActivityTypeProperties};
pub use long_running::{LongRunningOperationResponse, OperationError, OperationStatus};
pub use parameters::{
    ActivityTypeCreateOrUpdateParameters, ActivityTypeCreateOrUpdateWithRawJsonContentParameters,
    ActivityTypeGetParameters, ActivityTypeListParameters,
};
pub use responses::{
    ActivityTypeCreateOrUpdateResponse, ActivityTypeGetResponse, ActivityTypeListResponse,
};
