//! Typed views of the records and payloads exchanged with the control plane

pub mod connection;
pub mod deployment;
pub mod entity;
pub mod instance;
pub mod job;

pub use connection::{Connection, NewConnection, OrgType};
pub use deployment::{
    CheckinOptions, CheckinRequest, CheckoutRequest, DataDeployment, DeploymentRequest,
    DeploymentSource, EventControlOptions, ManageRequest, PlatformInstanceRef, QueryFilter,
    VersioningOptions,
};
pub use entity::EntityKind;
pub use instance::{ManagedInstance, ManagedInstances};
pub use job::{Job, JobOperation, JobStatus, Jobs};
