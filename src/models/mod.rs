//! Timeline domain models.
//!
//! Provides the data types shared by the registry, store, validator, and
//! dispatcher.
//!
//! # Domain Mappings
//!
//! | u-timeline | Staffing | Facilities | Fleet |
//! |------------|----------|------------|-------|
//! | Resource | Employee | Room | Vehicle |
//! | Event | Shift | Booking | Trip |

mod event;
mod ids;
mod resource;

pub use event::{Event, RenderKey};
pub use ids::{EventId, ResourceId};
pub use resource::Resource;
