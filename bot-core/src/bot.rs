//! Bot abstraction for delivering outbound activities.
//!
//! [`Bot`] is transport-agnostic; channels (Telegram, console) implement it.

use crate::error::Result;
use crate::types::{Activity, ResourceResponse};
use async_trait::async_trait;

/// Delivers activities to a channel. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends one activity to its conversation and returns the channel-assigned id.
    async fn send_activity(&self, activity: &Activity) -> Result<ResourceResponse>;

    /// Sends several activities in order; stops at the first failure.
    async fn send_activities(&self, activities: &[Activity]) -> Result<Vec<ResourceResponse>> {
        let mut responses = Vec::with_capacity(activities.len());
        for activity in activities {
            responses.push(self.send_activity(activity).await?);
        }
        Ok(responses)
    }
}
