//! Account endpoints.

use reqwest::Method;
use tracing::instrument;
use zendor_core::UserProfile;

use crate::conversions::convert_profile;
use crate::types::{Envelope, ProfileRecord};
use crate::{BackendClient, BackendError, BearerToken};

impl BackendClient {
    /// The profile of the user owning `token`, normalised.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unauthorized`] when the token is rejected,
    /// [`BackendError::Unsuccessful`] when the envelope carries no user, or
    /// any transport or API error.
    #[instrument(skip(self, token))]
    pub async fn get_user_profile(&self, token: &BearerToken) -> Result<UserProfile, BackendError> {
        let envelope: Envelope<ProfileRecord> = self
            .request(Method::GET, "/user/getUserProfile", Some(token))
            .await?;

        let record = envelope.data.ok_or_else(|| {
            BackendError::Unsuccessful(
                envelope
                    .message
                    .unwrap_or_else(|| "profile response had no data".to_string()),
            )
        })?;

        Ok(convert_profile(record))
    }
}
