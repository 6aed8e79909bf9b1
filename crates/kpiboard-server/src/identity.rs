//! Identity provider backed by a Microsoft Graph style `/me` endpoint.
//!
//! The bearer token is forwarded verbatim; the JSON profile in the response
//! is mapped onto a [`UserProfile`].

use std::time::Duration;

use kpiboard_core::{
  Error, Result,
  identity::{ExternalIdentity, IdentityProvider},
  user::UserProfile,
};
use reqwest::Client;
use serde::Deserialize;

/// Resolves bearer tokens by calling the configured userinfo endpoint.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GraphIdentityProvider {
  client:       Client,
  userinfo_url: String,
}

impl GraphIdentityProvider {
  pub fn new(userinfo_url: impl Into<String>, timeout: Duration) -> Result<Self> {
    let client = Client::builder()
      .timeout(timeout)
      .build()
      .map_err(|e| Error::UpstreamAuth(format!("failed to build HTTP client: {e}")))?;
    Ok(Self { client, userinfo_url: userinfo_url.into() })
  }
}

/// The subset of the Graph user resource that kpiboard keeps.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphProfile {
  id:                  String,
  display_name:        Option<String>,
  mail:                Option<String>,
  user_principal_name: Option<String>,
  given_name:          Option<String>,
  surname:             Option<String>,
  job_title:           Option<String>,
  #[serde(default)]
  business_phones:     Vec<String>,
  mobile_phone:        Option<String>,
  office_location:     Option<String>,
}

impl GraphProfile {
  fn into_identity(self) -> ExternalIdentity {
    let name = self
      .display_name
      .clone()
      .or_else(|| self.mail.clone())
      .or_else(|| self.user_principal_name.clone())
      .unwrap_or_else(|| self.id.clone());
    ExternalIdentity {
      external_id: self.id,
      profile:     UserProfile {
        name,
        email: self.mail,
        description: None,
        given_name: self.given_name,
        surname: self.surname,
        job_title: self.job_title,
        business_phone: self.business_phones.into_iter().next(),
        mobile_phone: self.mobile_phone,
        office_location: self.office_location,
      },
    }
  }
}

impl IdentityProvider for GraphIdentityProvider {
  async fn resolve<'a>(&'a self, token: &'a str) -> Result<ExternalIdentity> {
    let resp = self
      .client
      .get(&self.userinfo_url)
      .bearer_auth(token)
      .send()
      .await
      .map_err(|e| Error::UpstreamAuth(format!("identity provider unreachable: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
      return Err(Error::UpstreamAuth(format!(
        "identity provider rejected token: {status}"
      )));
    }

    let profile: GraphProfile = resp
      .json()
      .await
      .map_err(|e| Error::UpstreamAuth(format!("unreadable identity profile: {e}")))?;
    Ok(profile.into_identity())
  }
}
