//! Account endpoints.

use crate::client::{Client, RpcResponse};
use crate::errors::Result;
use crate::http::common::Endpoint;
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// Information about a user's account.
///
/// Fields missing from the response decode to their empty values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountInfo {
    /// The user's unique account ID.
    pub account_id: String,
    pub name: Name,
    pub email: String,
    /// Two-letter country code, if available.
    pub country: String,
    /// IETF language tag of the user's preferred language.
    pub locale: String,
    /// Referral link for inviting friends.
    pub referral_link: String,
    /// Whether the account is paired with a work or personal account.
    pub is_paired: bool,
}

/// Representations of a user's name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Name {
    pub given_name: String,
    pub surname: String,
    /// Locale-dependent name used in greetings.
    pub familiar_name: String,
    /// Name suitable for display in a UI.
    pub display_name: String,
}

/// Facade for `users/*` RPC endpoints, borrowed from a [`Client`].
#[derive(Debug, Clone, Copy)]
pub struct UsersService<'a> {
    client: &'a Client,
}

impl<'a> UsersService<'a> {
    pub(crate) const fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetches information about the authenticated user's account.
    ///
    /// The request has no body.
    ///
    /// # Errors
    ///
    /// Any error from request building or execution; see [`Client::do_rpc`].
    pub async fn get_current_account(&self) -> Result<RpcResponse<AccountInfo>> {
        let request = self.client.new_rpc_request::<()>(
            Method::POST,
            &Endpoint::GetCurrentAccount.path(),
            None,
        )?;
        let response: RpcResponse<AccountInfo> = self.client.do_rpc(request).await?;
        tracing::debug!("Fetched account {}", response.value.account_id);
        Ok(response)
    }
}
