/// Represents the API version to target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    /// The 2-beta RPC API (current)
    V2Beta,
}

impl ApiVersion {
    const fn as_str(self) -> &'static str {
        match self {
            Self::V2Beta => "2-beta",
        }
    }
}

// --- Defaults ---
pub(crate) const DEFAULT_BASE_URL: &str = "https://api.dropbox.com/";
pub(crate) const DEFAULT_CONTENT_URL: &str = "https://api-content.dropbox.com/";
pub(crate) const DEFAULT_USER_AGENT: &str = concat!("dropbox-rs/", env!("CARGO_PKG_VERSION"));

/// Media type sent in `Accept` and `Content-Type` for RPC requests.
pub(crate) const JSON_MEDIA_TYPE: &str = "application/json; charset=utf-8";

/// Header carrying the caller's IETF language tag.
pub(crate) const LOCALE_HEADER: &str = "dropbox-api-user-locale";

/// RPC endpoints modeled by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Information about the authenticated user's account
    GetCurrentAccount,
    /// One page of a folder listing
    ListFolder,
}

impl Endpoint {
    /// Relative path for this endpoint, without a leading slash so it
    /// resolves against the base URL's path.
    pub(crate) fn to_path(self, version: ApiVersion) -> String {
        match self {
            Self::GetCurrentAccount => format!("{}/users/get_current_account", version.as_str()),
            Self::ListFolder => format!("{}/files/list_folder", version.as_str()),
        }
    }

    /// Path for the default API version.
    pub(crate) fn path(self) -> String {
        self.to_path(ApiVersion::V2Beta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_version_as_str() {
        assert_eq!(ApiVersion::V2Beta.as_str(), "2-beta");
    }

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(
            Endpoint::GetCurrentAccount.path(),
            "2-beta/users/get_current_account"
        );
        assert_eq!(Endpoint::ListFolder.path(), "2-beta/files/list_folder");
    }

    #[test]
    fn test_endpoint_paths_are_relative() {
        for endpoint in [Endpoint::GetCurrentAccount, Endpoint::ListFolder] {
            assert!(!endpoint.path().starts_with('/'));
        }
    }

    #[test]
    fn test_default_user_agent_identifies_library() {
        assert!(DEFAULT_USER_AGENT.starts_with("dropbox-rs/"));
        assert!(DEFAULT_USER_AGENT.ends_with(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_default_urls_parse() {
        assert!(url::Url::parse(DEFAULT_BASE_URL).is_ok());
        assert!(url::Url::parse(DEFAULT_CONTENT_URL).is_ok());
    }
}
