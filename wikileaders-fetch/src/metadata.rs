//! Country and leader listings from the leaders API.

use tracing::{debug, info, instrument, warn};

use wikileaders_core::{Country, LeaderSkeleton};

use crate::client::ApiClient;
use crate::credential::{Credential, CredentialHandle, CredentialManager};
use crate::error::FetchError;
use crate::host::http::HttpResponse;

/// Endpoint listing supported countries.
pub const COUNTRIES_ENDPOINT: &str = "countries";

/// Endpoint listing a country's leaders.
pub const LEADERS_ENDPOINT: &str = "leaders";

/// Reads country and leader metadata.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    api: ApiClient,
    credentials: CredentialManager,
}

impl MetadataClient {
    /// Creates a metadata client.
    pub fn new(api: ApiClient, credentials: CredentialManager) -> Self {
        Self { api, credentials }
    }

    /// Lists the country codes the API supports.
    ///
    /// Codes that are not two letters are dropped with a warning.
    #[instrument(skip(self, credential))]
    pub async fn list_countries(&self, credential: &Credential) -> Result<Vec<Country>, FetchError> {
        let response = self.api.get(COUNTRIES_ENDPOINT, Some(credential), &[]).await?;
        check_status(COUNTRIES_ENDPOINT, &response)?;

        let codes: Vec<String> = serde_json::from_str(&response.body)?;
        let mut countries: Vec<Country> = Vec::with_capacity(codes.len());
        for code in codes {
            match Country::new(&code) {
                Ok(country) if !countries.contains(&country) => countries.push(country),
                Ok(_) => debug!(code, "Duplicate country code"),
                Err(e) => warn!(code, error = %e, "Ignoring country code"),
            }
        }

        info!(count = countries.len(), "Countries listed");
        Ok(countries)
    }

    /// Lists a country's leaders, validating the credential first.
    ///
    /// A 200 whose body is not a leader list yields an empty list. Any other
    /// status is an error, and the caller should leave the country out.
    #[instrument(skip(self, handle), fields(country = %country))]
    pub async fn list_leaders(
        &self,
        country: &Country,
        handle: &CredentialHandle,
    ) -> Result<Vec<LeaderSkeleton>, FetchError> {
        let credential = handle.ensure_fresh(&self.credentials).await?;
        let response = self
            .api
            .get(
                LEADERS_ENDPOINT,
                Some(&credential),
                &[("country", country.code())],
            )
            .await?;
        check_status(LEADERS_ENDPOINT, &response)?;

        let leaders = parse_leaders(&response.body);
        info!(count = leaders.len(), "Leaders listed");
        Ok(leaders)
    }
}

fn check_status(endpoint: &str, response: &HttpResponse) -> Result<(), FetchError> {
    match response.status {
        200 => Ok(()),
        403 => Err(FetchError::Forbidden {
            endpoint: endpoint.to_string(),
        }),
        status => Err(FetchError::UnexpectedStatus {
            endpoint: endpoint.to_string(),
            status,
        }),
    }
}

/// Parses a leaders payload leniently.
///
/// A body that is not a JSON array gives an empty list; array entries
/// without the required fields are skipped.
pub fn parse_leaders(body: &str) -> Vec<LeaderSkeleton> {
    let entries: Vec<serde_json::Value> = match serde_json::from_str(body) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "Malformed leaders payload, treating as empty");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(leader) => Some(leader),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed leader entry");
                None
            }
        })
        .collect()
}
