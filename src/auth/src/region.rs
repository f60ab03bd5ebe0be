// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Resolves service endpoints from the session catalog.
//!
//! Regions may be hierarchical, with dot-separated zone prefixes such as
//! `zone1.RegionOne`. A configured region that does not appear verbatim in
//! the catalog is broadened by removing its leading segments one at a time,
//! until a region in the catalog matches.

use crate::session::RegionServiceUrls;
use gax::error::EndpointError;
use std::collections::BTreeSet;

/// Finds the endpoint of `service_type` in the region matching `region`.
///
/// The matching region must offer every service in `required`. When it does
/// not, the error lists the missing services and any other regions that
/// offer all of them.
pub(crate) fn resolve<'a>(
    catalog: &'a RegionServiceUrls,
    region: &str,
    required: &BTreeSet<String>,
    service_type: &str,
) -> Result<&'a str, EndpointError> {
    let matched = match_region(catalog, region).ok_or_else(|| EndpointError::InvalidRegion {
        region: region.to_string(),
    })?;
    let services = &catalog[matched];

    let missing = required
        .iter()
        .filter(|s| !services.contains_key(s.as_str()))
        .cloned()
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        let mut suggested = catalog
            .iter()
            .filter(|(name, _)| name.as_str() != matched)
            .filter(|(_, urls)| missing.iter().all(|s| urls.contains_key(s)))
            .map(|(name, _)| name.clone())
            .collect::<Vec<_>>();
        suggested.sort();
        return Err(EndpointError::MissingServices {
            region: region.to_string(),
            required: required.iter().cloned().collect(),
            missing,
            suggested,
        });
    }

    services
        .get(service_type)
        .map(String::as_str)
        .ok_or_else(|| EndpointError::ServiceNotAvailable {
            service_type: service_type.to_string(),
        })
}

/// Returns the catalog key for `region`, broadening it if needed.
fn match_region<'a>(catalog: &RegionServiceUrls, region: &'a str) -> Option<&'a str> {
    if catalog.contains_key(region) {
        return Some(region);
    }
    let mut broadened = region;
    while let Some((_, rest)) = broadened.split_once('.') {
        broadened = rest;
        if catalog.contains_key(broadened) {
            tracing::debug!(region, matched = broadened, "using broadened region");
            return Some(broadened);
        }
    }
    None
}

/// Appends `parts` to `base`, separated by `/`.
///
/// Returns `base` unchanged when there are no parts, including any trailing
/// separator.
///
/// # Example
/// ```
/// # use stratus_auth::region::make_url;
/// assert_eq!(make_url("http://compute/v2", &["servers", "123"]), "http://compute/v2/servers/123");
/// assert_eq!(make_url("http://compute/v2/", &["servers"]), "http://compute/v2/servers");
/// assert_eq!(make_url("http://compute/v2/", &[]), "http://compute/v2/");
/// ```
pub fn make_url(base: &str, parts: &[&str]) -> String {
    if parts.is_empty() {
        return base.to_string();
    }
    let mut url = base.to_string();
    if !url.ends_with('/') {
        url.push('/');
    }
    url.push_str(&parts.join("/"));
    url
}
