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

/// Problems resolving a service endpoint from the session catalog.
///
/// The session catalog maps each region to the endpoints of the services it
/// offers. Resolving an endpoint can fail because there is no session yet,
/// because the configured region is unknown, because the region lacks some
/// of the required services, or because it lacks the requested service.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum EndpointError {
    /// There is no session to resolve endpoints from.
    #[error("cannot get endpoint URL without being authenticated")]
    NotAuthenticated,

    /// The configured region matches no region in the catalog, not even after
    /// removing its zone prefixes.
    #[error("invalid region {region:?}")]
    InvalidRegion {
        /// The region in the credentials.
        region: String,
    },

    /// The configured region lacks one or more of the required services.
    #[error("{}", missing_services(.region, .required, .missing, .suggested))]
    MissingServices {
        /// The region in the credentials.
        region: String,
        /// All the service types required by the application, sorted.
        required: Vec<String>,
        /// The required service types missing in `region`, sorted.
        missing: Vec<String>,
        /// Other regions offering all the missing services, sorted.
        suggested: Vec<String>,
    },

    /// The region offers all the required services, but not the one requested.
    #[error("no endpoints known for service type: {service_type}")]
    ServiceNotAvailable {
        /// The requested service type.
        service_type: String,
    },
}

fn missing_services(
    region: &str,
    required: &[String],
    missing: &[String],
    suggested: &[String],
) -> String {
    let mut message = format!(
        "the configured region {region:?} does not allow access to all required services, namely: {}\naccess to these services is missing: {}",
        required.join(", "),
        missing.join(", ")
    );
    if !suggested.is_empty() {
        message.push_str(&format!(
            "\none of these regions may be suitable instead: {}",
            suggested.join(", ")
        ));
    }
    message
}
