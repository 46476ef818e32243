//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod authentication_service;
mod credential_store;
mod manual_gateway;

#[cfg(test)]
pub use authentication_service::MockAuthenticationService;
pub use authentication_service::{
    AuthenticationError, AuthenticationService, FixtureAuthenticationService,
};
#[cfg(test)]
pub use credential_store::MockCredentialStore;
pub use credential_store::{
    CredentialStore, CredentialStoreError, IDENTITY_KEY, InMemoryCredentialStore, TOKEN_KEY,
};
#[cfg(test)]
pub use manual_gateway::MockManualGateway;
pub use manual_gateway::{
    FixtureManualGateway, ManualGateway, ManualGatewayError, NewEntry, ReportDocument,
    SectionPatch,
};
