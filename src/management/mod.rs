mod credentials;

pub use credentials::CredentialSink;
pub use credentials::CredentialStore;
pub use credentials::parse_credentials_file;
