//! Fetch Meta Ad Library search results through RapidAPI and export them as
//! a spreadsheet.
//!
//! The pipeline runs in one direction: a [`SearchRequest`] is paginated by
//! [`AdLibraryClient::fetch_ads`], each raw ad is mapped to a
//! [`FlatAdRecord`] by [`flatten_ads`], and the rows are serialized by
//! [`ExportArtifact::build`].

pub mod client;
pub mod credentials;
pub mod error;
pub mod export;
pub mod flatten;
pub mod request;

pub use client::{
    API_HOST, AdLibraryClient, FetchOutcome, PageProgress, RawAd, RawAdPage, SEARCH_ENDPOINT, StopReason,
    parse_ads_page,
};
pub use credentials::{API_KEY_ENV_VAR, CredentialProvider, EnvCredentials, StaticCredentials};
pub use error::{DecodeError, ExportError, FetchError};
pub use export::{
    ExportArtifact, ExportFormat, SHEET_NAME, XLSX_FILE_NAME, XLSX_MIME, write_records_to_csv, write_records_to_xlsx,
};
pub use flatten::{FlatAdRecord, decode_timestamp, flatten_ad_in, flatten_ads, flatten_ads_in};
pub use request::SearchRequest;
