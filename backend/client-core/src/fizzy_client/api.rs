use super::{ApiResponse, FizzyClient};
use crate::error::FizzyError;

use std::future::Future;
use std::path::Path;

use serde_json::Value;

/// Operations the command layer needs from the API.
///
/// Command handlers take any `Api`, so tests can hand them a recording mock
/// instead of a live client.
pub trait Api {
    fn get(&self, path: &str) -> impl Future<Output = Result<ApiResponse, FizzyError>> + Send;

    fn post(
        &self,
        path: &str,
        body: Option<&Value>,
    ) -> impl Future<Output = Result<ApiResponse, FizzyError>> + Send;

    fn patch(
        &self,
        path: &str,
        body: Option<&Value>,
    ) -> impl Future<Output = Result<ApiResponse, FizzyError>> + Send;

    fn put(
        &self,
        path: &str,
        body: Option<&Value>,
    ) -> impl Future<Output = Result<ApiResponse, FizzyError>> + Send;

    fn delete(&self, path: &str) -> impl Future<Output = Result<ApiResponse, FizzyError>> + Send;

    fn get_with_pagination(
        &self,
        path: &str,
        fetch_all: bool,
    ) -> impl Future<Output = Result<ApiResponse, FizzyError>> + Send;

    fn follow_location(
        &self,
        location: &str,
    ) -> impl Future<Output = Result<Option<ApiResponse>, FizzyError>> + Send;

    fn upload_file(
        &self,
        file_path: &Path,
    ) -> impl Future<Output = Result<ApiResponse, FizzyError>> + Send;

    fn download_file(
        &self,
        url: &str,
        destination: &Path,
    ) -> impl Future<Output = Result<(), FizzyError>> + Send;
}

impl Api for FizzyClient {
    fn get(&self, path: &str) -> impl Future<Output = Result<ApiResponse, FizzyError>> + Send {
        FizzyClient::get(self, path)
    }

    fn post(
        &self,
        path: &str,
        body: Option<&Value>,
    ) -> impl Future<Output = Result<ApiResponse, FizzyError>> + Send {
        FizzyClient::post(self, path, body)
    }

    fn patch(
        &self,
        path: &str,
        body: Option<&Value>,
    ) -> impl Future<Output = Result<ApiResponse, FizzyError>> + Send {
        FizzyClient::patch(self, path, body)
    }

    fn put(
        &self,
        path: &str,
        body: Option<&Value>,
    ) -> impl Future<Output = Result<ApiResponse, FizzyError>> + Send {
        FizzyClient::put(self, path, body)
    }

    fn delete(&self, path: &str) -> impl Future<Output = Result<ApiResponse, FizzyError>> + Send {
        FizzyClient::delete(self, path)
    }

    fn get_with_pagination(
        &self,
        path: &str,
        fetch_all: bool,
    ) -> impl Future<Output = Result<ApiResponse, FizzyError>> + Send {
        FizzyClient::get_with_pagination(self, path, fetch_all)
    }

    fn follow_location(
        &self,
        location: &str,
    ) -> impl Future<Output = Result<Option<ApiResponse>, FizzyError>> + Send {
        FizzyClient::follow_location(self, location)
    }

    fn upload_file(
        &self,
        file_path: &Path,
    ) -> impl Future<Output = Result<ApiResponse, FizzyError>> + Send {
        FizzyClient::upload_file(self, file_path)
    }

    fn download_file(
        &self,
        url: &str,
        destination: &Path,
    ) -> impl Future<Output = Result<(), FizzyError>> + Send {
        FizzyClient::download_file(self, url, destination)
    }
}
