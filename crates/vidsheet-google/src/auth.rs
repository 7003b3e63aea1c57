//! Service account credential loading.

use std::path::Path;
use std::sync::Arc;

use gcp_auth::{CustomServiceAccount, TokenProvider};

use crate::error::{GoogleApiError, GoogleResult};

/// Load a service account credential file.
///
/// Absence or invalidity of the file is fatal to the run; the caller is
/// expected to abort.
pub fn load_service_account(path: impl AsRef<Path>) -> GoogleResult<Arc<dyn TokenProvider>> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(GoogleApiError::auth_error(format!(
            "Credentials file not found: {}",
            path.display()
        )));
    }

    let service_account = CustomServiceAccount::from_file(path).map_err(|e| {
        GoogleApiError::auth_error(format!(
            "Failed to load service account from {}: {}",
            path.display(),
            e
        ))
    })?;

    Ok(Arc::new(service_account))
}
