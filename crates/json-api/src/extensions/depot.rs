//! Depot helper extensions.

use std::any::Any;

use larder_app::domain::users::UserUuid;
use salvo::prelude::{Depot, StatusError};

const USER_UUID_DEPOT_KEY: &str = "user_uuid";

/// Typed access to what middleware leaves in the depot.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Record the authenticated shopper for downstream handlers.
    fn insert_user_uuid(&mut self, user: UserUuid);

    /// The authenticated shopper, or 401 if the auth middleware did not run.
    fn user_uuid_or_401(&self) -> Result<UserUuid, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_user_uuid(&mut self, user: UserUuid) {
        self.insert(USER_UUID_DEPOT_KEY, user);
    }

    fn user_uuid_or_401(&self) -> Result<UserUuid, StatusError> {
        self.get::<UserUuid>(USER_UUID_DEPOT_KEY)
            .copied()
            .map_err(|_ignored| StatusError::unauthorized())
    }
}
