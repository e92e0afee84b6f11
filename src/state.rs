use std::sync::Arc;

use crate::access::PermissionCheck;
use crate::config::Config;
use crate::gateway::EndpointGateway;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub gateway: Arc<dyn EndpointGateway>,
    pub permissions: Arc<dyn PermissionCheck>,
}
