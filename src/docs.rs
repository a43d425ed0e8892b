use utoipa::OpenApi;
use crate::{devices, handlers, models};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_dashboard,
        handlers::press_device,
        handlers::press_control,
        handlers::listen
    ),
    components(
        schemas(
            models::WsMessage,
            models::DashboardView,
            models::StatusColumn,
            models::ControlView,
            devices::DeviceView,
            devices::DeviceId
        )
    ),
    info(title = "Smart Room Automation")
)]
pub struct ApiDoc;
