use utoipa::OpenApi;
use crate::controllers::et0_controller;
use crate::models::et0;
use crate::config;

#[derive(OpenApi)]
#[openapi(
    paths(
        et0_controller::compute_et0,
        et0_controller::compute_epw_day,
        et0_controller::list_sites,
        et0_controller::get_site_et0,
        et0_controller::health
    ),
    components(
        schemas(
            et0::Et0Input,
            et0::Et0Estimate,
            et0::Intermediates,
            et0::Et0Response,
            et0::EpwDayRequest,
            et0::EpwHeader,
            et0::EpwHourlyRecord,
            et0::SiteEstimate,
            et0::HealthStatus,
            config::SiteConfig
        )
    ),
    tags(
        (name = "evapo-calc", description = "FAO-56 Reference Evapotranspiration API")
    )
)]
pub struct ApiDoc;
