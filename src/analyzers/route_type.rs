use std::collections::HashSet;

use crate::analyzers::types::CityRouteType;
use crate::config::PipelineConfig;

/// Tags route numbers as In-City, Out-City or Unknown.
///
/// Matching is exact: `"24 S"` and `"24S"` are different routes. Fix the
/// membership lists in config rather than normalizing here.
#[derive(Debug, Clone, Default)]
pub struct RouteTypeClassifier {
    in_city: HashSet<String>,
    out_city: HashSet<String>,
}

impl RouteTypeClassifier {
    pub fn new<I, O>(in_city: I, out_city: O) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            in_city: in_city.into_iter().map(Into::into).collect(),
            out_city: out_city.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            config.in_city_routes.iter().cloned(),
            config.out_city_routes.iter().cloned(),
        )
    }

    pub fn classify(&self, route_number: &str) -> CityRouteType {
        if self.in_city.contains(route_number) {
            CityRouteType::InCity
        } else if self.out_city.contains(route_number) {
            CityRouteType::OutCity
        } else {
            CityRouteType::Unknown
        }
    }
}
