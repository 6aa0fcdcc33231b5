use alumnet_common::resources::{CreateLocation, Location, LocationId};
use axum::{http::StatusCode, Extension, Json};
use serde_json::Value;
use tracing::info;

use crate::{
    error::{AppError, Result},
    state::State,
    utils::{new_id, parse_payload, require},
};

pub async fn list_locations(Extension(state): Extension<State>) -> Result<Json<Vec<Location>>> {
    Ok(Json(state.locations.all()?))
}

pub async fn add_location(
    Extension(state): Extension<State>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Location>)> {
    let request: CreateLocation = parse_payload(payload)?;
    let location = new_location(request)?;
    state.locations.insert(&location)?;
    info!("location {} added at {}", location.id.0, location.lat_long_combined);
    Ok((StatusCode::CREATED, Json(location)))
}

fn new_location(request: CreateLocation) -> Result<Location> {
    if !(-90.0..=90.0).contains(&request.latitude) || !(-180.0..=180.0).contains(&request.longitude) {
        return Err(AppError::BadRequest("Invalid location data".to_string()));
    }
    require("address", &request.address)?;
    require("fileNumber", &request.file_number)?;
    require("category", &request.category)?;

    Ok(Location {
        id: LocationId(new_id()),
        latitude: request.latitude,
        longitude: request.longitude,
        lat_long_combined: format!("{},{}", request.latitude, request.longitude),
        address: request.address,
        file_number: request.file_number,
        survey_date: request.survey_date,
        category: request.category,
        survey_type: request.survey_type,
    })
}

#[cfg(test)]
mod tests {
    use alumnet_common::resources::SurveyType;
    use chrono::NaiveDate;

    use super::*;

    fn request(latitude: f64, longitude: f64) -> CreateLocation {
        CreateLocation {
            latitude,
            longitude,
            address: "1 Main St".to_string(),
            file_number: "F-17".to_string(),
            survey_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            category: "Residential".to_string(),
            survey_type: SurveyType::One,
        }
    }

    #[test]
    fn combined_coordinates_are_derived() {
        let location = new_location(request(18.52, 73.85)).unwrap();
        assert_eq!(location.lat_long_combined, "18.52,73.85");
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        assert!(matches!(new_location(request(91.0, 0.0)), Err(AppError::BadRequest(_))));
        assert!(matches!(new_location(request(0.0, -180.5)), Err(AppError::BadRequest(_))));
    }
}
