use crate::chart::{all_series, format_last_seen};
use crate::errors::Error;
use crate::metrics::{
    DEVICES_REJECTED_TOTAL, DEVICES_SUBMITTED_TOTAL, DEVICE_NOT_FOUND_TOTAL,
    READINGS_GENERATED_TOTAL, REQUESTS_TOTAL, SYNTHESIS_SECONDS,
};
use crate::model::{Device, DeviceEntry, DeviceListResponse, NewDevice, ReadingsResponse};
use crate::registry::Registry;
use crate::validate::{device_from_submission, validate_new_device};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use simulator::SensorReading;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub default_readings: usize,
    pub max_readings: usize,
}

#[derive(Debug, Deserialize)]
pub struct ReadingsQuery {
    count: Option<usize>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/devices", get(list_devices).post(create_device))
        .route("/api/v1/devices/:id", get(get_device))
        .route("/api/v1/devices/:id/readings", get(get_readings))
        .route("/api/v1/devices/:id/latest", get(get_latest))
        .with_state(state)
}

async fn list_devices(State(state): State<AppState>) -> Json<DeviceListResponse> {
    REQUESTS_TOTAL.inc();
    let now = Utc::now();

    let data = state
        .registry
        .list()
        .iter()
        .map(|device| DeviceEntry {
            last_seen_label: format_last_seen(device.last_seen, now),
            device: device.clone(),
        })
        .collect();

    Json(DeviceListResponse {
        data,
        summary: state.registry.summary(),
    })
}

async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Device>, AppError> {
    REQUESTS_TOTAL.inc();
    Ok(Json(lookup(&state, &id)?.clone()))
}

async fn get_readings(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ReadingsQuery>,
) -> Result<Json<ReadingsResponse>, AppError> {
    REQUESTS_TOTAL.inc();
    let device = lookup(&state, &id)?.clone();

    let count = params
        .count
        .unwrap_or(state.default_readings)
        .min(state.max_readings);

    let timer = SYNTHESIS_SECONDS.start_timer();
    let readings = simulator::generate(&device.id, count)?;
    timer.observe_duration();
    READINGS_GENERATED_TOTAL.inc_by(readings.len() as f64);

    debug!("Serving {} readings for {}", readings.len(), device.id);

    Ok(Json(ReadingsResponse {
        charts: all_series(&readings),
        latest: readings.last().cloned(),
        device,
        data: readings,
    }))
}

async fn get_latest(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SensorReading>, AppError> {
    REQUESTS_TOTAL.inc();
    let device = lookup(&state, &id)?;

    let reading = simulator::latest_reading(&device.id)
        .ok_or_else(|| Error::NotFound(format!("no reading for {}", device.id)))?;
    READINGS_GENERATED_TOTAL.inc();

    Ok(Json(reading))
}

async fn create_device(
    Json(submission): Json<NewDevice>,
) -> Result<(StatusCode, Json<Device>), AppError> {
    REQUESTS_TOTAL.inc();

    if let Err(e) = validate_new_device(&submission) {
        DEVICES_REJECTED_TOTAL.inc();
        warn!("Rejected device submission: {}", e);
        return Err(e.into());
    }

    let device = device_from_submission(submission, Utc::now());
    DEVICES_SUBMITTED_TOTAL.inc();
    info!(
        "New device submitted: {} ({}, {}), not persisted",
        device.name, device.kind, device.location
    );

    Ok((StatusCode::CREATED, Json(device)))
}

fn lookup<'a>(state: &'a AppState, id: &str) -> Result<&'a Device, Error> {
    state.registry.get_by_id(id).ok_or_else(|| {
        DEVICE_NOT_FOUND_TOTAL.inc();
        Error::NotFound(id.to_string())
    })
}

#[derive(Debug)]
pub struct AppError(Error);

impl AppError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Synth(simulator::Error::InvalidArgument(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("API error: {}", self.0);
        } else {
            debug!("API client error: {}", self.0);
        }
        (
            status,
            Json(serde_json::json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<simulator::Error> for AppError {
    fn from(err: simulator::Error) -> Self {
        Self(Error::Synth(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Channel;
    use crate::model::DeviceStatus;
    use crate::registry::fixture_devices;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState {
            registry: Arc::new(Registry::new(fixture_devices(Utc::now())).unwrap()),
            default_readings: 48,
            max_readings: 100,
        }
    }

    fn status_of<T>(result: Result<T, AppError>) -> StatusCode {
        match result {
            Ok(_) => StatusCode::OK,
            Err(e) => e.into_response().status(),
        }
    }

    #[tokio::test]
    async fn test_list_devices() {
        let Json(response) = list_devices(State(state())).await;

        assert_eq!(response.data.len(), 4);
        assert_eq!(response.data[0].device.id, "device-001");
        assert_eq!(response.data[0].last_seen_label, "just now");
        assert_eq!(response.data[3].last_seen_label, "2h ago");
        assert_eq!(response.summary.online, 2);
    }

    #[tokio::test]
    async fn test_get_device() {
        let Json(device) = get_device(State(state()), Path("device-003".to_string()))
            .await
            .unwrap();
        assert_eq!(device.status, DeviceStatus::Warning);
    }

    #[tokio::test]
    async fn test_get_device_not_found() {
        let result = get_device(State(state()), Path("does-not-exist".to_string())).await;
        assert_eq!(status_of(result), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_readings_default_count() {
        let Json(response) = get_readings(
            State(state()),
            Path("device-001".to_string()),
            Query(ReadingsQuery { count: None }),
        )
        .await
        .unwrap();

        assert_eq!(response.data.len(), 48);
        assert_eq!(response.latest.as_ref(), response.data.last());
        assert_eq!(response.charts.len(), 3);
        assert_eq!(response.charts[0].channel, Channel::Temperature);
        assert!(response.charts.iter().all(|c| c.points.len() == 48));
    }

    #[tokio::test]
    async fn test_readings_count_clamped() {
        let Json(response) = get_readings(
            State(state()),
            Path("device-002".to_string()),
            Query(ReadingsQuery { count: Some(5000) }),
        )
        .await
        .unwrap();
        assert_eq!(response.data.len(), 100);
    }

    #[tokio::test]
    async fn test_readings_zero_count() {
        let result = get_readings(
            State(state()),
            Path("device-001".to_string()),
            Query(ReadingsQuery { count: Some(0) }),
        )
        .await;
        assert_eq!(status_of(result), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_readings_unknown_device() {
        let result = get_readings(
            State(state()),
            Path("device-999".to_string()),
            Query(ReadingsQuery { count: Some(4) }),
        )
        .await;
        assert_eq!(status_of(result), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_latest() {
        let Json(reading) = get_latest(State(state()), Path("device-004".to_string()))
            .await
            .unwrap();
        assert_eq!(reading.id, "reading-device-004-0");
        assert!(reading.timestamp < Utc::now());
    }

    #[tokio::test]
    async fn test_create_device() {
        let submission = NewDevice {
            name: "Cold Storage".to_string(),
            kind: "SHT31".to_string(),
            location: "Basement".to_string(),
            status: DeviceStatus::Offline,
        };

        let (status, Json(device)) = create_device(Json(submission)).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(device.kind, "SHT31");
        assert_eq!(device.status, DeviceStatus::Offline);
    }

    #[tokio::test]
    async fn test_create_device_invalid() {
        let submission = NewDevice {
            name: "".to_string(),
            kind: "SHT31".to_string(),
            location: "Basement".to_string(),
            status: DeviceStatus::Online,
        };

        let result = create_device(Json(submission)).await;
        assert_eq!(status_of(result), StatusCode::UNPROCESSABLE_ENTITY);
    }

    async fn request_json(method: Method, uri: &str, body: Body) -> (StatusCode, serde_json::Value) {
        let response = create_router(state())
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        request_json(Method::GET, uri, Body::empty()).await
    }

    #[tokio::test]
    async fn test_router_serves_every_route() {
        let (status, json) = get_json("/api/v1/devices").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().unwrap().len(), 4);
        assert_eq!(json["data"][0]["type"], "Environmental Sensor");
        assert_eq!(json["summary"]["availability"], 50);

        let (status, json) = get_json("/api/v1/devices/device-002").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "online");

        let (status, json) = get_json("/api/v1/devices/device-001/readings?count=4").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().unwrap().len(), 4);
        assert_eq!(json["charts"].as_array().unwrap().len(), 3);
        assert_eq!(json["charts"][1]["unit"], "hPa");

        let (status, json) = get_json("/api/v1/devices/device-003/latest").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["id"], "reading-device-003-0");
    }

    #[tokio::test]
    async fn test_router_error_statuses() {
        let (status, json) = get_json("/api/v1/devices/does-not-exist").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].is_string());

        let (status, _) = get_json("/api/v1/devices/does-not-exist/readings").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get_json("/api/v1/devices/device-001/readings?count=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // Rejected by the query extractor before reaching the handler
        let (status, _) = get_json("/api/v1/devices/device-001/readings?count=-1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_router_create_device() {
        let body = r#"{"name": "Server Room", "type": "BMP180", "location": "Floor 2"}"#;
        let (status, json) = request_json(Method::POST, "/api/v1/devices", Body::from(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["type"], "BMP180");
        assert_eq!(json["status"], "online");

        let body = r#"{"name": "Server Room", "type": "LM35", "location": "Floor 2"}"#;
        let (status, _) = request_json(Method::POST, "/api/v1/devices", Body::from(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
