//! Response envelope helpers. Every success body is a single-key object,
//! e.g. `{"companies": [...]}` or `{"status": "DELETED"}`.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use std::collections::HashMap;

pub type Envelope<T> = (StatusCode, Json<HashMap<&'static str, T>>);

#[derive(Serialize)]
pub struct StatusBody {
    pub status: &'static str,
}

pub fn keyed<T: Serialize>(status: StatusCode, key: &'static str, data: T) -> Envelope<T> {
    (status, Json(HashMap::from([(key, data)])))
}

pub fn ok<T: Serialize>(key: &'static str, data: T) -> Envelope<T> {
    keyed(StatusCode::OK, key, data)
}

pub fn created<T: Serialize>(key: &'static str, data: T) -> Envelope<T> {
    keyed(StatusCode::CREATED, key, data)
}

pub fn status(status: &'static str) -> Json<StatusBody> {
    Json(StatusBody { status })
}

pub fn deleted() -> Json<StatusBody> {
    status("DELETED")
}
