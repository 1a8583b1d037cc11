//! Translation between JSON-LD route documents and domain objects.
//!
//! Plain field-copy mapping. Reads are best-effort: unknown keys are
//! ignored and malformed elements skipped, since every write replaces the
//! document with a well-formed one.

use serde_json::{json, Value};
use waymark_core::error::{WaymarkError, WaymarkResult};
use waymark_core::{CommentRef, MediaRef, Route, TrackPoint};

use crate::client::pod_root;
use crate::PodStore;

// ---------------------------------------------------------------------------
// Document <-> Route
// ---------------------------------------------------------------------------

/// Maps a route JSON-LD document to a [`Route`].
///
/// Missing fields default to empty; elements with the wrong shape are
/// skipped. Only a non-object payload is an error.
pub fn route_from_document(doc: &Value) -> WaymarkResult<Route> {
    let obj = doc
        .as_object()
        .ok_or_else(|| WaymarkError::Document("route document is not a JSON object".into()))?;

    let mut route = Route::default();

    if let Some(name) = obj.get("name").and_then(Value::as_str) {
        route.name = name.to_string();
    }
    if let Some(description) = obj.get("description").and_then(Value::as_str) {
        route.description = description.to_string();
    }

    if let Some(points) = obj.get("points").and_then(Value::as_array) {
        for point in points {
            match (coord(point, "latitude"), coord(point, "longitude")) {
                (Some(latitude), Some(longitude)) => route.itinerary.push(TrackPoint {
                    latitude,
                    longitude,
                }),
                _ => continue,
            }
        }
    }

    if let Some(comments) = obj.get("comments").and_then(Value::as_array) {
        route.comments = ids(comments).map(|id| CommentRef { id }).collect();
    }

    if let Some(media) = obj.get("media").and_then(Value::as_array) {
        route.media = ids(media).map(|id| MediaRef { id }).collect();
    }

    Ok(route)
}

/// Maps a [`Route`] to its JSON-LD document form.
pub fn route_to_document(route: &Route) -> Value {
    json!({
        "@context": {
            "@vocab": "https://schema.org/",
            "points": "https://schema.org/itinerary",
        },
        "name": route.name,
        "description": route.description,
        "points": route
            .itinerary
            .iter()
            .map(|p| json!({ "latitude": p.latitude, "longitude": p.longitude }))
            .collect::<Vec<_>>(),
        "comments": route
            .comments
            .iter()
            .map(|c| json!({ "@id": c.id }))
            .collect::<Vec<_>>(),
        "media": route
            .media
            .iter()
            .map(|m| json!({ "@id": m.id }))
            .collect::<Vec<_>>(),
    })
}

/// Extracts the `routes[].@id` references of a shared-routes document.
pub fn shared_route_ids(doc: &Value) -> Vec<String> {
    doc.get("routes")
        .and_then(Value::as_array)
        .map(|routes| ids(routes).collect())
        .unwrap_or_default()
}

/// URL of a friend's shared-routes document, derived from their WebID.
pub fn shared_routes_url(web_id: &str, filename: &str) -> String {
    format!("{}viade/shared/{filename}.jsonld", pod_root(web_id))
}

/// Coordinates may arrive as JSON numbers or as numeric strings.
fn coord(point: &Value, key: &str) -> Option<f64> {
    match point.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn ids(values: &[Value]) -> impl Iterator<Item = String> + '_ {
    values
        .iter()
        .filter_map(|v| v.get("@id").and_then(Value::as_str))
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Store compositions
// ---------------------------------------------------------------------------

/// Fetches and maps one route document.
pub async fn load_route<S: PodStore + ?Sized>(store: &S, url: &str) -> WaymarkResult<Route> {
    let doc = store.get_document(url).await?;
    route_from_document(&doc)
}

/// Persists a route as a JSON-LD document.
pub async fn save_route<S: PodStore + ?Sized>(
    store: &S,
    url: &str,
    route: &Route,
) -> WaymarkResult<()> {
    store.put_document(url, &route_to_document(route)).await
}

/// URLs of every route document owned by `web_id`.
pub async fn load_route_urls<S: PodStore + ?Sized>(
    store: &S,
    web_id: &str,
) -> WaymarkResult<Vec<String>> {
    store.list_routes(web_id).await
}

/// Route references shared by a friend under the given filename.
pub async fn load_shared_route_ids<S: PodStore + ?Sized>(
    store: &S,
    web_id: &str,
    filename: &str,
) -> WaymarkResult<Vec<String>> {
    let url = shared_routes_url(web_id, filename);
    let doc = store.get_document(&url).await?;
    Ok(shared_route_ids(&doc))
}
