use std::collections::HashMap;

use qdrant_client::qdrant::{ScoredPoint, Value, value::Kind};
use serde_json::{Map, Number, Value as JsonValue};

use finrag_domain::Hit;

pub const TEXT_PAYLOAD_KEY: &str = "text";

/// Converts scored points from a cosine collection into hits. Qdrant reports cosine
/// similarity, so the distance is `1 - score`.
pub fn hits_from_points(collection: &str, points: Vec<ScoredPoint>) -> Vec<Hit> {
	let mut hits = Vec::with_capacity(points.len());

	for point in points {
		let distance = 1.0 - f64::from(point.score);

		if !distance.is_finite() {
			tracing::warn!(collection, score = point.score, "Dropping point with non-finite score.");

			continue;
		}

		let Some((text, metadata)) = split_payload(point.payload) else {
			tracing::warn!(collection, "Dropping point without a text payload.");

			continue;
		};

		hits.push(Hit { text, metadata, distance });
	}

	hits
}

fn split_payload(payload: HashMap<String, Value>) -> Option<(String, Map<String, JsonValue>)> {
	let mut text = None;
	let mut metadata = Map::new();

	for (key, value) in payload {
		if key == TEXT_PAYLOAD_KEY {
			if let Some(Kind::StringValue(raw)) = value.kind {
				text = Some(raw);
			}

			continue;
		}

		metadata.insert(key, to_json(&value));
	}

	text.map(|text| (text, metadata))
}

pub fn to_json(value: &Value) -> JsonValue {
	match &value.kind {
		None | Some(Kind::NullValue(_)) => JsonValue::Null,
		Some(Kind::BoolValue(flag)) => JsonValue::Bool(*flag),
		Some(Kind::IntegerValue(number)) => JsonValue::from(*number),
		Some(Kind::DoubleValue(number)) =>
			Number::from_f64(*number).map(JsonValue::Number).unwrap_or(JsonValue::Null),
		Some(Kind::StringValue(text)) => JsonValue::String(text.clone()),
		Some(Kind::ListValue(list)) => JsonValue::Array(list.values.iter().map(to_json).collect()),
		Some(Kind::StructValue(object)) => JsonValue::Object(
			object.fields.iter().map(|(key, value)| (key.clone(), to_json(value))).collect(),
		),
	}
}
