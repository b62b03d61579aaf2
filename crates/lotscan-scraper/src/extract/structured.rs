//! JSON-LD overlay: backfills fields the page heuristics left empty.

use lotscan_core::VehicleRecord;
use reqwest::Url;
use serde_json::Value;

use super::identifiers::normalize_vin;
use crate::client::resolve_url;
use crate::page::ParsedPage;
use crate::text::{clean_text, digits_only};
use crate::title::find_year;

const VEHICLE_TYPES: [&str; 5] = ["Car", "Vehicle", "Motorcycle", "Product", "IndividualProduct"];

/// Every vehicle-typed node across the page's JSON-LD scripts, in order.
/// Handles top-level arrays and `@graph` containers.
pub(crate) fn vehicle_nodes(page: &ParsedPage) -> Vec<Value> {
    let mut nodes = Vec::new();
    for block in page.json_ld_blocks() {
        match serde_json::from_str::<Value>(&block) {
            Ok(value) => collect_vehicle_nodes(value, &mut nodes),
            Err(e) => {
                tracing::debug!(url = page.url(), error = %e, "skipping malformed JSON-LD block");
            }
        }
    }
    nodes
}

fn collect_vehicle_nodes(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_vehicle_nodes(item, out);
            }
        }
        Value::Object(mut map) => {
            if let Some(graph) = map.remove("@graph") {
                collect_vehicle_nodes(graph, out);
            }
            let node = Value::Object(map);
            if is_vehicle(&node) {
                out.push(node);
            }
        }
        _ => {}
    }
}

fn is_vehicle(node: &Value) -> bool {
    match node.get("@type") {
        Some(Value::String(kind)) => VEHICLE_TYPES.contains(&kind.as_str()),
        Some(Value::Array(kinds)) => kinds
            .iter()
            .filter_map(Value::as_str)
            .any(|kind| VEHICLE_TYPES.contains(&kind)),
        _ => false,
    }
}

/// Fills empty fields of `record` from the page's vehicle nodes. Values found
/// by the page heuristics are never replaced. Returns `true` when the title
/// itself came from structured data.
pub(crate) fn overlay_structured_data(page: &ParsedPage, record: &mut VehicleRecord) -> bool {
    let nodes = vehicle_nodes(page);
    if nodes.is_empty() {
        return false;
    }
    let base = Url::parse(page.url()).ok();
    let title_was_empty = record.title.is_empty();

    for node in &nodes {
        fill(&mut record.title, text_field(node, "name"));
        fill(
            &mut record.vin,
            text_field(node, "vehicleIdentificationNumber").and_then(|vin| normalize_vin(&vin)),
        );
        fill(
            &mut record.stock_number,
            text_field(node, "sku").or_else(|| text_field(node, "productID")),
        );
        fill(
            &mut record.brand,
            named_field(node, "brand").or_else(|| named_field(node, "manufacturer")),
        );
        fill(&mut record.model, named_field(node, "model"));
        fill(
            &mut record.year,
            ["vehicleModelDate", "modelDate", "productionDate"]
                .iter()
                .filter_map(|key| text_field(node, key))
                .find_map(|date| find_year(&date).map(str::to_owned)),
        );
        fill(&mut record.trim_or_sub_model, text_field(node, "vehicleConfiguration"));
        fill(&mut record.price, offer_price(node));
        fill(&mut record.body_style, text_field(node, "bodyType"));
        fill(&mut record.color, text_field(node, "color"));
        fill(&mut record.engine, engine_field(node));
        fill(&mut record.mileage, mileage_field(node));
        fill(&mut record.condition, condition_field(node));
        fill(
            &mut record.image_link,
            base.as_ref().and_then(|base| image_field(node, base)),
        );
        fill(&mut record.description, text_field(node, "description"));
    }

    title_was_empty && !record.title.is_empty()
}

fn fill(slot: &mut String, value: Option<String>) {
    if slot.is_empty() {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            *slot = value;
        }
    }
}

/// A string or number property as cleaned text.
fn text_field(node: &Value, key: &str) -> Option<String> {
    scalar_text(node.get(key)?)
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => clean_text(s),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// A property that may be a string or an object with a `name`.
fn named_field(node: &Value, key: &str) -> Option<String> {
    match node.get(key)? {
        Value::Object(_) => text_field(node.get(key)?, "name"),
        other => scalar_text(other),
    }
}

fn offer_price(node: &Value) -> Option<String> {
    let offers = node.get("offers")?;
    let offer = match offers {
        Value::Array(items) => items.first()?,
        other => other,
    };
    let raw = offer
        .get("price")
        .or_else(|| offer.get("priceSpecification").and_then(|spec| spec.get("price")))
        .or_else(|| offer.get("lowPrice"))?;
    let text = scalar_text(raw)?;
    let whole = text.split('.').next().unwrap_or_default();
    let digits = digits_only(whole);
    (!digits.is_empty()).then_some(digits)
}

fn engine_field(node: &Value) -> Option<String> {
    match node.get("vehicleEngine")? {
        Value::Array(engines) => engines.first().and_then(engine_value),
        other => engine_value(other),
    }
}

fn engine_value(engine: &Value) -> Option<String> {
    match engine {
        Value::Object(_) => text_field(engine, "name")
            .or_else(|| text_field(engine, "engineType"))
            .or_else(|| {
                let displacement = engine.get("engineDisplacement")?;
                let amount = text_field(displacement, "value")?;
                let unit = text_field(displacement, "unitCode").unwrap_or_default();
                Some(clean_text(&format!("{amount} {unit}")))
            }),
        other => scalar_text(other),
    }
}

fn mileage_field(node: &Value) -> Option<String> {
    let odometer = node.get("mileageFromOdometer")?;
    let text = match odometer {
        Value::Object(_) => text_field(odometer, "value")?,
        other => scalar_text(other)?,
    };
    let whole = text.split('.').next().unwrap_or_default();
    let digits = digits_only(whole);
    (!digits.is_empty()).then_some(digits)
}

/// `itemCondition` such as `https://schema.org/UsedCondition`.
fn condition_field(node: &Value) -> Option<String> {
    let condition = text_field(node, "itemCondition")?.to_lowercase();
    let name = condition.rsplit('/').next().unwrap_or_default();
    if name.starts_with("new") {
        Some("new".to_owned())
    } else if name.starts_with("used") || name.starts_with("refurbished") {
        Some("used".to_owned())
    } else {
        None
    }
}

fn image_field(node: &Value, base: &Url) -> Option<String> {
    let image = match node.get("image")? {
        Value::Array(images) => images.first()?,
        other => other,
    };
    let src = match image {
        Value::Object(_) => text_field(image, "url").or_else(|| text_field(image, "contentUrl"))?,
        other => scalar_text(other)?,
    };
    resolve_url(base, &src).map(String::from)
}

#[cfg(test)]
#[path = "structured_test.rs"]
mod tests;
