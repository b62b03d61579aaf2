use super::*;

fn page(scripts: &[&str], body: &str) -> ParsedPage {
    let scripts: String = scripts
        .iter()
        .map(|json| format!(r#"<script type="application/ld+json">{json}</script>"#))
        .collect();
    ParsedPage::parse(
        "https://dealer.example/inventory/used/2019-rav4-xle",
        &format!("<html><head>{scripts}</head><body>{body}</body></html>"),
    )
}

const CAR: &str = r#"{
    "@context": "https://schema.org",
    "@type": "Car",
    "name": "2019 Toyota RAV4 XLE AWD",
    "vehicleIdentificationNumber": "2t3p1rfv5kw012345",
    "sku": "U4411",
    "brand": {"@type": "Brand", "name": "Toyota"},
    "model": "RAV4",
    "vehicleModelDate": "2019",
    "vehicleConfiguration": "XLE AWD",
    "bodyType": "SUV",
    "color": "Magnetic Grey",
    "vehicleEngine": {"@type": "EngineSpecification", "name": "2.5L 4-Cylinder"},
    "mileageFromOdometer": {"@type": "QuantitativeValue", "value": 61250, "unitCode": "KMT"},
    "itemCondition": "https://schema.org/UsedCondition",
    "image": ["/photos/rav4-main.jpg", "/photos/rav4-2.jpg"],
    "offers": {"@type": "Offer", "price": "27995.00", "priceCurrency": "CAD"},
    "description": "Clean history, winter tires included."
}"#;

#[test]
fn car_node_fills_empty_record() {
    let page = page(&[CAR], "");
    let mut record = VehicleRecord::for_url(page.url());
    let title_from_json_ld = overlay_structured_data(&page, &mut record);

    assert!(title_from_json_ld);
    assert_eq!(record.title, "2019 Toyota RAV4 XLE AWD");
    assert_eq!(record.vin, "2T3P1RFV5KW012345");
    assert_eq!(record.stock_number, "U4411");
    assert_eq!(record.brand, "Toyota");
    assert_eq!(record.model, "RAV4");
    assert_eq!(record.year, "2019");
    assert_eq!(record.trim_or_sub_model, "XLE AWD");
    assert_eq!(record.body_style, "SUV");
    assert_eq!(record.color, "Magnetic Grey");
    assert_eq!(record.engine, "2.5L 4-Cylinder");
    assert_eq!(record.mileage, "61250");
    assert_eq!(record.condition, "used");
    assert_eq!(record.image_link, "https://dealer.example/photos/rav4-main.jpg");
    assert_eq!(record.price, "27995");
    assert_eq!(record.description, "Clean history, winter tires included.");
}

#[test]
fn heuristic_values_are_never_overridden() {
    let page = page(&[CAR], "");
    let mut record = VehicleRecord {
        title: "2019 Toyota RAV4 XLE".to_owned(),
        price: "26995".to_owned(),
        color: "Silver".to_owned(),
        ..VehicleRecord::for_url(page.url())
    };
    let title_from_json_ld = overlay_structured_data(&page, &mut record);

    assert!(!title_from_json_ld);
    assert_eq!(record.title, "2019 Toyota RAV4 XLE");
    assert_eq!(record.price, "26995");
    assert_eq!(record.color, "Silver");
    assert_eq!(record.stock_number, "U4411");
}

#[test]
fn graph_and_array_containers_are_searched() {
    let graph = r#"{"@graph": [
        {"@type": "WebPage", "name": "Dealer page"},
        {"@type": ["Product", "Car"], "name": "2024 Toyota Tundra", "offers": [{"price": 61000}]}
    ]}"#;
    let array = r#"[{"@type": "Organization", "name": "Dealer"}, {"@type": "Vehicle", "color": "Ice Cap"}]"#;
    let page = page(&[graph, array], "");
    let nodes = vehicle_nodes(&page);
    assert_eq!(nodes.len(), 2);

    let mut record = VehicleRecord::for_url(page.url());
    overlay_structured_data(&page, &mut record);
    assert_eq!(record.title, "2024 Toyota Tundra");
    assert_eq!(record.price, "61000");
    assert_eq!(record.color, "Ice Cap");
}

#[test]
fn malformed_and_unrelated_blocks_are_ignored() {
    let page = page(
        &[r#"{"@type": "Car", "name": "#, r#"{"@type": "BreadcrumbList"}"#],
        "",
    );
    assert!(vehicle_nodes(&page).is_empty());
    let mut record = VehicleRecord::for_url(page.url());
    assert!(!overlay_structured_data(&page, &mut record));
    assert_eq!(record, VehicleRecord::for_url(page.url()));
}

#[test]
fn invalid_vin_and_year_are_not_copied() {
    let node = r#"{"@type": "Car", "vehicleIdentificationNumber": "NOT-A-VIN", "modelDate": "1850"}"#;
    let page = page(&[node], "");
    let mut record = VehicleRecord::for_url(page.url());
    overlay_structured_data(&page, &mut record);
    assert!(record.vin.is_empty());
    assert!(record.year.is_empty());
}

#[test]
fn new_condition_is_recognized() {
    let node = r#"{"@type": "Car", "itemCondition": "NewCondition"}"#;
    let page = page(&[node], "");
    let mut record = VehicleRecord::for_url(page.url());
    overlay_structured_data(&page, &mut record);
    assert_eq!(record.condition, "new");
}
