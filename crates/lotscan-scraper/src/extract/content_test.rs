use super::*;

fn page(body: &str) -> ParsedPage {
    ParsedPage::parse(
        "https://dealer.example/inventory/used/2019-rav4-xle",
        &format!("<html><body>{body}</body></html>"),
    )
}

const LONG_DESCRIPTION: &str = "One owner, accident free RAV4 XLE with heated seats, \
     power liftgate, and a fresh safety inspection.";

#[test]
fn description_comes_from_description_container() {
    let page = page(&format!(
        r#"<div class="vdp-description"><p>{LONG_DESCRIPTION}</p></div>"#
    ));
    assert_eq!(extract_description(&page).as_deref(), Some(LONG_DESCRIPTION));
}

#[test]
fn description_skips_short_fragments() {
    let page = page(&format!(
        r#"<span class="description-label">Description</span>
           <div id="dealer-comments">{LONG_DESCRIPTION}</div>"#
    ));
    assert_eq!(extract_description(&page).as_deref(), Some(LONG_DESCRIPTION));
}

#[test]
fn description_missing_yields_none() {
    let page = page("<p>No matching containers here.</p>");
    assert!(extract_description(&page).is_none());
}

#[test]
fn options_come_from_feature_lists_only() {
    let page = page(
        r#"<ul class="nav-links"><li>Home</li><li>Service</li></ul>
           <div class="vehicle-features">
             <ul><li>Heated Seats</li><li>Backup Camera</li><li>heated seats</li></ul>
           </div>
           <h3>Installed Options</h3>
           <ol><li>All-Weather Mats</li></ol>"#,
    );
    assert_eq!(
        extract_options(&page).as_deref(),
        Some("Heated Seats; Backup Camera; All-Weather Mats")
    );
}

#[test]
fn options_are_capped() {
    let items: String = (0..80).map(|i| format!("<li>Feature {i}</li>")).collect();
    let page = page(&format!(r#"<ul class="features">{items}</ul>"#));
    let options = extract_options(&page).unwrap();
    assert_eq!(options.split("; ").count(), MAX_OPTIONS);
    assert!(options.starts_with("Feature 0; Feature 1"));
}

#[test]
fn overlong_option_items_are_dropped() {
    let long_item = "x".repeat(MAX_OPTION_LEN + 1);
    let page = page(&format!(
        r#"<ul class="options"><li>{long_item}</li><li>Sunroof</li></ul>"#
    ));
    assert_eq!(extract_options(&page).as_deref(), Some("Sunroof"));
}

#[test]
fn certified_flag_ignores_menus() {
    let menu_only = page("<nav><a>Certified Pre-Owned</a></nav><p>2024 Camry</p>");
    assert!(extract_certified(&menu_only).is_none());

    let certified = page("<p>Toyota Certified Pre-Owned with 160-point inspection</p>");
    assert_eq!(extract_certified(&certified).as_deref(), Some("yes"));

    let cpo = page("<span>CPO</span>");
    assert_eq!(extract_certified(&cpo).as_deref(), Some("yes"));
}

#[test]
fn image_skips_logos_and_placeholders() {
    let page = page(
        r#"<img src="/assets/dealer-logo.png">
           <div class="gallery">
             <img src="data:image/gif;base64,R0lGOD" data-src="/photos/rav4-1.jpg">
             <img src="/photos/rav4-2.jpg">
           </div>"#,
    );
    assert_eq!(
        extract_image(&page).as_deref(),
        Some("https://dealer.example/photos/rav4-1.jpg")
    );
}

#[test]
fn image_falls_back_to_any_image() {
    let page = page(r#"<img class="brand-logo" src="/a.png"><img src="//cdn.example/v/1.jpg">"#);
    assert_eq!(
        extract_image(&page).as_deref(),
        Some("https://cdn.example/v/1.jpg")
    );
}
