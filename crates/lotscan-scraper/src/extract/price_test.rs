use super::*;
use crate::extract::rules::PageView;

fn prices(body: &str) -> Prices {
    let page = ParsedPage::parse(
        "https://dealer.example/inventory/2024-camry-le",
        &format!("<html><body>{body}</body></html>"),
    );
    extract_prices(&PageView::new(&page))
}

#[test]
fn msrp_and_our_price_in_separate_blocks_are_not_swapped() {
    let found = prices(
        r#"<div class="msrp"><p>MSRP: $45,000</p></div>
           <div class="sale"><p>Our Price: $39,999</p></div>"#,
    );
    assert_eq!(found.price, "39999");
    assert_eq!(found.msrp, "45000");
    assert!(found.all_in.is_empty());
}

#[test]
fn selling_label_before_msrp_in_one_block() {
    let found = prices("<p>Our Price: $39,999 MSRP: $45,000</p>");
    assert_eq!(found.price, "39999");
    assert_eq!(found.msrp, "45000");
}

#[test]
fn labeled_selling_price_beats_earlier_unlabeled_amount() {
    let found = prices(
        r#"<p>$37,500</p>
           <section><p>This is a long marketing paragraph that pushes the next price into a separate block because it goes on well past the two hundred character limit used for price blocks on a detail page.</p>
           <p>Sale Price: $36,250</p></section>"#,
    );
    assert_eq!(found.price, "36250");
}

#[test]
fn first_unlabeled_amount_is_the_fallback_price() {
    let found = prices("<p>Price: $28,500</p><p>MSRP $31,000</p>");
    assert_eq!(found.price, "28500");
    assert_eq!(found.msrp, "31000");
}

#[test]
fn savings_payments_and_small_amounts_are_ignored() {
    let found = prices(
        "<p>Save $3,000 today</p><p>$199 bi-weekly</p><p>$450 doc fee</p><p>$32,995</p>",
    );
    assert_eq!(found.price, "32995");
    assert!(found.msrp.is_empty());
}

#[test]
fn definition_list_label_comes_from_previous_sibling() {
    let found = prices(
        "<dl><dt>All-in Price</dt><dd>$41,250</dd><dt>Manufacturer Suggested</dt><dd>$43,100</dd></dl>",
    );
    assert_eq!(found.all_in, "41250");
    assert_eq!(found.msrp, "43100");
    assert!(found.price.is_empty());
}

#[test]
fn trailing_label_is_used_when_nothing_precedes_the_amount() {
    let found = prices("<p>$45,000 MSRP</p><p>$42,000</p>");
    assert_eq!(found.msrp, "45000");
    assert_eq!(found.price, "42000");
}

#[test]
fn trailing_labels_belong_to_the_amount_before_them() {
    let found = prices("<p>$45,000 MSRP $39,999 Sale Price</p>");
    assert_eq!(found.price, "39999");
    assert_eq!(found.msrp, "45000");
}

#[test]
fn cents_are_dropped() {
    let found = prices("<p>Internet Price $39,999.99</p>");
    assert_eq!(found.price, "39999");
}

#[test]
fn data_attributes_fill_fields_text_left_empty() {
    let found = prices(r#"<div data-price="39999.00" data-msrp="45000"></div>"#);
    assert_eq!(found.price, "39999");
    assert_eq!(found.msrp, "45000");
}

#[test]
fn classify_block_marks_each_amount_by_its_own_window() {
    let kinds = classify_block("MSRP $45,000 Total $47,100 Our Price $39,999", "");
    assert_eq!(
        kinds,
        vec![
            (PriceKind::Msrp, "45000".to_owned()),
            (PriceKind::AllIn, "47100".to_owned()),
            (PriceKind::Selling, "39999".to_owned()),
        ]
    );
}

#[test]
fn consumed_trailing_label_leaves_next_amount_unlabeled() {
    let kinds = classify_block("$45,000 MSRP $41,250", "");
    assert_eq!(
        kinds,
        vec![
            (PriceKind::Msrp, "45000".to_owned()),
            (PriceKind::Unlabeled, "41250".to_owned()),
        ]
    );
}
