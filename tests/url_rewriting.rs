use shop_for_good::domain::entities::AffiliateTag;
use shop_for_good::utils::domain_matcher::{SUPPORTED_DOMAINS, is_supported_url};
use shop_for_good::utils::product_id::extract_product_id;
use shop_for_good::utils::url_rewriter::{RewriteResult, retag_in_place, rewrite_url};

fn tag(value: &str) -> AffiliateTag {
    AffiliateTag::new(value).unwrap()
}

#[test]
fn test_every_supported_domain_is_rewritten() {
    for domain in SUPPORTED_DOMAINS {
        let input = format!("https://www.{domain}/Product-Name/dp/B0ABCDEF12/ref=x?psc=1");
        let result = rewrite_url(&input, &tag("gwf-20")).unwrap();

        assert_eq!(
            result,
            RewriteResult::Rewritten(format!("https://www.{domain}/dp/B0ABCDEF12?tag=gwf-20")),
            "domain {domain}"
        );
    }
}

#[test]
fn test_rewrite_is_idempotent_across_tags() {
    let first = rewrite_url(
        "https://amazon.ca/gp/product/B07XYZ1234?tag=old-20",
        &tag("edu-20"),
    )
    .unwrap()
    .into_url();
    let second = rewrite_url(&first, &tag("food-20")).unwrap().into_url();

    assert_eq!(second, "https://amazon.ca/dp/B07XYZ1234?tag=food-20");
    assert_eq!(
        rewrite_url(&second, &tag("food-20")).unwrap().into_url(),
        second
    );
}

#[test]
fn test_extraction_ignores_query_and_lowercase() {
    assert_eq!(
        extract_product_id("https://amazon.com/search?next=/dp/B000123456"),
        None
    );
    assert_eq!(extract_product_id("https://amazon.com/dp/b000123456"), None);
    assert_eq!(
        extract_product_id("https://amazon.com/gp/product/B000123456/ref=x")
            .map(|id| id.to_string()),
        Some("B000123456".to_string())
    );
}

#[test]
fn test_lookalike_hosts_are_not_supported() {
    assert!(is_supported_url("https://smile.amazon.com/dp/B000123456"));
    assert!(!is_supported_url("https://notamazon.com/dp/B000123456"));
    assert!(!is_supported_url("https://amazon.com.evil.io/dp/B000123456"));
    assert!(!is_supported_url("not a url"));
}

#[test]
fn test_retag_keeps_other_parameters() {
    let result = retag_in_place(
        "https://www.amazon.co.uk/dp/0141036141?ref=sr_1_1&keywords=orwell",
        &tag("edu-20"),
    )
    .unwrap();

    assert_eq!(
        result,
        "https://www.amazon.co.uk/dp/0141036141?ref=sr_1_1&keywords=orwell&tag=edu-20"
    );
}
