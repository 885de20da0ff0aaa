
/// A small, well-formed shop page used across the fixture tests
pub(crate) const SHOP_HTML: &str = include_str!("fixtures/shop.html");
