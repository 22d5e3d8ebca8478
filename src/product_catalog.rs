/// Object paths (within the digital-products bucket) for each purchasable
/// download. Unknown product names yield no paths, which verification treats
/// as "nothing to link", not an error.
pub fn download_paths(product_name: &str) -> &'static [&'static str] {
    match product_name {
        "Maple's Storybook" => &["maples-storybook.pdf"],
        "Maple's Training Guide" => &["maples-training-guide.pdf"],
        _ => &[],
    }
}
