//! Database seed command for local development.

use rust_decimal::Decimal;

use velour_api::db::products::ProductInput;
use velour_api::db::{CategoryRepository, ProductRepository};
use velour_api::models::{ColorVariant, SizeVariant};

use super::{CommandError, connect};

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    category: &'static str,
    image: &'static str,
    sizes: &'static [(&'static str, &'static str)],
    colors: &'static [&'static str],
    trade_price: Option<&'static str>,
}

const CATEGORIES: &[(&str, &str, &str)] = &[
    (
        "Dresses",
        "dresses",
        "Occasion and everyday dresses",
    ),
    ("Tops", "tops", "Blouses, shirts, and knitwear"),
    ("Accessories", "accessories", "Scarves, belts, and bags"),
];

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Silk Wrap Dress",
        description: "Bias-cut silk wrap dress with a relaxed drape.",
        category: "dresses",
        image: "https://cdn.velour.shop/seed/silk-wrap-dress.jpg",
        sizes: &[("S", "450.00"), ("M", "450.00"), ("L", "475.00")],
        colors: &["Ivory", "Black"],
        trade_price: Some("290.00"),
    },
    SeedProduct {
        name: "Merino Roll Neck",
        description: "Fine-gauge merino roll neck.",
        category: "tops",
        image: "https://cdn.velour.shop/seed/merino-roll-neck.jpg",
        sizes: &[("S", "180.00"), ("M", "180.00"), ("L", "180.00")],
        colors: &["Oat", "Charcoal"],
        trade_price: None,
    },
    SeedProduct {
        name: "Woven Leather Belt",
        description: "Hand-woven vegetable-tanned leather belt.",
        category: "accessories",
        image: "https://cdn.velour.shop/seed/woven-leather-belt.jpg",
        sizes: &[("75", "95.00"), ("85", "95.00"), ("95", "95.00")],
        colors: &["Tan"],
        trade_price: Some("60.00"),
    },
];

/// Seed the catalog with sample categories and products.
///
/// Intended for empty development databases; re-running against seeded
/// data fails on the category unique constraints.
///
/// # Errors
///
/// Returns `CommandError` if any insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;
    let categories = CategoryRepository::new(&pool);
    let products = ProductRepository::new(&pool);

    let mut category_ids = std::collections::HashMap::new();
    for (name, slug, description) in CATEGORIES {
        let category = categories.create(name, slug, Some(description)).await?;
        tracing::info!(category = %name, "Seeded category");
        category_ids.insert(*slug, category.id);
    }

    for seed in PRODUCTS {
        let trade_price = seed
            .trade_price
            .map(str::parse::<Decimal>)
            .transpose()
            .map_err(|e| CommandError::InvalidInput(format!("bad seed price: {e}")))?;

        let sizes = seed
            .sizes
            .iter()
            .map(|(label, price)| {
                Ok(SizeVariant {
                    label: (*label).to_string(),
                    price: price
                        .parse()
                        .map_err(|e| CommandError::InvalidInput(format!("bad seed price: {e}")))?,
                    stock: 25,
                })
            })
            .collect::<Result<Vec<_>, CommandError>>()?;

        let product = products
            .create(ProductInput {
                name: seed.name.to_string(),
                description: Some(seed.description.to_string()),
                category_id: category_ids.get(seed.category).copied(),
                images: vec![seed.image.to_string()],
                sizes,
                colors: seed
                    .colors
                    .iter()
                    .map(|label| ColorVariant {
                        label: (*label).to_string(),
                    })
                    .collect(),
                trade_price,
            })
            .await?;

        tracing::info!(product_id = %product.id, name = %seed.name, "Seeded product");
    }

    tracing::info!("Seed complete");
    Ok(())
}
