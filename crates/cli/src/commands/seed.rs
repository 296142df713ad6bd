//! Catalog seeding command.
//!
//! Inserts a small fixture catalog for local development. Existing slugs are
//! skipped rather than overwritten.

use marigold_api::db::RepositoryError;
use marigold_api::db::products::{ProductInput, ProductRepository};
use marigold_api::models::Color;

/// Seed the catalog with fixture products.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    let products = ProductRepository::new(&pool);

    let mut inserted = 0usize;
    for input in fixtures() {
        match products.create(&input).await {
            Ok(product) => {
                tracing::info!(slug = %product.slug, "seeded product");
                inserted += 1;
            }
            Err(RepositoryError::Conflict(_)) => {
                tracing::info!(slug = %input.slug, "already present, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(inserted, "Seeding complete!");
    Ok(())
}

fn product(
    slug: &str,
    name: &str,
    description: &str,
    price: &str,
    category: &str,
) -> ProductInput {
    ProductInput {
        slug: slug.to_owned(),
        name: name.to_owned(),
        description: description.to_owned(),
        full_description: None,
        price: price.parse().unwrap_or_default(),
        original_price: None,
        images: vec![format!("/images/products/{slug}.jpg")],
        category: category.to_owned(),
        subcategory: None,
        rating: 0.0,
        review_count: 0,
        is_new: false,
        is_featured: false,
        available_sizes: vec!["XS", "S", "M", "L", "XL"]
            .into_iter()
            .map(str::to_owned)
            .collect(),
        colors: vec![Color {
            name: "Black".to_owned(),
            hex: "#000000".to_owned(),
        }],
        material: None,
        stock: 25,
    }
}

fn fixtures() -> Vec<ProductInput> {
    let mut items = vec![
        product(
            "ribbed-tank-top",
            "Ribbed Tank Top",
            "A soft ribbed tank in stretch cotton.",
            "20.00",
            "tops",
        ),
        product(
            "wide-leg-trousers",
            "Wide Leg Trousers",
            "High-waisted trousers with a relaxed drape.",
            "64.00",
            "bottoms",
        ),
        product(
            "boxy-linen-shirt",
            "Boxy Linen Shirt",
            "Breathable linen shirt with a boxy cut.",
            "48.00",
            "tops",
        ),
        product(
            "midi-slip-dress",
            "Midi Slip Dress",
            "Bias-cut slip dress in washed satin.",
            "79.00",
            "dresses",
        ),
        product(
            "oversized-knit-cardigan",
            "Oversized Knit Cardigan",
            "Chunky knit cardigan with dropped shoulders.",
            "89.00",
            "knitwear",
        ),
    ];

    if let Some(first) = items.first_mut() {
        first.is_featured = true;
        first.is_new = true;
        first.rating = 4.6;
        first.review_count = 12;
    }

    items
}
