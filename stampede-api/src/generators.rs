//! Randomized payload generators
//!
//! Behaviors that exercise write endpoints need fresh payloads on every
//! iteration. Generators draw from a caller-supplied [`Rng`] so tests can
//! seed them deterministically.

use chrono::Utc;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::records::{Cart, CartItem, NewProduct, NewUser};

/// Builds a product payload with a randomized title, price and category.
///
/// `category_ids` is the pool of known-good category ids; an empty pool
/// falls back to category 1.
pub fn random_product(rng: &mut impl Rng, category_ids: &[u32]) -> NewProduct {
    NewProduct {
        title: format!("Performance Test Product {}", rng.random_range(1..=10_000)),
        price: round_price(rng.random_range(10.0..1010.0)),
        description: "Randomized product payload for load generation".to_string(),
        category_id: category_ids.choose(rng).copied().map(u64::from).unwrap_or(1),
        images: vec!["https://via.placeholder.com/640x480.png".to_string()],
    }
}

/// Builds a user payload with a randomized identity.
pub fn random_user(rng: &mut impl Rng) -> NewUser {
    let id = rng.random_range(1..=100_000);
    NewUser {
        name: format!("Perf User {id}"),
        email: format!("perftest{id}@example.com"),
        password: "testpass123".to_string(),
        avatar: "https://via.placeholder.com/150".to_string(),
    }
}

/// Builds a cart payload dated today with one to five line items.
pub fn random_cart(rng: &mut impl Rng) -> Cart {
    let items = rng.random_range(1..=5);
    let products = (0..items)
        .map(|_| CartItem {
            product_id: rng.random_range(1..=20),
            quantity: rng.random_range(1..=5),
        })
        .collect();

    Cart {
        id: None,
        user_id: rng.random_range(1..=10),
        date: Utc::now().date_naive().to_string(),
        products,
    }
}

fn round_price(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_product_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let product = random_product(&mut rng, &[1, 2, 3, 4, 5]);
            assert!(product.title.starts_with("Performance Test Product "));
            assert!(product.price >= 10.0 && product.price < 1010.0);
            assert!((1..=5).contains(&product.category_id));
        }
    }

    #[test]
    fn test_random_product_empty_pool_falls_back() {
        let mut rng = StdRng::seed_from_u64(42);
        let product = random_product(&mut rng, &[]);
        assert_eq!(product.category_id, 1);
    }

    #[test]
    fn test_random_price_has_two_decimals() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let product = random_product(&mut rng, &[1]);
            let cents = product.price * 100.0;
            assert!((cents - cents.round()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_random_user_identity_is_consistent() {
        let mut rng = StdRng::seed_from_u64(1);
        let user = random_user(&mut rng);
        let id: String = user.email.chars().filter(char::is_ascii_digit).collect();
        assert!(user.name.ends_with(&id));
        assert!(user.email.starts_with("perftest"));
        assert!(user.email.ends_with("@example.com"));
    }

    #[test]
    fn test_random_cart_shape() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            let cart = random_cart(&mut rng);
            assert!(cart.id.is_none());
            assert!((1..=10).contains(&cart.user_id));
            assert!(!cart.products.is_empty() && cart.products.len() <= 5);
            for item in &cart.products {
                assert!((1..=20).contains(&item.product_id));
                assert!((1..=5).contains(&item.quantity));
            }
            // ISO calendar date, e.g. 2026-08-23
            assert_eq!(cart.date.len(), 10);
            assert_eq!(&cart.date[4..5], "-");
        }
    }
}
