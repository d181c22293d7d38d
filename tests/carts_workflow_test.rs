//! Shopping-cart journeys driven through the typed carts client.

use anyhow::Result;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use stampede_api::{random_cart, FakeStoreApi};
use stampede_config::TestDataConfig;
use stampede_http::HttpMethod;

fn offline_store() -> FakeStoreApi {
    FakeStoreApi::offline(TestDataConfig::default()).unwrap()
}

#[tokio::test]
async fn test_cart_create_patch_delete_journey() -> Result<()> {
    let mut store = offline_store();
    let mut rng = StdRng::seed_from_u64(11);
    let cart = random_cart(&mut rng);

    store.client_mut().add_mock(
        HttpMethod::Post,
        "/carts",
        json!({
            "id": 41,
            "userId": cart.user_id,
            "date": cart.date.as_str(),
            "products": []
        }),
    );
    store.client_mut().add_mock(
        HttpMethod::Patch,
        "/carts/41",
        json!({
            "id": 41,
            "userId": 9,
            "date": cart.date.as_str(),
            "products": []
        }),
    );
    store
        .client_mut()
        .add_mock(HttpMethod::Delete, "/carts/41", json!(true));

    let created = store.carts().create(&cart).await?;
    assert_eq!(created.id, Some(41));
    assert_eq!(created.user_id, cart.user_id);

    let patched = store.carts().patch(41, &json!({"userId": 9})).await?;
    assert_eq!(patched.user_id, 9);

    let deleted = store.carts().delete(41).await?;
    assert!(deleted);
    Ok(())
}

#[tokio::test]
async fn test_quarterly_cart_report_window() {
    let mut store = offline_store();
    let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();

    store.client_mut().add_mock(
        HttpMethod::Get,
        "/carts?startdate=2024-04-01&enddate=2024-06-30",
        json!([
            {"id": 1, "userId": 2, "date": "2024-04-15", "products": []},
            {"id": 2, "userId": 5, "date": "2024-06-02", "products": []}
        ]),
    );

    let carts = store.carts().in_date_range(start, end).await.unwrap();
    assert_eq!(carts.len(), 2);
    assert!(carts.iter().all(|cart| cart.date.as_str() >= "2024-04-01"));
}

#[tokio::test]
async fn test_created_cart_shows_up_for_its_user() {
    let mut store = offline_store();
    let mut rng = StdRng::seed_from_u64(23);
    let cart = random_cart(&mut rng);

    store.client_mut().add_mock(
        HttpMethod::Post,
        "/carts",
        json!({
            "id": 12,
            "userId": cart.user_id,
            "date": cart.date.as_str(),
            "products": [{"productId": 3, "quantity": 1}]
        }),
    );
    store.client_mut().add_mock(
        HttpMethod::Get,
        &format!("/carts/user/{}", cart.user_id),
        json!([{
            "id": 12,
            "userId": cart.user_id,
            "date": cart.date.as_str(),
            "products": [{"productId": 3, "quantity": 1}]
        }]),
    );

    let created = store.carts().create(&cart).await.unwrap();
    let owned = store.carts().for_user(cart.user_id).await.unwrap();

    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].id, created.id);
    assert_eq!(owned[0].products[0].product_id, 3);
}

#[tokio::test]
async fn test_batch_lookup_preserves_requested_order() {
    let mut store = offline_store();

    fastrand::seed(7);
    let ids: Vec<u64> = (0..3).map(|_| u64::from(fastrand::u32(1..=50))).collect();
    for id in &ids {
        store.client_mut().add_mock(
            HttpMethod::Get,
            &format!("/carts/{id}"),
            json!({"id": id, "userId": 1, "date": "2024-05-01", "products": []}),
        );
    }

    let carts = store.carts().batch_by_ids(&ids).await;

    assert_eq!(carts.len(), ids.len());
    for (id, cart) in ids.iter().zip(&carts) {
        assert_eq!(cart.as_ref().unwrap().id, Some(*id));
    }
}
