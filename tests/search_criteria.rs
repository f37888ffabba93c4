//! Criteria search: substring match on the construction model, brand flags
//! over the tag set, exact equality on the scalar columns, and the
//! not-found outcomes.

mod common;

use car_inventory::{Criteria, DataError, EngineKind, NewCar, NewConstruction, ReadService, WriteService};
use common::{attrs, services};

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Seeds three cars with distinct constructions, tags and scalars.
async fn seed(writer: &WriteService) -> TestResult {
    let mut sedan = attrs("WDB0000000000001");
    sedan.tags = ["MERCEDES".to_string()].into_iter().collect();
    sedan.rating = 5;
    sedan.engine = EngineKind::Combustion;
    sedan.price = 52000.0;
    sedan.available = true;
    writer
        .create(NewCar {
            attrs: sedan,
            construction: NewConstruction {
                model: "Sedan Alpha".to_string(),
                variant: "Limousine".to_string(),
            },
        })
        .await?;

    let mut kombi = attrs("WDB0000000000002");
    kombi.tags = ["AUDI".to_string()].into_iter().collect();
    kombi.rating = 4;
    kombi.engine = EngineKind::Electric;
    kombi.price = 39990.0;
    kombi.available = false;
    writer
        .create(NewCar {
            attrs: kombi,
            construction: NewConstruction {
                model: "Kombi Beta".to_string(),
                variant: "Kombi".to_string(),
            },
        })
        .await?;

    let mut roadster = attrs("WDB0000000000003");
    roadster.rating = 3;
    roadster.engine = EngineKind::Electric;
    roadster.price = 61500.0;
    roadster.available = true;
    writer
        .create(NewCar {
            attrs: roadster,
            construction: NewConstruction {
                model: "Roadster Gamma".to_string(),
                variant: "Cabrio".to_string(),
            },
        })
        .await?;

    Ok(())
}

async fn seeded() -> Result<ReadService, Box<dyn std::error::Error>> {
    let (reader, writer) = services();
    seed(&writer).await?;
    Ok(reader)
}

#[tokio::test]
async fn empty_criteria_return_every_car() -> TestResult {
    let reader = seeded().await?;
    let cars = reader.find(&Criteria::new()).await?;
    assert_eq!(cars.len(), 3);
    Ok(())
}

#[tokio::test]
async fn construction_substring_match_is_case_insensitive() -> TestResult {
    let reader = seeded().await?;

    for needle in ["sedan", "SEDAN", "edAn"] {
        let cars = reader.find(&Criteria::new().with("construction", needle)).await?;
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].construction.model, "Sedan Alpha");
    }

    // A one-letter needle spans all three models.
    let cars = reader.find(&Criteria::new().with("construction", "a")).await?;
    assert_eq!(cars.len(), 3);
    Ok(())
}

#[tokio::test]
async fn unmatched_construction_is_not_found() -> TestResult {
    let reader = seeded().await?;
    let err = reader
        .find(&Criteria::new().with("construction", "zzz-unlikely"))
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn unknown_criteria_key_is_not_found() -> TestResult {
    let reader = seeded().await?;
    let err = reader
        .find(&Criteria::new().with("bogusField", "x"))
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::NotFound(message) if message == "invalid search criteria"));
    Ok(())
}

#[tokio::test]
async fn brand_flags_filter_by_tag() -> TestResult {
    let reader = seeded().await?;

    let cars = reader.find(&Criteria::new().with("mercedes", "true")).await?;
    assert_eq!(cars.len(), 1);
    assert_eq!(cars[0].vin, "WDB0000000000001");

    // The boolean spelling behaves like the string one.
    let cars = reader.find(&Criteria::new().with("audi", true)).await?;
    assert_eq!(cars.len(), 1);
    assert_eq!(cars[0].vin, "WDB0000000000002");
    Ok(())
}

#[tokio::test]
async fn clauses_conjoin() -> TestResult {
    let reader = seeded().await?;

    let cars = reader
        .find(&Criteria::new().with("mercedes", "true").with("available", "true"))
        .await?;
    assert_eq!(cars.len(), 1);

    // The tagged Audi is not available, so the conjunction is empty.
    let err = reader
        .find(&Criteria::new().with("audi", "true").with("available", true))
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn equality_on_scalar_columns() -> TestResult {
    let reader = seeded().await?;

    let cars = reader.find(&Criteria::new().with("engine", "ELECTRIC")).await?;
    assert_eq!(cars.len(), 2);

    // Query-parameter style string values are coerced to the column type.
    let cars = reader.find(&Criteria::new().with("rating", "4")).await?;
    assert_eq!(cars.len(), 1);
    assert_eq!(cars[0].vin, "WDB0000000000002");

    let cars = reader.find(&Criteria::new().with("price", 61500.0)).await?;
    assert_eq!(cars.len(), 1);
    assert_eq!(cars[0].vin, "WDB0000000000003");

    let cars = reader
        .find(&Criteria::new().with("vin", "WDB0000000000001"))
        .await?;
    assert_eq!(cars.len(), 1);
    assert_eq!(cars[0].construction.model, "Sedan Alpha");
    Ok(())
}

#[tokio::test]
async fn equality_without_matches_is_not_found() -> TestResult {
    let reader = seeded().await?;
    let err = reader
        .find(&Criteria::new().with("rating", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn find_by_id_without_a_row_is_not_found() -> TestResult {
    let (reader, _) = services();
    let err = reader.find_by_id(424_242).await.unwrap_err();
    assert!(matches!(err, DataError::NotFound(_)));
    Ok(())
}
