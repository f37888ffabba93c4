//! Shared fixtures: sample cars, wired services, and test mailers.

#![allow(dead_code)]

use async_trait::async_trait;
use car_inventory::{
    CarAttrs, EngineKind, MemoryCarStore, NewCar, NewConstruction, Notifier, NullMailer,
    ReadService, WriteService,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;

pub fn attrs(vin: &str) -> CarAttrs {
    CarAttrs {
        vin: vin.to_string(),
        rating: 5,
        engine: EngineKind::Combustion,
        price: 44990.0,
        discount: 0.05,
        available: true,
        release_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        homepage: "https://cars.example.com/".to_string(),
        tags: BTreeSet::new(),
    }
}

pub fn new_car(vin: &str, model: &str) -> NewCar {
    NewCar {
        attrs: attrs(vin),
        construction: NewConstruction {
            model: model.to_string(),
            variant: "Basis".to_string(),
        },
    }
}

/// Wires both services onto a fresh in-memory store.
pub fn services() -> (ReadService, WriteService) {
    services_with_mailer(Arc::new(NullMailer))
}

pub fn services_with_mailer(mailer: Arc<dyn Notifier>) -> (ReadService, WriteService) {
    let store = Arc::new(MemoryCarStore::new());
    let reader = ReadService::new(store.clone());
    let writer = WriteService::new(store, reader.clone(), mailer);
    (reader, writer)
}

/// Captures every notification instead of delivering it.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Notifier for RecordingMailer {
    async fn notify(&self, subject: &str, body: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .await
            .push((subject.to_string(), body.to_string()));
        Ok(())
    }
}

/// Fails every delivery attempt.
pub struct FailingMailer;

#[async_trait]
impl Notifier for FailingMailer {
    async fn notify(&self, _subject: &str, _body: &str) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("mail gateway unreachable"))
    }
}
