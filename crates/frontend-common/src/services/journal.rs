//! Execution journal service

use crate::gate::RequestGate;
use arrosage_http::ClientError;
use arrosage_http::types::{JournalArrosage, JournalInput};
use chrono::NaiveDateTime;
use reqwest::Method;

const JOURNAUX_PATH: &str = "/api/arrosage/journaux";

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Clone)]
pub struct JournalService {
    gate: RequestGate,
}

impl JournalService {
    pub const fn new(gate: RequestGate) -> Self {
        Self { gate }
    }

    pub async fn list(&self) -> Result<Vec<JournalArrosage>, ClientError> {
        let request = self.gate.request(Method::GET, JOURNAUX_PATH);
        self.gate.execute(request).await
    }

    pub async fn get(&self, id: i64) -> Result<JournalArrosage, ClientError> {
        let request = self
            .gate
            .request(Method::GET, &format!("{JOURNAUX_PATH}/{id}"));
        self.gate.execute(request).await
    }

    pub async fn list_by_programme(
        &self,
        programme_id: i64,
    ) -> Result<Vec<JournalArrosage>, ClientError> {
        let request = self
            .gate
            .request(Method::GET, &format!("{JOURNAUX_PATH}/programme/{programme_id}"));
        self.gate.execute(request).await
    }

    pub async fn list_by_parcelle(
        &self,
        parcelle_id: i64,
    ) -> Result<Vec<JournalArrosage>, ClientError> {
        let request = self
            .gate
            .request(Method::GET, &format!("{JOURNAUX_PATH}/parcelle/{parcelle_id}"));
        self.gate.execute(request).await
    }

    /// Entries executed between `start` and `end`
    pub async fn list_by_periode(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<JournalArrosage>, ClientError> {
        let request = self
            .gate
            .request(Method::GET, &format!("{JOURNAUX_PATH}/periode"))
            .query(&[
                ("startDate", start.format(DATE_FORMAT).to_string()),
                ("endDate", end.format(DATE_FORMAT).to_string()),
            ]);
        self.gate.execute(request).await
    }

    pub async fn create(&self, journal: &JournalInput) -> Result<JournalArrosage, ClientError> {
        let request = self.gate.request(Method::POST, JOURNAUX_PATH).json(journal);
        self.gate.execute(request).await
    }

    pub async fn update(
        &self,
        id: i64,
        journal: &JournalInput,
    ) -> Result<JournalArrosage, ClientError> {
        let request = self
            .gate
            .request(Method::PUT, &format!("{JOURNAUX_PATH}/{id}"))
            .json(journal);
        self.gate.execute(request).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let request = self
            .gate
            .request(Method::DELETE, &format!("{JOURNAUX_PATH}/{id}"));
        self.gate.execute_empty(request).await
    }
}
