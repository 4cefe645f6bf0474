//! Watering programme service

use crate::gate::RequestGate;
use arrosage_http::ClientError;
use arrosage_http::types::{ProgrammeArrosage, ProgrammeInput, StatutProgramme};
use chrono::NaiveDateTime;
use reqwest::Method;

const PROGRAMMES_PATH: &str = "/api/arrosage/programmes";

#[derive(Clone)]
pub struct ProgrammeService {
    gate: RequestGate,
}

impl ProgrammeService {
    pub const fn new(gate: RequestGate) -> Self {
        Self { gate }
    }

    pub async fn list(&self) -> Result<Vec<ProgrammeArrosage>, ClientError> {
        let request = self.gate.request(Method::GET, PROGRAMMES_PATH);
        self.gate.execute(request).await
    }

    pub async fn get(&self, id: i64) -> Result<ProgrammeArrosage, ClientError> {
        let request = self
            .gate
            .request(Method::GET, &format!("{PROGRAMMES_PATH}/{id}"));
        self.gate.execute(request).await
    }

    pub async fn list_by_parcelle(
        &self,
        parcelle_id: i64,
    ) -> Result<Vec<ProgrammeArrosage>, ClientError> {
        let request = self
            .gate
            .request(Method::GET, &format!("{PROGRAMMES_PATH}/parcelle/{parcelle_id}"));
        self.gate.execute(request).await
    }

    pub async fn list_by_statut(
        &self,
        statut: StatutProgramme,
    ) -> Result<Vec<ProgrammeArrosage>, ClientError> {
        let request = self.gate.request(
            Method::GET,
            &format!("{PROGRAMMES_PATH}/statut/{}", statut.as_str()),
        );
        self.gate.execute(request).await
    }

    pub async fn create(&self, programme: &ProgrammeInput) -> Result<ProgrammeArrosage, ClientError> {
        let request = self
            .gate
            .request(Method::POST, PROGRAMMES_PATH)
            .json(programme);
        self.gate.execute(request).await
    }

    pub async fn update(
        &self,
        id: i64,
        programme: &ProgrammeInput,
    ) -> Result<ProgrammeArrosage, ClientError> {
        let request = self
            .gate
            .request(Method::PUT, &format!("{PROGRAMMES_PATH}/{id}"))
            .json(programme);
        self.gate.execute(request).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let request = self
            .gate
            .request(Method::DELETE, &format!("{PROGRAMMES_PATH}/{id}"));
        self.gate.execute_empty(request).await
    }

    /// Let the backend plan a programme from the station's forecast
    pub async fn schedule_with_weather(
        &self,
        parcelle_id: i64,
        station_id: i64,
        date_planifiee: NaiveDateTime,
    ) -> Result<ProgrammeArrosage, ClientError> {
        let request = self
            .gate
            .request(Method::POST, &format!("{PROGRAMMES_PATH}/schedule"))
            .query(&[
                ("parcelleId", parcelle_id.to_string()),
                ("stationId", station_id.to_string()),
                (
                    "datePlanifiee",
                    date_planifiee.format("%Y-%m-%dT%H:%M:%S").to_string(),
                ),
            ]);
        self.gate.execute(request).await
    }
}
