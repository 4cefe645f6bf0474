//! Parcelle (field) service

use crate::gate::RequestGate;
use arrosage_http::ClientError;
use arrosage_http::types::{Parcelle, ParcelleInput};
use reqwest::Method;

const PARCELLES_PATH: &str = "/api/arrosage/parcelles";

/// Percent-encode a value for use as a single path segment
fn path_segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[derive(Clone)]
pub struct ParcelleService {
    gate: RequestGate,
}

impl ParcelleService {
    pub const fn new(gate: RequestGate) -> Self {
        Self { gate }
    }

    pub async fn list(&self) -> Result<Vec<Parcelle>, ClientError> {
        let request = self.gate.request(Method::GET, PARCELLES_PATH);
        self.gate.execute(request).await
    }

    pub async fn get(&self, id: i64) -> Result<Parcelle, ClientError> {
        let request = self
            .gate
            .request(Method::GET, &format!("{PARCELLES_PATH}/{id}"));
        self.gate.execute(request).await
    }

    pub async fn list_by_culture(&self, culture: &str) -> Result<Vec<Parcelle>, ClientError> {
        let culture = path_segment(culture);
        let request = self
            .gate
            .request(Method::GET, &format!("{PARCELLES_PATH}/culture/{culture}"));
        self.gate.execute(request).await
    }

    pub async fn create(&self, parcelle: &ParcelleInput) -> Result<Parcelle, ClientError> {
        let request = self.gate.request(Method::POST, PARCELLES_PATH).json(parcelle);
        self.gate.execute(request).await
    }

    pub async fn update(&self, id: i64, parcelle: &ParcelleInput) -> Result<Parcelle, ClientError> {
        let request = self
            .gate
            .request(Method::PUT, &format!("{PARCELLES_PATH}/{id}"))
            .json(parcelle);
        self.gate.execute(request).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let request = self
            .gate
            .request(Method::DELETE, &format!("{PARCELLES_PATH}/{id}"));
        self.gate.execute_empty(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::path_segment;

    #[test]
    fn test_path_segment_encoding() {
        assert_eq!(path_segment("blé dur"), "bl%C3%A9%20dur");
        assert_eq!(path_segment("mais/grain"), "mais%2Fgrain");
    }
}
