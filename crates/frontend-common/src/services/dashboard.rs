//! Dashboard aggregation
//!
//! The backend has no dashboard endpoint; figures are derived client-side
//! from the three resource lists, fetched concurrently.

use super::{JournalService, ParcelleService, ProgrammeService};
use crate::gate::RequestGate;
use arrosage_http::ClientError;
use arrosage_http::types::{JournalArrosage, Parcelle, ProgrammeArrosage, StatutProgramme};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Entries taken from each resource list before merging
const PER_KIND: usize = 3;

/// Size of the merged activity feed
const FEED_LEN: usize = 10;

/// Summary figures shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_parcelles: usize,
    pub total_programmes: usize,
    pub total_journaux: usize,
    pub programmes_en_cours: usize,
    pub programmes_planifies: usize,
    pub programmes_termines: usize,
    pub programmes_annules: usize,
    /// m³
    pub volume_prevu_total: f64,
    /// m³
    pub volume_reel_total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dernier_arrosage: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Parcelle,
    Programme,
    Journal,
}

/// One line of the recent activity feed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub id: Option<i64>,
    pub kind: ActivityKind,
    pub title: String,
    pub description: String,
    pub date: Option<NaiveDateTime>,
}

#[derive(Clone)]
pub struct DashboardService {
    parcelles: ParcelleService,
    programmes: ProgrammeService,
    journaux: JournalService,
}

impl DashboardService {
    pub fn new(gate: RequestGate) -> Self {
        Self {
            parcelles: ParcelleService::new(gate.clone()),
            programmes: ProgrammeService::new(gate.clone()),
            journaux: JournalService::new(gate),
        }
    }

    async fn fetch_all(
        &self,
    ) -> Result<(Vec<Parcelle>, Vec<ProgrammeArrosage>, Vec<JournalArrosage>), ClientError> {
        futures::try_join!(
            self.parcelles.list(),
            self.programmes.list(),
            self.journaux.list()
        )
    }

    pub async fn stats(&self) -> Result<DashboardStats, ClientError> {
        let (parcelles, programmes, journaux) = self.fetch_all().await?;
        Ok(compute_stats(&parcelles, &programmes, &journaux))
    }

    pub async fn recent_activity(&self) -> Result<Vec<RecentActivity>, ClientError> {
        let (parcelles, programmes, journaux) = self.fetch_all().await?;
        Ok(recent_activity(&parcelles, &programmes, &journaux))
    }
}

pub fn compute_stats(
    parcelles: &[Parcelle],
    programmes: &[ProgrammeArrosage],
    journaux: &[JournalArrosage],
) -> DashboardStats {
    let count = |statut: StatutProgramme| programmes.iter().filter(|p| p.statut == statut).count();

    DashboardStats {
        total_parcelles: parcelles.len(),
        total_programmes: programmes.len(),
        total_journaux: journaux.len(),
        programmes_en_cours: count(StatutProgramme::EnCours),
        programmes_planifies: count(StatutProgramme::Planifie),
        programmes_termines: count(StatutProgramme::Termine),
        programmes_annules: count(StatutProgramme::Annule),
        volume_prevu_total: programmes.iter().map(|p| p.volume_prevu).sum(),
        volume_reel_total: journaux.iter().map(|j| j.volume_reel).sum(),
        dernier_arrosage: journaux.iter().map(|j| j.date_execution).max(),
    }
}

/// Merge the head of each list into a single feed, newest first
///
/// Undated entries sort after dated ones.
pub fn recent_activity(
    parcelles: &[Parcelle],
    programmes: &[ProgrammeArrosage],
    journaux: &[JournalArrosage],
) -> Vec<RecentActivity> {
    let parcelles = parcelles.iter().take(PER_KIND).map(|p| RecentActivity {
        id: p.id,
        kind: ActivityKind::Parcelle,
        title: format!("Parcelle: {}", p.nom),
        description: format!("Superficie: {} m² - {}", p.superficie, p.culture),
        date: None,
    });

    let programmes = programmes.iter().take(PER_KIND).map(|p| RecentActivity {
        id: p.id,
        kind: ActivityKind::Programme,
        title: p.parcelle_nom.as_ref().map_or_else(
            || format!("Programme: parcelle #{}", p.parcelle_id),
            |nom| format!("Programme: {nom}"),
        ),
        description: format!(
            "Durée: {} min - Volume: {} m³ - {}",
            p.duree, p.volume_prevu, p.statut
        ),
        date: Some(p.date_planifiee),
    });

    let journaux = journaux.iter().take(PER_KIND).map(|j| RecentActivity {
        id: j.id,
        kind: ActivityKind::Journal,
        title: "Arrosage exécuté".to_string(),
        description: format!("Volume: {} m³", j.volume_reel),
        date: Some(j.date_execution),
    });

    let mut feed: Vec<_> = parcelles.chain(programmes).chain(journaux).collect();
    // Option orders None first, so reversing puts undated entries last
    feed.sort_by(|a, b| b.date.cmp(&a.date));
    feed.truncate(FEED_LEN);
    feed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .unwrap()
    }

    fn parcelle(id: i64) -> Parcelle {
        Parcelle {
            id: Some(id),
            nom: format!("P{id}"),
            superficie: 1200.0,
            culture: "Tomate".into(),
        }
    }

    fn programme(id: i64, day: u32, statut: StatutProgramme) -> ProgrammeArrosage {
        ProgrammeArrosage {
            id: Some(id),
            parcelle_id: 1,
            parcelle_nom: Some("Nord".into()),
            date_planifiee: at(day),
            duree: 30,
            volume_prevu: 12.5,
            statut,
        }
    }

    fn journal(id: i64, day: u32, volume: f64) -> JournalArrosage {
        JournalArrosage {
            id: Some(id),
            programme_id: 1,
            parcelle_nom: None,
            date_execution: at(day),
            volume_reel: volume,
            remarque: None,
        }
    }

    #[test]
    fn test_stats_counts_and_totals() {
        let programmes = vec![
            programme(1, 1, StatutProgramme::Planifie),
            programme(2, 2, StatutProgramme::Planifie),
            programme(3, 3, StatutProgramme::EnCours),
            programme(4, 4, StatutProgramme::Annule),
        ];
        let journaux = vec![journal(1, 5, 10.0), journal(2, 12, 4.5), journal(3, 7, 1.0)];

        let stats = compute_stats(&[parcelle(1)], &programmes, &journaux);

        assert_eq!(stats.total_parcelles, 1);
        assert_eq!(stats.total_programmes, 4);
        assert_eq!(stats.total_journaux, 3);
        assert_eq!(stats.programmes_planifies, 2);
        assert_eq!(stats.programmes_en_cours, 1);
        assert_eq!(stats.programmes_termines, 0);
        assert_eq!(stats.programmes_annules, 1);
        assert!((stats.volume_prevu_total - 50.0).abs() < f64::EPSILON);
        assert!((stats.volume_reel_total - 15.5).abs() < f64::EPSILON);
        assert_eq!(stats.dernier_arrosage, Some(at(12)));
    }

    #[test]
    fn test_stats_empty() {
        assert_eq!(compute_stats(&[], &[], &[]), DashboardStats::default());
    }

    #[test]
    fn test_recent_activity_order_and_limit() {
        let parcelles: Vec<_> = (1..=5).map(parcelle).collect();
        let programmes: Vec<_> = (1..=5)
            .map(|i| programme(i, u32::try_from(i).unwrap(), StatutProgramme::Termine))
            .collect();
        let journaux: Vec<_> = (1..=5)
            .map(|i| journal(i, u32::try_from(i).unwrap() + 10, 1.0))
            .collect();

        let feed = recent_activity(&parcelles, &programmes, &journaux);

        assert_eq!(feed.len(), 9);
        assert_eq!(feed[0].kind, ActivityKind::Journal);
        assert_eq!(feed[0].date, Some(at(13)));
        assert_eq!(feed[3].kind, ActivityKind::Programme);
        assert_eq!(feed[3].date, Some(at(3)));
        assert!(feed[6..].iter().all(|a| a.kind == ActivityKind::Parcelle));
        assert!(feed.windows(2).all(|w| w[0].date >= w[1].date || w[1].date.is_none()));
    }

    #[test]
    fn test_recent_activity_labels() {
        let feed = recent_activity(&[], &[programme(7, 1, StatutProgramme::EnCours)], &[]);
        assert_eq!(feed[0].title, "Programme: Nord");
        assert_eq!(feed[0].description, "Durée: 30 min - Volume: 12.5 m³ - En cours");
    }
}
