//! Exact refinement of a candidate set: true great-circle distance, radius
//! cut and ordering.

use model::{ResourceEntry, WithDistance, WithId};

use crate::SearchQuery;

pub type RankedResult = WithDistance<ResourceEntry>;

#[derive(Debug, Clone, Default)]
pub struct Ranking {
    /// Nearest first; equal distances keep their candidate order.
    pub results: Vec<RankedResult>,
    /// Candidates dropped for lacking a usable coordinate pair.
    pub unlocated: usize,
    /// Candidates inside the bounding box but outside the circle.
    pub outside_radius: usize,
}

impl Ranking {
    pub fn dropped(&self) -> usize {
        self.unlocated + self.outside_radius
    }
}

pub fn rank<I>(latitude: f64, longitude: f64, radius_km: f64, candidates: I) -> Ranking
where
    I: IntoIterator<Item = ResourceEntry>,
{
    let mut ranking = Ranking::default();
    for WithId { id, content } in candidates {
        let Some(located) = content.with_distance_to(latitude, longitude) else {
            ranking.unlocated += 1;
            continue;
        };
        if located.distance_km <= radius_km {
            ranking.results.push(located.with_id(id));
        } else {
            ranking.outside_radius += 1;
        }
    }
    // sort_by is stable
    ranking
        .results
        .sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranking
}

pub fn rank_query<I>(query: &SearchQuery, candidates: I) -> Ranking
where
    I: IntoIterator<Item = ResourceEntry>,
{
    rank(
        query.latitude(),
        query.longitude(),
        query.radius_km(),
        candidates,
    )
}
