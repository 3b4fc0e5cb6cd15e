use locator::{
    database::{DatabaseError, Result},
    CandidateFilter,
};
use model::{filter::AttributeFilter, ResourceEntry, ResourceRecord};
use sqlx::{Executor, Postgres};
use utility::{id::Id, let_also::LetAlso};

use super::{contains_pattern, convert_error};
use crate::data_model::{resource::ResourceRow, with_ids};

// Repo

pub async fn get<'c, E>(executor: E, id: &Id<ResourceRecord>) -> Result<ResourceEntry>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as::<_, ResourceRow>(
        "
        SELECT
            id, name, categories, languages, address_line1, city, state,
            postal_code, phone, website, cost_notes, eligibility, lat, lng
        FROM
            resources
        WHERE id = $1;
        ",
    )
    .bind(id.raw())
    .fetch_one(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|row| with_ids(vec![row]))
    .pop()
    .ok_or(DatabaseError::NotFound)
}

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<ResourceEntry>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as::<_, ResourceRow>(
        "
        SELECT
            id, name, categories, languages, address_line1, city, state,
            postal_code, phone, website, cost_notes, eligibility, lat, lng
        FROM
            resources
        ORDER BY id;
        ",
    )
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|rows| Ok(with_ids(rows)))
}

// Candidates

/// Rows inside the bounding box whose category tokens contain the fragment.
/// Matching happens per token so a fragment never spans a delimiter.
pub async fn find_candidates<'c, E>(
    executor: E,
    filter: &CandidateFilter,
) -> Result<Vec<ResourceEntry>>
where
    E: Executor<'c, Database = Postgres>,
{
    let bbox = &filter.bounding_box;
    let category = filter.category.as_deref().map(contains_pattern);
    let limit = i64::try_from(filter.limit).unwrap_or(i64::MAX);

    sqlx::query_as::<_, ResourceRow>(
        "
        SELECT
            id, name, categories, languages, address_line1, city, state,
            postal_code, phone, website, cost_notes, eligibility, lat, lng
        FROM
            resources
        WHERE
            lat IS NOT NULL
            AND lng IS NOT NULL
            AND lat BETWEEN $1 AND $2
            AND lng BETWEEN $3 AND $4
            AND (
                $5::TEXT IS NULL
                OR EXISTS (
                    SELECT 1
                    FROM unnest(string_to_array(categories, ',')) AS token
                    WHERE btrim(token) ILIKE $5
                )
            )
        ORDER BY id
        LIMIT $6;
        ",
    )
    .bind(bbox.min_lat)
    .bind(bbox.max_lat)
    .bind(bbox.min_lng)
    .bind(bbox.max_lng)
    .bind(category)
    .bind(limit)
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|rows| Ok(with_ids(rows)))
}

// Browse

pub async fn find_by_attributes<'c, E>(
    executor: E,
    filter: &AttributeFilter,
) -> Result<Vec<ResourceEntry>>
where
    E: Executor<'c, Database = Postgres>,
{
    let category = filter.category.as_deref().map(contains_pattern);
    let language = filter.language.as_deref().map(contains_pattern);

    sqlx::query_as::<_, ResourceRow>(
        "
        SELECT
            id, name, categories, languages, address_line1, city, state,
            postal_code, phone, website, cost_notes, eligibility, lat, lng
        FROM
            resources
        WHERE
            ($1::TEXT IS NULL OR lower(btrim(city)) = lower($1))
            AND (
                $2::TEXT IS NULL
                OR EXISTS (
                    SELECT 1
                    FROM unnest(string_to_array(categories, ',')) AS token
                    WHERE btrim(token) ILIKE $2
                )
            )
            AND (
                $3::TEXT IS NULL
                OR EXISTS (
                    SELECT 1
                    FROM unnest(string_to_array(languages, ',')) AS token
                    WHERE btrim(token) ILIKE $3
                )
            )
        ORDER BY id;
        ",
    )
    .bind(filter.city.as_deref())
    .bind(category)
    .bind(language)
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|rows| Ok(with_ids(rows)))
}
