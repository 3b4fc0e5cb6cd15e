use locator::database::DatabaseError;

pub mod resource;

pub(crate) fn convert_error(why: sqlx::Error) -> DatabaseError {
    match why {
        sqlx::Error::RowNotFound => DatabaseError::NotFound,
        _ => DatabaseError::Other(Box::new(why)),
    }
}

/// Escapes `LIKE` metacharacters so `value` only ever matches literally.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `%value%` with `value` escaped.
pub fn contains_pattern(value: &str) -> String {
    format!("%{}%", escape_like(value))
}
