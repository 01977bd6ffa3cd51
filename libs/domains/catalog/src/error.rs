use axum::response::IntoResponse;
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

/// Catalog domain errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product with id {0} not found")]
    NotFound(i32),

    /// The database rejected a query because a column is missing from the
    /// live schema. Classified here, at the data-source boundary, so
    /// callers can match on the column name instead of sniffing strings.
    #[error("Column '{column}' does not exist")]
    UnknownColumn { column: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<DbErr> for CatalogError {
    fn from(err: DbErr) -> Self {
        let message = err.to_string();
        if let Some(column) = missing_column(&message) {
            return CatalogError::UnknownColumn { column };
        }
        CatalogError::Database(message)
    }
}

/// Extract the column name from a Postgres undefined-column message,
/// e.g. `column "rating" does not exist` or
/// `column products.rating does not exist`.
fn missing_column(message: &str) -> Option<String> {
    if !message.contains("does not exist") {
        return None;
    }
    let rest = message.split("column ").nth(1)?;
    let name = rest
        .split(" does not exist")
        .next()?
        .trim()
        .trim_matches('"');
    let name = name.rsplit('.').next()?.trim_matches('"');
    if name.is_empty() {
        None
    } else {
        Some(name.to_owned())
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => {
                AppError::NotFound(format!("Product with id {id} not found"))
            }
            CatalogError::UnknownColumn { column } => AppError::DatabaseColumnNotFound(column),
            CatalogError::Database(msg) => AppError::InternalServerError(msg),
            CatalogError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> axum::response::Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn classifies_quoted_missing_column() {
        let err = DbErr::Custom(
            "Query Error: error returned from database: column \"rating\" does not exist"
                .to_string(),
        );
        match CatalogError::from(err) {
            CatalogError::UnknownColumn { column } => assert_eq!(column, "rating"),
            other => panic!("expected UnknownColumn, got {other:?}"),
        }
    }

    #[test]
    fn classifies_qualified_missing_column() {
        let err = DbErr::Custom("column products.rating does not exist".to_string());
        match CatalogError::from(err) {
            CatalogError::UnknownColumn { column } => assert_eq!(column, "rating"),
            other => panic!("expected UnknownColumn, got {other:?}"),
        }
    }

    #[test]
    fn other_db_errors_stay_database() {
        let err = DbErr::Custom("connection reset by peer".to_string());
        assert!(matches!(CatalogError::from(err), CatalogError::Database(_)));
    }

    #[test]
    fn relation_does_not_exist_without_column_is_database() {
        let err = DbErr::Custom("relation \"products\" does not exist".to_string());
        assert!(matches!(CatalogError::from(err), CatalogError::Database(_)));
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = CatalogError::NotFound(42).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unknown_column_maps_to_500() {
        let response = CatalogError::UnknownColumn {
            column: "rating".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unknown_column_carries_the_column_error_code() {
        let app_err = AppError::from(CatalogError::UnknownColumn {
            column: "rating".to_string(),
        });
        assert!(matches!(
            app_err,
            AppError::DatabaseColumnNotFound(ref column) if column == "rating"
        ));
    }
}
