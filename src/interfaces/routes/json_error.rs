use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web, HttpRequest,
};

use crate::errors::{AppError, FieldError};

/// Extraction failures (malformed JSON bodies, unparseable path ids, bad
/// query strings) get the same JSON error envelope as handler failures
/// instead of actix's plain-text defaults.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_payload_error));
    cfg.app_data(web::PathConfig::default().error_handler(path_error));
    cfg.app_data(web::QueryConfig::default().error_handler(query_error));
}

fn json_payload_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(vec![FieldError::new("body", &err.to_string())]).into()
}

/// An id that does not parse cannot address any resource.
fn path_error(_err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::NotFound("Record couldn't be found".into()).into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(vec![FieldError::new("query", &err.to_string())]).into()
}
