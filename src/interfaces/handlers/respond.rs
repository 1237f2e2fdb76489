use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::errors::AppError;

/// Success envelope without a payload: `{"success": msg}`. The `data` key
/// only appears when there is something to return.
pub fn success(msg: &str) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": msg }))
}

/// Success envelope with a payload: `{"success": msg, "data": ...}`.
pub fn success_with(msg: &str, data: impl Serialize) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": msg, "data": data }))
}

pub fn parse_body<T: DeserializeOwned>(body: &web::Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|_| AppError::validation("Invalid JSON body"))
}

/// Non-empty query parameter, trimmed. Empty strings count as absent so
/// `?status=` places no constraint.
pub fn query_param<'a>(query: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    query
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// 1-based page and page size from the query string, falling back to the
/// given default size. Unparseable values take the defaults.
pub fn page_params(query: &HashMap<String, String>, default_limit: u32) -> (u32, u32) {
    let page = query_param(query, "page")
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|&p| p >= 1)
        .unwrap_or(1);
    let limit = query_param(query, "limit")
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|&l| l >= 1)
        .unwrap_or(default_limit);

    (page, limit)
}

/// Optional numeric limit where zero means "no limit".
pub fn limit_param(query: &HashMap<String, String>, default_limit: u32) -> u32 {
    query_param(query, "limit")
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default_limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_query_values_count_as_absent() {
        let query = q(&[("status", ""), ("search", "  "), ("level", "degree")]);
        assert_eq!(query_param(&query, "status"), None);
        assert_eq!(query_param(&query, "search"), None);
        assert_eq!(query_param(&query, "level"), Some("degree"));
        assert_eq!(query_param(&query, "missing"), None);
    }

    #[test]
    fn page_params_fall_back_on_garbage() {
        let query = q(&[("page", "abc"), ("limit", "-5")]);
        assert_eq!(page_params(&query, 10), (1, 10));

        let query = q(&[("page", "3"), ("limit", "25")]);
        assert_eq!(page_params(&query, 10), (3, 25));

        let query = q(&[("page", "0")]);
        assert_eq!(page_params(&query, 10), (1, 10));
    }

    #[test]
    fn zero_limit_is_preserved_for_unbounded_views() {
        let query = q(&[("limit", "0")]);
        assert_eq!(limit_param(&query, 6), 0);
        assert_eq!(limit_param(&q(&[]), 6), 6);
    }
}
