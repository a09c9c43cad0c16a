use crate::error::FetchError;
use chrono::NaiveDate;

pub const COUNTRY_CODE: &str = "US";
pub const ACTIVE_STATUS: &str = "active";
pub const MEDIA_TYPES: &str = "image";
pub const PLATFORMS: [&str; 2] = ["facebook", "instagram"];
pub const AD_TYPE: &str = "all";

/// A validated search over the ad library.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub page_limit: u32,
}

impl SearchRequest {
    pub fn new(
        query: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        page_limit: u32,
    ) -> Result<Self, FetchError> {
        if start_date > end_date {
            return Err(FetchError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }
        if page_limit == 0 {
            return Err(FetchError::InvalidPageLimit);
        }

        Ok(Self {
            query: query.into(),
            start_date,
            end_date,
            page_limit,
        })
    }

    /// Query string parameters for one page. The continuation token, when
    /// present, is always the last parameter.
    pub fn query_params(&self, continuation_token: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("query", self.query.clone()),
            ("country_code", COUNTRY_CODE.to_string()),
            ("active_status", ACTIVE_STATUS.to_string()),
            ("media_types", MEDIA_TYPES.to_string()),
            ("platform", PLATFORMS.join(",")),
            ("start_min_date", self.start_date.format("%Y-%m-%d").to_string()),
            ("start_max_date", self.end_date.format("%Y-%m-%d").to_string()),
            ("ad_type", AD_TYPE.to_string()),
        ];
        if let Some(token) = continuation_token {
            params.push(("continuation_token", token.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rejects_start_after_end() {
        let result = SearchRequest::new("Cosmetics", date(2024, 2, 1), date(2024, 1, 1), 1);
        assert!(matches!(result, Err(FetchError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_accepts_same_day_range() {
        let request = SearchRequest::new("Cosmetics", date(2024, 1, 1), date(2024, 1, 1), 1).unwrap();
        assert_eq!(request.start_date, request.end_date);
    }

    #[test]
    fn test_rejects_zero_page_limit() {
        let result = SearchRequest::new("Cosmetics", date(2024, 1, 1), date(2024, 1, 31), 0);
        assert!(matches!(result, Err(FetchError::InvalidPageLimit)));
    }

    #[test]
    fn test_query_params() {
        let request = SearchRequest::new("Cosmetics", date(2024, 1, 1), date(2024, 1, 31), 3).unwrap();

        let params = request.query_params(None);
        assert_eq!(params.len(), 8);
        assert!(params.contains(&("query", "Cosmetics".to_string())));
        assert!(params.contains(&("platform", "facebook,instagram".to_string())));
        assert!(params.contains(&("start_min_date", "2024-01-01".to_string())));
        assert!(params.contains(&("start_max_date", "2024-01-31".to_string())));
        assert!(params.iter().all(|(k, _)| *k != "continuation_token"));

        let params = request.query_params(Some("next"));
        assert_eq!(params.last(), Some(&("continuation_token", "next".to_string())));
    }
}
