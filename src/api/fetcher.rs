use log::{debug, warn};

use crate::{
    api::Transport,
    error::ApiError,
    model::{FetchResult, PageQuery},
};

/// Loads one page of the collection.
///
/// Malformed responses do not fail the fetch; they degrade to an empty
/// result so the view keeps working.
pub async fn fetch(
    transport: &impl Transport,
    token: &str,
    query: &PageQuery,
) -> Result<FetchResult, ApiError> {
    let path = query.to_path();
    debug!("fetching {path}");
    let parsed = match transport.get(&path, token).await {
        Ok(value) => FetchResult::parse(value),
        Err(ApiError::Malformed(e)) => Err(e),
        Err(e) => return Err(e),
    };

    match parsed {
        Ok(result) => Ok(result.conform_to(query)),
        Err(e) => {
            warn!("malformed response for {path}, showing empty page: {e}");
            Ok(FetchResult::degraded())
        }
    }
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;
    use serde_json::json;

    use crate::{
        api::mock_transport::{MockTransport, page},
        error::MalformedResponseError,
        model::PageSize,
    };

    use super::*;

    #[fixture]
    fn query() -> PageQuery {
        PageQuery::new(0, assert_ok!(PageSize::try_from(10)), false)
    }

    #[rstest]
    #[tokio::test]
    async fn test_fetch_requests_query_path_with_token(query: PageQuery) {
        let transport = MockTransport::default();
        transport.reply_get(&query.to_path(), Ok(page(&[(1, false), (2, true)], 23)));

        let result = assert_ok!(fetch(&transport, "secret", &query).await);

        assert_eq!(23, result.total_items());
        assert_eq!(2, result.rows().len());
        assert!(!result.is_degraded());
        let calls = transport.calls();
        assert_eq!(1, calls.len());
        assert_eq!("GET /api/messages?page=1&pageSize=10&archived=false", calls[0].key);
        assert_eq!("secret", calls[0].token);
    }

    #[rstest]
    #[case(Ok(json!({ "data": "x", "pagination": { "totalItems": 4 } })))]
    #[case(Ok(json!({ "data": [] })))]
    #[case(Ok(serde_json::Value::Null))]
    #[case(Err(ApiError::Malformed(MalformedResponseError::NotAnObject)))]
    #[tokio::test]
    async fn test_fetch_degrades_malformed_response_to_empty(
        query: PageQuery,
        #[case] reply: Result<serde_json::Value, ApiError>,
    ) {
        let transport = MockTransport::default();
        transport.reply_get(&query.to_path(), reply);

        let result = assert_ok!(fetch(&transport, "secret", &query).await);

        assert!(result.is_degraded());
        assert_is_empty!(result.rows());
        assert_eq!(0, result.total_items());
    }

    #[rstest]
    #[tokio::test]
    async fn test_fetch_propagates_server_error(query: PageQuery) {
        let transport = MockTransport::default();
        transport.reply_get(
            &query.to_path(),
            Err(ApiError::Server {
                status: 500,
                body: "db error\n".to_string(),
            }),
        );

        let error = assert_err!(fetch(&transport, "secret", &query).await);

        assert_matches!(error, ApiError::Server { status: 500, .. });
    }
}
