use std::borrow::Cow;

use realtor_core::SearchError;
use rmcp::ErrorData;
use rmcp::model::ErrorCode;

fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}

pub fn map_search_err(err: SearchError) -> ErrorData {
    let code = match err {
        SearchError::Validation(_) => ErrorCode::INVALID_PARAMS,
        SearchError::RemoteApi { .. } | SearchError::NoResponse | SearchError::RequestFailed(_) => {
            ErrorCode::INTERNAL_ERROR
        }
    };
    mcp_err(code, err.to_string())
}
