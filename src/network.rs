//! Network constants for the price feed.

/// Default price-aggregation endpoint.
pub const DEFAULT_ENDPOINT_URL: &str =
    "https://redfulp5b9.execute-api.us-east-1.amazonaws.com/lambda_function";

/// Value of the `range` query parameter. Only the one-day range is requested.
pub const DEFAULT_RANGE: &str = "1D";
