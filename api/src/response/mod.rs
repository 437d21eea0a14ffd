use serde::Serialize;

/// Envelope for every JSON body the API returns.
///
/// ```json
/// {
///   "success": true,
///   "data": { "paymentId": "5c1f…", "duplicate": false },
///   "message": "Payment recorded"
/// }
/// ```
///
/// Errors use the same shape with `success: false`. `data` is empty unless
/// the error carries detail the caller can act on, such as the field
/// violations of a rejected form:
///
/// ```json
/// {
///   "success": false,
///   "data": [{ "field": "planType", "message": "Plan type must be one of: code, live" }],
///   "message": "Validation failed: planType: Plan type must be one of: code, live"
/// }
/// ```
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// An error response whose `data` is `T::default()`.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }

    /// An error response that still carries a payload.
    pub fn failure(data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            message: message.into(),
        }
    }
}

/// Serializes as `{}`; used as `data` when an error has nothing to add.
#[derive(Debug, Serialize, Default)]
pub struct Empty {}
