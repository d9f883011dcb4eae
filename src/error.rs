use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures raised by the browser glue. None of these are fatal to a running
/// session; callers inside the frame loop log and carry on.
#[derive(Debug, Error)]
pub enum ValentineError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("missing element #{0}")]
    MissingElement(&'static str),
    #[error("dom call failed: {0}")]
    Dom(String),
    #[error("audio unavailable: {0}")]
    Audio(String),
}

pub type Result<T> = std::result::Result<T, ValentineError>;

impl ValentineError {
    pub(crate) fn dom(err: JsValue) -> Self {
        Self::Dom(describe(&err))
    }

    pub(crate) fn audio(err: JsValue) -> Self {
        Self::Audio(describe(&err))
    }
}

impl From<ValentineError> for JsValue {
    fn from(err: ValentineError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
