use mapfield_core::ConfigError;
use miette::Diagnostic;
use smol_str::SmolStr;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failure to bring up one field's map. Contained to that field.
#[derive(Debug, Error, Diagnostic)]
pub enum SessionError {
    #[error("no browser document available")]
    #[diagnostic(code(mapfield::session::no_document))]
    NoDocument,

    #[error("element #{0} not found")]
    #[diagnostic(
        code(mapfield::session::missing_element),
        help("the field markup must be on the page before the maps boot")
    )]
    MissingElement(SmolStr),

    #[error("element #{id} is not {expected}")]
    #[diagnostic(code(mapfield::session::wrong_element))]
    WrongElement { id: SmolStr, expected: &'static str },

    #[error("field {0} has no live map")]
    #[diagnostic(code(mapfield::session::not_live))]
    NotLive(SmolStr),

    #[error("mapping provider call failed: {0}")]
    #[diagnostic(code(mapfield::session::provider))]
    Provider(String),
}

impl From<JsValue> for SessionError {
    fn from(err: JsValue) -> Self {
        SessionError::Provider(format!("{err:?}"))
    }
}

/// Failure to request the provider script.
#[derive(Debug, Error, Diagnostic)]
pub enum LoaderError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to inject provider script: {0}")]
    #[diagnostic(code(mapfield::loader::dom))]
    Dom(String),
}

impl From<JsValue> for LoaderError {
    fn from(err: JsValue) -> Self {
        LoaderError::Dom(format!("{err:?}"))
    }
}
