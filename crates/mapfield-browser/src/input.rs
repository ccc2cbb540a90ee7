//! The bound text input, as seen by a session.

use mapfield_core::FieldInput;
use smol_str::SmolStr;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlInputElement};

use crate::error::SessionError;

/// A reference to the field's `<input>`. The element itself belongs to the
/// page; dropping this never removes it.
#[derive(Clone, Debug)]
pub struct DomInput {
    element: HtmlInputElement,
}

impl DomInput {
    pub fn new(element: HtmlInputElement) -> Self {
        Self { element }
    }

    /// Look up the input by id.
    pub fn find(document: &Document, input_id: &str) -> Result<Self, SessionError> {
        let element = document
            .get_element_by_id(input_id)
            .ok_or_else(|| SessionError::MissingElement(SmolStr::new(input_id)))?;
        let element = element
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| SessionError::WrongElement {
                id: SmolStr::new(input_id),
                expected: "an <input>",
            })?;
        Ok(Self::new(element))
    }

    pub fn element(&self) -> &HtmlInputElement {
        &self.element
    }
}

impl FieldInput for DomInput {
    fn value(&self) -> String {
        self.element.value()
    }

    fn set_value(&mut self, value: &str) {
        self.element.set_value(value);
    }
}
