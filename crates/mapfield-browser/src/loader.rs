//! Load the provider SDK once per page and boot the registered fields.
//!
//! The script is requested at most once no matter how many fields or boot
//! calls the page has. The provider's load callback fires a single shared
//! [`ReadySignal`]; every boot awaits it, waits for layout to settle, and then
//! initializes whatever is still pending.

use std::cell::RefCell;

use gloo_events::EventListener;
use gloo_timers::future::TimeoutFuture;
use mapfield_core::{ProviderSettings, READY_SETTLE_DELAY, ReadySignal};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlScriptElement;

use crate::error::LoaderError;
use crate::fields::MapFields;
use crate::google;

#[derive(Default)]
struct Loader {
    ready: ReadySignal,
    callback: Option<Closure<dyn FnMut()>>,
    requested: bool,
}

thread_local! {
    static LOADER: RefCell<Loader> = RefCell::new(Loader::default());
}

/// The page's provider-ready signal.
pub fn ready_signal() -> ReadySignal {
    LOADER.with(|loader| loader.borrow().ready.clone())
}

/// Whether the provider script has been requested (or found already loaded).
pub fn is_requested() -> bool {
    LOADER.with(|loader| loader.borrow().requested)
}

/// Append the provider script unless this page already did.
///
/// Returns `true` if a script element was added by this call. If the provider
/// is already present on the page the ready signal fires immediately.
pub fn load_provider_once(
    settings: &ProviderSettings,
    with_places: bool,
) -> Result<bool, LoaderError> {
    LOADER.with(|loader| {
        let mut loader = loader.borrow_mut();
        if loader.requested {
            return Ok(false);
        }

        if google::is_loaded() {
            tracing::debug!("mapping provider already on the page");
            loader.requested = true;
            loader.ready.fire();
            return Ok(false);
        }

        if loader.callback.is_none() {
            let ready = loader.ready.clone();
            let callback = Closure::<dyn FnMut()>::new(move || {
                if ready.fire() {
                    tracing::debug!("mapping provider ready");
                }
            });
            js_sys::Reflect::set(
                &js_sys::global(),
                &JsValue::from_str(&settings.callback),
                callback.as_ref(),
            )?;
            loader.callback = Some(callback);
        }

        let url = settings.script_url(with_places)?;
        let script: HtmlScriptElement = gloo_utils::document()
            .create_element("script")?
            .dyn_into()
            .map_err(|_| LoaderError::Dom("created element is not a <script>".into()))?;
        script.set_src(url.as_str());
        script.set_async(true);

        // Never retried: the page has to be reloaded.
        EventListener::once(&script, "error", |_| {
            tracing::warn!("mapping provider script failed to load");
        })
        .forget();

        gloo_utils::head().append_child(&script)?;
        loader.requested = true;
        tracing::debug!(with_places, "mapping provider script requested");
        Ok(true)
    })
}

/// Load the provider if needed, wait for it, then initialize every pending
/// field. Returns how many fields came up.
///
/// Safe to call repeatedly; fields registered after an earlier boot are
/// picked up by the next one.
pub async fn boot(fields: MapFields, settings: ProviderSettings) -> Result<usize, LoaderError> {
    if fields.pending() == 0 {
        return Ok(0);
    }
    load_provider_once(&settings, fields.needs_search())?;

    ready_signal().wait().await;
    TimeoutFuture::new(READY_SETTLE_DELAY.as_millis() as u32).await;

    Ok(fields.initialize_pending())
}
