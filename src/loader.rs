use crate::constants::LOAD_RETRY_LIMIT;
use showcase_core::{decode_gltf, AssetLoadError, EntityError, LoadTicket, Scene};
use std::cell::RefCell;
use std::rc::Weak;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Fetch `url` and return the response body.
pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, AssetLoadError> {
    let fetch_err = |e: wasm_bindgen::JsValue| AssetLoadError::Fetch(format!("{}: {:?}", url, e));
    let window = web::window().ok_or_else(|| AssetLoadError::Fetch("no window".into()))?;
    let resp: web::Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(fetch_err)?
        .dyn_into()
        .map_err(fetch_err)?;
    if !resp.ok() {
        return Err(AssetLoadError::Fetch(format!("{}: HTTP {}", url, resp.status())));
    }
    let buf = JsFuture::from(resp.array_buffer().map_err(fetch_err)?)
        .await
        .map_err(fetch_err)?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

/// Run one entity's load in the background. The future only holds a weak
/// reference to the scene and re-checks the ticket after every await.
pub fn spawn_load(scene: Weak<RefCell<Scene>>, ticket: LoadTicket) {
    spawn_local(async move {
        load_with_retry(scene, ticket).await;
    });
}

async fn load_with_retry(scene: Weak<RefCell<Scene>>, mut ticket: LoadTicket) {
    let mut attempt = 0u32;
    loop {
        let result = match fetch_bytes(&ticket.source).await {
            Ok(bytes) => decode_gltf(&bytes).await,
            Err(e) => Err(e),
        };
        if ticket.is_cancelled() {
            log::debug!("[load] {} cancelled", ticket.source);
            return;
        }
        let Some(scene_rc) = scene.upgrade() else {
            return;
        };
        let mut scene_ref = scene_rc.borrow_mut();
        match scene_ref.complete_load(&ticket, result) {
            Ok(()) => return,
            Err(EntityError::AssetLoad(e)) if e.is_transient() && attempt < LOAD_RETRY_LIMIT => {
                attempt += 1;
                log::warn!("[load] retry {} for {} ({})", attempt, ticket.source, e);
                match scene_ref.retry_load(ticket.entity) {
                    Ok(next) => ticket = next,
                    Err(e) => {
                        log::error!("[load] cannot retry {}: {}", ticket.source, e);
                        return;
                    }
                }
            }
            Err(EntityError::StaleLoad) | Err(EntityError::Disposed) => {
                log::debug!("[load] dropped result for {}", ticket.source);
                return;
            }
            Err(e) => {
                log::error!("[load] giving up on {}: {}", ticket.source, e);
                return;
            }
        }
    }
}
